//! Transfer date extraction for Spanish-language receipts.
//!
//! The date line of the template reads like `Jueves, 14 marzo 2024 10:32 am`.
//! Weekday and month names come from static tables so that parsing does not
//! depend on the process locale.

use std::collections::HashMap;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::error::{BoucherError, Result};
use crate::models::config::ExtractionConfig;
use crate::ocr::Row;
use crate::receipt::{Extraction, FieldResult, RowExtractor};

/// Separators accepted between the weekday and the day of month, in the
/// order they are tried.
const SEPARATORS: [&str; 3] = [r",\s+", r";\s+", r"\s+"];

/// Date field extractor.
pub struct DateExtractor {
    weekdays: Vec<String>,
    months: HashMap<String, u32>,
    diacritic_fixes: Vec<(String, String)>,
    templates: Vec<Regex>,
}

impl DateExtractor {
    /// Build the extractor and its templates from configured name tables.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let weekdays: Vec<String> = config.weekdays.iter().map(|w| w.to_lowercase()).collect();
        let months: HashMap<String, u32> = config
            .months
            .iter()
            .map(|(name, number)| (name.to_lowercase(), *number))
            .collect();

        let weekday_alt = alternation(weekdays.iter().map(String::as_str));
        let month_alt = alternation(months.keys().map(String::as_str));

        let templates = SEPARATORS
            .iter()
            .map(|sep| {
                Regex::new(&format!(
                    r"(?i)^(?:{weekday_alt}){sep}(?P<day>\d{{1,2}})\s+(?:de\s+)?(?P<month>{month_alt})\s+(?:de\s+)?(?P<year>\d{{4}})$"
                ))
                .map_err(|e| BoucherError::Config(format!("invalid date template: {}", e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            weekdays,
            months,
            diacritic_fixes: config.diacritic_fixes.clone(),
            templates,
        })
    }

    /// Whether any token of the row names a weekday.
    pub fn mentions_weekday(&self, row: &Row) -> bool {
        row.tokens().iter().any(|token| {
            let lower = token.text.to_lowercase();
            self.weekdays.iter().any(|day| lower.contains(day.as_str()))
        })
    }

    /// Restore diacritics and cut the line right after the year.
    pub fn normalize(&self, line: &str) -> String {
        let words: Vec<String> = line
            .split_whitespace()
            .map(|word| {
                let mut word = word.to_string();
                for (from, to) in &self.diacritic_fixes {
                    if word.contains(from.as_str()) {
                        word = word.replace(from.as_str(), to);
                    }
                }
                word
            })
            .collect();

        let end = words
            .iter()
            .position(|w| w.chars().count() == 4 && w.chars().all(|c| c.is_ascii_digit()))
            .map_or(words.len(), |i| i + 1);

        words[..end].join(" ")
    }

    /// Parse a normalized date line, trying each separator template in turn.
    pub fn parse(&self, line: &str) -> Option<NaiveDate> {
        self.templates.iter().find_map(|template| {
            let caps = template.captures(line)?;
            let day: u32 = caps["day"].parse().ok()?;
            let month = *self.months.get(&caps["month"].to_lowercase())?;
            let year: i32 = caps["year"].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
    }
}

impl RowExtractor for DateExtractor {
    fn field(&self) -> &'static str {
        "fecha"
    }

    fn extract<'r>(&self, rows: &'r [Row]) -> Extraction<'r> {
        let Some(index) = rows.iter().position(|row| self.mentions_weekday(row)) else {
            return Extraction::not_found(rows);
        };

        let row = &rows[index];
        let line = self.normalize(&row.text());

        match self.parse(&line) {
            Some(date) => Extraction::found_at(
                rows,
                index,
                FieldResult::found(date.format("%d/%m/%Y").to_string(), row.first_confidence()),
            ),
            None => {
                debug!("Weekday row did not parse as a date: {:?}", line);
                Extraction::not_found(rows)
            }
        }
    }
}

/// Regex alternation of escaped names, longest first.
fn alternation<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = names.collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    names
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}
