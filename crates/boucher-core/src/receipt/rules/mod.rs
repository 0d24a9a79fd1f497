//! Rule-based field extractors for the receipt template.

pub mod amounts;
pub mod dates;
pub mod destination;
pub mod operation;
pub mod patterns;

pub use amounts::AmountExtractor;
pub use dates::DateExtractor;
pub use destination::DestinationExtractor;
pub use operation::OperationNumberExtractor;
