//! Decoders for the two tagged binary formats shipped with a chart package.
//!
//! Both formats are a sequence of one-byte tags, each announcing how the
//! following bytes are read. The chart decoder rejects anything it does not
//! know; the catalog decoder skips it.

pub mod catalog;
pub mod chart;
mod error;
pub mod reader;

pub use catalog::decode_catalog;
pub use chart::decode_chart;
pub use error::FormatError;
pub use reader::TagReader;
