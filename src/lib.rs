#![allow(non_snake_case)]

mod batch;
pub mod converter;
pub mod decoder;
mod model;
mod util;

pub use batch::*;
pub use converter::{
    ChartTime, ConvertError, ConvertedChart, TransformError, Zone, convert_chart, transform,
};
pub use decoder::{FormatError, TagReader, decode_catalog, decode_chart};
pub use model::catalog::*;
pub use model::chart::*;
pub use model::config::*;
pub use model::difficulty::*;
pub use model::mapper::*;
pub use model::note::*;
pub use util::*;
