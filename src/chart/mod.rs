//! Chart output: static template catalog and the writer

pub mod catalog;
pub mod writer;

pub use writer::{ChartError, ChartWriter};
