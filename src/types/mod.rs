//! Type definitions for salesviz

mod bucket;
mod error;
mod order;

pub use bucket::*;
pub use error::*;
pub use order::*;
