//! salesviz - sales CSV reports rendered as SVG charts

pub mod cli;
pub mod parsers;
pub mod render;
pub mod reports;
pub mod services;
pub mod tui;
pub mod types;
