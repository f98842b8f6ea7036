//! TUI widgets

pub mod help;
pub mod preview;
pub mod report_list;
pub mod spinner;
