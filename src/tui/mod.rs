//! Interactive report picker

mod app;
mod theme;
mod widgets;

pub use app::run;
