//! Categorical colors

use std::collections::HashMap;

pub const TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

/// Five-color palette of the order share report
pub const SHARE_PALETTE: [&str; 5] = ["#16a085", "#34495e", "#e74c3c", "#f1c40f", "#525a7c"];

pub const BEST_COLOR: &str = "#2ca02c";
pub const WORST_COLOR: &str = "#d62728";
pub const HISTOGRAM_FILL: &str = "#1f77b4";
pub const ERROR_COLOR: &str = "red";
pub const TEXT_COLOR: &str = "#333333";
pub const AXIS_COLOR: &str = "#666666";

/// Assigns palette colors to keys in first-seen order, cycling when the
/// palette runs out. A key keeps its color for the lifetime of the value.
#[derive(Debug, Clone)]
pub struct OrdinalColor {
    palette: Vec<String>,
    assigned: HashMap<String, usize>,
}

impl OrdinalColor {
    pub fn tableau10() -> Self {
        Self::with_palette(&TABLEAU10)
    }

    pub fn with_palette(palette: &[&str]) -> Self {
        let palette: Vec<String> = if palette.is_empty() {
            TABLEAU10.iter().map(|c| c.to_string()).collect()
        } else {
            palette.iter().map(|c| c.to_string()).collect()
        };
        Self {
            palette,
            assigned: HashMap::new(),
        }
    }

    /// Pre-assign colors in the given key order
    pub fn with_domain<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for key in keys {
            self.color(key.as_ref());
        }
        self
    }

    pub fn color(&mut self, key: &str) -> String {
        let next = self.assigned.len();
        let idx = *self.assigned.entry(key.to_string()).or_insert(next);
        self.palette[idx % self.palette.len()].clone()
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

impl Default for OrdinalColor {
    fn default() -> Self {
        Self::tableau10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_assignment_is_stable() {
        let mut colors = OrdinalColor::tableau10();
        let a = colors.color("SET");
        let b = colors.color("THO");
        assert_eq!(a, TABLEAU10[0]);
        assert_eq!(b, TABLEAU10[1]);
        assert_eq!(colors.color("SET"), a);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_palette_cycles() {
        let mut colors = OrdinalColor::with_palette(&SHARE_PALETTE);
        for i in 0..5 {
            colors.color(&format!("g{}", i));
        }
        assert_eq!(colors.color("g5"), SHARE_PALETTE[0]);
    }

    #[test]
    fn test_with_domain_preassigns() {
        let mut colors = OrdinalColor::tableau10().with_domain(["b", "a"]);
        assert_eq!(colors.color("a"), TABLEAU10[1]);
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let mut colors = OrdinalColor::with_palette(&[]);
        assert_eq!(colors.color("x"), TABLEAU10[0]);
    }
}
