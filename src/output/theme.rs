//! Color choices shared by the non-tabular output helpers in
//! [`super::context`]. Table coloring lives in [`super::table`] instead,
//! via `comfy_table::Color`, since `comfy-table` measures cell width itself
//! and mixing in `colored`'s ANSI-wrapped strings there would throw that
//! measurement off.

use colored::Colorize;

#[derive(Debug, Clone, Copy, Default)]
pub struct Theme;

impl Theme {
    pub fn success(&self, text: &str) -> String {
        text.green().to_string()
    }

    pub fn error(&self, text: &str) -> String {
        text.red().bold().to_string()
    }

    pub fn warning(&self, text: &str) -> String {
        text.yellow().to_string()
    }

    pub fn dimmed(&self, text: &str) -> String {
        text.dimmed().to_string()
    }
}
