// In-memory `DisplaySurface` for tests.  Models a viewport `visible_lines`
// tall over the content, scrolled one line per unit.

use super::DisplaySurface;
use crate::theme::Theme;

#[derive(Debug)]
pub(crate) struct MemorySurface {
    pub(crate) text: String,
    pub(crate) editable: bool,
    pub(crate) first_line: usize,
    pub(crate) visible_lines: usize,
    pub(crate) font_size: u32,
    pub(crate) theme: Theme,
    padding: usize,
}

impl MemorySurface {
    pub(crate) fn new(text: &str, visible_lines: usize) -> Self {
        Self {
            text: text.to_owned(),
            editable: true,
            first_line: 0,
            visible_lines,
            font_size: crate::scroll::DEFAULT_FONT_SIZE,
            theme: Theme::Light,
            padding: 0,
        }
    }

    fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Scroll straight to the last page.
    pub(crate) fn scroll_to_end(&mut self) {
        self.first_line = self.line_count().saturating_sub(self.visible_lines);
    }
}

impl DisplaySurface for MemorySurface {
    fn scroll_fraction(&self) -> f64 {
        let total = self.line_count();
        if total <= self.visible_lines {
            return 1.0;
        }
        ((self.first_line + self.visible_lines) as f64 / total as f64).min(1.0)
    }

    fn scroll_by_one_unit(&mut self) {
        if self.first_line + self.visible_lines < self.line_count() {
            self.first_line += 1;
        }
    }

    fn scroll_to_top(&mut self) {
        self.first_line = 0;
    }

    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    fn insert_padding_at_top(&mut self, lines: usize) {
        let pad = "\n".repeat(lines);
        self.text.insert_str(0, &pad);
        self.padding += pad.len();
    }

    fn remove_padding_at_top(&mut self) {
        self.text.drain(..self.padding);
        self.padding = 0;
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.first_line = 0;
        self.padding = 0;
    }

    fn font_size(&self) -> u32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: u32) {
        self.font_size = size;
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}
