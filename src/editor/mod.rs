// ── Display surface abstraction ───────────────────────────────────────────────
//
// `DisplaySurface` is everything the autoscroll controller and the `App`
// orchestration need from the text view.  The Win32 front end implements it
// on top of Scintilla (`scintilla::ScintillaView`); tests use the in-memory
// `memory::MemorySurface`.
//
// Implementations are only ever called from the UI thread.

#[cfg(test)]
pub(crate) mod memory;
#[cfg(windows)]
pub mod scintilla;

use crate::theme::Theme;

/// The text-viewing widget as seen by the core.
pub(crate) trait DisplaySurface {
    /// Bottom edge of the viewport as a fraction of the content height.
    /// `1.0` means the end of the document is visible.
    fn scroll_fraction(&self) -> f64;

    /// Scroll the view down by one line.
    fn scroll_by_one_unit(&mut self);

    /// Scroll back to the first line.
    fn scroll_to_top(&mut self);

    /// Allow or forbid user edits.
    fn set_editable(&mut self, editable: bool);

    /// Insert `lines` blank lines before the first character of the content.
    ///
    /// The padding stays anchored to the start of the document until
    /// `remove_padding_at_top` is called.
    fn insert_padding_at_top(&mut self, lines: usize);

    /// Remove the padding added by `insert_padding_at_top`.  No-op when none
    /// is present.
    fn remove_padding_at_top(&mut self);

    fn text(&self) -> String;

    /// Replace the whole content.
    fn set_text(&mut self, text: &str);

    fn font_size(&self) -> u32;

    fn set_font_size(&mut self, size: u32);

    /// Repaint with the colours of `theme`.
    fn apply_theme(&mut self, theme: Theme);
}
