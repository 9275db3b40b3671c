//! Copying the display to the system clipboard.

use super::state::{ERROR_MARKER, SEPARATOR};
use arboard::Clipboard;

/// The text `:copy` would place on the clipboard for `display`.
///
/// The error marker and half-typed value lists are refused, and a dangling
/// decimal point is dropped (`7.` copies as `7`).
pub fn clipboard_text(display: &str) -> Result<&str, String> {
    if display == ERROR_MARKER {
        return Err("Nothing to copy: the display shows an error".to_string());
    }
    if display.ends_with(SEPARATOR) {
        return Err("Nothing to copy: the value list is incomplete".to_string());
    }
    Ok(display.strip_suffix('.').unwrap_or(display))
}

/// Copy the current display value to the system clipboard.
///
/// Returns the copied text, or an error message on failure.
pub fn copy_display(display: &str) -> Result<String, String> {
    let text = clipboard_text(display)?.to_string();

    let mut clipboard =
        Clipboard::new().map_err(|e| format!("Failed to access clipboard: {}", e))?;
    clipboard
        .set_text(text.clone())
        .map_err(|e| format!("Failed to copy to clipboard: {}", e))?;

    tracing::debug!(copied = %text, "copied display to clipboard");
    Ok(text)
}
