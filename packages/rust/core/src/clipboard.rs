//! Clipboard access behind a small trait so presenters can be exercised
//! without a display server.

use presetui_shared::{PresetUiError, Result};

/// Read/write text on a clipboard.
pub trait Clipboard {
    fn get_text(&mut self) -> Result<String>;
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard via `arboard`. The handle is opened per call, so a
/// missing display only fails the operation that needed it.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String> {
        let mut clip = arboard::Clipboard::new().map_err(|e| PresetUiError::Clipboard(e.to_string()))?;
        let text = clip
            .get_text()
            .map_err(|e| PresetUiError::Clipboard(e.to_string()))?;
        Ok(text.replace("\r\n", "\n"))
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clip = arboard::Clipboard::new().map_err(|e| PresetUiError::Clipboard(e.to_string()))?;
        clip.set_text(text.to_owned())
            .map_err(|e| PresetUiError::Clipboard(e.to_string()))
    }
}

/// In-process clipboard for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: String,
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<String> {
        Ok(self.contents.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents = text.to_owned();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_roundtrips() {
        let mut clip = MemoryClipboard::default();
        clip.set_text("python demo.py --verbose").unwrap();
        assert_eq!(clip.get_text().unwrap(), "python demo.py --verbose");
    }

    #[test]
    fn trait_object_usable() {
        let mut boxed: Box<dyn Clipboard> = Box::new(MemoryClipboard::default());
        boxed.set_text("x").unwrap();
        assert_eq!(boxed.get_text().unwrap(), "x");
    }
}
