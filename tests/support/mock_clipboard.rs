use std::sync::{Arc, Mutex};

use vim_interp::traits::Clipboard;

/// Clipboard whose clones share contents, so a test can keep a handle
/// after giving one to the engine.
#[derive(Default, Debug, Clone)]
pub struct MockClipboard {
    content: Arc<Mutex<Option<String>>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.content.lock().unwrap().clone()
    }
}

impl Clipboard for MockClipboard {
    fn set(&mut self, text: String) {
        *self.content.lock().unwrap() = Some(text);
    }
}
