//! Clipboard targets and the transient "copied" indicator.

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("clipboard unavailable: {message}")]
pub struct ClipboardError {
    pub message: String,
}

impl ClipboardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard held in memory; used by tests and headless callers.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    unavailable: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write.
    pub fn unavailable() -> Self {
        Self {
            contents: Mutex::new(None),
            unavailable: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        match self.contents.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.unavailable {
            return Err(ClipboardError::new("clipboard access denied"));
        }
        match self.contents.lock() {
            Ok(mut guard) => *guard = Some(text.to_string()),
            Err(poisoned) => *poisoned.into_inner() = Some(text.to_string()),
        }
        Ok(())
    }
}

/// Writes an OSC 52 escape so the terminal places `text` on the system
/// clipboard.
pub struct Osc52Clipboard<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        out.write_all(osc52_sequence(text).as_bytes())
            .and_then(|()| out.flush())
            .map_err(|err| ClipboardError::new(err.to_string()))
    }
}

pub fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// A boolean that resets itself after a fixed delay.
///
/// `raise` sets the flag and schedules the reset on the current tokio
/// runtime; raising again restarts the delay. `clear` (and drop) cancel the
/// pending reset. Without a runtime the flag stays up until cleared.
#[derive(Debug, Default)]
pub struct TransientFlag {
    shared: Arc<FlagShared>,
    timer: Option<CancellationToken>,
}

#[derive(Debug, Default)]
struct FlagShared {
    active: AtomicBool,
    epoch: AtomicU64,
}

impl TransientFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    pub fn raise(&mut self, ttl: Duration) {
        self.cancel_timer();
        let epoch = self.shared.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.active.store(true, Ordering::SeqCst);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime; transient flag will not auto-clear");
            return;
        };

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let shared = Arc::clone(&self.shared);
        handle.spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(ttl) => {
                    if shared.epoch.load(Ordering::SeqCst) == epoch {
                        shared.active.store(false, Ordering::SeqCst);
                    }
                }
            }
        });
        self.timer = Some(token);
    }

    pub fn clear(&mut self) {
        self.cancel_timer();
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.shared.active.store(false, Ordering::SeqCst);
    }

    fn cancel_timer(&mut self) {
        if let Some(token) = self.timer.take() {
            token.cancel();
        }
    }
}

impl Drop for TransientFlag {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
