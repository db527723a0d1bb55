//! Panic boundary around the render/event loop
//!
//! A panic anywhere in the loop must not leave the terminal in raw mode
//! with a half-drawn alternate screen. The boundary catches the unwind,
//! records the payload and a backtrace, and turns it into an error the
//! shell reports after teardown. Not recoverable: the user restarts.

use anyhow::{anyhow, Result};
use std::backtrace::Backtrace;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;
use tracing::error;

#[derive(Debug, Clone)]
pub struct PanicReport {
    pub message: String,
    pub backtrace: String,
}

static LAST_PANIC: Mutex<Option<PanicReport>> = Mutex::new(None);

fn record_panic(info: &panic::PanicHookInfo<'_>) {
    let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    };

    let location = info
        .location()
        .map(|l| format!(" at {}:{}", l.file(), l.line()))
        .unwrap_or_default();

    let report = PanicReport {
        message: format!("{}{}", message, location),
        backtrace: Backtrace::force_capture().to_string(),
    };

    if let Ok(mut last) = LAST_PANIC.lock() {
        *last = Some(report);
    }
}

/// Run `f` under the boundary. On panic the hook's report becomes the
/// returned error, message first, trace underneath.
pub fn run_guarded<F>(f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(record_panic));

    let result = panic::catch_unwind(AssertUnwindSafe(f));

    panic::set_hook(previous_hook);

    match result {
        Ok(outcome) => outcome,
        Err(_) => {
            let report = LAST_PANIC
                .lock()
                .ok()
                .and_then(|mut r| r.take())
                .unwrap_or_else(|| PanicReport {
                    message: "Unknown panic".to_string(),
                    backtrace: String::new(),
                });
            error!(target: "shell", "Render loop panicked: {}", report.message);
            Err(anyhow!("{}\n{}", report.message, report.backtrace))
        }
    }
}
