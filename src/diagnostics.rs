use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static VERBOSE: AtomicBool = AtomicBool::new(false);
static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Enable or disable verbose diagnostics for the whole process.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Start holding stderr messages. Used while the form owns the terminal.
pub fn activate_buffer() {
    if let Ok(mut guard) = BUFFER.lock() {
        *guard = Some(Vec::new());
    }
}

/// Stop buffering and return everything collected so far.
pub fn drain() -> Vec<String> {
    BUFFER
        .lock()
        .ok()
        .and_then(|mut guard| guard.take())
        .unwrap_or_default()
}

/// Emit a message on stderr, or store it if buffering is active.
pub fn emit(msg: String) {
    let mut guard = match BUFFER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// Emit a message only when verbose mode is on.
pub fn debug(msg: String) {
    if is_verbose() {
        emit(msg);
    }
}

/// Like `eprintln!`, but routed through the buffer when the form is running.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::diagnostics::emit(format!($($arg)*))
    };
}

/// Like `buffered_eprintln!`, but silent unless `--verbose` was given.
#[macro_export]
macro_rules! verbose_eprintln {
    ($($arg:tt)*) => {
        $crate::diagnostics::debug(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Buffer and verbose flag are process-wide, so keep all assertions in one test.
    #[test]
    fn test_buffer_collects_until_drained() {
        set_verbose(true);
        activate_buffer();
        emit("first".to_string());
        debug("second".to_string());
        set_verbose(false);
        debug("hidden".to_string());

        // Other tests may emit concurrently, so only check our own messages
        let messages = drain();
        let first = messages.iter().position(|m| m == "first").unwrap();
        let second = messages.iter().position(|m| m == "second").unwrap();
        assert!(first < second);
        assert!(!messages.iter().any(|m| m == "hidden"));
        assert!(drain().is_empty());
    }
}
