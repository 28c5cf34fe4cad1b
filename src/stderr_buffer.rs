use std::io;
use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    // A panic while holding the lock leaves plain data behind; keep using it
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, log lines are stored instead of being
/// printed to stderr, so they can't corrupt the TUI.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// Write one line of output, whatever its log level. If buffering is active
/// the line is stored; otherwise it is printed to stderr immediately.
pub fn write_line(msg: String) {
    let mut guard = lock();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// `io::Write` sink for the tracing subscriber that routes each formatted
/// event through the buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferedStderr;

impl io::Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        let line = line.trim_end_matches('\n');
        if !line.is_empty() {
            write_line(line.to_string());
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Single test so the shared global buffer isn't raced by parallel tests
    #[test]
    fn test_buffer_lifecycle() {
        activate();

        write_line("first".to_string());
        BufferedStderr.write_all(b"second\n").unwrap();
        BufferedStderr.write_all(b"\n").unwrap();

        let drained = drain();
        assert_eq!(drained, vec!["first", "second"]);
        // Drained means inactive: nothing more is collected
        assert!(drain().is_empty());
    }
}
