//! Helpers shared by the unit tests.

use std::io::{Result, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A `Write` target a test can hand to a `LogSink` and inspect afterwards.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("buffer lock poisoned")).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.0.lock().expect("buffer lock poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A sink target that sleeps on every write, slowing a worker run down
/// enough for pause/stop timing tests to observe it mid-flight.
pub struct SlowWriter(pub Duration);

impl Write for SlowWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        std::thread::sleep(self.0);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
