use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Destination for the human-readable progress lines of a run. Stdout by default.
#[derive(Clone)]
pub struct Progress {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Progress {
    pub fn stdout() -> Self {
        Self::to_writer(io::stdout())
    }

    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Writes one line. A broken progress sink never fails the run.
    pub fn line(&self, args: fmt::Arguments<'_>) {
        let result = match self.out.lock() {
            Ok(mut out) => writeln!(out, "{}", args).and_then(|_| out.flush()),
            Err(_) => Ok(()),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to write progress line: {}", e);
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

/// In-memory sink whose contents can be read back after a run.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> Progress {
        Progress::to_writer(self.clone())
    }

    pub fn contents(&self) -> String {
        self.buf
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for CapturedOutput {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self
            .buf
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "capture buffer poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
