//! A synchronous, single-threaded [`PtyPort`] backed by `portable-pty`.
//!
//! Grounded in `jarvis-terminal::pty::PtyManager::spawn` for the
//! `native_pty_system`/`CommandBuilder`/environment setup, but with its
//! background reader thread and channel removed: the concurrency model
//! here mandates exactly one thread of control with one suspension point
//! (the event loop's readiness wait), so `read`/`write` go straight to
//! the master fd instead of through a proactor thread.

use std::io::{self, Read, Write};
use std::os::unix::io::RawFd;
use std::path::Path;

use anyhow::{Context, Result};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use crate::port::PtyPort;

/// A shell spawned under a pseudoterminal, ready to be driven from a
/// single-threaded event loop.
pub struct PortablePtyPort {
    master: Box<dyn MasterPty + Send>,
    reader: Box<dyn Read + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
    raw_fd: RawFd,
}

impl PortablePtyPort {
    /// Spawn `shell` under a new PTY of `cols`x`rows`, inheriting the
    /// caller's environment plus `TERM=xterm-256color`.
    pub fn spawn(shell: &str, working_dir: &Path, cols: u16, rows: u16) -> Result<Self> {
        let pty_system = native_pty_system();

        let pair = pty_system
            .openpty(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("failed to open pseudoterminal")?;

        let mut cmd = CommandBuilder::new(shell);
        cmd.cwd(working_dir);
        for (key, value) in std::env::vars() {
            cmd.env(key, value);
        }
        cmd.env("TERM", "xterm-256color");
        cmd.env("COLORTERM", "truecolor");

        let child = pair
            .slave
            .spawn_command(cmd)
            .context("failed to attach shell to pseudoterminal")?;
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .context("failed to clone pty reader")?;
        let writer = pair
            .master
            .take_writer()
            .context("failed to take pty writer")?;
        let raw_fd = pair
            .master
            .as_raw_fd()
            .context("pty master has no raw fd to multiplex on")?;

        Ok(Self {
            master: pair.master,
            reader,
            writer,
            child,
            raw_fd,
        })
    }

}

impl PtyPort for PortablePtyPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.writer.write(buf)?;
        self.writer.flush()?;
        Ok(n)
    }

    fn set_size(&mut self, cols: u16, rows: u16) -> io::Result<()> {
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }

    fn raw_fd(&self) -> RawFd {
        self.raw_fd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    #[cfg(unix)]
    fn spawn_write_and_read_echo() {
        let mut pty = PortablePtyPort::spawn("/bin/sh", Path::new("/"), 80, 24)
            .expect("spawn /bin/sh");

        pty.write(b"echo hello\n").expect("write echo");
        pty.write(b"exit\n").expect("write exit");

        let mut output = String::new();
        let mut buf = [0u8; 4096];
        let deadline = Instant::now() + Duration::from_secs(5);

        while Instant::now() < deadline && !output.contains("hello") {
            match pty.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => output.push_str(&String::from_utf8_lossy(&buf[..n])),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }

        assert!(output.contains("hello"), "expected 'hello' in {output:?}");
    }
}
