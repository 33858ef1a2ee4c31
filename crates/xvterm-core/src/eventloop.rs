//! The single-threaded cooperative driver: one readiness wait per
//! iteration, multiplexing the PTY master and the display connection.
//!
//! Grounded in `term_loop` (`original_source/term.c`), whose
//! `select(maxfd+1, &set, ...)` over `pty_m` and `ConnectionNumber(dpy)`
//! this reworks into a `mio::Poll` registered with both ports' raw fds —
//! the cross-platform readiness multiplexer already reached for by other
//! terminal emulators in this corpus for the same `select`-loop shape.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Token};

use crate::keyencoder::KeyEncoder;
use crate::port::{InputEvent, InputSource, PtyPort, Surface};
use crate::renderer::{Geometry, Renderer};
use crate::terminal::Terminal;

const PTY_TOKEN: Token = Token(0);
const DISPLAY_TOKEN: Token = Token(1);

/// Bytes read from the PTY per readiness notification.
const READ_CHUNK: usize = 256;

/// How long a single `Poll::poll` call may block before returning control
/// to check the shutdown flag. Shutdown is otherwise driven only by PTY
/// EOF or a signal handler setting the flag between iterations.
const POLL_TIMEOUT: Duration = Duration::from_millis(200);

/// Multiplexes a [`PtyPort`] and an [`InputSource`] on one thread,
/// shuttling bytes into a [`Terminal`] and keystrokes back to the PTY.
pub struct EventLoop {
    poll: Poll,
    events: Events,
}

impl EventLoop {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            poll: Poll::new()?,
            events: Events::with_capacity(8),
        })
    }

    /// Run until the PTY reports EOF, an I/O error occurs, or `shutdown`
    /// is set (by a `signal_hook::flag::register`-style handler) between
    /// iterations.
    pub fn run<P, S, I>(
        &mut self,
        pty: &mut P,
        surface: &mut S,
        input: &mut I,
        terminal: &mut Terminal,
        key_encoder: &KeyEncoder,
        geometry: Geometry,
        shutdown: &AtomicBool,
    ) -> io::Result<()>
    where
        P: PtyPort,
        S: Surface,
        I: InputSource,
    {
        let pty_fd = pty.raw_fd();
        let input_fd = input.raw_fd();
        self.poll
            .registry()
            .register(&mut SourceFd(&pty_fd), PTY_TOKEN, Interest::READABLE)?;
        self.poll
            .registry()
            .register(&mut SourceFd(&input_fd), DISPLAY_TOKEN, Interest::READABLE)?;

        let mut renderer = Renderer::new(geometry);
        renderer.flush_damage(surface, &mut terminal.grid);

        let mut read_buf = [0u8; READ_CHUNK];

        while !shutdown.load(Ordering::Relaxed) {
            match self.poll.poll(&mut self.events, Some(POLL_TIMEOUT)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }

            let mut pty_readable = false;
            let mut display_readable = false;
            for event in self.events.iter() {
                match event.token() {
                    PTY_TOKEN => pty_readable = true,
                    DISPLAY_TOKEN => display_readable = true,
                    _ => {}
                }
            }

            if pty_readable {
                match pty.read(&mut read_buf) {
                    Ok(0) => break,
                    Ok(n) => terminal.process(&read_buf[..n]),
                    Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
            }

            if display_readable {
                for ev in input.poll_events() {
                    self.handle_input_event(ev, pty, terminal, key_encoder, geometry)?;
                }
            }

            if terminal.grid.has_damage() {
                renderer.flush_damage(surface, &mut terminal.grid);
            }
        }

        Ok(())
    }

    fn handle_input_event<P: PtyPort>(
        &self,
        ev: InputEvent,
        pty: &mut P,
        terminal: &mut Terminal,
        key_encoder: &KeyEncoder,
        geometry: Geometry,
    ) -> io::Result<()> {
        match ev {
            InputEvent::KeyPress { key, utf8 } => {
                let bytes = key_encoder.encode(key, &utf8);
                if !bytes.is_empty() {
                    pty.write(&bytes)?;
                }
            }
            InputEvent::Resize { pixel_w, pixel_h } => {
                let cols = (pixel_w / geometry.char_w).max(1) as usize;
                let rows = (pixel_h / geometry.char_h).saturating_sub(1).max(1) as usize;
                terminal.resize(cols, rows);
                pty.set_size(cols as u16, rows as u16)?;
            }
            InputEvent::Expose => terminal.grid.mark_full_damage(),
            InputEvent::ButtonPress => { /* mouse reporting is out of scope */ }
        }
        Ok(())
    }
}

