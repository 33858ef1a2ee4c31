//! The event half of the X11 window: drains pending events into the
//! core's [`InputEvent`] vocabulary.
//!
//! Grounded in `original_source/term.c`'s `term_key`: `XLookupString`
//! resolves a `KeyPress` to a Latin-1 byte, with the arrow keys singled
//! out by keysym rather than by the looked-up string, since the source's
//! own `case XK_Left:` / `case XK_Right:` switch does the same.

use std::os::raw::c_int;
use std::os::unix::io::RawFd;
use std::rc::Rc;

use x11::keysym;
use x11::xlib;

use xvterm_core::{InputEvent, InputSource, Key};

use crate::display::DisplayHandle;

pub struct XlibInput {
    display: Rc<DisplayHandle>,
}

impl XlibInput {
    pub(crate) fn new(display: Rc<DisplayHandle>, _window: xlib::Window) -> Self {
        Self { display }
    }

    fn translate_key(&self, event: &mut xlib::XKeyEvent) -> InputEvent {
        let mut buf = [0u8; 32];
        let mut sym: xlib::KeySym = 0;
        let n = unsafe {
            xlib::XLookupString(
                event,
                buf.as_mut_ptr() as *mut i8,
                buf.len() as c_int,
                &mut sym,
                std::ptr::null_mut(),
            )
        };

        let key = match sym as u32 {
            keysym::XK_Left => Key::Left,
            keysym::XK_Right => Key::Right,
            keysym::XK_Up => Key::Up,
            keysym::XK_Down => Key::Down,
            _ => Key::Other,
        };

        let utf8 = if matches!(key, Key::Other) && n > 0 {
            buf[..n as usize].to_vec()
        } else {
            Vec::new()
        };

        InputEvent::KeyPress { key, utf8 }
    }
}

impl InputSource for XlibInput {
    fn raw_fd(&self) -> RawFd {
        unsafe { xlib::XConnectionNumber(self.display.0) as RawFd }
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut out = Vec::new();
        unsafe {
            while xlib::XPending(self.display.0) > 0 {
                let mut event: xlib::XEvent = std::mem::zeroed();
                xlib::XNextEvent(self.display.0, &mut event);
                match event.type_ {
                    xlib::KeyPress => {
                        let mut key_event: xlib::XKeyEvent = event.xkey;
                        out.push(self.translate_key(&mut key_event));
                    }
                    xlib::ConfigureNotify => {
                        let cfg: xlib::XConfigureEvent = event.xconfigure;
                        out.push(InputEvent::Resize {
                            pixel_w: cfg.width.max(0) as u32,
                            pixel_h: cfg.height.max(0) as u32,
                        });
                    }
                    xlib::Expose => {
                        let expose: xlib::XExposeEvent = event.xexpose;
                        if expose.count == 0 {
                            out.push(InputEvent::Expose);
                        }
                    }
                    xlib::ButtonPress => out.push(InputEvent::ButtonPress),
                    _ => {}
                }
            }
        }
        out
    }
}
