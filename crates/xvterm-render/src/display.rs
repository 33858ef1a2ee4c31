//! Opens the X connection and the single top-level window, grounded in
//! `original_source/term.c`'s `term_init`. Split into a drawing half
//! ([`XlibSurface`]) and an event-draining half ([`XlibInput`]) because
//! the core event loop borrows them independently and mutably in the
//! same iteration.

use std::ffi::CString;
use std::ptr;
use std::rc::Rc;

use x11::xlib;

use crate::input::XlibInput;
use crate::surface::XlibSurface;

#[derive(Debug)]
pub enum WindowError {
    OpenDisplay,
    LoadFont(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::OpenDisplay => write!(f, "failed to open X display"),
            WindowError::LoadFont(name) => write!(f, "failed to load font {name:?}"),
        }
    }
}

impl std::error::Error for WindowError {}

/// Shared ownership of the display connection, closed once both the
/// surface and the input source have been dropped.
pub(crate) struct DisplayHandle(pub(crate) *mut xlib::Display);

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.0);
        }
    }
}

/// Opens a display connection, creates and maps a top-level window of
/// `(width, height)` pixels, and loads `font_name` as a core font,
/// falling back to the server's built-in `fixed` font on failure.
pub fn open_window(
    title: &str,
    width: u32,
    height: u32,
    font_name: &str,
) -> Result<(XlibSurface, XlibInput), WindowError> {
    unsafe {
        let display = xlib::XOpenDisplay(ptr::null());
        if display.is_null() {
            return Err(WindowError::OpenDisplay);
        }

        let screen = xlib::XDefaultScreen(display);
        let root = xlib::XRootWindow(display, screen);
        let black = xlib::XBlackPixel(display, screen);
        let white = xlib::XWhitePixel(display, screen);

        let window =
            xlib::XCreateSimpleWindow(display, root, 0, 0, width, height, 0, white, black);

        let title_c = CString::new(title).unwrap_or_else(|_| CString::new("xvterm").unwrap());
        xlib::XStoreName(display, window, title_c.as_ptr());

        let event_mask = xlib::KeyPressMask
            | xlib::ExposureMask
            | xlib::StructureNotifyMask
            | xlib::ButtonPressMask;
        xlib::XSelectInput(display, window, event_mask);

        let gc = xlib::XCreateGC(display, window, 0, ptr::null_mut());

        let font_c = CString::new(font_name).unwrap_or_else(|_| CString::new("fixed").unwrap());
        let mut font_info = xlib::XLoadQueryFont(display, font_c.as_ptr());
        if font_info.is_null() {
            let fallback = CString::new("fixed").unwrap();
            font_info = xlib::XLoadQueryFont(display, fallback.as_ptr());
        }
        let font_info = match font_info.is_null() {
            true => {
                xlib::XFreeGC(display, gc);
                xlib::XDestroyWindow(display, window);
                xlib::XCloseDisplay(display);
                return Err(WindowError::LoadFont(font_name.to_string()));
            }
            false => font_info,
        };
        xlib::XSetFont(display, gc, (*font_info).fid);

        xlib::XMapWindow(display, window);
        xlib::XFlush(display);

        let handle = Rc::new(DisplayHandle(display));

        let surface = XlibSurface::new(Rc::clone(&handle), window, gc, font_info);
        let input = XlibInput::new(handle, window);

        Ok((surface, input))
    }
}
