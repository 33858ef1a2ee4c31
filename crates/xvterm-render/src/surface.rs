//! The drawing half of the X11 window: the fill-rect/draw-glyph/flush
//! surface the renderer paints damaged cells onto.
//!
//! Grounded in `original_source/term.c`'s `term_draw`: the background
//! fill is `XFillRectangle`, the glyph draw is `XDrawString`, and colours
//! go through `XAllocColor`/`XSetForeground` against the default
//! colormap rather than the source's fixed 2-colour `fgc`/`bgc` GCs, to
//! carry truecolor SGR through to the window.

use std::os::raw::c_char;
use std::rc::Rc;

use x11::xlib;

use xvterm_core::config::theme::RgbColor;
use xvterm_core::Surface;

use crate::display::DisplayHandle;

pub struct XlibSurface {
    display: Rc<DisplayHandle>,
    window: xlib::Window,
    gc: xlib::GC,
    font: *mut xlib::XFontStruct,
    colormap: xlib::Colormap,
}

impl XlibSurface {
    pub(crate) fn new(
        display: Rc<DisplayHandle>,
        window: xlib::Window,
        gc: xlib::GC,
        font: *mut xlib::XFontStruct,
    ) -> Self {
        let colormap = unsafe {
            let screen = xlib::XDefaultScreen(display.0);
            xlib::XDefaultColormap(display.0, screen)
        };
        Self {
            display,
            window,
            gc,
            font,
            colormap,
        }
    }

    fn set_foreground(&mut self, rgb: RgbColor) {
        unsafe {
            let mut color: xlib::XColor = std::mem::zeroed();
            color.red = (rgb.r as u16) << 8;
            color.green = (rgb.g as u16) << 8;
            color.blue = (rgb.b as u16) << 8;
            color.flags = (xlib::DoRed | xlib::DoGreen | xlib::DoBlue) as i8;
            xlib::XAllocColor(self.display.0, self.colormap, &mut color);
            xlib::XSetForeground(self.display.0, self.gc, color.pixel);
        }
    }
}

impl Surface for XlibSurface {
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, rgb: RgbColor) {
        self.set_foreground(rgb);
        unsafe {
            xlib::XFillRectangle(self.display.0, self.window, self.gc, x, y, w, h);
        }
    }

    fn draw_glyph(&mut self, x: i32, y: i32, codepoint: u32, rgb: RgbColor) {
        if codepoint == 0 {
            return;
        }
        self.set_foreground(rgb);
        // Core fonts are Latin-1; anything outside that range draws as a
        // placeholder rather than silently dropping the cell.
        let byte = if codepoint <= 0xFF { codepoint as u8 } else { b'?' };
        let ascent = unsafe { (*self.font).ascent };
        let baseline = y + ascent;
        unsafe {
            xlib::XDrawString(
                self.display.0,
                self.window,
                self.gc,
                x,
                baseline,
                &byte as *const u8 as *const c_char,
                1,
            );
        }
    }

    fn clear_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        unsafe {
            xlib::XClearArea(self.display.0, self.window, x, y, w, h, 0);
        }
    }

    fn clear_all(&mut self) {
        unsafe {
            xlib::XClearWindow(self.display.0, self.window);
        }
    }

    fn flush(&mut self) {
        unsafe {
            xlib::XFlush(self.display.0);
        }
    }
}

impl Drop for XlibSurface {
    fn drop(&mut self) {
        unsafe {
            if !self.font.is_null() {
                xlib::XFreeFont(self.display.0, self.font);
            }
            xlib::XFreeGC(self.display.0, self.gc);
        }
    }
}
