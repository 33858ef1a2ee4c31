//! Xlib-backed concrete adapters for [`xvterm_core::Surface`] and
//! [`xvterm_core::InputSource`]. Nothing in here is reachable from
//! `xvterm-core`; the dependency runs one way, through the trait objects
//! the event loop is generic over.

mod display;
mod input;
mod surface;

pub use display::{open_window, WindowError};
pub use input::XlibInput;
pub use surface::XlibSurface;
