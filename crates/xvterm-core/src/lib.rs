pub mod cell;
pub mod config;
pub mod error;
pub mod eventloop;
pub mod grid;
pub mod keyencoder;
pub mod parser;
pub mod port;
pub mod renderer;
pub mod sgr;
pub mod terminal;
pub mod utf8;

pub use cell::{Cell, CursorStyle, TermAttrs};
pub use config::{Config, Theme};
pub use eventloop::EventLoop;
pub use grid::{Cursor, Damage, EraseRegion, Grid};
pub use keyencoder::KeyEncoder;
pub use parser::EscParser;
pub use port::{InputEvent, InputSource, Key, PtyPort, Surface};
pub use renderer::{Geometry, Renderer};
pub use sgr::SgrInterpreter;
pub use terminal::Terminal;
pub use utf8::Utf8Decoder;
