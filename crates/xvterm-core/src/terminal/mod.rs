pub mod emulator;
pub mod pty;

pub use emulator::Terminal;
pub use pty::PortablePtyPort;
