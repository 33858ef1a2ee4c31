//! The surrounding executable: loads config, opens the X11 window and the
//! PTY, wires them to [`xvterm_core::Terminal`] through an [`EventLoop`],
//! and maps startup failures to exit codes 1-4 (display, PTY, shell
//! attach, font).

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use xvterm_core::terminal::PortablePtyPort;
use xvterm_core::{Config, EventLoop, KeyEncoder, Terminal};
use xvterm_render::open_window;

const EXIT_OPEN_DISPLAY: i32 = 1;
const EXIT_OPEN_PTY: i32 = 2;
const EXIT_ATTACH_SHELL: i32 = 3;
const EXIT_LOAD_FONT: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "xvterm")]
#[command(about = "A minimal X11 terminal emulator")]
struct Args {
    /// Shell to run in place of $SHELL / the config default.
    #[arg(short = 'e', long)]
    shell: Option<String>,

    /// Initial grid size, overriding the config file, as "COLSxROWS".
    #[arg(long, value_parser = parse_cols_rows)]
    geometry: Option<(u16, u16)>,
}

fn parse_cols_rows(s: &str) -> Result<(u16, u16), String> {
    let (cols, rows) = s
        .split_once('x')
        .ok_or_else(|| format!("expected COLSxROWS, got {s:?}"))?;
    let cols: u16 = cols.parse().map_err(|_| format!("bad column count in {s:?}"))?;
    let rows: u16 = rows.parse().map_err(|_| format!("bad row count in {s:?}"))?;
    if cols == 0 || rows == 0 {
        return Err(format!("geometry must be positive, got {s:?}"));
    }
    Ok((cols, rows))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("xvterm v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("failed to load config: {e}, using defaults");
        Config::default()
    });
    if let Some(shell) = &args.shell {
        config.general.shell = shell.clone();
    }
    if let Some((cols, rows)) = args.geometry {
        config.geometry.cols = cols;
        config.geometry.rows = rows;
    }

    let (width, height) = config.initial_pixel_size();

    let (mut surface, mut input) = match open_window("xvterm", width, height, &config.font.family) {
        Ok(pair) => pair,
        Err(e) => {
            error!("{e}");
            std::process::exit(match e {
                xvterm_render::WindowError::OpenDisplay => EXIT_OPEN_DISPLAY,
                xvterm_render::WindowError::LoadFont(_) => EXIT_LOAD_FONT,
            });
        }
    };

    let cols = config.geometry.cols;
    let rows = config.geometry.rows;
    let shell = config.shell();
    let working_dir: PathBuf = config.working_directory();

    let mut pty = match PortablePtyPort::spawn(&shell, &working_dir, cols, rows) {
        Ok(pty) => pty,
        Err(e) => {
            let msg = e.to_string();
            error!("failed to start shell: {msg}");
            let code = if msg.contains("attach shell") {
                EXIT_ATTACH_SHELL
            } else {
                EXIT_OPEN_PTY
            };
            std::process::exit(code);
        }
    };

    let mut terminal = Terminal::new(cols as usize, rows as usize, &config.theme);
    let key_encoder = KeyEncoder::new();
    let geometry = config.render_geometry();

    let shutdown = Arc::new(AtomicBool::new(false));
    for sig in [SIGINT, SIGTERM] {
        if let Err(e) = signal_hook::flag::register(sig, Arc::clone(&shutdown)) {
            tracing::warn!("failed to register handler for signal {sig}: {e}");
        }
    }

    let mut event_loop = match EventLoop::new() {
        Ok(loop_) => loop_,
        Err(e) => {
            error!("failed to set up the readiness multiplexer: {e}");
            std::process::exit(EXIT_OPEN_PTY);
        }
    };

    let result = event_loop.run(
        &mut pty,
        &mut surface,
        &mut input,
        &mut terminal,
        &key_encoder,
        geometry,
        &shutdown,
    );

    if let Err(e) = result {
        error!("event loop terminated with an error: {e}");
        std::process::exit(EXIT_OPEN_PTY);
    }

    info!("shell exited, shutting down");
}
