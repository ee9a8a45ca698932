// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except:
//   • `platform::win32`   – Win32 / WinAPI FFI
//   • `editor::scintilla` – Scintilla child-window hosting
// Each unsafe block in those modules MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that tracing output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
// Without the Win32 front end only the tests reach the core modules.
#![cfg_attr(not(windows), allow(dead_code))]

mod app;
mod document;
mod editor;
mod error;
mod platform;
mod scroll;
mod session;
mod theme;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Hands-free autoscrolling viewer for chord and lyric sheets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Text file to open on startup
    path: Option<PathBuf>,
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(filter)
        .try_init();
}

#[cfg(windows)]
fn main() {
    let args = Args::parse();
    init_tracing();

    if let Err(e) = platform::win32::window::run(args.path) {
        tracing::error!(error = %e, "startup failed");
        // Startup failed before or during the message loop.
        // A modal dialog is the only output a GUI-subsystem build shows.
        platform::win32::window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
fn main() {
    let _args = Args::parse();
    init_tracing();
    eprintln!(
        "chordscroll: unsupported platform ({}); the viewer window requires Windows",
        std::env::consts::OS
    );
    // 1 is a startup failure; 2 is "no front end on this host".
    std::process::exit(2);
}
