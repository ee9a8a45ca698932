// ── Platform layer ────────────────────────────────────────────────────────────
//
// No `unsafe` lives here; all Win32 FFI is confined to the `win32` sub-module
// and never leaks outward.  Other targets have no front end yet.

#[cfg(windows)]
pub mod win32;
