// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Chord Scroll return `error::Result<T>`.  No
// panics in production paths; recoverable errors surface as warning dialogs
// raised by the `App` orchestration layer.

use std::path::PathBuf;

/// Every error that Chord Scroll can produce.
#[derive(Debug)]
pub(crate) enum ChordScrollError {
    /// The path given to "open" does not reference an existing file.
    FileNotFound(PathBuf),

    /// A settings block was found at the end of a document but could not be
    /// decoded into valid `Settings`.  The document itself still opens.
    SettingsCorrupt(String),

    /// A standard I/O error (file read, write, …).
    Io(std::io::Error),

    /// A Win32 API call returned a failure code.
    #[cfg(windows)]
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },
}

impl std::fmt::Display for ChordScrollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Self::SettingsCorrupt(reason) => write!(f, "cannot load setting data: {reason}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(windows)]
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
        }
    }
}

impl std::error::Error for ChordScrollError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChordScrollError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ChordScrollError {
    fn from(e: serde_json::Error) -> Self {
        Self::SettingsCorrupt(e.to_string())
    }
}

// Convert a windows-crate error (HRESULT) directly into a ChordScrollError so
// that `?` can be used on `windows::core::Result<T>` throughout the platform
// module.
#[cfg(windows)]
impl From<windows::core::Error> for ChordScrollError {
    fn from(e: windows::core::Error) -> Self {
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, ChordScrollError>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn file_not_found_names_the_path() {
        let e = ChordScrollError::FileNotFound(PathBuf::from("song.txt"));
        assert_eq!(e.to_string(), "file not found: song.txt");
    }

    #[test]
    fn io_error_exposes_source() {
        let e: ChordScrollError = std::io::Error::other("disk full").into();
        assert!(e.source().is_some());
        assert!(e.to_string().contains("disk full"));
    }

    #[test]
    fn json_error_becomes_settings_corrupt() {
        let json_err = serde_json::from_str::<u32>("{").unwrap_err();
        let e: ChordScrollError = json_err.into();
        assert!(matches!(e, ChordScrollError::SettingsCorrupt(_)));
        assert!(e.source().is_none());
    }
}
