//! Session signing key loading.
//!
//! Release builds refuse to start without a readable key file of at least
//! 64 bytes unless ephemeral keys are explicitly allowed. Debug builds fall
//! back to a generated key with a warning.

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use tracing::warn;
use zeroize::Zeroize;

const SESSION_KEY_MIN_LEN: usize = 64;

/// Build mode for key loading.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Key material could not be loaded and no fallback was permitted.
#[derive(thiserror::Error, Debug)]
pub enum SessionKeyError {
    #[error("failed to read session key at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    TooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

fn read_key(path: &Path) -> Result<Key, SessionKeyError> {
    let mut bytes = std::fs::read(path).map_err(|source| SessionKeyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let length = bytes.len();
    if length < SESSION_KEY_MIN_LEN {
        bytes.zeroize();
        return Err(SessionKeyError::TooShort {
            path: path.to_path_buf(),
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

/// Load the session key from `path`, falling back to a generated key in
/// debug builds or when `allow_ephemeral` is set.
///
/// # Errors
///
/// Returns [`SessionKeyError`] in release builds without the ephemeral
/// opt-in when the file is missing or too short.
pub fn load_session_key(
    path: &Path,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionKeyError> {
    match read_key(path) {
        Ok(key) => Ok(key),
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(error) => Err(error),
    }
}
