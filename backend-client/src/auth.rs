//! Shared-secret storage.
//!
//! The backend authenticates every request with a single `x-app-password`
//! header. The secret lives in `auth.json` under the tracker home and is
//! re-read each time a request is built, so an external edit takes effect on
//! the next request without restarting the client.

use std::fs::{self, OpenOptions};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use serde::{Deserialize, Serialize};

const AUTH_FILE: &str = "auth.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct AuthFile {
    #[serde(default)]
    app_password: String,
}

/// Reads the shared secret from `auth.json` in `home`.
///
/// Returns `None` when the file is missing, unreadable, or holds an empty
/// password; callers then omit the auth header entirely.
pub fn load_app_password(home: &Path) -> Option<String> {
    let path = home.join(AUTH_FILE);
    let contents = fs::read_to_string(&path).ok()?;
    let parsed: AuthFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("ignoring malformed {}: {err}", path.display());
            return None;
        }
    };
    if parsed.app_password.is_empty() {
        None
    } else {
        Some(parsed.app_password)
    }
}

/// Writes the shared secret to `auth.json` in `home`, creating the directory
/// if needed. The file is created with mode 0o600 on Unix.
pub fn store_app_password(home: &Path, password: &str) -> std::io::Result<()> {
    fs::create_dir_all(home)?;
    let path = home.join(AUTH_FILE);
    let body = serde_json::to_string_pretty(&AuthFile {
        app_password: password.to_string(),
    })?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(&path)?;
    file.write_all(body.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    #[expect(clippy::unwrap_used)]
    fn round_trips_password() {
        let home = TempDir::new().unwrap();
        store_app_password(home.path(), "hunter2").unwrap();
        assert_eq!(load_app_password(home.path()), Some("hunter2".to_string()));
    }

    #[test]
    #[expect(clippy::expect_used)]
    fn missing_file_yields_none() {
        let home = TempDir::new().expect("tempdir");
        assert_eq!(load_app_password(home.path()), None);
    }

    #[test]
    #[expect(clippy::unwrap_used)]
    fn empty_password_yields_none() {
        let home = TempDir::new().unwrap();
        store_app_password(home.path(), "").unwrap();
        assert_eq!(load_app_password(home.path()), None);
    }

    #[test]
    #[expect(clippy::unwrap_used)]
    fn malformed_file_yields_none() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join("auth.json"), "not json").unwrap();
        assert_eq!(load_app_password(home.path()), None);
    }
}
