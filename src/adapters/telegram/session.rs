//! Session storage. Persistent grammers session file.
//!
//! SqliteSession keeps authorization across invocations, so the operator
//! logs in once and every later run reuses the session unconditionally.
//! Writes happen synchronously inside grammers; dropping the client on any
//! exit path leaves the file consistent.

use std::path::{Path, PathBuf};

use grammers_session::storages::SqliteSession;

/// Session file used when neither --session nor TG_LENS_SESSION_PATH names one.
pub const DEFAULT_SESSION_FILE: &str = "./tg-lens.session";

/// Pick the session file location: the configured path when there is one,
/// the default file in the working directory otherwise.
pub fn session_file(configured: Option<&str>) -> PathBuf {
    PathBuf::from(configured.unwrap_or(DEFAULT_SESSION_FILE))
}

/// Open (or create) the session file at `path`, creating parent directories
/// as needed. A bare filename has no parent to create.
pub async fn open_file_session(path: impl AsRef<Path>) -> anyhow::Result<SqliteSession> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("create session directory: {}", e))?;
    }
    SqliteSession::open(path)
        .await
        .map_err(|e| anyhow::anyhow!("open session file: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_path_wins_over_default() {
        assert_eq!(
            session_file(Some("/var/lib/tg-lens/op.session")),
            PathBuf::from("/var/lib/tg-lens/op.session")
        );
    }

    #[test]
    fn absent_path_falls_back_to_the_working_directory_file() {
        assert_eq!(session_file(None), PathBuf::from(DEFAULT_SESSION_FILE));
    }

    #[test]
    fn bare_filename_has_no_parent_to_create() {
        let p = PathBuf::from("op.session");
        assert!(
            p.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .is_none()
        );
    }
}
