use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

use super::parsing::env_optional;

const KEY_BYTES: usize = 64;

/// Development fallback when no `SECRET_KEY` is configured: reuse the key a previous
/// start wrote to disk so issued tokens survive restarts, or mint and persist one.
pub(super) fn load_or_create_secret_key() -> String {
    let path = env_optional("SECRET_KEY_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".secret_key"));

    if let Some(key) = read_key(&path) {
        return key;
    }

    let key = random_key();
    match persist_key(&path, &key) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Generated new JWT signing key");
            key
        }
        // Lost a race with another process; its key wins.
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => read_key(&path).unwrap_or(key),
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %path.display(),
                "Could not persist JWT signing key; tokens will not survive a restart"
            );
            key
        }
    }
}

fn read_key(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    Some(contents.trim().to_string()).filter(|key| !key.is_empty())
}

fn persist_key(path: &Path, key: &str) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)?.write_all(key.as_bytes())
}

fn random_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("staff-eval-{name}-{}", std::process::id()))
    }

    #[test]
    fn random_keys_are_long_and_distinct() {
        let first = random_key();
        assert!(first.len() >= 80);
        assert_ne!(first, random_key());
    }

    #[test]
    fn blank_key_files_are_ignored() {
        let dir = scratch_dir("blank-key");
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("key");

        fs::write(&path, "  \n").expect("write blank");
        assert!(read_key(&path).is_none());
        fs::write(&path, "abc\n").expect("write key");
        assert_eq!(read_key(&path).as_deref(), Some("abc"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn persisted_key_is_never_overwritten() {
        let dir = scratch_dir("persist-key");
        let path = dir.join("nested").join("key");

        persist_key(&path, "first").expect("persist");
        let err = persist_key(&path, "second").expect_err("second write");
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(read_key(&path).as_deref(), Some("first"));

        let _ = fs::remove_dir_all(&dir);
    }
}
