//! File-backed game storage.

use base2048_core::{GameStateStore, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keeps each key in its own file under one directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Unavailable(format!("invalid key {:?}", key)));
        }
        Ok(self.dir.join(key))
    }
}

impl GameStateStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves half a save behind
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base2048_core::{Direction, Session, StorageKeys};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_get_set_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("saves"));

        assert_eq!(store.get("base2048_best_score").unwrap(), None);
        store.set("base2048_best_score", "128").unwrap();
        assert_eq!(
            store.get("base2048_best_score").unwrap(),
            Some("128".to_string())
        );

        store.remove("base2048_best_score").unwrap();
        assert_eq!(store.get("base2048_best_score").unwrap(), None);
        // Removing a missing key is fine
        store.remove("base2048_best_score").unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_session_resumes_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let mut session =
            Session::open_with_rng(FileStore::new(dir.path()), StdRng::seed_from_u64(1)).unwrap();
        for direction in [Direction::Left, Direction::Down, Direction::Right] {
            session.make_move(direction).unwrap();
        }
        let state = session.game().serialize();
        drop(session);

        let resumed =
            Session::open_with_rng(FileStore::new(dir.path()), StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(resumed.game().serialize(), state);
        assert!(dir.path().join(StorageKeys::GAME_STATE).exists());
    }
}
