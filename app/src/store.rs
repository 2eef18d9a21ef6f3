use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::DoorState;

const STATE_EXTENSION: &str = "state";

#[derive(Debug, thiserror::Error)]
#[error("unable to access state for door '{door}' at {}: {source}", .path.display())]
pub struct PersistenceError {
    pub door: String,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

pub trait Persist {
    fn persist(&self, door: &str, state: DoorState) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        StateStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, door: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", door, STATE_EXTENSION))
    }

    /// Read back the last persisted state. `None` if the door has never been written.
    pub fn load(&self, door: &str) -> Result<Option<DoorState>, PersistenceError> {
        let path = self.path_for(door);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(contents.parse().ok()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError {
                door: door.to_string(),
                path,
                source,
            }),
        }
    }
}

impl Persist for StateStore {
    fn persist(&self, door: &str, state: DoorState) -> Result<(), PersistenceError> {
        let path = self.path_for(door);
        let write = || -> io::Result<()> {
            if !self.dir.exists() {
                fs::create_dir_all(&self.dir)?;
                log::info!("created data directory {}", self.dir.display());
            }
            fs::write(&path, state.token())
        };
        write().map_err(|source| PersistenceError {
            door: door.to_string(),
            path,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_derived_from_name() {
        let store = StateStore::new("/srv/garage/data");
        assert_eq!(
            store.path_for("door1"),
            PathBuf::from("/srv/garage/data/door1.state")
        );
    }

    #[test]
    fn creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path().join("nested").join("data"));
        store.persist("door1", DoorState::Closed).unwrap();
        assert_eq!(
            fs::read_to_string(store.path_for("door1")).unwrap(),
            "closed"
        );
    }

    #[test]
    fn last_write_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());
        store.persist("door1", DoorState::Closed).unwrap();
        store.persist("door1", DoorState::Open).unwrap();
        store.persist("door1", DoorState::Closed).unwrap();
        assert_eq!(
            fs::read_to_string(store.path_for("door1")).unwrap(),
            "closed"
        );
    }

    #[test]
    fn shorter_token_truncates() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());
        store.persist("door1", DoorState::Closed).unwrap();
        store.persist("door1", DoorState::Open).unwrap();
        assert_eq!(fs::read_to_string(store.path_for("door1")).unwrap(), "open");
    }

    #[test]
    fn doors_are_kept_apart() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());
        store.persist("door1", DoorState::Closed).unwrap();
        store.persist("door2", DoorState::Open).unwrap();
        assert_eq!(store.load("door1").unwrap(), Some(DoorState::Closed));
        assert_eq!(store.load("door2").unwrap(), Some(DoorState::Open));
    }

    #[test]
    fn load_missing_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::new(tmp.path());
        assert_eq!(store.load("door1").unwrap(), None);
    }

    #[test]
    fn write_failure_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        // A regular file where the data directory should be.
        let blocker = tmp.path().join("data");
        fs::write(&blocker, "").unwrap();
        let store = StateStore::new(blocker.join("inner"));

        let err = store.persist("door1", DoorState::Open).unwrap_err();
        assert_eq!(err.door, "door1");
        assert_eq!(err.path, store.path_for("door1"));
    }
}
