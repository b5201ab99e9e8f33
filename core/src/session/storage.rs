use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;

/// Key/value store for the persisted session scalars.
///
/// Mirrors the browser local-storage contract: string keys, string values,
/// missing keys read as `None`.
pub trait SessionStorage: Send + Sync + std::fmt::Debug {
    fn read(&self, key: &str) -> std::io::Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> std::io::Result<()>;
    /// Returns `Ok(true)` if a value was removed.
    fn remove(&self, key: &str) -> std::io::Result<bool>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> std::io::Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> std::io::Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> std::io::Result<bool> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.remove(key).is_some())
    }
}

/// Stores each key as a file inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> std::io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, key: &str, value: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut options = OpenOptions::new();
        options.truncate(true).write(true).create(true);
        #[cfg(unix)]
        {
            options.mode(0o600);
        }
        let mut file = options.open(self.path_for(key))?;
        file.write_all(value.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> std::io::Result<bool> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn file_storage_round_trip() -> std::io::Result<()> {
        let dir = tempdir()?;
        let storage = FileStorage::new(dir.path().join("session"));
        assert_eq!(storage.read("token")?, None);

        storage.write("token", "abc")?;
        assert_eq!(storage.read("token")?.as_deref(), Some("abc"));

        storage.write("token", "xyz")?;
        assert_eq!(storage.read("token")?.as_deref(), Some("xyz"));

        assert!(storage.remove("token")?);
        assert!(!storage.remove("token")?);
        assert_eq!(storage.read("token")?, None);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn file_storage_is_owner_only() -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let storage = FileStorage::new(dir.path());
        storage.write("token", "secret")?;
        let mode = std::fs::metadata(dir.path().join("token"))?
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }

    #[test]
    fn memory_storage_round_trip() -> std::io::Result<()> {
        let storage = MemoryStorage::new();
        storage.write("user", "{}")?;
        assert_eq!(storage.read("user")?.as_deref(), Some("{}"));
        assert!(storage.remove("user")?);
        assert_eq!(storage.read("user")?, None);
        Ok(())
    }
}
