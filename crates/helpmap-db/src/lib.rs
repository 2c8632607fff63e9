pub mod models;
pub mod queries;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// The resource collections, one JSON document each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    HelpRequests,
    Messages,
    ForumTopics,
    Reviews,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::HelpRequests,
        Collection::Messages,
        Collection::ForumTopics,
        Collection::Reviews,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::HelpRequests => "help_requests",
            Collection::Messages => "messages",
            Collection::ForumTopics => "forum_topics",
            Collection::Reviews => "reviews",
        }
    }

    /// Position in [`Collection::ALL`], used to pick the collection's lock.
    pub fn index(self) -> usize {
        match self {
            Collection::Users => 0,
            Collection::HelpRequests => 1,
            Collection::Messages => 2,
            Collection::ForumTopics => 3,
            Collection::Reviews => 4,
        }
    }

    fn file_name(self) -> String {
        format!("{}.json", self.name())
    }
}

/// Flat-file record store.
///
/// Every collection is a JSON array in `{dir}/{name}.json`, rewritten in
/// full on each change. Each collection has its own lock; `read` and
/// `update` hold it for the whole load (and save), so concurrent writers
/// cannot lose each other's records or hand out the same id twice.
pub struct Store {
    dir: PathBuf,
    locks: [Mutex<()>; Collection::ALL.len()],
}

impl Store {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;

        info!("Record store opened at {}", dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            locks: Default::default(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }

    /// Read a whole collection. A missing file is an empty collection;
    /// malformed JSON is an error.
    ///
    /// Does not take the collection lock; use [`Store::read`] or
    /// [`Store::update`] from request paths.
    pub fn load<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let path = self.path(collection);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };

        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Overwrite a collection with `records`. Not atomic: a crash mid-write
    /// can leave a truncated file behind.
    pub fn save<T: Serialize>(&self, collection: Collection, records: &[T]) -> Result<()> {
        let path = self.path(collection);
        let raw = serde_json::to_vec_pretty(records)?;
        fs::write(&path, raw).with_context(|| format!("writing {}", path.display()))?;

        debug!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }

    /// Load a collection under its lock.
    pub fn read<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let _guard = self.lock(collection)?;
        self.load(collection)
    }

    /// Read-modify-write a collection under its lock.
    ///
    /// `f` gets the current records; returning `Some` saves the (possibly
    /// modified) collection and hands the value back, `None` leaves the
    /// file untouched.
    pub fn update<T, R, F>(&self, collection: Collection, f: F) -> Result<Option<R>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Option<R>,
    {
        let _guard = self.lock(collection)?;
        let mut records = self.load(collection)?;

        match f(&mut records) {
            Some(out) => {
                self.save(collection, &records)?;
                Ok(Some(out))
            }
            None => Ok(None),
        }
    }

    fn lock(&self, collection: Collection) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.locks[collection.index()]
            .lock()
            .map_err(|e| anyhow!("{} lock poisoned: {}", collection.name(), e))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT: AtomicUsize = AtomicUsize::new(0);

    /// Fresh scratch directory under the system temp dir.
    pub fn scratch_dir(tag: &str) -> PathBuf {
        let n = NEXT.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "helpmap_db_{}_{}_{}",
            tag,
            std::process::id(),
            n
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;
    use serde_json::{Value, json};

    #[test]
    fn collection_index_matches_all_order() {
        for (i, collection) in Collection::ALL.iter().enumerate() {
            assert_eq!(collection.index(), i, "{}", collection.name());
        }
    }

    #[test]
    fn open_creates_directory() {
        let dir = scratch_dir("open");
        assert!(!dir.exists());
        let store = Store::open(&dir).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn missing_collection_loads_empty() {
        let store = Store::open(&scratch_dir("missing")).unwrap();
        let records: Vec<Value> = store.load(Collection::Reviews).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let store = Store::open(&scratch_dir("order")).unwrap();
        let records = vec![json!({"id": 1, "name": "Ирина"}), json!({"id": 2})];
        store.save(Collection::Messages, &records).unwrap();

        let loaded: Vec<Value> = store.load(Collection::Messages).unwrap();
        assert_eq!(loaded, records);

        // Non-ASCII text is written as-is, not escaped.
        let raw = std::fs::read_to_string(store.path(Collection::Messages)).unwrap();
        assert!(raw.contains("Ирина"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let store = Store::open(&scratch_dir("malformed")).unwrap();
        std::fs::write(store.path(Collection::Users), b"{ not json").unwrap();
        let result: Result<Vec<Value>> = store.load(Collection::Users);
        assert!(result.is_err());
    }

    #[test]
    fn update_skips_write_on_none() {
        let store = Store::open(&scratch_dir("skip")).unwrap();
        let out: Option<()> = store
            .update(Collection::ForumTopics, |_records: &mut Vec<Value>| None)
            .unwrap();
        assert!(out.is_none());
        assert!(!store.path(Collection::ForumTopics).exists());
    }

    #[test]
    fn concurrent_updates_do_not_lose_records() {
        let store = std::sync::Arc::new(Store::open(&scratch_dir("concurrent")).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        store
                            .update(Collection::HelpRequests, |records: &mut Vec<Value>| {
                                let id = records.len() + 1;
                                records.push(json!({ "id": id }));
                                Some(())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records: Vec<Value> = store.read(Collection::HelpRequests).unwrap();
        assert_eq!(records.len(), 80);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record["id"], json!(i + 1));
        }
    }
}
