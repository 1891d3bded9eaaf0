//! File-backed [`CacheBackend`] that lets several processes share one bearer token.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
	process,
	sync::atomic::{AtomicU64, Ordering},
};
// self
use crate::{
	_prelude::*,
	store::{CacheBackend, Clock, StoreError, StoreFuture, SystemClock},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Entry {
	value: String,
	#[serde(with = "time::serde::rfc3339")]
	expires_at: OffsetDateTime,
}

type Snapshot = HashMap<String, Entry>;

// Per-write temp file suffix, shared by every handle in the process.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Persists cache entries to a JSON file after each write.
///
/// Every read reloads the file, so tokens written by other processes pointing at the same
/// path are picked up. Writes replace the file through a rename.
#[derive(Clone)]
pub struct FileCache {
	path: PathBuf,
	lock: Arc<Mutex<()>>,
	clock: Arc<dyn Clock>,
}
impl FileCache {
	/// Opens (or creates the parent directory of) a cache file at the provided path.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		Self::open_with_clock(path, Arc::new(SystemClock))
	}

	/// Same as [`FileCache::open`] with a custom time source.
	pub fn open_with_clock(
		path: impl Into<PathBuf>,
		clock: Arc<dyn Clock>,
	) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		Ok(Self { path, lock: Default::default(), clock })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Snapshot, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(HashMap::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create cache directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize cache snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension(format!(
			"{}.{}.tmp",
			process::id(),
			TMP_SEQ.fetch_add(1, Ordering::Relaxed)
		));

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn get_now(&self, key: &str) -> Result<Option<String>, StoreError> {
		let _guard = self.lock.lock();
		let now = self.clock.now();
		let snapshot = Self::load_snapshot(&self.path)?;

		Ok(snapshot.get(key).filter(|entry| now < entry.expires_at).map(|entry| entry.value.clone()))
	}

	fn put_now(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
		let _guard = self.lock.lock();
		let now = self.clock.now();
		let expires_at = super::expiry(now, ttl)?;
		let mut snapshot = Self::load_snapshot(&self.path)?;

		snapshot.retain(|_, entry| now < entry.expires_at);
		snapshot.insert(key.to_owned(), Entry { value, expires_at });

		self.persist(&snapshot)
	}
}
impl Debug for FileCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FileCache").field("path", &self.path).finish()
	}
}
impl CacheBackend for FileCache {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
		Box::pin(async move { self.get_now(key) })
	}

	fn put<'a>(&'a self, key: &'a str, value: String, ttl: Duration) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.put_now(key, value, ttl) })
	}
}
