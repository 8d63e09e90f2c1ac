use std::{
	collections::BTreeMap,
	fs,
	io::ErrorKind,
	path::PathBuf,
	sync::Mutex,
};

use crate::Result;

/// Durable string key-value storage held on the client.
pub trait LocalStore
where
	Self: Send + Sync,
{
	fn get(&self, key: &str) -> Result<Option<String>>;

	fn set(&self, key: &str, value: &str) -> Result<()>;

	fn remove(&self, key: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
	entries: Mutex<BTreeMap<String, String>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn keys(&self) -> Vec<String> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).keys().cloned().collect()
	}
}
impl LocalStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>> {
		Ok(self.entries.lock().unwrap_or_else(|err| err.into_inner()).get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<()> {
		self.entries
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.insert(key.to_string(), value.to_string());

		Ok(())
	}

	fn remove(&self, key: &str) -> Result<()> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).remove(key);

		Ok(())
	}
}

/// A JSON object on disk. Every write replaces the file through a sibling temp file and a rename.
#[derive(Debug)]
pub struct FileStore {
	path: PathBuf,
	entries: Mutex<BTreeMap<String, String>>,
}
impl FileStore {
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let entries = match fs::read_to_string(&path) {
			Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
			Ok(raw) => serde_json::from_str(&raw)?,
			Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
			Err(err) => return Err(err.into()),
		};

		Ok(Self { path, entries: Mutex::new(entries) })
	}

	fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
		if let Some(parent) = self.path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent)?;
		}

		let tmp = self.path.with_extension("json.tmp");

		fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
		fs::rename(&tmp, &self.path)?;

		Ok(())
	}
}
impl LocalStore for FileStore {
	fn get(&self, key: &str) -> Result<Option<String>> {
		Ok(self.entries.lock().unwrap_or_else(|err| err.into_inner()).get(key).cloned())
	}

	// Memory only changes once the file write has landed.
	fn set(&self, key: &str, value: &str) -> Result<()> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let mut next = entries.clone();

		next.insert(key.to_string(), value.to_string());
		self.persist(&next)?;

		*entries = next;

		Ok(())
	}

	fn remove(&self, key: &str) -> Result<()> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		if !entries.contains_key(key) {
			return Ok(());
		}

		let mut next = entries.clone();

		next.remove(key);
		self.persist(&next)?;

		*entries = next;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::{env, process};

	use super::*;

	fn scratch_path(name: &str) -> PathBuf {
		env::temp_dir().join(format!("scrmbld-local-{}-{name}", process::id())).join("store.json")
	}

	#[test]
	fn file_store_survives_reopen() {
		let path = scratch_path("reopen");
		let _ = fs::remove_file(&path);
		let store = FileStore::open(&path).expect("Failed to open store.");

		store.set("track_note_u1_t1", "Great hook").expect("set");
		store.set("album_note_u1_a1", "Front-loaded").expect("set");
		store.remove("album_note_u1_a1").expect("remove");

		let reopened = FileStore::open(&path).expect("Failed to reopen store.");

		assert_eq!(reopened.get("track_note_u1_t1").expect("get").as_deref(), Some("Great hook"));
		assert_eq!(reopened.get("album_note_u1_a1").expect("get"), None);

		let _ = fs::remove_dir_all(path.parent().expect("parent"));
	}

	#[test]
	fn file_store_rejects_corrupt_file() {
		let path = scratch_path("corrupt");

		fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
		fs::write(&path, "{not json").expect("write");

		assert!(matches!(FileStore::open(&path), Err(crate::Error::SerdeJson(_))));

		let _ = fs::remove_dir_all(path.parent().expect("parent"));
	}

	#[test]
	fn failed_writes_leave_memory_unchanged() {
		let path = scratch_path("failed-write");
		let _ = fs::remove_dir_all(path.parent().expect("parent"));
		let store = FileStore::open(&path).expect("Failed to open store.");

		store.set("kept", "1").expect("set");
		// A directory at the target path makes the final rename fail.
		fs::remove_file(&path).expect("remove file");
		fs::create_dir_all(&path).expect("mkdir");

		assert!(store.set("added", "2").is_err());
		assert_eq!(store.get("added").expect("get"), None);
		assert!(store.remove("kept").is_err());
		assert_eq!(store.get("kept").expect("get").as_deref(), Some("1"));

		fs::remove_dir(&path).expect("rmdir");
		store.set("added", "2").expect("set after recovery");

		let reopened = FileStore::open(&path).expect("Failed to reopen store.");

		assert_eq!(reopened.get("kept").expect("get").as_deref(), Some("1"));
		assert_eq!(reopened.get("added").expect("get").as_deref(), Some("2"));

		let _ = fs::remove_dir_all(path.parent().expect("parent"));
	}

	#[test]
	fn memory_store_removes_keys() {
		let store = MemoryStore::new();

		store.set("a", "1").expect("set");
		store.remove("a").expect("remove");
		store.remove("missing").expect("remove missing");

		assert!(store.keys().is_empty());
	}
}
