use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use scrmbld_domain::note::{FAILED_SYNCS_KEY, NoteKind};

use crate::{LocalStore, Result};

/// A remote save that failed and waits for a retry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSync {
	pub kind: NoteKind,
	pub entity_id: String,
	pub owner_id: String,
	pub content: String,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub failed_at: OffsetDateTime,
}
impl PendingSync {
	pub fn matches(&self, kind: NoteKind, entity_id: &str, owner_id: &str) -> bool {
		self.kind == kind && self.entity_id == entity_id && self.owner_id == owner_id
	}

	pub fn is_expired(&self, now: OffsetDateTime, retention: Duration) -> bool {
		now - self.failed_at > retention
	}
}

/// The pending sync list, persisted as one JSON array under a single local key.
#[derive(Clone)]
pub struct PendingSyncQueue {
	store: Arc<dyn LocalStore>,
}
impl PendingSyncQueue {
	pub fn new(store: Arc<dyn LocalStore>) -> Self {
		Self { store }
	}

	/// An unreadable list is logged and treated as empty so one bad write cannot wedge retries.
	pub fn load(&self) -> Result<Vec<PendingSync>> {
		let Some(raw) = self.store.get(FAILED_SYNCS_KEY)? else {
			return Ok(Vec::new());
		};

		match serde_json::from_str(&raw) {
			Ok(entries) => Ok(entries),
			Err(err) => {
				tracing::warn!(error = %err, "Discarding unreadable pending sync list.");

				Ok(Vec::new())
			},
		}
	}

	pub fn persist(&self, entries: &[PendingSync]) -> Result<()> {
		self.store.set(FAILED_SYNCS_KEY, &serde_json::to_string(entries)?)
	}

	/// Inserts the entry, replacing any earlier one for the same key.
	pub fn record_failure(&self, entry: PendingSync) -> Result<()> {
		let mut entries = self.load()?;

		entries.retain(|existing| !existing.matches(entry.kind, &entry.entity_id, &entry.owner_id));
		entries.push(entry);

		self.persist(&entries)
	}

	/// Returns whether an entry was removed.
	pub fn remove(&self, kind: NoteKind, entity_id: &str, owner_id: &str) -> Result<bool> {
		let mut entries = self.load()?;
		let before = entries.len();

		entries.retain(|existing| !existing.matches(kind, entity_id, owner_id));

		if entries.len() == before {
			return Ok(false);
		}

		self.persist(&entries)?;

		Ok(true)
	}
}
