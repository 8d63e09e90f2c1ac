//! Local-first note cache mirrored to a remote store.
//!
//! Reads prefer the remote copy whenever it is reachable and holds content. Writes land in the
//! local store first, then go to the remote; failed remote saves wait in a [`PendingSyncQueue`]
//! until [`NoteSyncManager::retry_failed_syncs`] replays them.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use scrmbld_domain::note::{self, NoteKind};

use crate::{
	LocalStore, PendingSync, PendingSyncQueue, RemoteError, RemoteNote, RemoteNoteStore, Result,
};

pub const DEFAULT_RETENTION_DAYS: i64 = 7;

type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

/// Outcome of one pass over the pending sync list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetryReport {
	pub attempted: usize,
	pub synced: usize,
	pub expired: usize,
	pub remaining: usize,
}

pub struct NoteSyncManager {
	local: Arc<dyn LocalStore>,
	remote: Arc<dyn RemoteNoteStore>,
	queue: PendingSyncQueue,
	retention: Duration,
	clock: Clock,
}
impl NoteSyncManager {
	pub fn new(local: Arc<dyn LocalStore>, remote: Arc<dyn RemoteNoteStore>) -> Self {
		let queue = PendingSyncQueue::new(local.clone());

		Self {
			local,
			remote,
			queue,
			retention: Duration::days(DEFAULT_RETENTION_DAYS),
			clock: Arc::new(OffsetDateTime::now_utc),
		}
	}

	pub fn with_retention(mut self, retention: Duration) -> Self {
		self.retention = retention;

		self
	}

	pub fn with_clock<F>(mut self, clock: F) -> Self
	where
		F: Fn() -> OffsetDateTime + Send + Sync + 'static,
	{
		self.clock = Arc::new(clock);

		self
	}

	pub fn queue(&self) -> &PendingSyncQueue {
		&self.queue
	}

	/// Returns the best available note content, or an empty string when there is none.
	///
	/// Remote failures are never surfaced here; they fall back to the local copy.
	pub async fn get(&self, kind: NoteKind, entity_id: &str, owner_id: &str) -> Result<String> {
		let key = note::cache_key(kind, owner_id, entity_id);
		let local = self.local.get(&key)?.unwrap_or_default();
		let remote = match self.remote.fetch_note(kind, entity_id, owner_id).await {
			Ok(remote) => remote.map(|note| note.content).filter(|content| !content.trim().is_empty()),
			Err(err) => {
				// Reads fall back silently; an unreachable remote is the normal offline case.
				tracing::debug!(%kind, entity_id, error = %err, "Remote note read failed.");

				None
			},
		};

		if local.trim().is_empty() {
			let Some(content) = remote else {
				return Ok(String::new());
			};

			self.local.set(&key, &content)?;

			return Ok(content);
		}

		match remote {
			Some(content) if content != local => {
				tracing::debug!(%kind, entity_id, "Remote note differs from local; taking remote.");

				self.local.set(&key, &content)?;

				Ok(content)
			},
			_ => Ok(local),
		}
	}

	/// Stores trimmed content locally and mirrors it to the remote. Blank content deletes the note.
	pub async fn save(
		&self,
		kind: NoteKind,
		entity_id: &str,
		owner_id: &str,
		content: &str,
	) -> Result<()> {
		let Some(content) = note::normalize_content(content) else {
			return self.delete(kind, entity_id, owner_id).await;
		};
		let key = note::cache_key(kind, owner_id, entity_id);

		self.local.set(&key, content)?;

		match self.remote.save_note(kind, entity_id, owner_id, content).await {
			Ok(_) => {
				// A newer successful save supersedes anything still queued for this key.
				if self.queue.remove(kind, entity_id, owner_id)? {
					tracing::debug!(%kind, entity_id, "Cleared superseded pending sync.");
				}
			},
			Err(err) => {
				log_remote_failure("save", kind, entity_id, &err);

				self.queue.record_failure(PendingSync {
					kind,
					entity_id: entity_id.to_string(),
					owner_id: owner_id.to_string(),
					content: content.to_string(),
					failed_at: (self.clock)(),
				})?;
			},
		}

		Ok(())
	}

	/// Removes the local copy, then deletes remotely. Remote deletes are best-effort.
	pub async fn delete(&self, kind: NoteKind, entity_id: &str, owner_id: &str) -> Result<()> {
		let key = note::cache_key(kind, owner_id, entity_id);

		self.local.remove(&key)?;
		// A queued save replayed later would bring the deleted note back.
		self.queue.remove(kind, entity_id, owner_id)?;

		if let Err(err) = self.remote.delete_note(kind, entity_id, owner_id).await {
			log_remote_failure("delete", kind, entity_id, &err);
		}

		Ok(())
	}

	/// Locks or unlocks an album note. This talks to the remote only and reports its failures.
	pub async fn set_album_lock(
		&self,
		album_id: &str,
		owner_id: &str,
		is_locked: bool,
	) -> Result<RemoteNote> {
		match self.remote.set_album_lock(album_id, owner_id, is_locked).await {
			Ok(note) => Ok(note),
			Err(err) => {
				log_remote_failure("lock", NoteKind::Album, album_id, &err);

				Err(err.into())
			},
		}
	}

	/// Replays queued saves for `owner_id`, dropping entries older than the retention window.
	///
	/// Entries that belong to other owners are kept for their own retry. The filtered list is
	/// written back once, after every entry has been processed.
	pub async fn retry_failed_syncs(&self, owner_id: &str) -> Result<RetryReport> {
		let entries = self.queue.load()?;
		let mut report = RetryReport::default();

		if entries.is_empty() {
			return Ok(report);
		}

		let now = (self.clock)();
		let mut remaining = Vec::with_capacity(entries.len());

		for entry in entries {
			if entry.is_expired(now, self.retention) {
				tracing::debug!(
					kind = %entry.kind,
					entity_id = entry.entity_id.as_str(),
					"Dropping expired pending sync."
				);

				report.expired += 1;

				continue;
			}
			if entry.owner_id != owner_id {
				remaining.push(entry);

				continue;
			}

			report.attempted += 1;

			match self.remote.save_note(entry.kind, &entry.entity_id, owner_id, &entry.content).await
			{
				Ok(_) => report.synced += 1,
				Err(err) => {
					log_remote_failure("retry", entry.kind, &entry.entity_id, &err);

					remaining.push(entry);
				},
			}
		}

		self.queue.persist(&remaining)?;

		report.remaining = remaining.len();

		if report.synced > 0 {
			tracing::info!(synced = report.synced, remaining = report.remaining, "Pending notes synced.");
		}

		Ok(report)
	}
}

fn log_remote_failure(op: &str, kind: NoteKind, entity_id: &str, err: &RemoteError) {
	match err {
		RemoteError::Unreachable { .. } => {
			tracing::debug!(op, %kind, entity_id, error = %err, "Remote note store unreachable.");
		},
		RemoteError::Rejected { status, .. } => {
			tracing::warn!(op, %kind, entity_id, status, error = %err, "Remote note store rejected the request.");
		},
		RemoteError::Unknown { .. } => {
			tracing::error!(op, %kind, entity_id, error = %err, "Remote note store failed.");
		},
	}
}
