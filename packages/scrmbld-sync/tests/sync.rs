use std::{
	collections::HashMap,
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
};

use time::{Duration, OffsetDateTime, macros::datetime};

use scrmbld_domain::note::{FAILED_SYNCS_KEY, NoteKind};
use scrmbld_sync::{
	BoxFuture, LocalStore, MemoryStore, NoteSyncManager, PendingSync, RemoteError, RemoteNote,
	RemoteNoteStore, RemoteResult, RetryReport,
};

type NoteKey = (NoteKind, String, String);

#[derive(Default)]
struct FakeRemote {
	notes: Mutex<HashMap<NoteKey, RemoteNote>>,
	offline: AtomicBool,
	reject_saves: AtomicBool,
	fetch_calls: AtomicUsize,
	save_calls: AtomicUsize,
	delete_calls: AtomicUsize,
}
impl FakeRemote {
	fn key(kind: NoteKind, entity_id: &str, owner_id: &str) -> NoteKey {
		(kind, entity_id.to_string(), owner_id.to_string())
	}

	fn set_offline(&self, offline: bool) {
		self.offline.store(offline, Ordering::SeqCst);
	}

	fn content(&self, kind: NoteKind, entity_id: &str, owner_id: &str) -> Option<String> {
		self.notes
			.lock()
			.expect("notes lock")
			.get(&Self::key(kind, entity_id, owner_id))
			.map(|note| note.content.clone())
	}

	fn put(&self, kind: NoteKind, entity_id: &str, owner_id: &str, content: &str) {
		self.notes.lock().expect("notes lock").insert(
			Self::key(kind, entity_id, owner_id),
			RemoteNote { content: content.to_string(), is_locked: false },
		);
	}

	fn check_online(&self) -> RemoteResult<()> {
		if self.offline.load(Ordering::SeqCst) {
			return Err(RemoteError::Unreachable { message: "connection refused".to_string() });
		}

		Ok(())
	}
}
impl RemoteNoteStore for FakeRemote {
	fn fetch_note<'a>(
		&'a self,
		kind: NoteKind,
		entity_id: &'a str,
		owner_id: &'a str,
	) -> BoxFuture<'a, RemoteResult<Option<RemoteNote>>> {
		self.fetch_calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			self.check_online()?;

			Ok(self
				.notes
				.lock()
				.expect("notes lock")
				.get(&Self::key(kind, entity_id, owner_id))
				.cloned())
		})
	}

	fn save_note<'a>(
		&'a self,
		kind: NoteKind,
		entity_id: &'a str,
		owner_id: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, RemoteResult<RemoteNote>> {
		self.save_calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			self.check_online()?;

			if self.reject_saves.load(Ordering::SeqCst) {
				return Err(RemoteError::Rejected {
					status: 403,
					message: "Note is locked and cannot be edited.".to_string(),
				});
			}

			self.put(kind, entity_id, owner_id, content);

			Ok(RemoteNote { content: content.to_string(), is_locked: false })
		})
	}

	fn delete_note<'a>(
		&'a self,
		kind: NoteKind,
		entity_id: &'a str,
		owner_id: &'a str,
	) -> BoxFuture<'a, RemoteResult<()>> {
		self.delete_calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			self.check_online()?;
			self.notes.lock().expect("notes lock").remove(&Self::key(kind, entity_id, owner_id));

			Ok(())
		})
	}

	fn set_album_lock<'a>(
		&'a self,
		album_id: &'a str,
		owner_id: &'a str,
		is_locked: bool,
	) -> BoxFuture<'a, RemoteResult<RemoteNote>> {
		Box::pin(async move {
			self.check_online()?;

			let mut notes = self.notes.lock().expect("notes lock");
			let Some(note) = notes.get_mut(&Self::key(NoteKind::Album, album_id, owner_id)) else {
				return Err(RemoteError::Rejected {
					status: 404,
					message: "Note not found.".to_string(),
				});
			};

			note.is_locked = is_locked;

			Ok(note.clone())
		})
	}
}

struct Harness {
	local: Arc<MemoryStore>,
	remote: Arc<FakeRemote>,
	manager: NoteSyncManager,
}

const NOW: OffsetDateTime = datetime!(2025-06-10 09:00:00 UTC);

fn harness() -> Harness {
	let local = Arc::new(MemoryStore::new());
	let remote = Arc::new(FakeRemote::default());
	let manager = NoteSyncManager::new(local.clone(), remote.clone()).with_clock(|| NOW);

	Harness { local, remote, manager }
}

fn pending(h: &Harness) -> Vec<PendingSync> {
	h.manager.queue().load().expect("Failed to load pending syncs.")
}

#[tokio::test]
async fn save_then_get_reads_back_even_when_remote_fails() {
	let h = harness();

	h.remote.set_offline(true);
	h.manager.save(NoteKind::Track, "t1", "u1", "  Great hook \n").await.expect("save");

	let content = h.manager.get(NoteKind::Track, "t1", "u1").await.expect("get");

	assert_eq!(content, "Great hook");
	assert_eq!(
		h.local.get("track_note_u1_t1").expect("local get").as_deref(),
		Some("Great hook")
	);
}

#[tokio::test]
async fn repeated_saves_leave_the_same_state() {
	let h = harness();

	h.remote.set_offline(true);
	h.manager.save(NoteKind::Album, "a1", "u1", "Front-loaded").await.expect("save");

	let once_local = h.local.get("album_note_u1_a1").expect("local get");
	let once_pending = pending(&h);

	h.manager.save(NoteKind::Album, "a1", "u1", "Front-loaded").await.expect("save");

	assert_eq!(h.local.get("album_note_u1_a1").expect("local get"), once_local);
	assert_eq!(pending(&h), once_pending);
	assert_eq!(once_pending.len(), 1);
}

#[tokio::test]
async fn remote_content_wins_over_different_local_content() {
	let h = harness();

	h.local.set("track_note_u1_t1", "A").expect("local set");
	h.remote.put(NoteKind::Track, "t1", "u1", "B");

	assert_eq!(h.manager.get(NoteKind::Track, "t1", "u1").await.expect("get"), "B");
	assert_eq!(h.local.get("track_note_u1_t1").expect("local get").as_deref(), Some("B"));
}

#[tokio::test]
async fn local_content_survives_remote_outage_and_empty_remote() {
	let h = harness();

	h.local.set("track_note_u1_t1", "A").expect("local set");

	assert_eq!(h.manager.get(NoteKind::Track, "t1", "u1").await.expect("get"), "A");

	h.remote.set_offline(true);

	assert_eq!(h.manager.get(NoteKind::Track, "t1", "u1").await.expect("get"), "A");
	assert_eq!(h.remote.fetch_calls.load(Ordering::SeqCst), 2);
	assert!(pending(&h).is_empty());
}

#[tokio::test]
async fn empty_local_is_filled_from_remote() {
	let h = harness();

	h.remote.put(NoteKind::Album, "a1", "u1", "Side B drags");

	assert_eq!(h.manager.get(NoteKind::Album, "a1", "u1").await.expect("get"), "Side B drags");
	assert_eq!(
		h.local.get("album_note_u1_a1").expect("local get").as_deref(),
		Some("Side B drags")
	);

	h.remote.set_offline(true);

	assert_eq!(h.manager.get(NoteKind::Album, "missing", "u1").await.expect("get"), "");
}

#[tokio::test]
async fn empty_save_behaves_like_delete() {
	let h = harness();

	h.manager.save(NoteKind::Track, "t1", "u1", "Great hook").await.expect("save");
	h.manager.save(NoteKind::Track, "t1", "u1", "   ").await.expect("blank save");

	assert_eq!(h.manager.get(NoteKind::Track, "t1", "u1").await.expect("get"), "");
	assert_eq!(h.local.get("track_note_u1_t1").expect("local get"), None);
	assert_eq!(h.remote.content(NoteKind::Track, "t1", "u1"), None);
	assert_eq!(h.remote.delete_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn delete_swallows_remote_failure_and_drops_queued_save() {
	let h = harness();

	h.remote.set_offline(true);
	h.manager.save(NoteKind::Track, "t1", "u1", "queued").await.expect("save");

	assert_eq!(pending(&h).len(), 1);

	h.manager.delete(NoteKind::Track, "t1", "u1").await.expect("delete");

	assert_eq!(h.local.get("track_note_u1_t1").expect("local get"), None);
	assert!(pending(&h).is_empty());
	assert_eq!(h.remote.delete_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn expired_entries_are_dropped_without_a_remote_call() {
	let h = harness();
	let stale = PendingSync {
		kind: NoteKind::Track,
		entity_id: "t_old".to_string(),
		owner_id: "u1".to_string(),
		content: "from last month".to_string(),
		failed_at: NOW - Duration::days(8),
	};

	h.manager.queue().persist(&[stale]).expect("persist");

	let report = h.manager.retry_failed_syncs("u1").await.expect("retry");

	assert_eq!(report, RetryReport { attempted: 0, synced: 0, expired: 1, remaining: 0 });
	assert_eq!(h.remote.save_calls.load(Ordering::SeqCst), 0);
	assert!(pending(&h).is_empty());
}

#[tokio::test]
async fn consecutive_failures_keep_one_entry_with_latest_content() {
	let h = harness();

	h.remote.set_offline(true);
	h.manager.save(NoteKind::Track, "t1", "u1", "first").await.expect("save");
	h.manager.save(NoteKind::Track, "t1", "u1", "second").await.expect("save");

	let entries = pending(&h);

	assert_eq!(entries.len(), 1);
	assert_eq!(entries[0].content, "second");
	assert_eq!(entries[0].kind, NoteKind::Track);
	assert_eq!(entries[0].failed_at, NOW);
}

#[tokio::test]
async fn outage_then_retry_end_to_end() {
	let h = harness();

	assert_eq!(h.manager.get(NoteKind::Track, "t1", "u1").await.expect("get"), "");

	h.manager.save(NoteKind::Track, "t1", "u1", "Great hook").await.expect("save");

	assert_eq!(
		h.local.get("track_note_u1_t1").expect("local get").as_deref(),
		Some("Great hook")
	);
	assert_eq!(h.remote.content(NoteKind::Track, "t1", "u1").as_deref(), Some("Great hook"));

	h.remote.set_offline(true);
	h.manager.save(NoteKind::Track, "t1", "u1", "Even better").await.expect("save");

	assert_eq!(
		h.local.get("track_note_u1_t1").expect("local get").as_deref(),
		Some("Even better")
	);
	assert_eq!(
		pending(&h),
		vec![PendingSync {
			kind: NoteKind::Track,
			entity_id: "t1".to_string(),
			owner_id: "u1".to_string(),
			content: "Even better".to_string(),
			failed_at: NOW,
		}]
	);

	h.remote.set_offline(false);

	let report = h.manager.retry_failed_syncs("u1").await.expect("retry");

	assert_eq!(report, RetryReport { attempted: 1, synced: 1, expired: 0, remaining: 0 });
	assert_eq!(h.remote.content(NoteKind::Track, "t1", "u1").as_deref(), Some("Even better"));
	assert!(pending(&h).is_empty());
	assert_eq!(h.local.get(FAILED_SYNCS_KEY).expect("local get").as_deref(), Some("[]"));
}

#[tokio::test]
async fn failed_retries_stay_queued_and_other_owners_are_untouched() {
	let h = harness();

	h.remote.set_offline(true);
	h.manager.save(NoteKind::Track, "t1", "u1", "mine").await.expect("save");
	h.manager.save(NoteKind::Album, "a1", "u2", "theirs").await.expect("save");

	let report = h.manager.retry_failed_syncs("u1").await.expect("retry");

	assert_eq!(report, RetryReport { attempted: 1, synced: 0, expired: 0, remaining: 2 });
	assert_eq!(pending(&h).len(), 2);

	h.remote.set_offline(false);

	let report = h.manager.retry_failed_syncs("u1").await.expect("retry");

	assert_eq!(report, RetryReport { attempted: 1, synced: 1, expired: 0, remaining: 1 });
	assert_eq!(pending(&h)[0].owner_id, "u2");
	assert_eq!(h.remote.content(NoteKind::Album, "a1", "u2"), None);
}

#[tokio::test]
async fn successful_save_clears_stale_pending_entry() {
	let h = harness();

	h.remote.set_offline(true);
	h.manager.save(NoteKind::Track, "t1", "u1", "old").await.expect("save");
	h.remote.set_offline(false);
	h.manager.save(NoteKind::Track, "t1", "u1", "new").await.expect("save");

	assert!(pending(&h).is_empty());

	h.manager.retry_failed_syncs("u1").await.expect("retry");

	assert_eq!(h.remote.content(NoteKind::Track, "t1", "u1").as_deref(), Some("new"));
}

#[tokio::test]
async fn rejected_saves_are_queued_like_outages() {
	let h = harness();

	h.remote.reject_saves.store(true, Ordering::SeqCst);
	h.manager.save(NoteKind::Album, "a1", "u1", "locked edit").await.expect("save");

	assert_eq!(pending(&h).len(), 1);
	assert_eq!(
		h.local.get("album_note_u1_a1").expect("local get").as_deref(),
		Some("locked edit")
	);
}

#[tokio::test]
async fn album_lock_reports_remote_failures() {
	let h = harness();

	h.manager.save(NoteKind::Album, "a1", "u1", "final").await.expect("save");

	let note = h.manager.set_album_lock("a1", "u1", true).await.expect("lock");

	assert!(note.is_locked);

	let err = h.manager.set_album_lock("a2", "u1", true).await.expect_err("no note");

	assert!(matches!(
		err,
		scrmbld_sync::Error::Remote(RemoteError::Rejected { status: 404, .. })
	));
}

#[tokio::test]
async fn retention_window_is_configurable() {
	let local = Arc::new(MemoryStore::new());
	let remote = Arc::new(FakeRemote::default());
	let manager = NoteSyncManager::new(local.clone(), remote.clone())
		.with_clock(|| NOW)
		.with_retention(Duration::days(1));

	manager
		.queue()
		.persist(&[PendingSync {
			kind: NoteKind::Album,
			entity_id: "a1".to_string(),
			owner_id: "u1".to_string(),
			content: "two days old".to_string(),
			failed_at: NOW - Duration::days(2),
		}])
		.expect("persist");

	let report = manager.retry_failed_syncs("u1").await.expect("retry");

	assert_eq!(report.expired, 1);
	assert_eq!(remote.save_calls.load(Ordering::SeqCst), 0);
}
