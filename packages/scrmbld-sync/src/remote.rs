use std::{future::Future, pin::Pin};

use scrmbld_domain::note::NoteKind;

use crate::RemoteResult;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoteNote {
	pub content: String,
	pub is_locked: bool,
}

/// The authoritative note store the sync manager mirrors into.
pub trait RemoteNoteStore
where
	Self: Send + Sync,
{
	/// `Ok(None)` means the remote holds no note for the key.
	fn fetch_note<'a>(
		&'a self,
		kind: NoteKind,
		entity_id: &'a str,
		owner_id: &'a str,
	) -> BoxFuture<'a, RemoteResult<Option<RemoteNote>>>;

	/// Keyed upsert. Repeating it with the same content is harmless.
	fn save_note<'a>(
		&'a self,
		kind: NoteKind,
		entity_id: &'a str,
		owner_id: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, RemoteResult<RemoteNote>>;

	/// Deleting a note that does not exist succeeds.
	fn delete_note<'a>(
		&'a self,
		kind: NoteKind,
		entity_id: &'a str,
		owner_id: &'a str,
	) -> BoxFuture<'a, RemoteResult<()>>;

	fn set_album_lock<'a>(
		&'a self,
		album_id: &'a str,
		owner_id: &'a str,
		is_locked: bool,
	) -> BoxFuture<'a, RemoteResult<RemoteNote>>;
}
