use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use scrmbld_domain::note::{self, NoteKind};
use scrmbld_storage::models::{AlbumNote, TrackNote};

use crate::{Error, Result, ScrmbldService, required};

/// Identifies one user's note on a track or album.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteQuery {
	pub spotify_user_id: String,
	pub spotify_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteSaveRequest {
	pub spotify_user_id: String,
	pub spotify_id: String,
	pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteLockRequest {
	pub spotify_user_id: String,
	pub spotify_id: String,
	pub is_locked: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteResponse {
	pub note_id: Uuid,
	pub kind: NoteKind,
	pub content: String,
	pub is_locked: bool,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<TrackNote> for NoteResponse {
	fn from(note: TrackNote) -> Self {
		Self {
			note_id: note.note_id,
			kind: NoteKind::Track,
			content: note.content,
			is_locked: false,
			created_at: note.created_at,
			updated_at: note.updated_at,
		}
	}
}
impl From<AlbumNote> for NoteResponse {
	fn from(note: AlbumNote) -> Self {
		Self {
			note_id: note.note_id,
			kind: NoteKind::Album,
			content: note.content,
			is_locked: note.is_locked,
			created_at: note.created_at,
			updated_at: note.updated_at,
		}
	}
}

impl ScrmbldService {
	/// Returns `None` when the user, the track, or the note is unknown.
	pub async fn get_track_note(&self, req: NoteQuery) -> Result<Option<NoteResponse>> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "track id")?;
		let Some(user) = self.find_user(spotify_user_id).await? else {
			return Ok(None);
		};
		let Some(track) = scrmbld_storage::catalog::find_track(&self.db.pool, spotify_id).await?
		else {
			return Ok(None);
		};
		let note =
			scrmbld_storage::notes::find_track_note(&self.db.pool, user.user_id, track.track_id)
				.await?;

		Ok(note.map(NoteResponse::from))
	}

	/// Creates or replaces a track note, registering a placeholder track when needed.
	pub async fn save_track_note(&self, req: NoteSaveRequest) -> Result<NoteResponse> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "track id")?;
		let Some(content) = note::normalize_content(&req.content) else {
			return Err(Error::invalid("content is required."));
		};
		let user = self.ensure_user(spotify_user_id).await?;
		let track = scrmbld_storage::catalog::ensure_track(&self.db.pool, spotify_id).await?;
		let note = scrmbld_storage::notes::upsert_track_note(
			&self.db.pool,
			user.user_id,
			track.track_id,
			content,
		)
		.await?;

		tracing::debug!(note_id = %note.note_id, track_id = spotify_id, "Track note saved.");

		Ok(note.into())
	}

	pub async fn delete_track_note(&self, req: NoteQuery) -> Result<()> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "track id")?;
		let Some(user) = self.find_user(spotify_user_id).await? else {
			return Err(Error::not_found("User not found."));
		};
		let Some(track) = scrmbld_storage::catalog::find_track(&self.db.pool, spotify_id).await?
		else {
			return Err(Error::not_found("Track not found."));
		};
		let deleted =
			scrmbld_storage::notes::delete_track_note(&self.db.pool, user.user_id, track.track_id)
				.await?;

		if !deleted {
			return Err(Error::not_found("Note not found."));
		}

		Ok(())
	}

	/// Returns `None` when the user, the album, or the note is unknown.
	pub async fn get_album_note(&self, req: NoteQuery) -> Result<Option<NoteResponse>> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "album id")?;
		let Some(user) = self.find_user(spotify_user_id).await? else {
			return Ok(None);
		};
		let Some(album) = scrmbld_storage::catalog::find_album(&self.db.pool, spotify_id).await?
		else {
			return Ok(None);
		};
		let note =
			scrmbld_storage::notes::find_album_note(&self.db.pool, user.user_id, album.album_id)
				.await?;

		Ok(note.map(NoteResponse::from))
	}

	/// Creates or replaces an album note. The album must already be synced and the note unlocked.
	pub async fn save_album_note(&self, req: NoteSaveRequest) -> Result<NoteResponse> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "album id")?;
		let Some(content) = note::normalize_content(&req.content) else {
			return Err(Error::invalid("content is required."));
		};
		let user = self.ensure_user(spotify_user_id).await?;
		let Some(album) = scrmbld_storage::catalog::find_album(&self.db.pool, spotify_id).await?
		else {
			return Err(Error::not_found("Album not found."));
		};
		let Some(note) = scrmbld_storage::notes::upsert_album_note(
			&self.db.pool,
			user.user_id,
			album.album_id,
			content,
		)
		.await?
		else {
			return Err(Error::Forbidden {
				message: "Note is locked and cannot be edited.".to_string(),
			});
		};

		tracing::debug!(note_id = %note.note_id, album_id = spotify_id, "Album note saved.");

		Ok(note.into())
	}

	pub async fn delete_album_note(&self, req: NoteQuery) -> Result<()> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "album id")?;
		let Some(user) = self.find_user(spotify_user_id).await? else {
			return Err(Error::not_found("User not found."));
		};
		let Some(album) = scrmbld_storage::catalog::find_album(&self.db.pool, spotify_id).await?
		else {
			return Err(Error::not_found("Album not found."));
		};
		let deleted =
			scrmbld_storage::notes::delete_album_note(&self.db.pool, user.user_id, album.album_id)
				.await?;

		if !deleted {
			return Err(Error::not_found("Note not found."));
		}

		Ok(())
	}

	pub async fn set_album_note_lock(&self, req: NoteLockRequest) -> Result<NoteResponse> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "album id")?;
		let Some(album) = scrmbld_storage::catalog::find_album(&self.db.pool, spotify_id).await?
		else {
			return Err(Error::not_found("Album not found."));
		};
		let Some(user) = self.find_user(spotify_user_id).await? else {
			return Err(Error::not_found("Note not found."));
		};
		let Some(note) = scrmbld_storage::notes::set_album_note_lock(
			&self.db.pool,
			user.user_id,
			album.album_id,
			req.is_locked,
		)
		.await?
		else {
			return Err(Error::not_found("Note not found."));
		};

		tracing::info!(album_id = spotify_id, is_locked = note.is_locked, "Album note lock changed.");

		Ok(note.into())
	}
}
