use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
	Result,
	models::{AlbumNote, TrackNote},
};

pub async fn find_track_note<'e, E>(
	executor: E,
	user_id: Uuid,
	track_id: Uuid,
) -> Result<Option<TrackNote>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, TrackNote>(
		"\
SELECT note_id, user_id, track_id, content, created_at, updated_at
FROM track_notes
WHERE user_id = $1 AND track_id = $2",
	)
	.bind(user_id)
	.bind(track_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn upsert_track_note<'e, E>(
	executor: E,
	user_id: Uuid,
	track_id: Uuid,
	content: &str,
) -> Result<TrackNote>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, TrackNote>(
		"\
INSERT INTO track_notes (note_id, user_id, track_id, content)
VALUES ($1, $2, $3, $4)
ON CONFLICT (user_id, track_id) DO UPDATE
SET content = EXCLUDED.content, updated_at = now()
RETURNING note_id, user_id, track_id, content, created_at, updated_at",
	)
	.bind(Uuid::new_v4())
	.bind(user_id)
	.bind(track_id)
	.bind(content)
	.fetch_one(executor)
	.await?;

	Ok(row)
}

/// Returns whether a note was removed.
pub async fn delete_track_note<'e, E>(executor: E, user_id: Uuid, track_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM track_notes WHERE user_id = $1 AND track_id = $2")
		.bind(user_id)
		.bind(track_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn find_album_note<'e, E>(
	executor: E,
	user_id: Uuid,
	album_id: Uuid,
) -> Result<Option<AlbumNote>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, AlbumNote>(
		"\
SELECT note_id, user_id, album_id, content, is_locked, created_at, updated_at
FROM album_notes
WHERE user_id = $1 AND album_id = $2",
	)
	.bind(user_id)
	.bind(album_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Creates or replaces the note. Returns `None` when the existing note is locked.
pub async fn upsert_album_note<'e, E>(
	executor: E,
	user_id: Uuid,
	album_id: Uuid,
	content: &str,
) -> Result<Option<AlbumNote>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, AlbumNote>(
		"\
INSERT INTO album_notes (note_id, user_id, album_id, content, is_locked)
VALUES ($1, $2, $3, $4, FALSE)
ON CONFLICT (user_id, album_id) DO UPDATE
SET content = EXCLUDED.content, updated_at = now()
WHERE album_notes.is_locked = FALSE
RETURNING note_id, user_id, album_id, content, is_locked, created_at, updated_at",
	)
	.bind(Uuid::new_v4())
	.bind(user_id)
	.bind(album_id)
	.bind(content)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Returns whether a note was removed.
pub async fn delete_album_note<'e, E>(executor: E, user_id: Uuid, album_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM album_notes WHERE user_id = $1 AND album_id = $2")
		.bind(user_id)
		.bind(album_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn set_album_note_lock<'e, E>(
	executor: E,
	user_id: Uuid,
	album_id: Uuid,
	is_locked: bool,
) -> Result<Option<AlbumNote>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, AlbumNote>(
		"\
UPDATE album_notes
SET is_locked = $3, updated_at = now()
WHERE user_id = $1 AND album_id = $2
RETURNING note_id, user_id, album_id, content, is_locked, created_at, updated_at",
	)
	.bind(user_id)
	.bind(album_id)
	.bind(is_locked)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}
