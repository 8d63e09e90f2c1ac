use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{Result, models::AlbumListened};

pub async fn get_listened<'e, E>(executor: E, user_id: Uuid, album_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let listened: Option<bool> = sqlx::query_scalar(
		"SELECT listened FROM album_listened WHERE user_id = $1 AND album_id = $2",
	)
	.bind(user_id)
	.bind(album_id)
	.fetch_optional(executor)
	.await?;

	Ok(listened.unwrap_or(false))
}

pub async fn set_listened<'e, E>(
	executor: E,
	user_id: Uuid,
	album_id: Uuid,
	listened: bool,
) -> Result<AlbumListened>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, AlbumListened>(
		"\
INSERT INTO album_listened (user_id, album_id, listened)
VALUES ($1, $2, $3)
ON CONFLICT (user_id, album_id) DO UPDATE
SET listened = EXCLUDED.listened, updated_at = now()
RETURNING user_id, album_id, listened, created_at, updated_at",
	)
	.bind(user_id)
	.bind(album_id)
	.bind(listened)
	.fetch_one(executor)
	.await?;

	Ok(row)
}
