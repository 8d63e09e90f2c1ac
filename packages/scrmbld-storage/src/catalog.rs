use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
	Result,
	models::{Album, NewAlbum, NewTrack, Track},
};

pub const PLACEHOLDER_TRACK_NAME: &str = "Unknown Track";

/// Returns the existing album row unchanged, or inserts a new one.
pub async fn get_or_create_album<'e, E>(executor: E, album: &NewAlbum) -> Result<Album>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, Album>(
		"\
INSERT INTO albums (album_id, spotify_id, name, artist, image_url, release_date)
VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT (spotify_id) DO UPDATE
SET spotify_id = albums.spotify_id
RETURNING album_id, spotify_id, name, artist, image_url, release_date, created_at, updated_at",
	)
	.bind(Uuid::new_v4())
	.bind(album.spotify_id.as_str())
	.bind(album.name.as_str())
	.bind(album.artist.as_str())
	.bind(album.image_url.as_deref())
	.bind(album.release_date.as_deref())
	.fetch_one(executor)
	.await?;

	Ok(row)
}

pub async fn find_album<'e, E>(executor: E, spotify_id: &str) -> Result<Option<Album>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, Album>(
		"\
SELECT album_id, spotify_id, name, artist, image_url, release_date, created_at, updated_at
FROM albums
WHERE spotify_id = $1",
	)
	.bind(spotify_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Returns the existing track row unchanged, or inserts a new one.
pub async fn get_or_create_track<'e, E>(executor: E, track: &NewTrack) -> Result<Track>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, Track>(
		"\
INSERT INTO tracks (track_id, spotify_id, album_id, name, duration_ms, track_number)
VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT (spotify_id) DO UPDATE
SET spotify_id = tracks.spotify_id
RETURNING track_id, spotify_id, album_id, name, duration_ms, track_number, created_at, updated_at",
	)
	.bind(Uuid::new_v4())
	.bind(track.spotify_id.as_str())
	.bind(track.album_id)
	.bind(track.name.as_str())
	.bind(track.duration_ms)
	.bind(track.track_number)
	.fetch_one(executor)
	.await?;

	Ok(row)
}

/// Ensures a track row exists so notes can reference tracks that were never synced.
pub async fn ensure_track<'e, E>(executor: E, spotify_id: &str) -> Result<Track>
where
	E: PgExecutor<'e>,
{
	let placeholder = NewTrack {
		spotify_id: spotify_id.to_string(),
		album_id: None,
		name: PLACEHOLDER_TRACK_NAME.to_string(),
		duration_ms: Some(0),
		track_number: Some(0),
	};

	get_or_create_track(executor, &placeholder).await
}

pub async fn find_track<'e, E>(executor: E, spotify_id: &str) -> Result<Option<Track>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, Track>(
		"\
SELECT track_id, spotify_id, album_id, name, duration_ms, track_number, created_at, updated_at
FROM tracks
WHERE spotify_id = $1",
	)
	.bind(spotify_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}
