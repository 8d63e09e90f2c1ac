use serde::{Deserialize, Serialize};

use scrmbld_domain::catalog;
use scrmbld_storage::models::{NewAlbum, NewTrack};

use crate::{Error, Result, ScrmbldService, optional};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlbumInput {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub uri: Option<String>,
	pub name: String,
	pub artist: String,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default)]
	pub release_date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackInput {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub uri: Option<String>,
	pub name: String,
	#[serde(default)]
	pub duration_ms: Option<i64>,
	#[serde(default)]
	pub track_number: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncAlbumRequest {
	pub album: AlbumInput,
	#[serde(default)]
	pub tracks: Vec<TrackInput>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncAlbumResponse {
	pub album_id: String,
	pub tracks_synced: usize,
	pub tracks_skipped: usize,
}

impl ScrmbldService {
	/// Registers an album and its tracks. Tracks without a resolvable id are skipped.
	pub async fn sync_album(&self, req: SyncAlbumRequest) -> Result<SyncAlbumResponse> {
		let Some(album_id) = catalog::spotify_id(req.album.id.as_deref(), req.album.uri.as_deref())
		else {
			return Err(Error::invalid("album.id or album.uri is required."));
		};
		let mut tx = self.db.pool.begin().await?;
		let album = scrmbld_storage::catalog::get_or_create_album(
			&mut *tx,
			&NewAlbum {
				spotify_id: album_id,
				name: req.album.name.trim().to_string(),
				artist: req.album.artist.trim().to_string(),
				image_url: optional(req.album.image_url.as_deref()).map(str::to_string),
				release_date: optional(req.album.release_date.as_deref()).map(str::to_string),
			},
		)
		.await?;
		let mut tracks_synced = 0;
		let mut tracks_skipped = 0;

		for track in &req.tracks {
			let Some(track_id) = catalog::spotify_id(track.id.as_deref(), track.uri.as_deref())
			else {
				tracks_skipped += 1;

				continue;
			};

			scrmbld_storage::catalog::get_or_create_track(
				&mut *tx,
				&NewTrack {
					spotify_id: track_id,
					album_id: Some(album.album_id),
					name: track.name.trim().to_string(),
					duration_ms: track.duration_ms,
					track_number: track.track_number,
				},
			)
			.await?;

			tracks_synced += 1;
		}

		tx.commit().await?;

		if tracks_skipped > 0 {
			tracing::warn!(
				album_id = %album.spotify_id,
				tracks_skipped,
				"Skipped album tracks without an id."
			);
		}

		Ok(SyncAlbumResponse { album_id: album.spotify_id, tracks_synced, tracks_skipped })
	}
}
