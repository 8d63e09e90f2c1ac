use std::time::Duration;

use color_eyre::eyre;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

use scrmbld_providers::spotify::{SpotifyAlbum, SpotifyTrack, SpotifyUser};

#[derive(Debug, Deserialize)]
pub struct SyncedAlbum {
	pub album_id: String,
	pub tracks_synced: usize,
	pub tracks_skipped: usize,
}

#[derive(Debug, Deserialize)]
pub struct SavedRating {
	pub rating: i32,
}

#[derive(Debug, Serialize)]
struct AlbumPayload<'a> {
	id: &'a str,
	uri: Option<&'a str>,
	name: &'a str,
	artist: String,
	image_url: Option<&'a str>,
	release_date: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct TrackPayload<'a> {
	id: Option<&'a str>,
	uri: Option<&'a str>,
	name: &'a str,
	duration_ms: u64,
	track_number: Option<u32>,
}

/// Calls to the Scrmbld HTTP API that sit outside note sync.
pub struct ApiClient {
	api_base: String,
	http: Client,
}
impl ApiClient {
	pub fn new(cfg: &scrmbld_config::NoteSync) -> eyre::Result<Self> {
		let http = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { api_base: cfg.api_base.trim_end_matches('/').to_string(), http })
	}

	pub async fn sync_user(&self, user: &SpotifyUser) -> eyre::Result<()> {
		let res = self
			.http
			.post(format!("{}/api/users/sync", self.api_base))
			.json(&json!({
				"spotify_id": user.id,
				"display_name": user.display_name,
				"email": user.email,
			}))
			.send()
			.await?;

		ensure_success(res).await?;

		Ok(())
	}

	pub async fn sync_album(
		&self,
		album: &SpotifyAlbum,
		tracks: &[SpotifyTrack],
	) -> eyre::Result<SyncedAlbum> {
		let album_payload = AlbumPayload {
			id: &album.id,
			uri: album.uri.as_deref(),
			name: &album.name,
			artist: album.artist_names(),
			image_url: album.image_url(),
			release_date: album.release_date.as_deref(),
		};
		let track_payloads = tracks
			.iter()
			.map(|track| TrackPayload {
				id: track.id.as_deref(),
				uri: track.uri.as_deref(),
				name: &track.name,
				duration_ms: track.duration_ms,
				track_number: track.track_number,
			})
			.collect::<Vec<_>>();
		let res = self
			.http
			.post(format!("{}/api/albums/sync", self.api_base))
			.json(&json!({ "album": album_payload, "tracks": track_payloads }))
			.send()
			.await?;

		Ok(ensure_success(res).await?.json().await?)
	}

	pub async fn rate_track(
		&self,
		owner_id: &str,
		track_id: &str,
		rating: i32,
	) -> eyre::Result<SavedRating> {
		let res = self
			.http
			.post(format!("{}/api/tracks/{track_id}/ratings", self.api_base))
			.json(&json!({ "spotify_user_id": owner_id, "rating": rating }))
			.send()
			.await?;

		Ok(ensure_success(res).await?.json().await?)
	}
}

async fn ensure_success(res: Response) -> eyre::Result<Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let body = res.text().await.unwrap_or_default();

	Err(eyre::eyre!("API request failed with {status}: {body}"))
}
