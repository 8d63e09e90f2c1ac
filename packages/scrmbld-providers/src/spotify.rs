use std::{sync::Mutex, time::Duration};

use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{Error, Result};

/// Tokens the client currently holds. Callers persist these after each call that may refresh.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tokens {
	pub access_token: Option<String>,
	pub refresh_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	pub access_token: String,
	#[serde(default)]
	pub refresh_token: Option<String>,
	#[serde(default)]
	pub expires_in: Option<u64>,
	#[serde(default)]
	pub scope: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpotifyUser {
	pub id: String,
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpotifyArtist {
	pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpotifyImage {
	pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpotifyAlbum {
	pub id: String,
	#[serde(default)]
	pub uri: Option<String>,
	pub name: String,
	#[serde(default)]
	pub artists: Vec<SpotifyArtist>,
	#[serde(default)]
	pub images: Vec<SpotifyImage>,
	#[serde(default)]
	pub release_date: Option<String>,
	#[serde(default)]
	pub total_tracks: Option<u32>,
}
impl SpotifyAlbum {
	pub fn artist_names(&self) -> String {
		join_artists(&self.artists)
	}

	pub fn image_url(&self) -> Option<&str> {
		self.images.first().map(|image| image.url.as_str())
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpotifyTrack {
	/// Absent for local files in playlists.
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub uri: Option<String>,
	pub name: String,
	#[serde(default)]
	pub duration_ms: u64,
	#[serde(default)]
	pub track_number: Option<u32>,
	#[serde(default)]
	pub artists: Vec<SpotifyArtist>,
}
impl SpotifyTrack {
	pub fn artist_names(&self) -> String {
		join_artists(&self.artists)
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlaylistOwner {
	#[serde(default)]
	pub display_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlaylistTracksRef {
	pub total: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SpotifyPlaylist {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub owner: Option<PlaylistOwner>,
	#[serde(default)]
	pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
	items: Vec<T>,
	#[serde(default)]
	next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SavedAlbumItem {
	album: SpotifyAlbum,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
	#[serde(default)]
	track: Option<SpotifyTrack>,
}

pub struct SpotifyClient {
	cfg: scrmbld_config::Spotify,
	http: Client,
	tokens: Mutex<Tokens>,
}
impl SpotifyClient {
	pub fn new(cfg: scrmbld_config::Spotify, tokens: Tokens) -> Result<Self> {
		let http = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { cfg, http, tokens: Mutex::new(tokens) })
	}

	pub fn tokens(&self) -> Tokens {
		self.tokens.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn store_tokens(&self, response: &TokenResponse) {
		let mut tokens = self.tokens.lock().unwrap_or_else(|err| err.into_inner());

		tokens.access_token = Some(response.access_token.clone());

		// Spotify may omit the refresh token on refresh; keep the old one.
		if let Some(refresh_token) = &response.refresh_token {
			tokens.refresh_token = Some(refresh_token.clone());
		}
	}

	/// Trades an authorization code and its PKCE verifier for tokens.
	pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<TokenResponse> {
		let form = [
			("client_id", self.cfg.client_id.as_str()),
			("grant_type", "authorization_code"),
			("code", code),
			("redirect_uri", self.cfg.redirect_uri.as_str()),
			("code_verifier", verifier),
		];
		let response = self.token_request(&form).await?;

		self.store_tokens(&response);

		tracing::info!("Spotify authorization code exchanged.");

		Ok(response)
	}

	pub async fn refresh(&self) -> Result<TokenResponse> {
		let Some(refresh_token) = self.tokens().refresh_token else {
			return Err(Error::NotAuthenticated);
		};
		let form = [
			("client_id", self.cfg.client_id.as_str()),
			("grant_type", "refresh_token"),
			("refresh_token", refresh_token.as_str()),
		];
		let response = self.token_request(&form).await?;

		self.store_tokens(&response);

		tracing::debug!("Spotify access token refreshed.");

		Ok(response)
	}

	async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
		let res = self.http.post(&self.cfg.token_url).form(form).send().await?;
		let status = res.status();

		if !status.is_success() {
			let message = res.text().await.unwrap_or_default();

			return Err(Error::Status { status: status.as_u16(), message });
		}

		Ok(res.json().await?)
	}

	/// Authenticated GET. A 401 triggers one refresh and one retry.
	pub async fn get_json<T>(&self, url: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let Some(access_token) = self.tokens().access_token else {
			return Err(Error::NotAuthenticated);
		};
		let mut res =
			self.http.get(url).headers(crate::auth_headers(&access_token)?).send().await?;

		if res.status() == StatusCode::UNAUTHORIZED {
			tracing::debug!(url, "Spotify rejected the access token; refreshing.");

			let refreshed = self.refresh().await?;

			res = self
				.http
				.get(url)
				.headers(crate::auth_headers(&refreshed.access_token)?)
				.send()
				.await?;
		}

		let status = res.status();

		if !status.is_success() {
			let message = res.text().await.unwrap_or_default();

			tracing::warn!(url, status = status.as_u16(), "Spotify request failed.");

			return Err(Error::Status { status: status.as_u16(), message });
		}

		Ok(res.json().await?)
	}

	async fn collect_pages<T>(&self, first: String) -> Result<Vec<T>>
	where
		T: DeserializeOwned,
	{
		let mut items = Vec::new();
		let mut next = Some(first);
		let mut pages = 0_usize;

		while let Some(url) = next {
			let page: Page<T> = self.get_json(&url).await?;

			pages += 1;
			items.extend(page.items);
			next = page.next;
		}

		tracing::debug!(pages, items = items.len(), "Collected Spotify pages.");

		Ok(items)
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}{path}", self.cfg.api_base)
	}

	fn first_page(&self, path: &str) -> String {
		format!("{}{path}?limit={}&offset=0", self.cfg.api_base, self.cfg.page_limit)
	}

	pub async fn current_user(&self) -> Result<SpotifyUser> {
		self.get_json(&self.endpoint("/me")).await
	}

	pub async fn saved_albums(&self) -> Result<Vec<SpotifyAlbum>> {
		let items: Vec<SavedAlbumItem> = self.collect_pages(self.first_page("/me/albums")).await?;

		Ok(items.into_iter().map(|item| item.album).collect())
	}

	pub async fn playlists(&self) -> Result<Vec<SpotifyPlaylist>> {
		self.collect_pages(self.first_page("/me/playlists")).await
	}

	pub async fn album_tracks(&self, album_id: &str) -> Result<Vec<SpotifyTrack>> {
		self.collect_pages(self.first_page(&format!("/albums/{album_id}/tracks"))).await
	}

	/// Playlist entries whose track is unavailable are dropped.
	pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<SpotifyTrack>> {
		let items: Vec<PlaylistItem> =
			self.collect_pages(self.first_page(&format!("/playlists/{playlist_id}/tracks"))).await?;

		Ok(items.into_iter().filter_map(|item| item.track).collect())
	}
}

fn join_artists(artists: &[SpotifyArtist]) -> String {
	artists.iter().map(|artist| artist.name.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_saved_album_page() {
		let json = serde_json::json!({
			"items": [
				{
					"album": {
						"id": "a1",
						"uri": "spotify:album:a1",
						"name": "Blue Train",
						"artists": [{ "name": "John Coltrane" }, { "name": "Lee Morgan" }],
						"images": [{ "url": "https://img/large" }, { "url": "https://img/small" }],
						"release_date": "1958-01"
					}
				}
			],
			"next": null
		});
		let page: Page<SavedAlbumItem> = serde_json::from_value(json).expect("parse failed");

		assert!(page.next.is_none());
		assert_eq!(page.items[0].album.artist_names(), "John Coltrane, Lee Morgan");
		assert_eq!(page.items[0].album.image_url(), Some("https://img/large"));
	}

	#[test]
	fn playlist_items_tolerate_missing_tracks() {
		let json = serde_json::json!({
			"items": [
				{ "track": null },
				{ "track": { "id": null, "name": "Local demo", "duration_ms": 1000 } },
				{ "track": { "id": "t1", "name": "Giant Steps", "duration_ms": 286000 } }
			],
			"next": "https://api.spotify.com/v1/playlists/p/tracks?offset=50"
		});
		let page: Page<PlaylistItem> = serde_json::from_value(json).expect("parse failed");
		let tracks = page.items.into_iter().filter_map(|item| item.track).collect::<Vec<_>>();

		assert_eq!(tracks.len(), 2);
		assert!(tracks[0].id.is_none());
		assert_eq!(page.next.as_deref(), Some("https://api.spotify.com/v1/playlists/p/tracks?offset=50"));
	}
}
