use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Option<Storage>,
	pub sync: Option<NoteSync>,
	pub spotify: Option<Spotify>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Browser origins allowed to call the HTTP API. Empty means same-origin only.
	#[serde(default)]
	pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Client-side note sync settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NoteSync {
	/// Base URL of the Scrmbld HTTP API, without the `/api` suffix.
	pub api_base: String,
	pub timeout_ms: u64,
	/// Pending sync entries older than this are discarded instead of retried.
	#[serde(default = "default_retention_days")]
	pub retention_days: i64,
	/// JSON file backing the local key-value store.
	pub local_store_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Spotify {
	pub client_id: String,
	pub redirect_uri: String,
	#[serde(default = "default_auth_url")]
	pub auth_url: String,
	#[serde(default = "default_token_url")]
	pub token_url: String,
	#[serde(default = "default_api_base")]
	pub api_base: String,
	#[serde(default = "default_scopes")]
	pub scopes: Vec<String>,
	pub timeout_ms: u64,
	#[serde(default = "default_page_limit")]
	pub page_limit: u32,
}

fn default_retention_days() -> i64 {
	7
}

fn default_auth_url() -> String {
	"https://accounts.spotify.com/authorize".to_string()
}

fn default_token_url() -> String {
	"https://accounts.spotify.com/api/token".to_string()
}

fn default_api_base() -> String {
	"https://api.spotify.com/v1".to_string()
}

fn default_scopes() -> Vec<String> {
	["user-library-read", "user-library-modify", "playlist-read-private", "playlist-read-collaborative"]
		.into_iter()
		.map(str::to_string)
		.collect()
}

fn default_page_limit() -> u32 {
	50
}
