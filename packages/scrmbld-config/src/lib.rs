mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, NoteSync, Postgres, Service, Spotify, Storage};

use std::{fs, path::Path};

pub const MAX_SPOTIFY_PAGE_LIMIT: u32 = 50;
pub const MAX_RETENTION_DAYS: i64 = 365;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	if let Some(storage) = cfg.storage.as_ref() {
		if storage.postgres.dsn.trim().is_empty() {
			return Err(Error::Validation {
				message: "storage.postgres.dsn must be non-empty.".to_string(),
			});
		}
		if storage.postgres.pool_max_conns == 0 {
			return Err(Error::Validation {
				message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
			});
		}
	}
	if let Some(sync) = cfg.sync.as_ref() {
		if sync.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: "sync.api_base must be non-empty.".to_string(),
			});
		}
		if sync.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "sync.timeout_ms must be greater than zero.".to_string(),
			});
		}
		if !(1..=MAX_RETENTION_DAYS).contains(&sync.retention_days) {
			return Err(Error::Validation {
				message: format!("sync.retention_days must be in the range 1-{MAX_RETENTION_DAYS}."),
			});
		}
		if sync.local_store_path.as_os_str().is_empty() {
			return Err(Error::Validation {
				message: "sync.local_store_path must be non-empty.".to_string(),
			});
		}
	}
	if let Some(spotify) = cfg.spotify.as_ref() {
		for (label, value) in [
			("spotify.client_id", &spotify.client_id),
			("spotify.redirect_uri", &spotify.redirect_uri),
			("spotify.auth_url", &spotify.auth_url),
			("spotify.token_url", &spotify.token_url),
			("spotify.api_base", &spotify.api_base),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
		}

		if spotify.scopes.is_empty() {
			return Err(Error::Validation {
				message: "spotify.scopes must be non-empty.".to_string(),
			});
		}
		if spotify.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "spotify.timeout_ms must be greater than zero.".to_string(),
			});
		}
		if !(1..=MAX_SPOTIFY_PAGE_LIMIT).contains(&spotify.page_limit) {
			return Err(Error::Validation {
				message: format!(
					"spotify.page_limit must be in the range 1-{MAX_SPOTIFY_PAGE_LIMIT}."
				),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.cors_allowed_origins.retain(|origin| !origin.trim().is_empty());

	for origin in &mut cfg.service.cors_allowed_origins {
		*origin = origin.trim().trim_end_matches('/').to_string();
	}

	if let Some(sync) = cfg.sync.as_mut() {
		sync.api_base = sync.api_base.trim().trim_end_matches('/').to_string();
	}
	if let Some(spotify) = cfg.spotify.as_mut() {
		spotify.client_id = spotify.client_id.trim().to_string();
		spotify.api_base = spotify.api_base.trim().trim_end_matches('/').to_string();
		spotify.scopes.retain(|scope| !scope.trim().is_empty());
	}
}
