use std::sync::Arc;

use color_eyre::eyre;

use scrmbld_domain::{catalog, rating, score};
use scrmbld_providers::{
	pkce,
	spotify::{SpotifyClient, Tokens},
};
use scrmbld_sync::{FileStore, HttpNoteStore, LocalStore, NoteSyncManager, RetryReport};

use crate::{Command, NoteCommand, api::ApiClient, session};

pub struct App {
	store: Arc<dyn LocalStore>,
	spotify_cfg: scrmbld_config::Spotify,
	spotify: SpotifyClient,
	tokens: Tokens,
	notes: NoteSyncManager,
	api: ApiClient,
}
impl App {
	pub fn new(config: &scrmbld_config::Config) -> eyre::Result<Self> {
		let sync_cfg = config
			.sync
			.as_ref()
			.ok_or_else(|| eyre::eyre!("The client requires a [sync] section."))?;
		let spotify_cfg = config
			.spotify
			.clone()
			.ok_or_else(|| eyre::eyre!("The client requires a [spotify] section."))?;
		let store: Arc<dyn LocalStore> = Arc::new(FileStore::open(&sync_cfg.local_store_path)?);
		let tokens = session::load_tokens(store.as_ref())?;
		let spotify = SpotifyClient::new(spotify_cfg.clone(), tokens.clone())?;
		let remote = Arc::new(HttpNoteStore::new(sync_cfg)?);
		let notes = NoteSyncManager::new(store.clone(), remote)
			.with_retention(time::Duration::days(sync_cfg.retention_days));
		let api = ApiClient::new(sync_cfg)?;

		Ok(Self { store, spotify_cfg, spotify, tokens, notes, api })
	}

	/// Replays queued note saves for the signed-in user. Does nothing when signed out.
	pub async fn retry_pending(&self) -> eyre::Result<Option<RetryReport>> {
		let Some(owner) = session::owner(self.store.as_ref())? else {
			return Ok(None);
		};
		let report = self.notes.retry_failed_syncs(&owner).await?;

		tracing::debug!(
			attempted = report.attempted,
			synced = report.synced,
			expired = report.expired,
			"Startup sync pass finished."
		);

		Ok(Some(report))
	}

	pub async fn dispatch(&self, command: Command) -> eyre::Result<()> {
		match command {
			Command::Login => self.login(),
			Command::Callback { code, state } => self.callback(&code, &state).await,
			Command::Refresh => {
				self.spotify.refresh().await?;
				self.save_tokens()?;

				println!("Access token refreshed.");

				Ok(())
			},
			Command::Albums { sync } => self.albums(sync).await,
			Command::Playlists => self.playlists().await,
			Command::Playlist { id } => self.playlist(&id).await,
			Command::Note(note) => self.note(note).await,
			Command::Rate { track, rating } => self.rate(&track, rating).await,
			Command::Score { album } => self.score(&album).await,
			Command::Retry => self.retry().await,
		}
	}

	fn login(&self) -> eyre::Result<()> {
		let request = pkce::begin_authorization(&self.spotify_cfg)?;

		self.store.set(session::CODE_VERIFIER_KEY, &request.verifier)?;
		self.store.set(session::AUTH_STATE_KEY, &request.state)?;

		println!("Open this URL to sign in:\n{}", request.url);

		Ok(())
	}

	async fn callback(&self, code: &str, state: &str) -> eyre::Result<()> {
		let expected = self.store.get(session::AUTH_STATE_KEY)?;

		if expected.as_deref() != Some(state) {
			return Err(eyre::eyre!("Authorization state mismatch. Run `login` again."));
		}

		let Some(verifier) = self.store.get(session::CODE_VERIFIER_KEY)? else {
			return Err(eyre::eyre!("No pending login. Run `login` first."));
		};

		self.spotify.exchange_code(code, &verifier).await?;
		self.save_tokens()?;
		session::clear_pending_login(self.store.as_ref())?;

		let user = self.spotify.current_user().await?;

		self.save_tokens()?;
		self.store.set(session::USER_ID_KEY, &user.id)?;

		if let Err(err) = self.api.sync_user(&user).await {
			tracing::warn!(error = %err, "Failed to register user with the API.");
		}

		println!("Signed in as {}.", user.display_name.as_deref().unwrap_or(&user.id));

		Ok(())
	}

	async fn albums(&self, sync: bool) -> eyre::Result<()> {
		let albums = self.spotify.saved_albums().await?;

		for album in &albums {
			println!("{}  {} - {}", album.id, album.name, album.artist_names());

			if !sync {
				continue;
			}

			let tracks = self.spotify.album_tracks(&album.id).await?;

			match self.api.sync_album(album, &tracks).await {
				Ok(synced) => tracing::info!(
					album_id = synced.album_id.as_str(),
					tracks_synced = synced.tracks_synced,
					tracks_skipped = synced.tracks_skipped,
					"Album synced."
				),
				Err(err) => {
					tracing::warn!(album_id = album.id.as_str(), error = %err, "Album sync failed.")
				},
			}
		}

		self.save_tokens()?;

		Ok(())
	}

	async fn playlists(&self) -> eyre::Result<()> {
		let playlists = self.spotify.playlists().await?;

		for playlist in &playlists {
			let total = playlist.tracks.as_ref().map(|tracks| tracks.total).unwrap_or(0);

			println!("{}  {} ({total} tracks)", playlist.id, playlist.name);
		}

		self.save_tokens()?;

		Ok(())
	}

	async fn playlist(&self, playlist_id: &str) -> eyre::Result<()> {
		let tracks = self.spotify.playlist_tracks(playlist_id).await?;

		for track in &tracks {
			println!(
				"{}  {} - {} [{}]",
				track.id.as_deref().unwrap_or("-"),
				track.name,
				track.artist_names(),
				catalog::format_duration(track.duration_ms)
			);
		}

		self.save_tokens()?;

		Ok(())
	}

	async fn note(&self, command: NoteCommand) -> eyre::Result<()> {
		let owner = self.require_owner()?;

		match command {
			NoteCommand::Get { kind, id } => {
				let content = self.notes.get(kind, &id, &owner).await?;

				if content.is_empty() {
					println!("No note.");
				} else {
					println!("{content}");
				}
			},
			NoteCommand::Save { kind, id, content } => {
				self.notes.save(kind, &id, &owner, &content).await?;

				let pending = self.notes.queue().load()?;

				if pending.iter().any(|entry| entry.matches(kind, &id, &owner)) {
					println!("Note saved locally; it will sync on the next start.");
				} else {
					println!("Note saved.");
				}
			},
			NoteCommand::Delete { kind, id } => {
				self.notes.delete(kind, &id, &owner).await?;

				println!("Note deleted.");
			},
			NoteCommand::Lock { id, locked } => {
				let note = self.notes.set_album_lock(&id, &owner, locked).await?;

				println!("Album note {}.", if note.is_locked { "locked" } else { "unlocked" });
			},
		}

		Ok(())
	}

	async fn rate(&self, track_id: &str, value: i32) -> eyre::Result<()> {
		let owner = self.require_owner()?;
		let value = rating::validate_rating(Some(value))
			.map_err(|_| eyre::eyre!("Rating must be between 1 and 5."))?;

		self.store.set(&rating::rating_cache_key(&owner, track_id), &value.to_string())?;

		match self.api.rate_track(&owner, track_id, value).await {
			Ok(saved) => println!("Rated {track_id} {} / 5.", saved.rating),
			Err(err) => {
				tracing::warn!(track_id, error = %err, "Failed to send rating to the API.");

				println!("Rated {track_id} {value} / 5 locally.");
			},
		}

		Ok(())
	}

	async fn score(&self, album_id: &str) -> eyre::Result<()> {
		let owner = self.require_owner()?;
		let tracks = self.spotify.album_tracks(album_id).await?;

		self.save_tokens()?;

		let mut ratings = Vec::with_capacity(tracks.len());

		for track in &tracks {
			let cached = match &track.id {
				Some(id) => self.store.get(&rating::rating_cache_key(&owner, id))?,
				None => None,
			};
			let value = cached.as_deref().and_then(rating::parse_cached_rating);
			let shown = value.map(|value| value.to_string()).unwrap_or_else(|| "-".to_string());

			println!(
				"{:>2}. {} [{}]  {shown}",
				track.track_number.unwrap_or(0),
				track.name,
				catalog::format_duration(track.duration_ms)
			);

			ratings.push(value);
		}

		match score::album_score(ratings) {
			Some(result) => println!(
				"Score {:.1} ({}) from {} of {} tracks.",
				result.score, result.grade, result.rated_tracks, result.total_tracks
			),
			None => println!("No rated tracks."),
		}

		Ok(())
	}

	async fn retry(&self) -> eyre::Result<()> {
		match self.retry_pending().await? {
			Some(report) => println!(
				"Synced {} of {} pending notes; {} expired, {} still pending.",
				report.synced, report.attempted, report.expired, report.remaining
			),
			None => println!("Not signed in; nothing to retry."),
		}

		Ok(())
	}

	fn require_owner(&self) -> eyre::Result<String> {
		session::owner(self.store.as_ref())?
			.ok_or_else(|| eyre::eyre!("Not signed in. Run `login` first."))
	}

	fn save_tokens(&self) -> eyre::Result<()> {
		session::persist_tokens(self.store.as_ref(), &self.tokens, &self.spotify.tokens())?;

		Ok(())
	}
}
