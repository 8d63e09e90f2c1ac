use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use scrmbld_domain::note::NoteKind;

use crate::{BoxFuture, RemoteError, RemoteNote, RemoteNoteStore, RemoteResult, Result};

#[derive(Debug, Deserialize)]
struct NoteBody {
	content: String,
	#[serde(default)]
	is_locked: bool,
}
impl From<NoteBody> for RemoteNote {
	fn from(body: NoteBody) -> Self {
		Self { content: body.content, is_locked: body.is_locked }
	}
}

/// Remote note store backed by the Scrmbld HTTP API.
pub struct HttpNoteStore {
	api_base: String,
	http: Client,
}
impl HttpNoteStore {
	pub fn new(cfg: &scrmbld_config::NoteSync) -> Result<Self> {
		let http = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self { api_base: cfg.api_base.trim_end_matches('/').to_string(), http })
	}

	fn notes_url(&self, kind: NoteKind, entity_id: &str) -> String {
		format!("{}/api/{}s/{entity_id}/notes", self.api_base, kind.as_str())
	}

	async fn fetch(
		&self,
		kind: NoteKind,
		entity_id: &str,
		owner_id: &str,
	) -> RemoteResult<Option<RemoteNote>> {
		let res = self
			.http
			.get(self.notes_url(kind, entity_id))
			.query(&[("spotify_user_id", owner_id)])
			.send()
			.await
			.map_err(classify_transport)?;
		let body: Option<NoteBody> =
			ensure_success(res).await?.json().await.map_err(classify_transport)?;

		Ok(body.map(RemoteNote::from))
	}

	async fn save(
		&self,
		kind: NoteKind,
		entity_id: &str,
		owner_id: &str,
		content: &str,
	) -> RemoteResult<RemoteNote> {
		let res = self
			.http
			.post(self.notes_url(kind, entity_id))
			.json(&serde_json::json!({ "spotify_user_id": owner_id, "content": content }))
			.send()
			.await
			.map_err(classify_transport)?;
		let body: NoteBody = ensure_success(res).await?.json().await.map_err(classify_transport)?;

		Ok(body.into())
	}

	async fn delete(&self, kind: NoteKind, entity_id: &str, owner_id: &str) -> RemoteResult<()> {
		let res = self
			.http
			.delete(self.notes_url(kind, entity_id))
			.query(&[("spotify_user_id", owner_id)])
			.send()
			.await
			.map_err(classify_transport)?;

		if res.status() == StatusCode::NOT_FOUND {
			return Ok(());
		}

		ensure_success(res).await?;

		Ok(())
	}

	async fn lock(
		&self,
		album_id: &str,
		owner_id: &str,
		is_locked: bool,
	) -> RemoteResult<RemoteNote> {
		let url = format!("{}/lock", self.notes_url(NoteKind::Album, album_id));
		let res = self
			.http
			.put(url)
			.json(&serde_json::json!({ "spotify_user_id": owner_id, "is_locked": is_locked }))
			.send()
			.await
			.map_err(classify_transport)?;
		let body: NoteBody = ensure_success(res).await?.json().await.map_err(classify_transport)?;

		Ok(body.into())
	}
}
impl RemoteNoteStore for HttpNoteStore {
	fn fetch_note<'a>(
		&'a self,
		kind: NoteKind,
		entity_id: &'a str,
		owner_id: &'a str,
	) -> BoxFuture<'a, RemoteResult<Option<RemoteNote>>> {
		Box::pin(self.fetch(kind, entity_id, owner_id))
	}

	fn save_note<'a>(
		&'a self,
		kind: NoteKind,
		entity_id: &'a str,
		owner_id: &'a str,
		content: &'a str,
	) -> BoxFuture<'a, RemoteResult<RemoteNote>> {
		Box::pin(self.save(kind, entity_id, owner_id, content))
	}

	fn delete_note<'a>(
		&'a self,
		kind: NoteKind,
		entity_id: &'a str,
		owner_id: &'a str,
	) -> BoxFuture<'a, RemoteResult<()>> {
		Box::pin(self.delete(kind, entity_id, owner_id))
	}

	fn set_album_lock<'a>(
		&'a self,
		album_id: &'a str,
		owner_id: &'a str,
		is_locked: bool,
	) -> BoxFuture<'a, RemoteResult<RemoteNote>> {
		Box::pin(self.lock(album_id, owner_id, is_locked))
	}
}

async fn ensure_success(res: Response) -> RemoteResult<Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let message = res.text().await.unwrap_or_default();

	Err(classify_status(status, message))
}

fn classify_status(status: StatusCode, message: String) -> RemoteError {
	match status {
		StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT =>
			RemoteError::Unreachable { message: format!("{status}: {message}") },
		_ => RemoteError::Rejected { status: status.as_u16(), message },
	}
}

fn classify_transport(err: reqwest::Error) -> RemoteError {
	if err.is_connect() || err.is_timeout() {
		return RemoteError::Unreachable { message: err.to_string() };
	}
	if let Some(status) = err.status() {
		return classify_status(status, err.to_string());
	}

	RemoteError::Unknown { message: err.to_string() }
}
