use std::{
	future::IntoFuture,
	path::PathBuf,
	sync::{Arc, Mutex},
};

use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	routing,
};
use serde_json::{Value, json};
use tokio::{
	net::TcpListener,
	sync::{oneshot, oneshot::Sender},
};

use scrmbld_client::api::ApiClient;
use scrmbld_config::NoteSync;
use scrmbld_providers::spotify::{SpotifyAlbum, SpotifyTrack, SpotifyUser};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn start_mock_api(seen: Seen) -> (String, Sender<()>) {
	let app = Router::new()
		.route("/api/users/sync", routing::post(sync_user))
		.route("/api/albums/sync", routing::post(sync_album))
		.route("/api/tracks/{id}/ratings", routing::post(rate_track))
		.with_state(seen);
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind mock API.");
	let addr = listener.local_addr().expect("Failed to read mock API address.");
	let (tx, rx) = oneshot::channel();
	let server = axum::serve(listener, app).with_graceful_shutdown(async move {
		let _ = rx.await;
	});

	tokio::spawn(async move {
		let _ = server.into_future().await;
	});

	(format!("http://{addr}"), tx)
}

async fn sync_user(State(seen): State<Seen>, Json(body): Json<Value>) -> impl IntoResponse {
	seen.lock().expect("lock").push(body.clone());

	Json(json!({ "user_id": "00000000-0000-0000-0000-000000000001", "spotify_id": body["spotify_id"] }))
}

async fn sync_album(State(seen): State<Seen>, Json(body): Json<Value>) -> impl IntoResponse {
	seen.lock().expect("lock").push(body.clone());

	let tracks = body["tracks"].as_array().cloned().unwrap_or_default();
	let synced = tracks.iter().filter(|track| !track["id"].is_null()).count();

	Json(json!({
		"album_id": body["album"]["id"],
		"tracks_synced": synced,
		"tracks_skipped": tracks.len() - synced,
	}))
}

async fn rate_track(Path(id): Path<String>, Json(body): Json<Value>) -> impl IntoResponse {
	if id != "t1" {
		return (
			StatusCode::NOT_FOUND,
			Json(json!({ "error_code": "NOT_FOUND", "message": "Track not found." })),
		)
			.into_response();
	}

	(StatusCode::CREATED, Json(json!({ "rating": body["rating"] }))).into_response()
}

fn sync_config(api_base: String) -> NoteSync {
	NoteSync {
		api_base,
		timeout_ms: 2_000,
		retention_days: 7,
		local_store_path: PathBuf::from("unused.json"),
	}
}

#[tokio::test]
async fn album_sync_sends_artist_names_and_track_ids() {
	let seen = Seen::default();
	let (api_base, shutdown) = start_mock_api(seen.clone()).await;
	let client = ApiClient::new(&sync_config(api_base)).expect("Failed to build API client.");
	let album: SpotifyAlbum = serde_json::from_value(json!({
		"id": "a1",
		"uri": "spotify:album:a1",
		"name": "Blue Train",
		"artists": [{ "name": "John Coltrane" }, { "name": "Lee Morgan" }],
		"images": [{ "url": "https://img.example/a1.jpg" }],
		"release_date": "1958-01-01"
	}))
	.expect("album");
	let tracks: Vec<SpotifyTrack> = serde_json::from_value(json!([
		{ "id": "t1", "name": "Blue Train", "duration_ms": 643_000, "track_number": 1 },
		{ "id": null, "name": "Local file", "duration_ms": 1_000 }
	]))
	.expect("tracks");
	let synced = client.sync_album(&album, &tracks).await.expect("Failed to sync album.");

	assert_eq!(synced.album_id, "a1");
	assert_eq!(synced.tracks_synced, 1);
	assert_eq!(synced.tracks_skipped, 1);

	let bodies = seen.lock().expect("lock").clone();

	assert_eq!(bodies[0]["album"]["artist"], "John Coltrane, Lee Morgan");
	assert_eq!(bodies[0]["album"]["image_url"], "https://img.example/a1.jpg");
	assert_eq!(bodies[0]["tracks"][0]["duration_ms"], 643_000);

	let _ = shutdown.send(());
}

#[tokio::test]
async fn user_sync_posts_profile() {
	let seen = Seen::default();
	let (api_base, shutdown) = start_mock_api(seen.clone()).await;
	let client = ApiClient::new(&sync_config(api_base)).expect("Failed to build API client.");
	let user = SpotifyUser {
		id: "u1".to_string(),
		display_name: Some("Listener".to_string()),
		email: None,
	};

	client.sync_user(&user).await.expect("Failed to sync user.");

	let bodies = seen.lock().expect("lock").clone();

	assert_eq!(bodies[0]["spotify_id"], "u1");
	assert_eq!(bodies[0]["display_name"], "Listener");
	assert!(bodies[0]["email"].is_null());

	let _ = shutdown.send(());
}

#[tokio::test]
async fn rating_errors_surface_the_status() {
	let (api_base, shutdown) = start_mock_api(Seen::default()).await;
	let client = ApiClient::new(&sync_config(api_base)).expect("Failed to build API client.");
	let saved = client.rate_track("u1", "t1", 4).await.expect("Failed to rate track.");

	assert_eq!(saved.rating, 4);

	let err = client.rate_track("u1", "missing", 4).await.expect_err("Unknown track must fail.");

	assert!(err.to_string().contains("404"));

	let _ = shutdown.send(());
}
