use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::{HeaderValue, Method, StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::state::AppState;
use scrmbld_service::{
	Error as ServiceError, ListenedQuery, ListenedResponse, NoteLockRequest, NoteQuery,
	NoteResponse, NoteSaveRequest, RateTrackRequest, RatingItem, RatingListQuery, RatingResponse,
	ReviewDeleteRequest, ReviewItem, ReviewListQuery, ReviewResponse, ReviewUpdateRequest,
	SetListenedRequest, SyncAlbumRequest, SyncAlbumResponse, SyncUserRequest, SyncUserResponse,
	WriteReviewRequest,
};

pub fn router(state: AppState) -> Router {
	let cors = cors_layer(&state.service.cfg.service.cors_allowed_origins);
	let app = Router::new()
		.route("/health", get(health))
		.route("/api/users/sync", post(sync_user))
		.route("/api/albums/sync", post(sync_album))
		.route(
			"/api/tracks/{spotify_id}/notes",
			get(get_track_note).post(save_track_note).delete(delete_track_note),
		)
		.route(
			"/api/albums/{spotify_id}/notes",
			get(get_album_note).post(save_album_note).delete(delete_album_note),
		)
		.route("/api/albums/{spotify_id}/notes/lock", put(lock_album_note))
		.route("/api/albums/{spotify_id}/listened", get(get_listened).put(set_listened))
		.route("/api/tracks/{spotify_id}/ratings", get(list_ratings).post(rate_track))
		.route("/api/tracks/{spotify_id}/reviews", get(list_reviews).post(write_review))
		.route("/api/reviews/{review_id}", put(update_review).delete(delete_review))
		.with_state(state)
		.layer(TraceLayer::new_for_http());

	match cors {
		Some(cors) => app.layer(cors),
		None => app,
	}
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
	let allowed = origins
		.iter()
		.filter_map(|origin| match HeaderValue::from_str(origin) {
			Ok(value) => Some(value),
			Err(err) => {
				tracing::warn!(origin = origin.as_str(), error = %err, "Ignoring invalid CORS origin.");

				None
			},
		})
		.collect::<Vec<_>>();

	if allowed.is_empty() {
		return None;
	}

	Some(
		CorsLayer::new()
			.allow_origin(allowed)
			.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
			.allow_headers([header::CONTENT_TYPE]),
	)
}

#[derive(Debug, Deserialize)]
struct OwnerQuery {
	spotify_user_id: Option<String>,
}
impl OwnerQuery {
	fn require(self) -> Result<String, ApiError> {
		self.spotify_user_id.filter(|value| !value.trim().is_empty()).ok_or_else(|| {
			json_error(
				StatusCode::BAD_REQUEST,
				"INVALID_REQUEST",
				"spotify_user_id is required.",
				Some(vec!["spotify_user_id".to_string()]),
			)
		})
	}
}

#[derive(Debug, Deserialize)]
struct NoteBody {
	spotify_user_id: String,
	content: String,
}

#[derive(Debug, Deserialize)]
struct LockBody {
	spotify_user_id: String,
	is_locked: bool,
}

#[derive(Debug, Deserialize)]
struct ListenedBody {
	spotify_user_id: String,
	listened: bool,
}

#[derive(Debug, Deserialize)]
struct RatingBody {
	spotify_user_id: String,
	rating: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ReviewBody {
	spotify_user_id: String,
	content: String,
}

#[derive(Debug, Deserialize)]
struct ReviewEditBody {
	spotify_user_id: Option<String>,
	content: String,
}

#[derive(Debug, Serialize)]
struct MessageBody {
	message: String,
}
impl MessageBody {
	fn new(message: &str) -> Json<Self> {
		Json(Self { message: message.to_string() })
	}
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn sync_user(
	State(state): State<AppState>,
	Json(payload): Json<SyncUserRequest>,
) -> Result<Json<SyncUserResponse>, ApiError> {
	let response = state.service.sync_user(payload).await?;

	Ok(Json(response))
}

async fn sync_album(
	State(state): State<AppState>,
	Json(payload): Json<SyncAlbumRequest>,
) -> Result<Json<SyncAlbumResponse>, ApiError> {
	let response = state.service.sync_album(payload).await?;

	Ok(Json(response))
}

async fn get_track_note(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Query(query): Query<OwnerQuery>,
) -> Result<Json<Option<NoteResponse>>, ApiError> {
	// Anonymous readers have no personal notes.
	let Ok(spotify_user_id) = query.require() else {
		return Ok(Json(None));
	};
	let response = state.service.get_track_note(NoteQuery { spotify_user_id, spotify_id }).await?;

	Ok(Json(response))
}

async fn save_track_note(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Json(payload): Json<NoteBody>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
	let response = state
		.service
		.save_track_note(NoteSaveRequest {
			spotify_user_id: payload.spotify_user_id,
			spotify_id,
			content: payload.content,
		})
		.await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn delete_track_note(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Query(query): Query<OwnerQuery>,
) -> Result<Json<MessageBody>, ApiError> {
	let spotify_user_id = query.require()?;

	state.service.delete_track_note(NoteQuery { spotify_user_id, spotify_id }).await?;

	Ok(MessageBody::new("Note deleted."))
}

async fn get_album_note(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Query(query): Query<OwnerQuery>,
) -> Result<Json<Option<NoteResponse>>, ApiError> {
	let Ok(spotify_user_id) = query.require() else {
		return Ok(Json(None));
	};
	let response = state.service.get_album_note(NoteQuery { spotify_user_id, spotify_id }).await?;

	Ok(Json(response))
}

async fn save_album_note(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Json(payload): Json<NoteBody>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
	let response = state
		.service
		.save_album_note(NoteSaveRequest {
			spotify_user_id: payload.spotify_user_id,
			spotify_id,
			content: payload.content,
		})
		.await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn delete_album_note(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Query(query): Query<OwnerQuery>,
) -> Result<Json<MessageBody>, ApiError> {
	let spotify_user_id = query.require()?;

	state.service.delete_album_note(NoteQuery { spotify_user_id, spotify_id }).await?;

	Ok(MessageBody::new("Note deleted."))
}

async fn lock_album_note(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Json(payload): Json<LockBody>,
) -> Result<Json<NoteResponse>, ApiError> {
	let response = state
		.service
		.set_album_note_lock(NoteLockRequest {
			spotify_user_id: payload.spotify_user_id,
			spotify_id,
			is_locked: payload.is_locked,
		})
		.await?;

	Ok(Json(response))
}

async fn get_listened(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Query(query): Query<OwnerQuery>,
) -> Result<Json<ListenedResponse>, ApiError> {
	let response = state
		.service
		.get_listened(ListenedQuery { spotify_id, spotify_user_id: query.spotify_user_id })
		.await?;

	Ok(Json(response))
}

async fn set_listened(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Json(payload): Json<ListenedBody>,
) -> Result<Json<ListenedResponse>, ApiError> {
	let response = state
		.service
		.set_listened(SetListenedRequest {
			spotify_user_id: payload.spotify_user_id,
			spotify_id,
			listened: payload.listened,
		})
		.await?;

	Ok(Json(response))
}

async fn list_ratings(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<RatingItem>>, ApiError> {
	let response = state
		.service
		.list_ratings(RatingListQuery { spotify_id, spotify_user_id: query.spotify_user_id })
		.await?;

	Ok(Json(response))
}

async fn rate_track(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Json(payload): Json<RatingBody>,
) -> Result<(StatusCode, Json<RatingResponse>), ApiError> {
	let response = state
		.service
		.rate_track(RateTrackRequest {
			spotify_user_id: payload.spotify_user_id,
			spotify_id,
			rating: payload.rating,
		})
		.await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn list_reviews(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<ReviewItem>>, ApiError> {
	let response = state
		.service
		.list_reviews(ReviewListQuery { spotify_id, spotify_user_id: query.spotify_user_id })
		.await?;

	Ok(Json(response))
}

async fn write_review(
	State(state): State<AppState>,
	Path(spotify_id): Path<String>,
	Json(payload): Json<ReviewBody>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
	let response = state
		.service
		.write_review(WriteReviewRequest {
			spotify_user_id: payload.spotify_user_id,
			spotify_id,
			content: payload.content,
		})
		.await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn update_review(
	State(state): State<AppState>,
	Path(review_id): Path<Uuid>,
	Json(payload): Json<ReviewEditBody>,
) -> Result<Json<ReviewResponse>, ApiError> {
	let response = state
		.service
		.update_review(ReviewUpdateRequest {
			review_id,
			spotify_user_id: payload.spotify_user_id,
			content: payload.content,
		})
		.await?;

	Ok(Json(response))
}

async fn delete_review(
	State(state): State<AppState>,
	Path(review_id): Path<Uuid>,
	Query(query): Query<OwnerQuery>,
) -> Result<Json<MessageBody>, ApiError> {
	state
		.service
		.delete_review(ReviewDeleteRequest { review_id, spotify_user_id: query.spotify_user_id })
		.await?;

	Ok(MessageBody::new("Review deleted."))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			ServiceError::Forbidden { message } =>
				json_error(StatusCode::FORBIDDEN, "FORBIDDEN", message, None),
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			ServiceError::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "CONFLICT", message, None),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal error.", None)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
