use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub user_id: Uuid,
	pub spotify_id: String,
	pub display_name: Option<String>,
	pub email: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Album {
	pub album_id: Uuid,
	pub spotify_id: String,
	pub name: String,
	pub artist: String,
	pub image_url: Option<String>,
	pub release_date: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAlbum {
	pub spotify_id: String,
	pub name: String,
	pub artist: String,
	pub image_url: Option<String>,
	pub release_date: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Track {
	pub track_id: Uuid,
	pub spotify_id: String,
	pub album_id: Option<Uuid>,
	pub name: String,
	pub duration_ms: Option<i64>,
	pub track_number: Option<i32>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewTrack {
	pub spotify_id: String,
	pub album_id: Option<Uuid>,
	pub name: String,
	pub duration_ms: Option<i64>,
	pub track_number: Option<i32>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrackNote {
	pub note_id: Uuid,
	pub user_id: Uuid,
	pub track_id: Uuid,
	pub content: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlbumNote {
	pub note_id: Uuid,
	pub user_id: Uuid,
	pub album_id: Uuid,
	pub content: String,
	pub is_locked: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Rating {
	pub rating_id: Uuid,
	pub user_id: Uuid,
	pub track_id: Uuid,
	pub rating: i32,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// A rating joined with the rater's public profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RatingWithUser {
	pub rating_id: Uuid,
	pub track_id: Uuid,
	pub rating: i32,
	pub user_spotify_id: String,
	pub display_name: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Review {
	pub review_id: Uuid,
	pub user_id: Uuid,
	pub track_id: Uuid,
	pub content: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

/// A review joined with the author's public profile.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewWithAuthor {
	pub review_id: Uuid,
	pub track_id: Uuid,
	pub content: String,
	pub user_spotify_id: String,
	pub display_name: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlbumListened {
	pub user_id: Uuid,
	pub album_id: Uuid,
	pub listened: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
