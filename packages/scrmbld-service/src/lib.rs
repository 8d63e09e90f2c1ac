pub mod catalog;
pub mod listened;
pub mod notes;
pub mod ratings;
pub mod reviews;
pub mod users;

mod error;

pub use catalog::{AlbumInput, SyncAlbumRequest, SyncAlbumResponse, TrackInput};
pub use error::{Error, Result};
pub use listened::{ListenedQuery, ListenedResponse, SetListenedRequest};
pub use notes::{NoteLockRequest, NoteQuery, NoteResponse, NoteSaveRequest};
pub use ratings::{RatingItem, RatingListQuery, RatingResponse, RateTrackRequest};
pub use reviews::{
	ReviewDeleteRequest, ReviewItem, ReviewListQuery, ReviewResponse, ReviewUpdateRequest,
	WriteReviewRequest,
};
pub use users::{SyncUserRequest, SyncUserResponse};

use scrmbld_config::Config;
use scrmbld_storage::{db::Db, models::User};

pub struct ScrmbldService {
	pub cfg: Config,
	pub db: Db,
}
impl ScrmbldService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db }
	}

	pub(crate) async fn find_user(&self, spotify_user_id: &str) -> Result<Option<User>> {
		Ok(scrmbld_storage::users::find_user(&self.db.pool, spotify_user_id).await?)
	}

	pub(crate) async fn ensure_user(&self, spotify_user_id: &str) -> Result<User> {
		Ok(scrmbld_storage::users::get_or_create_user(&self.db.pool, spotify_user_id, None, None)
			.await?)
	}
}

/// Trims a required identifier, rejecting blank input.
pub(crate) fn required<'a>(value: &'a str, field: &str) -> Result<&'a str> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(Error::invalid(format!("{field} is required.")));
	}

	Ok(trimmed)
}

/// Treats a blank optional identifier as absent.
pub(crate) fn optional(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}
