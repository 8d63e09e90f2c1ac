use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use scrmbld_domain::note;
use scrmbld_storage::models::Review;

use crate::{Error, Result, ScrmbldService, optional, required};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WriteReviewRequest {
	pub spotify_user_id: String,
	pub spotify_id: String,
	pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewUpdateRequest {
	pub review_id: Uuid,
	#[serde(default)]
	pub spotify_user_id: Option<String>,
	pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewDeleteRequest {
	pub review_id: Uuid,
	#[serde(default)]
	pub spotify_user_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewListQuery {
	pub spotify_id: String,
	#[serde(default)]
	pub spotify_user_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
	pub review_id: Uuid,
	pub content: String,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Review> for ReviewResponse {
	fn from(review: Review) -> Self {
		Self {
			review_id: review.review_id,
			content: review.content,
			created_at: review.created_at,
			updated_at: review.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewItem {
	pub review_id: Uuid,
	pub content: String,
	pub user_spotify_id: String,
	pub display_name: Option<String>,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub updated_at: OffsetDateTime,
}

impl ScrmbldService {
	/// Writes the caller's review of a track, replacing any earlier one.
	pub async fn write_review(&self, req: WriteReviewRequest) -> Result<ReviewResponse> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "track id")?;
		let Some(content) = note::normalize_content(&req.content) else {
			return Err(Error::invalid("content is required."));
		};
		let Some(track) = scrmbld_storage::catalog::find_track(&self.db.pool, spotify_id).await?
		else {
			return Err(Error::not_found("Track not found."));
		};
		let user = self.ensure_user(spotify_user_id).await?;
		let review =
			scrmbld_storage::reviews::upsert_review(&self.db.pool, user.user_id, track.track_id, content)
				.await?;

		Ok(review.into())
	}

	pub async fn list_reviews(&self, req: ReviewListQuery) -> Result<Vec<ReviewItem>> {
		let spotify_id = required(&req.spotify_id, "track id")?;
		let Some(track) = scrmbld_storage::catalog::find_track(&self.db.pool, spotify_id).await?
		else {
			return Ok(Vec::new());
		};
		let user_id = match optional(req.spotify_user_id.as_deref()) {
			Some(spotify_user_id) => match self.find_user(spotify_user_id).await? {
				Some(user) => Some(user.user_id),
				None => return Ok(Vec::new()),
			},
			None => None,
		};
		let rows =
			scrmbld_storage::reviews::list_reviews(&self.db.pool, track.track_id, user_id).await?;

		Ok(rows
			.into_iter()
			.map(|row| ReviewItem {
				review_id: row.review_id,
				content: row.content,
				user_spotify_id: row.user_spotify_id,
				display_name: row.display_name,
				created_at: row.created_at,
				updated_at: row.updated_at,
			})
			.collect())
	}

	pub async fn update_review(&self, req: ReviewUpdateRequest) -> Result<ReviewResponse> {
		let Some(content) = note::normalize_content(&req.content) else {
			return Err(Error::invalid("content is required."));
		};
		let author = self.review_author(req.spotify_user_id.as_deref()).await?;
		let Some(review) =
			scrmbld_storage::reviews::update_review(&self.db.pool, req.review_id, author, content)
				.await?
		else {
			return Err(Error::not_found("Review not found."));
		};

		Ok(review.into())
	}

	pub async fn delete_review(&self, req: ReviewDeleteRequest) -> Result<()> {
		let author = self.review_author(req.spotify_user_id.as_deref()).await?;
		let deleted =
			scrmbld_storage::reviews::delete_review(&self.db.pool, req.review_id, author).await?;

		if !deleted {
			return Err(Error::not_found("Review not found."));
		}

		Ok(())
	}

	async fn review_author(&self, spotify_user_id: Option<&str>) -> Result<Option<Uuid>> {
		let Some(spotify_user_id) = optional(spotify_user_id) else {
			return Ok(None);
		};
		let Some(user) = self.find_user(spotify_user_id).await? else {
			return Err(Error::not_found("User not found."));
		};

		Ok(Some(user.user_id))
	}
}
