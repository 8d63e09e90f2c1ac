use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use scrmbld_domain::rating::{self, RatingError};

use crate::{Error, Result, ScrmbldService, optional, required};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateTrackRequest {
	pub spotify_user_id: String,
	pub spotify_id: String,
	#[serde(default)]
	pub rating: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RatingResponse {
	pub rating_id: Uuid,
	pub rating: i32,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RatingListQuery {
	pub spotify_id: String,
	#[serde(default)]
	pub spotify_user_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RatingItem {
	pub rating_id: Uuid,
	pub rating: i32,
	pub user_spotify_id: String,
	pub display_name: Option<String>,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "scrmbld_domain::time_serde")]
	pub updated_at: OffsetDateTime,
}

impl ScrmbldService {
	pub async fn rate_track(&self, req: RateTrackRequest) -> Result<RatingResponse> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "track id")?;
		let value = rating::validate_rating(req.rating).map_err(|err| match err {
			RatingError::Missing => Error::invalid("rating is required."),
			RatingError::OutOfRange => Error::invalid("Rating must be between 1 and 5."),
		})?;
		let Some(track) = scrmbld_storage::catalog::find_track(&self.db.pool, spotify_id).await?
		else {
			return Err(Error::not_found("Track not found."));
		};
		let user = self.ensure_user(spotify_user_id).await?;
		let row =
			scrmbld_storage::ratings::upsert_rating(&self.db.pool, user.user_id, track.track_id, value)
				.await?;

		Ok(RatingResponse {
			rating_id: row.rating_id,
			rating: row.rating,
			created_at: row.created_at,
			updated_at: row.updated_at,
		})
	}

	/// Lists a track's ratings. An unknown track or rater yields an empty list.
	pub async fn list_ratings(&self, req: RatingListQuery) -> Result<Vec<RatingItem>> {
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
			scrmbld_storage::ratings::list_ratings(&self.db.pool, track.track_id, user_id).await?;

		Ok(rows
			.into_iter()
			.map(|row| RatingItem {
				rating_id: row.rating_id,
				rating: row.rating,
				user_spotify_id: row.user_spotify_id,
				display_name: row.display_name,
				created_at: row.created_at,
				updated_at: row.updated_at,
			})
			.collect())
	}
}
