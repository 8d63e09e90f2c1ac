use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
	Error, Result,
	models::{Rating, RatingWithUser},
};

pub async fn upsert_rating<'e, E>(
	executor: E,
	user_id: Uuid,
	track_id: Uuid,
	rating: i32,
) -> Result<Rating>
where
	E: PgExecutor<'e>,
{
	if !(1..=5).contains(&rating) {
		return Err(Error::InvalidArgument(format!("rating {rating} is outside 1..=5")));
	}

	let row = sqlx::query_as::<_, Rating>(
		"\
INSERT INTO ratings (rating_id, user_id, track_id, rating)
VALUES ($1, $2, $3, $4)
ON CONFLICT (user_id, track_id) DO UPDATE
SET rating = EXCLUDED.rating, updated_at = now()
RETURNING rating_id, user_id, track_id, rating, created_at, updated_at",
	)
	.bind(Uuid::new_v4())
	.bind(user_id)
	.bind(track_id)
	.bind(rating)
	.fetch_one(executor)
	.await?;

	Ok(row)
}

/// Lists ratings for a track, newest first, optionally limited to one rater.
pub async fn list_ratings<'e, E>(
	executor: E,
	track_id: Uuid,
	user_id: Option<Uuid>,
) -> Result<Vec<RatingWithUser>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, RatingWithUser>(
		"\
SELECT
\tr.rating_id,
\tr.track_id,
\tr.rating,
\tu.spotify_id AS user_spotify_id,
\tu.display_name,
\tr.created_at,
\tr.updated_at
FROM ratings r
JOIN users u ON u.user_id = r.user_id
WHERE r.track_id = $1 AND ($2::uuid IS NULL OR r.user_id = $2)
ORDER BY r.created_at DESC",
	)
	.bind(track_id)
	.bind(user_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
