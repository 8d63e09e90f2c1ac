use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
	Result,
	models::{Review, ReviewWithAuthor},
};

/// One review per user per track; posting again replaces the content.
pub async fn upsert_review<'e, E>(
	executor: E,
	user_id: Uuid,
	track_id: Uuid,
	content: &str,
) -> Result<Review>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, Review>(
		"\
INSERT INTO reviews (review_id, user_id, track_id, content)
VALUES ($1, $2, $3, $4)
ON CONFLICT (user_id, track_id) DO UPDATE
SET content = EXCLUDED.content, updated_at = now()
RETURNING review_id, user_id, track_id, content, created_at, updated_at",
	)
	.bind(Uuid::new_v4())
	.bind(user_id)
	.bind(track_id)
	.bind(content)
	.fetch_one(executor)
	.await?;

	Ok(row)
}

pub async fn list_reviews<'e, E>(
	executor: E,
	track_id: Uuid,
	user_id: Option<Uuid>,
) -> Result<Vec<ReviewWithAuthor>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, ReviewWithAuthor>(
		"\
SELECT
\tr.review_id,
\tr.track_id,
\tr.content,
\tu.spotify_id AS user_spotify_id,
\tu.display_name,
\tr.created_at,
\tr.updated_at
FROM reviews r
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

/// Updates a review. When `author` is set only that user's review matches.
pub async fn update_review<'e, E>(
	executor: E,
	review_id: Uuid,
	author: Option<Uuid>,
	content: &str,
) -> Result<Option<Review>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, Review>(
		"\
UPDATE reviews
SET content = $3, updated_at = now()
WHERE review_id = $1 AND ($2::uuid IS NULL OR user_id = $2)
RETURNING review_id, user_id, track_id, content, created_at, updated_at",
	)
	.bind(review_id)
	.bind(author)
	.bind(content)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// Returns whether a review was removed.
pub async fn delete_review<'e, E>(executor: E, review_id: Uuid, author: Option<Uuid>) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"DELETE FROM reviews WHERE review_id = $1 AND ($2::uuid IS NULL OR user_id = $2)",
	)
	.bind(review_id)
	.bind(author)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}
