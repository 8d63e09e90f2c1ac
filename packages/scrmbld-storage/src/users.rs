use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{Result, models::User};

/// Inserts the user or refreshes the profile fields that were supplied.
pub async fn get_or_create_user<'e, E>(
	executor: E,
	spotify_id: &str,
	display_name: Option<&str>,
	email: Option<&str>,
) -> Result<User>
where
	E: PgExecutor<'e>,
{
	let user = sqlx::query_as::<_, User>(
		"\
INSERT INTO users (user_id, spotify_id, display_name, email)
VALUES ($1, $2, $3, $4)
ON CONFLICT (spotify_id) DO UPDATE
SET
\tdisplay_name = COALESCE(EXCLUDED.display_name, users.display_name),
\temail = COALESCE(EXCLUDED.email, users.email),
\tupdated_at = now()
RETURNING user_id, spotify_id, display_name, email, created_at, updated_at",
	)
	.bind(Uuid::new_v4())
	.bind(spotify_id)
	.bind(display_name)
	.bind(email)
	.fetch_one(executor)
	.await?;

	Ok(user)
}

pub async fn find_user<'e, E>(executor: E, spotify_id: &str) -> Result<Option<User>>
where
	E: PgExecutor<'e>,
{
	let user = sqlx::query_as::<_, User>(
		"\
SELECT user_id, spotify_id, display_name, email, created_at, updated_at
FROM users
WHERE spotify_id = $1",
	)
	.bind(spotify_id)
	.fetch_optional(executor)
	.await?;

	Ok(user)
}
