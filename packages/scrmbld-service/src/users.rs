use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, ScrmbldService, optional, required};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncUserRequest {
	pub spotify_id: String,
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncUserResponse {
	pub user_id: Uuid,
	pub spotify_id: String,
}

impl ScrmbldService {
	pub async fn sync_user(&self, req: SyncUserRequest) -> Result<SyncUserResponse> {
		let spotify_id = required(&req.spotify_id, "spotify_id")?;
		let user = scrmbld_storage::users::get_or_create_user(
			&self.db.pool,
			spotify_id,
			optional(req.display_name.as_deref()),
			optional(req.email.as_deref()),
		)
		.await?;

		tracing::debug!(user_id = %user.user_id, "User synced.");

		Ok(SyncUserResponse { user_id: user.user_id, spotify_id: user.spotify_id })
	}
}
