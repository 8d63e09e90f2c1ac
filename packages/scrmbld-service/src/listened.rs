use serde::{Deserialize, Serialize};

use crate::{Error, Result, ScrmbldService, optional, required};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListenedQuery {
	pub spotify_id: String,
	#[serde(default)]
	pub spotify_user_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetListenedRequest {
	pub spotify_user_id: String,
	pub spotify_id: String,
	pub listened: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListenedResponse {
	pub listened: bool,
}

impl ScrmbldService {
	/// Unknown users and albums read as not listened.
	pub async fn get_listened(&self, req: ListenedQuery) -> Result<ListenedResponse> {
		let spotify_id = required(&req.spotify_id, "album id")?;
		let Some(spotify_user_id) = optional(req.spotify_user_id.as_deref()) else {
			return Ok(ListenedResponse { listened: false });
		};
		let Some(user) = self.find_user(spotify_user_id).await? else {
			return Ok(ListenedResponse { listened: false });
		};
		let Some(album) = scrmbld_storage::catalog::find_album(&self.db.pool, spotify_id).await?
		else {
			return Ok(ListenedResponse { listened: false });
		};
		let listened =
			scrmbld_storage::listened::get_listened(&self.db.pool, user.user_id, album.album_id)
				.await?;

		Ok(ListenedResponse { listened })
	}

	pub async fn set_listened(&self, req: SetListenedRequest) -> Result<ListenedResponse> {
		let spotify_user_id = required(&req.spotify_user_id, "spotify_user_id")?;
		let spotify_id = required(&req.spotify_id, "album id")?;
		let Some(album) = scrmbld_storage::catalog::find_album(&self.db.pool, spotify_id).await?
		else {
			return Err(Error::not_found("Album not found."));
		};
		let user = self.ensure_user(spotify_user_id).await?;
		let row = scrmbld_storage::listened::set_listened(
			&self.db.pool,
			user.user_id,
			album.album_id,
			req.listened,
		)
		.await?;

		Ok(ListenedResponse { listened: row.listened })
	}
}
