use scrmbld_providers::spotify::Tokens;
use scrmbld_sync::{LocalStore, Result};

pub const ACCESS_TOKEN_KEY: &str = "spotify_access_token";
pub const REFRESH_TOKEN_KEY: &str = "spotify_refresh_token";
pub const CODE_VERIFIER_KEY: &str = "code_verifier";
pub const AUTH_STATE_KEY: &str = "spotify_auth_state";
pub const USER_ID_KEY: &str = "spotify_user_id";

pub fn load_tokens(store: &dyn LocalStore) -> Result<Tokens> {
	Ok(Tokens {
		access_token: store.get(ACCESS_TOKEN_KEY)?,
		refresh_token: store.get(REFRESH_TOKEN_KEY)?,
	})
}

/// Writes tokens back, skipping the store when nothing changed.
pub fn persist_tokens(store: &dyn LocalStore, before: &Tokens, after: &Tokens) -> Result<()> {
	if before == after {
		return Ok(());
	}

	write_optional(store, ACCESS_TOKEN_KEY, after.access_token.as_deref())?;
	write_optional(store, REFRESH_TOKEN_KEY, after.refresh_token.as_deref())?;

	Ok(())
}

pub fn clear_pending_login(store: &dyn LocalStore) -> Result<()> {
	store.remove(CODE_VERIFIER_KEY)?;
	store.remove(AUTH_STATE_KEY)?;

	Ok(())
}

/// The signed-in Spotify user, if a login has completed.
pub fn owner(store: &dyn LocalStore) -> Result<Option<String>> {
	Ok(store.get(USER_ID_KEY)?.filter(|value| !value.trim().is_empty()))
}

fn write_optional(store: &dyn LocalStore, key: &str, value: Option<&str>) -> Result<()> {
	match value {
		Some(value) => store.set(key, value),
		None => store.remove(key),
	}
}
