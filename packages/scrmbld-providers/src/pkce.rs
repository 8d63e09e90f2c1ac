//! Authorization code flow with PKCE for public clients.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distributions::Alphanumeric};
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

pub const VERIFIER_LEN: usize = 128;
pub const STATE_LEN: usize = 16;

/// Secrets generated for one login attempt. Keep `verifier` and `state` until the callback.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
	pub url: String,
	pub verifier: String,
	pub state: String,
}

pub fn random_string(len: usize) -> String {
	rand::thread_rng().sample_iter(&Alphanumeric).take(len).map(char::from).collect()
}

/// S256 challenge: base64url of the SHA-256 digest, without padding.
pub fn code_challenge(verifier: &str) -> String {
	URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

pub fn authorize_url(
	cfg: &scrmbld_config::Spotify,
	challenge: &str,
	state: &str,
) -> Result<String> {
	let scope = cfg.scopes.join(" ");
	let url = Url::parse_with_params(
		&cfg.auth_url,
		&[
			("response_type", "code"),
			("client_id", cfg.client_id.as_str()),
			("scope", scope.as_str()),
			("redirect_uri", cfg.redirect_uri.as_str()),
			("state", state),
			("code_challenge_method", "S256"),
			("code_challenge", challenge),
		],
	)
	.map_err(|err| Error::InvalidConfig {
		message: format!("spotify.auth_url is not a valid URL: {err}."),
	})?;

	Ok(url.into())
}

pub fn begin_authorization(cfg: &scrmbld_config::Spotify) -> Result<AuthorizationRequest> {
	let verifier = random_string(VERIFIER_LEN);
	let state = random_string(STATE_LEN);
	let url = authorize_url(cfg, &code_challenge(&verifier), &state)?;

	Ok(AuthorizationRequest { url, verifier, state })
}
