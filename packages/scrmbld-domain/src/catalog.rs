/// Resolves a Spotify id from either a bare id or a `spotify:<kind>:<id>` URI.
pub fn spotify_id(id: Option<&str>, uri: Option<&str>) -> Option<String> {
	if let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) {
		return Some(id.to_string());
	}

	uri.and_then(|uri| uri.rsplit(':').next())
		.map(str::trim)
		.filter(|id| !id.is_empty())
		.map(str::to_string)
}

/// Formats a track duration as `m:ss`.
pub fn format_duration(duration_ms: u64) -> String {
	let total_seconds = duration_ms / 1_000;

	format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
