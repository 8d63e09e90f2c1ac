pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatingError {
	Missing,
	OutOfRange,
}

pub fn validate_rating(rating: Option<i32>) -> Result<i32, RatingError> {
	let Some(rating) = rating else {
		return Err(RatingError::Missing);
	};

	if !(MIN_RATING..=MAX_RATING).contains(&rating) {
		return Err(RatingError::OutOfRange);
	}

	Ok(rating)
}

pub fn rating_cache_key(owner_id: &str, track_id: &str) -> String {
	format!("track_rating_{owner_id}_{track_id}")
}

/// Reads a locally cached rating, ignoring anything that is not a valid star count.
pub fn parse_cached_rating(raw: &str) -> Option<i32> {
	raw.trim().parse::<i32>().ok().filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
}
