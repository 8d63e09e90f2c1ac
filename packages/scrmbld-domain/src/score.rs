use std::fmt;

use serde::Serialize;

use crate::rating::{MAX_RATING, MIN_RATING};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AlbumScore {
	/// Mean track rating rescaled to 0-10.
	pub score: f64,
	pub grade: Grade,
	pub rated_tracks: usize,
	pub total_tracks: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum Grade {
	#[serde(rename = "A+")]
	APlus,
	A,
	#[serde(rename = "A-")]
	AMinus,
	#[serde(rename = "B+")]
	BPlus,
	B,
	#[serde(rename = "B-")]
	BMinus,
	#[serde(rename = "C+")]
	CPlus,
	C,
	#[serde(rename = "C-")]
	CMinus,
	#[serde(rename = "D+")]
	DPlus,
	D,
	#[serde(rename = "D-")]
	DMinus,
	F,
}
impl Grade {
	const THRESHOLDS: [(f64, Self); 12] = [
		(9.5, Self::APlus),
		(9.0, Self::A),
		(8.5, Self::AMinus),
		(8.0, Self::BPlus),
		(7.5, Self::B),
		(7.0, Self::BMinus),
		(6.5, Self::CPlus),
		(6.0, Self::C),
		(5.5, Self::CMinus),
		(5.0, Self::DPlus),
		(4.5, Self::D),
		(4.0, Self::DMinus),
	];

	pub fn for_score(score: f64) -> Self {
		Self::THRESHOLDS
			.iter()
			.find(|(min, _)| score >= *min)
			.map(|(_, grade)| *grade)
			.unwrap_or(Self::F)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::APlus => "A+",
			Self::A => "A",
			Self::AMinus => "A-",
			Self::BPlus => "B+",
			Self::B => "B",
			Self::BMinus => "B-",
			Self::CPlus => "C+",
			Self::C => "C",
			Self::CMinus => "C-",
			Self::DPlus => "D+",
			Self::D => "D",
			Self::DMinus => "D-",
			Self::F => "F",
		}
	}
}
impl fmt::Display for Grade {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Scores an album from per-track ratings. Unrated or invalid entries count toward the total
/// but not the average. Returns `None` when no track has a valid rating.
pub fn album_score<I>(ratings: I) -> Option<AlbumScore>
where
	I: IntoIterator<Item = Option<i32>>,
{
	let mut total_tracks = 0;
	let mut rated_tracks = 0;
	let mut total_stars = 0_i64;

	for rating in ratings {
		total_tracks += 1;

		if let Some(rating) = rating.filter(|value| (MIN_RATING..=MAX_RATING).contains(value)) {
			rated_tracks += 1;
			total_stars += i64::from(rating);
		}
	}

	if rated_tracks == 0 {
		return None;
	}

	let average = total_stars as f64 / rated_tracks as f64;
	let score = average / f64::from(MAX_RATING) * 10.0;

	Some(AlbumScore { score, grade: Grade::for_score(score), rated_tracks, total_tracks })
}
