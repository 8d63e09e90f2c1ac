use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Local key holding the serialized pending sync queue.
pub const FAILED_SYNCS_KEY: &str = "failed_note_syncs";

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
	Track,
	Album,
}
impl NoteKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Track => "track",
			Self::Album => "album",
		}
	}
}
impl fmt::Display for NoteKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for NoteKind {
	type Err = UnknownNoteKind;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"track" => Ok(Self::Track),
			"album" => Ok(Self::Album),
			_ => Err(UnknownNoteKind(raw.to_string())),
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownNoteKind(pub String);
impl fmt::Display for UnknownNoteKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Unknown note kind {:?}; expected track or album.", self.0)
	}
}
impl std::error::Error for UnknownNoteKind {}

/// Trimmed note content, or `None` when nothing is left. Empty content means "no note".
pub fn normalize_content(raw: &str) -> Option<&str> {
	let trimmed = raw.trim();

	if trimmed.is_empty() { None } else { Some(trimmed) }
}

pub fn cache_key(kind: NoteKind, owner_id: &str, entity_id: &str) -> String {
	format!("{}_note_{owner_id}_{entity_id}", kind.as_str())
}
