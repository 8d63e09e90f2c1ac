pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_users.sql")),
				"tables/002_albums.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_albums.sql")),
				"tables/003_tracks.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_tracks.sql")),
				"tables/004_track_notes.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_track_notes.sql")),
				"tables/005_album_notes.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_album_notes.sql")),
				"tables/006_ratings.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_ratings.sql")),
				"tables/007_reviews.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_reviews.sql")),
				"tables/008_album_listened.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_album_listened.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn includes_are_expanded() {
		let sql = render_schema();

		assert!(!sql.contains("\\ir "));

		for table in [
			"users",
			"albums",
			"tracks",
			"track_notes",
			"album_notes",
			"ratings",
			"reviews",
			"album_listened",
		] {
			assert!(
				sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
				"Missing table {table}."
			);
		}
	}

	#[test]
	fn statements_split_cleanly() {
		let sql = render_schema();
		let statements =
			sql.split(';').map(str::trim).filter(|s| !s.is_empty()).collect::<Vec<_>>();

		assert!(statements.iter().all(|s| s.starts_with("CREATE ")));
	}
}
