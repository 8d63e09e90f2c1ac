use scrmbld_config::Postgres;
use scrmbld_storage::{
	catalog,
	db::Db,
	listened, notes, ratings, reviews, users,
	models::{NewAlbum, NewTrack},
};
use scrmbld_testkit::TestDatabase;

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

fn sample_album() -> NewAlbum {
	NewAlbum {
		spotify_id: "album_1".to_string(),
		name: "Blue Train".to_string(),
		artist: "John Coltrane".to_string(),
		image_url: None,
		release_date: Some("1957".to_string()),
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRMBLD_PG_DSN to run."]
async fn db_connects_and_bootstraps_twice() {
	let Some(base_dsn) = scrmbld_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps_twice; set SCRMBLD_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	db.ensure_schema().await.expect("Schema bootstrap should be idempotent.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'album_notes'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRMBLD_PG_DSN to run."]
async fn get_or_create_is_stable_per_spotify_id() {
	let Some(base_dsn) = scrmbld_testkit::env_dsn() else {
		eprintln!("Skipping get_or_create_is_stable_per_spotify_id; set SCRMBLD_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let first = users::get_or_create_user(&db.pool, "user_1", Some("Ada"), None)
		.await
		.expect("Failed to create user.");
	let second = users::get_or_create_user(&db.pool, "user_1", None, Some("ada@example.com"))
		.await
		.expect("Failed to fetch user.");

	assert_eq!(first.user_id, second.user_id);
	assert_eq!(second.display_name.as_deref(), Some("Ada"));
	assert_eq!(second.email.as_deref(), Some("ada@example.com"));

	let album = catalog::get_or_create_album(&db.pool, &sample_album())
		.await
		.expect("Failed to create album.");
	let again = catalog::get_or_create_album(&db.pool, &sample_album())
		.await
		.expect("Failed to fetch album.");

	assert_eq!(album.album_id, again.album_id);

	let placeholder = catalog::ensure_track(&db.pool, "track_1").await.expect("Failed to ensure track.");

	assert_eq!(placeholder.name, catalog::PLACEHOLDER_TRACK_NAME);

	let synced = catalog::get_or_create_track(
		&db.pool,
		&NewTrack {
			spotify_id: "track_1".to_string(),
			album_id: Some(album.album_id),
			name: "Moment's Notice".to_string(),
			duration_ms: Some(549_000),
			track_number: Some(2),
		},
	)
	.await
	.expect("Failed to fetch track.");

	assert_eq!(synced.track_id, placeholder.track_id);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRMBLD_PG_DSN to run."]
async fn locked_album_note_rejects_upsert() {
	let Some(base_dsn) = scrmbld_testkit::env_dsn() else {
		eprintln!("Skipping locked_album_note_rejects_upsert; set SCRMBLD_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let user = users::get_or_create_user(&db.pool, "user_1", None, None)
		.await
		.expect("Failed to create user.");
	let album = catalog::get_or_create_album(&db.pool, &sample_album())
		.await
		.expect("Failed to create album.");
	let note = notes::upsert_album_note(&db.pool, user.user_id, album.album_id, "first")
		.await
		.expect("Failed to upsert note.")
		.expect("Unlocked note should be written.");

	assert!(!note.is_locked);

	notes::set_album_note_lock(&db.pool, user.user_id, album.album_id, true)
		.await
		.expect("Failed to lock note.")
		.expect("Note should exist.");

	let blocked = notes::upsert_album_note(&db.pool, user.user_id, album.album_id, "second")
		.await
		.expect("Failed to attempt upsert.");

	assert!(blocked.is_none());

	let stored = notes::find_album_note(&db.pool, user.user_id, album.album_id)
		.await
		.expect("Failed to fetch note.")
		.expect("Note should exist.");

	assert_eq!(stored.content, "first");
	assert!(notes::delete_album_note(&db.pool, user.user_id, album.album_id).await.expect("delete"));
	assert!(!notes::delete_album_note(&db.pool, user.user_id, album.album_id).await.expect("delete"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set SCRMBLD_PG_DSN to run."]
async fn ratings_reviews_and_listened_round_out_feedback() {
	let Some(base_dsn) = scrmbld_testkit::env_dsn() else {
		eprintln!(
			"Skipping ratings_reviews_and_listened_round_out_feedback; set SCRMBLD_PG_DSN to run."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let alice = users::get_or_create_user(&db.pool, "alice", Some("Alice"), None)
		.await
		.expect("Failed to create user.");
	let bob = users::get_or_create_user(&db.pool, "bob", None, None)
		.await
		.expect("Failed to create user.");
	let album = catalog::get_or_create_album(&db.pool, &sample_album())
		.await
		.expect("Failed to create album.");
	let track = catalog::ensure_track(&db.pool, "track_1").await.expect("Failed to ensure track.");

	ratings::upsert_rating(&db.pool, alice.user_id, track.track_id, 3).await.expect("rating");
	ratings::upsert_rating(&db.pool, alice.user_id, track.track_id, 5).await.expect("rating");
	ratings::upsert_rating(&db.pool, bob.user_id, track.track_id, 2).await.expect("rating");

	assert!(ratings::upsert_rating(&db.pool, bob.user_id, track.track_id, 6).await.is_err());

	let all = ratings::list_ratings(&db.pool, track.track_id, None).await.expect("list");
	let mine =
		ratings::list_ratings(&db.pool, track.track_id, Some(alice.user_id)).await.expect("list");

	assert_eq!(all.len(), 2);
	assert_eq!(mine.len(), 1);
	assert_eq!(mine[0].rating, 5);
	assert_eq!(mine[0].display_name.as_deref(), Some("Alice"));

	let review = reviews::upsert_review(&db.pool, alice.user_id, track.track_id, "Great solo.")
		.await
		.expect("review");
	let foreign = reviews::update_review(&db.pool, review.review_id, Some(bob.user_id), "Nope.")
		.await
		.expect("update");

	assert!(foreign.is_none());

	let updated = reviews::update_review(&db.pool, review.review_id, Some(alice.user_id), "Edit.")
		.await
		.expect("update")
		.expect("Author update should match.");

	assert_eq!(updated.content, "Edit.");
	assert!(reviews::delete_review(&db.pool, review.review_id, None).await.expect("delete"));
	assert!(
		!listened::get_listened(&db.pool, alice.user_id, album.album_id).await.expect("listened")
	);

	listened::set_listened(&db.pool, alice.user_id, album.album_id, true).await.expect("set");

	assert!(listened::get_listened(&db.pool, alice.user_id, album.album_id).await.expect("listened"));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
