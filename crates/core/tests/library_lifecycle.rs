//! Library lifecycle integration tests.
//!
//! These tests drive the data manager against a file-backed SQLite store:
//! users share pooled movies, edits fork private copies, and movies vanish
//! once nobody has them.

use std::sync::Arc;

use tempfile::TempDir;

use movieweb_core::{
    testing::{fixtures, MockMovieLookup},
    AddMovieOutcome, DataManager, LibraryConfig, LibraryError, LibraryStore, Movie, MovieRemoval,
    MovieUpdate, SqliteLibraryStore,
};

/// Test helper owning the store, the lookup mock and the temp database.
struct TestHarness {
    store: Arc<SqliteLibraryStore>,
    lookup: Arc<MockMovieLookup>,
    manager: DataManager,
    _temp_dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("library.db");

        let store = Arc::new(SqliteLibraryStore::new(&db_path).expect("Failed to create store"));
        let lookup = Arc::new(MockMovieLookup::new());
        lookup.add_movie(fixtures::inception()).await;
        lookup
            .add_movie(fixtures::movie_metadata(
                "Heat",
                "Michael Mann",
                "1995",
                "8.3",
            ))
            .await;

        let manager = DataManager::new(
            Arc::clone(&store) as Arc<dyn LibraryStore>,
            lookup.clone(),
            LibraryConfig::default(),
        );

        Self {
            store,
            lookup,
            manager,
            _temp_dir: temp_dir,
        }
    }

    async fn add(&self, user_id: i64, title: &str) -> Movie {
        match self.manager.add_movie_to_user(user_id, title).await {
            Ok(AddMovieOutcome::Added(movie)) => movie,
            other => panic!("expected '{}' to be added, got {:?}", title, other),
        }
    }
}

#[tokio::test]
async fn test_shared_movie_edit_and_cleanup() {
    let h = TestHarness::new().await;
    let alice = h.manager.add_user("Alice").unwrap();
    let bob = h.manager.add_user("Bob").unwrap();

    // Both users end up on the same pooled row, fetched once.
    let shared = h.add(alice.id, "Inception").await;
    assert_eq!(h.add(bob.id, "Inception").await.id, shared.id);
    assert_eq!(h.lookup.query_count().await, 1);

    // Alice's edit forks a private copy; Bob keeps the original.
    let update = MovieUpdate {
        director: Some("Nolan".to_string()),
        ..Default::default()
    };
    let updated = h.manager.update_movie(alice.id, shared.id, &update).unwrap();
    assert!(!updated.original_deleted);
    assert_ne!(updated.movie.id, shared.id);
    assert_eq!(updated.movie.director, "Nolan");
    assert_eq!(updated.movie.title, "Inception");
    assert_eq!(h.manager.list_user_movies(bob.id).unwrap(), vec![shared.clone()]);
    assert_eq!(
        h.manager.list_user_movies(alice.id).unwrap(),
        vec![updated.movie.clone()]
    );
    assert_eq!(h.manager.get_movie(shared.id).unwrap(), shared);

    // Bob drops the original: nobody has it anymore, so it is gone.
    let removal = h.manager.remove_movie_from_user(shared.id, bob.id).unwrap();
    assert!(matches!(
        removal,
        MovieRemoval::Removed {
            movie_deleted: true,
            ..
        }
    ));
    assert!(matches!(
        h.manager.get_movie(shared.id),
        Err(LibraryError::NotFound(_))
    ));
    assert_eq!(h.manager.list_all_movies().unwrap(), vec![updated.movie]);
}

#[tokio::test]
async fn test_no_orphans_after_mixed_operations() {
    let h = TestHarness::new().await;
    let alice = h.manager.add_user("Alice").unwrap();
    let bob = h.manager.add_user("Bob").unwrap();

    let inception = h.add(alice.id, "Inception").await;
    h.add(alice.id, "Heat").await;
    h.add(bob.id, "Heat").await;
    h.manager
        .update_movie(
            bob.id,
            h.manager.list_user_movies(bob.id).unwrap()[0].id,
            &MovieUpdate {
                imdb_rating: Some("9.0".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let removal = h.manager.delete_user(alice.id).unwrap();
    assert_eq!(removal.orphans_deleted, 2);
    assert!(matches!(
        h.manager.get_movie(inception.id),
        Err(LibraryError::NotFound(_))
    ));

    // Only Bob's edited copy of Heat remains.
    let stats = h.manager.stats().unwrap();
    assert_eq!(stats.users, 1);
    assert_eq!(stats.movies, 1);
    assert_eq!(stats.associations, 1);
    let remaining = h.manager.list_all_movies().unwrap();
    assert_eq!(remaining[0].imdb_rating, 9.0);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let h = TestHarness::new().await;
    let alice = h.manager.add_user("Alice").unwrap();
    let movie = h.add(alice.id, "Inception").await;

    h.manager.remove_movie_from_user(movie.id, alice.id).unwrap();
    let again = h.manager.remove_movie_from_user(movie.id, alice.id).unwrap();

    assert_eq!(again, MovieRemoval::NotAssociated);
    assert_eq!(h.manager.stats().unwrap().movies, 0);
}

#[tokio::test]
async fn test_ids_are_not_reused() {
    let h = TestHarness::new().await;
    let alice = h.manager.add_user("Alice").unwrap();

    let first = h.add(alice.id, "Inception").await;
    h.manager.remove_movie_from_user(first.id, alice.id).unwrap();
    let second = h.add(alice.id, "Inception").await;

    assert!(second.id > first.id);
    assert_eq!(h.lookup.query_count().await, 2);
}

#[tokio::test]
async fn test_lookup_failure_leaves_library_unchanged() {
    let h = TestHarness::new().await;
    let alice = h.manager.add_user("Alice").unwrap();
    let before = h.store.stats().unwrap();

    let outcome = h
        .manager
        .add_movie_to_user(alice.id, "Not A Real Movie")
        .await
        .unwrap();

    assert!(matches!(outcome, AddMovieOutcome::LookupFailed(_)));
    assert_eq!(h.store.stats().unwrap(), before);
}

#[tokio::test]
async fn test_library_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("library.db");
    let lookup = Arc::new(MockMovieLookup::new());
    lookup.add_movie(fixtures::inception()).await;

    let (alice_id, movie_id) = {
        let store = Arc::new(SqliteLibraryStore::new(&db_path).unwrap());
        let manager = DataManager::new(store, lookup.clone(), LibraryConfig::default());
        let alice = manager.add_user("Alice").unwrap();
        let movie = manager
            .add_movie_to_user(alice.id, "Inception")
            .await
            .unwrap()
            .movie()
            .cloned()
            .unwrap();
        (alice.id, movie.id)
    };

    let store = Arc::new(SqliteLibraryStore::new(&db_path).unwrap());
    let manager = DataManager::new(store, lookup.clone(), LibraryConfig::default());
    let movies = manager.list_user_movies(alice_id).unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, movie_id);
    assert_eq!(lookup.query_count().await, 1);
}
