pub mod config;
pub mod library;
pub mod lookup;
pub mod metrics;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    LibraryConfig, OmdbConfig, SanitizedConfig, ServerConfig,
};
pub use library::{
    AddMovieOutcome, DataManager, LibraryError, LibraryStats, LibraryStore, Movie, MovieRemoval,
    MovieUpdate, MovieUpdated, SqliteLibraryStore, User, UserRemoval,
};
pub use lookup::{DisabledLookup, LookupError, MovieLookup, MovieMetadata, OmdbClient};
