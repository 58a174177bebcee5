mod connection;
mod migrations;
mod repositories;

pub use connection::Database;

/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "workshop-pulse.sqlite3";
