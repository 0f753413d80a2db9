//! Runtime configuration: where the database and the attachment blobs
//! live. Environment variables override the defaults, with an optional
//! `.env` file loaded first.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub blob_dir: PathBuf,
}

impl Config {
    pub fn new(db_path: impl Into<PathBuf>, blob_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            blob_dir: blob_dir.into(),
        }
    }

    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let db_path = env::var("ALCOVE_DB_PATH").unwrap_or_else(|_| "alcove.db".into());
        let blob_dir = env::var("ALCOVE_BLOB_DIR").unwrap_or_else(|_| "uploads".into());

        Self::new(db_path, blob_dir)
    }
}
