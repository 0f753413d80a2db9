//! Encrypted attachment storage.
//!
//! Attachments never live in the database: the encrypted token is written
//! to a uniquely named file under one directory and only the reference is
//! recorded on the message row.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::info;
use uuid::Uuid;

use crate::error::{ChatError, Result};

pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        info!("blob store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn path_of(&self, blob_ref: &str) -> PathBuf {
        self.dir.join(blob_ref)
    }

    /// Write an encrypted token under a fresh unique name and return the
    /// reference.
    pub fn write(&self, token: &[u8]) -> Result<String> {
        let blob_ref = format!("{}.enc", Uuid::new_v4().simple());
        fs::write(self.path_of(&blob_ref), token)?;
        Ok(blob_ref)
    }

    /// Read a stored token. A missing file is reported as `BlobMissing`,
    /// distinct from a token that later fails authentication.
    pub fn read(&self, blob_ref: &str) -> Result<Vec<u8>> {
        let path = self.path_of(blob_ref);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ChatError::BlobMissing(path)),
            Err(e) => Err(e.into()),
        }
    }
}
