//! Static asset cache: precomputed feed collections and trending shows.
//!
//! Written by the offline generator, read-only at serve time.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::model::{FeedCollection, Show};

const COLLECTIONS_FILE: &str = "feed_collections.json";
const TRENDING_FILE: &str = "trending_shows.json";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("asset decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load_collections(&self) -> Result<Vec<FeedCollection>, AssetError> {
        self.load(COLLECTIONS_FILE)
    }

    pub fn load_trending(&self) -> Result<Vec<Show>, AssetError> {
        self.load(TRENDING_FILE)
    }

    pub fn save_collections(&self, collections: &[FeedCollection]) -> Result<(), AssetError> {
        self.save(COLLECTIONS_FILE, collections)
    }

    pub fn save_trending(&self, shows: &[Show]) -> Result<(), AssetError> {
        self.save(TRENDING_FILE, shows)
    }

    fn load<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T, AssetError> {
        let path = self.dir.join(file);
        debug!(path = %path.display(), "loading static asset");
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save<T: serde::Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), AssetError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file);
        debug!(path = %path.display(), "writing static asset");
        std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
        Ok(())
    }
}

impl AssetStore {
    /// Store rooted at `ANITECA_ASSET_DIR`, falling back to `./assets`.
    pub fn from_env() -> Self {
        let dir = std::env::var("ANITECA_ASSET_DIR").unwrap_or_else(|_| "assets".to_string());
        Self::new(Path::new(&dir))
    }
}
