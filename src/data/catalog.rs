use std::path::{Path, PathBuf};

use super::model::{to_portable, DatasetCatalog};
use super::places::PlaceLoader;
use super::sessions::SessionIndexer;
use crate::error::Result;

/// Session store file, relative to the dataset root.
pub const SESSION_STORE_FILE: &str = "rdb1to6.sqlite";
/// Directory of georeferenced site images, relative to the dataset root.
pub const IMAGES_DIR: &str = "image_georeferenced";

/// Fixed locations of the two inputs below a dataset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub root: PathBuf,
    pub db_path: PathBuf,
    pub images_dir: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            db_path: root.join(SESSION_STORE_FILE),
            images_dir: root.join(IMAGES_DIR),
            root,
        }
    }
}

impl DatasetCatalog {
    /// Load the catalog of `dataset_dir` with the default blacklist.
    pub fn build(dataset_dir: impl AsRef<Path>) -> Result<Self> {
        Self::build_with(dataset_dir, &SessionIndexer::default(), &PlaceLoader::new())
    }

    /// Load the catalog with explicit components. Either failure aborts the
    /// load; no partial catalog is returned.
    pub fn build_with(
        dataset_dir: impl AsRef<Path>,
        indexer: &SessionIndexer,
        loader: &PlaceLoader,
    ) -> Result<Self> {
        let layout = DatasetLayout::new(dataset_dir);
        log::debug!("loading dataset catalog from {}", layout.root.display());

        let session_ids = indexer.list_sessions(&layout.db_path)?;
        let places = loader.load_places(&layout.images_dir)?;

        Ok(DatasetCatalog {
            dataset_dir: to_portable(&layout.root),
            db_path: to_portable(&layout.db_path),
            session_ids,
            places,
        })
    }
}
