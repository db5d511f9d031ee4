//! Catalog loader for the openDD traffic dataset.
//!
//! A dataset root holds a SQLite store with one table per recording session
//! and a directory of georeferenced site images. [`DatasetCatalog::build`]
//! reads both into a read-only snapshot:
//!
//! ```no_run
//! use opendd_catalog::DatasetCatalog;
//!
//! let catalog = DatasetCatalog::build("/data/opendd")?;
//! for id in catalog.session_ids() {
//!     println!("{id}");
//! }
//! if let Some(place) = catalog.place("rdb1") {
//!     println!("{} {:?}", place.image_size, place.world_params);
//! }
//! # Ok::<(), opendd_catalog::CatalogError>(())
//! ```

pub mod data;
pub mod error;

pub use data::catalog::{DatasetLayout, IMAGES_DIR, SESSION_STORE_FILE};
pub use data::model::{DatasetCatalog, ImageSize, Place, PlaceMap, SessionId};
pub use data::places::{PlaceLoader, IMAGE_EXTENSION, WORLD_FILE_EXTENSION};
pub use data::sessions::{SessionBlacklist, SessionIndexer, DEFAULT_BLACKLIST};
pub use error::{CatalogError, Result, WorldParamError};
