use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;

// ---------------------------------------------------------------------------
// SessionId – one recorded trajectory table
// ---------------------------------------------------------------------------

/// Name of one recording session, i.e. one table of the session store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<&str> for SessionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Place – one georeferenced aerial image
// ---------------------------------------------------------------------------

/// Pixel dimensions of a site image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for ImageSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A site image together with its world-file coefficients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    /// Image base name, extension stripped. Unique within a catalog.
    pub name: String,
    pub image_size: ImageSize,
    /// Slash-separated path of the source image.
    pub image_path: String,
    /// One value per non-empty world-file line, in file order. The count is
    /// not checked against the usual six affine coefficients.
    pub world_params: Vec<f64>,
}

/// Places keyed by [`Place::name`].
pub type PlaceMap = BTreeMap<String, Place>;

// ---------------------------------------------------------------------------
// DatasetCatalog – the complete loaded index
// ---------------------------------------------------------------------------

/// Read-only snapshot of a dataset root: valid sessions plus every place.
///
/// Built in one pass by [`DatasetCatalog::build`](crate::DatasetCatalog::build);
/// there are no mutating methods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetCatalog {
    pub(crate) dataset_dir: String,
    pub(crate) db_path: String,
    pub(crate) session_ids: Vec<SessionId>,
    pub(crate) places: PlaceMap,
}

impl DatasetCatalog {
    /// Dataset root in slash-separated form.
    pub fn dataset_dir(&self) -> &str {
        &self.dataset_dir
    }

    /// Session store path in slash-separated form.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Valid sessions in store order.
    pub fn session_ids(&self) -> &[SessionId] {
        &self.session_ids
    }

    pub fn contains_session(&self, id: &str) -> bool {
        self.session_ids.iter().any(|s| s.as_str() == id)
    }

    pub fn places(&self) -> &PlaceMap {
        &self.places
    }

    pub fn place(&self, name: &str) -> Option<&Place> {
        self.places.get(name)
    }

    /// Place names, sorted.
    pub fn place_names(&self) -> impl Iterator<Item = &str> {
        self.places.keys().map(String::as_str)
    }

    pub fn session_count(&self) -> usize {
        self.session_ids.len()
    }

    pub fn place_count(&self) -> usize {
        self.places.len()
    }
}

/// Render a path with `/` separators regardless of platform.
pub fn to_portable(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
