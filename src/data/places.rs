use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use super::model::{to_portable, ImageSize, Place, PlaceMap};
use crate::error::{CatalogError, Result, WorldParamError};

/// Only files with exactly this extension are treated as site images.
pub const IMAGE_EXTENSION: &str = "jpg";
/// Extension of the world-file sitting next to each image.
pub const WORLD_FILE_EXTENSION: &str = "tfw";

// ---------------------------------------------------------------------------
// PlaceLoader
// ---------------------------------------------------------------------------

/// Builds one [`Place`] per `<name>.jpg` / `<name>.tfw` pair of a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceLoader;

impl PlaceLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every place found directly inside `images_dir`.
    ///
    /// Images are visited in file-name order. Files with any other
    /// extension are ignored, but an image without a readable world-file
    /// aborts the whole load.
    pub fn load_places(&self, images_dir: &Path) -> Result<PlaceMap> {
        fs::metadata(images_dir).map_err(|source| CatalogError::Io {
            path: images_dir.to_path_buf(),
            source,
        })?;

        let mut places = PlaceMap::new();
        let walker = WalkDir::new(images_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|err| CatalogError::Io {
                path: err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| images_dir.to_path_buf()),
                source: io::Error::from(err),
            })?;

            if !entry.file_type().is_file() || !is_site_image(entry.path()) {
                continue;
            }

            let place = self.load_place(entry.path())?;
            log::debug!(
                "loaded place {} ({}, {} world params)",
                place.name,
                place.image_size,
                place.world_params.len()
            );
            places.insert(place.name.clone(), place);
        }

        log::info!("loaded {} places from {}", places.len(), images_dir.display());
        Ok(places)
    }

    /// Load a single place from its image path; the world-file is looked up
    /// next to it.
    pub fn load_place(&self, image_path: &Path) -> Result<Place> {
        let name = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let image_size = probe_image_size(image_path)?;

        let world_file = image_path.with_extension(WORLD_FILE_EXTENSION);
        let world_params = read_world_file(&world_file).map_err(|err| match err {
            CatalogError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                CatalogError::MissingWorldFile {
                    image: image_path.to_path_buf(),
                    world_file: world_file.clone(),
                }
            }
            other => other,
        })?;

        Ok(Place {
            name,
            image_size,
            image_path: to_portable(image_path),
            world_params,
        })
    }
}

fn is_site_image(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(IMAGE_EXTENSION)
}

/// Read the pixel dimensions from the image header without decoding it.
fn probe_image_size(path: &Path) -> Result<ImageSize> {
    image::image_dimensions(path)
        .map(ImageSize::from)
        .map_err(|source| CatalogError::ImageRead {
            path: path.to_path_buf(),
            source,
        })
}

// ---------------------------------------------------------------------------
// World-file parsing
// ---------------------------------------------------------------------------

/// Read a world-file from disk. See [`parse_world_params`].
pub fn read_world_file(path: &Path) -> Result<Vec<f64>> {
    let bytes = fs::read(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_world_params(bytes, path)
}

/// Parse one float per line, keeping file order.
///
/// Surrounding whitespace is trimmed and blank lines are skipped. A line
/// that is not UTF-8 is malformed like any other non-number. `path` is only
/// used for error reporting.
pub fn parse_world_params(contents: impl AsRef<[u8]>, path: &Path) -> Result<Vec<f64>> {
    let malformed = |line: usize, value: String, source: WorldParamError| {
        CatalogError::MalformedWorldFile {
            path: path.to_path_buf(),
            line,
            value,
            source,
        }
    };

    let mut params = Vec::new();
    for (i, raw) in contents.as_ref().split(|&b| b == b'\n').enumerate() {
        let line = std::str::from_utf8(raw)
            .map_err(|e| malformed(i + 1, String::from_utf8_lossy(raw).trim().to_string(), e.into()))?
            .trim();
        if line.is_empty() {
            continue;
        }
        let value = line
            .parse::<f64>()
            .map_err(|e| malformed(i + 1, line.to_string(), e.into()))?;
        params.push(value);
    }
    Ok(params)
}
