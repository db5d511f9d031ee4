/// Data layer: catalog types and the two loaders that fill them.
///
/// Architecture:
/// ```text
///  <dataset_dir>/rdb1to6.sqlite      <dataset_dir>/image_georeferenced/
///        │                                 │  *.jpg + *.tfw
///        ▼                                 ▼
///   ┌────────────────┐              ┌─────────────┐
///   │ SessionIndexer │ tables −     │ PlaceLoader │ size + world params
///   │                │ blacklist    │             │ per image
///   └────────────────┘              └─────────────┘
///        │                                 │
///        └──────────────┬──────────────────┘
///                       ▼
///               ┌────────────────┐
///               │ DatasetCatalog │  read-only snapshot
///               └────────────────┘
/// ```

pub mod catalog;
pub mod model;
pub mod places;
pub mod sessions;
