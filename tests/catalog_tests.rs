//! End-to-end catalog loads against throwaway dataset directories.

use std::fs;
use std::path::{Path, PathBuf};

use opendd_catalog::{
    CatalogError, DatasetCatalog, ImageSize, Place, PlaceLoader, SessionBlacklist, SessionIndexer,
    DEFAULT_BLACKLIST, IMAGES_DIR, SESSION_STORE_FILE,
};
use rusqlite::Connection;
use tempfile::TempDir;

const SITE_A_PARAMS: [f64; 6] = [0.5, 0.0, 0.0, -0.5, 500000.0, 4000000.0];

/// Dataset root with a session store of `tables` and an empty image directory.
fn create_dataset(tables: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    let conn = Connection::open(tmp.path().join(SESSION_STORE_FILE)).unwrap();
    for table in tables {
        conn.execute_batch(&format!(
            "CREATE TABLE \"{table}\" (OBJID INTEGER, TIMESTAMP REAL, UTM_X REAL, UTM_Y REAL);"
        ))
        .unwrap();
    }
    fs::create_dir(tmp.path().join(IMAGES_DIR)).unwrap();
    tmp
}

fn images_dir(root: &Path) -> PathBuf {
    root.join(IMAGES_DIR)
}

fn add_image(root: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = images_dir(root).join(format!("{name}.jpg"));
    image::RgbImage::new(width, height).save(&path).unwrap();
    path
}

fn add_world_file(root: &Path, name: &str, text: &str) {
    fs::write(images_dir(root).join(format!("{name}.tfw")), text).unwrap();
}

fn params_text(params: &[f64]) -> String {
    params.iter().map(|v| format!("{v:?}\n")).collect()
}

#[test]
fn test_blacklisted_session_is_dropped() {
    let tmp = create_dataset(&["sessA", "sessB", "rdb6_DJI_0016"]);

    let catalog = DatasetCatalog::build(tmp.path()).unwrap();
    let ids: Vec<&str> = catalog.session_ids().iter().map(|s| s.as_str()).collect();
    assert_eq!(ids, vec!["sessA", "sessB"]);
    assert!(catalog.contains_session("sessA"));
    assert!(!catalog.contains_session("rdb6_DJI_0016"));
}

#[test]
fn test_no_blacklisted_name_survives() {
    let mut tables = vec!["rdb1_DJI_0001", "rdb2_DJI_0003"];
    tables.extend(DEFAULT_BLACKLIST);
    let tmp = create_dataset(&tables);

    let catalog = DatasetCatalog::build(tmp.path()).unwrap();
    let blacklist = SessionBlacklist::default();
    assert_eq!(catalog.session_count(), 2);
    assert!(catalog
        .session_ids()
        .iter()
        .all(|id| !blacklist.contains(id.as_str())));
}

#[test]
fn test_site_place_is_loaded() {
    let tmp = create_dataset(&["sessA"]);
    let image_path = add_image(tmp.path(), "siteA", 100, 50);
    add_world_file(tmp.path(), "siteA", "0.5\n0.0\n0.0\n-0.5\n500000.0\n4000000.0\n");

    let catalog = DatasetCatalog::build(tmp.path()).unwrap();
    let expected = Place {
        name: "siteA".to_string(),
        image_size: ImageSize { width: 100, height: 50 },
        image_path: image_path.to_string_lossy().into_owned(),
        world_params: SITE_A_PARAMS.to_vec(),
    };
    assert_eq!(catalog.place("siteA"), Some(&expected));
    assert_eq!(catalog.place_count(), 1);
}

#[test]
fn test_place_keys_match_names() {
    let tmp = create_dataset(&[]);
    for (name, w, h) in [("rdb1", 32, 16), ("rdb3", 16, 16), ("rdb6", 40, 20)] {
        add_image(tmp.path(), name, w, h);
        add_world_file(tmp.path(), name, &params_text(&SITE_A_PARAMS));
    }

    let catalog = DatasetCatalog::build(tmp.path()).unwrap();
    assert_eq!(catalog.place_names().collect::<Vec<_>>(), vec!["rdb1", "rdb3", "rdb6"]);
    for (key, place) in catalog.places() {
        assert_eq!(key, &place.name);
    }
    assert_eq!(catalog.place("rdb6").unwrap().image_size, ImageSize { width: 40, height: 20 });
}

#[test]
fn test_world_params_match_written_values() {
    let tmp = create_dataset(&[]);
    let written = [0.1, -0.1, 2.5e-4, -3.75e-4, 653210.125, 5621432.0625, 7.0];
    add_image(tmp.path(), "site", 8, 8);
    add_world_file(tmp.path(), "site", &params_text(&written));

    let catalog = DatasetCatalog::build(tmp.path()).unwrap();
    let place = catalog.place("site").unwrap();
    assert_eq!(place.world_params, written.to_vec());
}

#[test]
fn test_missing_world_file_aborts_build() {
    let tmp = create_dataset(&["sessA"]);
    add_image(tmp.path(), "siteA", 100, 50);

    let err = DatasetCatalog::build(tmp.path()).unwrap_err();
    assert!(matches!(err, CatalogError::MissingWorldFile { .. }));
}

#[test]
fn test_malformed_world_file_aborts_build() {
    let tmp = create_dataset(&["sessA"]);
    add_image(tmp.path(), "siteA", 10, 10);
    add_world_file(tmp.path(), "siteA", "0.5\n0.0\nabc\n-0.5\n500000.0\n4000000.0\n");

    let err = DatasetCatalog::build(tmp.path()).unwrap_err();
    match err {
        CatalogError::MalformedWorldFile { line, value, .. } => {
            assert_eq!(line, 3);
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_non_utf8_world_file_aborts_build() {
    let tmp = create_dataset(&["sessA"]);
    add_image(tmp.path(), "siteA", 10, 10);
    fs::write(images_dir(tmp.path()).join("siteA.tfw"), b"0.5\n\xff\xfe\n").unwrap();

    let err = DatasetCatalog::build(tmp.path()).unwrap_err();
    assert!(matches!(err, CatalogError::MalformedWorldFile { line: 2, .. }));
}

#[test]
fn test_one_bad_site_aborts_whole_build() {
    let tmp = create_dataset(&["sessA"]);
    add_image(tmp.path(), "good", 10, 10);
    add_world_file(tmp.path(), "good", &params_text(&SITE_A_PARAMS));
    add_image(tmp.path(), "orphan", 10, 10);

    assert!(DatasetCatalog::build(tmp.path()).is_err());
}

#[test]
fn test_missing_store_is_unavailable() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(images_dir(tmp.path())).unwrap();

    let err = DatasetCatalog::build(tmp.path()).unwrap_err();
    assert!(matches!(err, CatalogError::StoreUnavailable { .. }));
    assert!(!tmp.path().join(SESSION_STORE_FILE).exists());
}

#[test]
fn test_injected_blacklist_is_used() {
    let tmp = create_dataset(&["sessA", "sessB", "rdb6_DJI_0016"]);

    let indexer = SessionIndexer::new(SessionBlacklist::new(["sessA"]));
    let catalog = DatasetCatalog::build_with(tmp.path(), &indexer, &PlaceLoader::new()).unwrap();
    let ids: Vec<&str> = catalog.session_ids().iter().map(|s| s.as_str()).collect();
    assert_eq!(ids, vec!["sessB", "rdb6_DJI_0016"]);
}

#[test]
fn test_catalog_paths_are_recorded() {
    let tmp = create_dataset(&[]);

    let catalog = DatasetCatalog::build(tmp.path()).unwrap();
    assert_eq!(catalog.dataset_dir(), tmp.path().to_string_lossy().as_ref());
    assert!(catalog.db_path().ends_with("/rdb1to6.sqlite"));
    assert_eq!(catalog.session_count(), 0);
    assert_eq!(catalog.place_count(), 0);
}

#[test]
fn test_catalog_serializes_to_json() {
    let tmp = create_dataset(&["sessA"]);
    add_image(tmp.path(), "siteA", 100, 50);
    add_world_file(tmp.path(), "siteA", &params_text(&SITE_A_PARAMS));

    let catalog = DatasetCatalog::build(tmp.path()).unwrap();
    let json = serde_json::to_value(&catalog).unwrap();
    assert_eq!(json["session_ids"], serde_json::json!(["sessA"]));
    assert_eq!(json["places"]["siteA"]["image_size"]["width"], 100);
    assert_eq!(json["places"]["siteA"]["world_params"][4], 500000.0);
}
