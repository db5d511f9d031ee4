use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use opendd_catalog::{IMAGES_DIR, SESSION_STORE_FILE, WORLD_FILE_EXTENSION};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[-scale, scale)`.
    fn jitter(&mut self, scale: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        (unit * 2.0 - 1.0) * scale
    }
}

/// (name, width, height, origin easting, origin northing)
const SITES: [(&str, u32, u32, f64, f64); 3] = [
    ("rdb1", 320, 180, 653_210.0, 5_621_430.0),
    ("rdb3", 256, 256, 653_890.0, 5_620_870.0),
    ("rdb6", 400, 200, 654_400.0, 5_622_100.0),
];

/// Sessions per site; `rdb6_DJI_0016` is on the default blacklist.
const SESSIONS: [(&str, usize); 5] = [
    ("rdb1_DJI_0001", 0),
    ("rdb1_DJI_0002", 0),
    ("rdb3_DJI_0005", 1),
    ("rdb6_DJI_0011", 2),
    ("rdb6_DJI_0016", 2),
];

const PIXEL_SIZE: f64 = 0.05;
const ROWS_PER_SESSION: usize = 200;

fn write_store(path: &Path, rng: &mut SimpleRng) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("removing {}", path.display()))?;
    }
    let mut conn = Connection::open(path).context("creating session store")?;
    let tx = conn.transaction()?;

    for &(session, site) in &SESSIONS {
        let (_, width, height, east, north) = SITES[site];
        tx.execute_batch(&format!(
            "CREATE TABLE \"{session}\" (OBJID INTEGER, TIMESTAMP REAL, UTM_X REAL, UTM_Y REAL, CLASS TEXT);"
        ))?;

        let insert = format!(
            "INSERT INTO \"{session}\" (OBJID, TIMESTAMP, UTM_X, UTM_Y, CLASS) VALUES (?1, ?2, ?3, ?4, 'Car')"
        );
        let mut stmt = tx.prepare(&insert)?;
        let center_x = east + f64::from(width) * PIXEL_SIZE / 2.0;
        let center_y = north - f64::from(height) * PIXEL_SIZE / 2.0;
        for row in 0..ROWS_PER_SESSION {
            let obj_id = (row % 4) as i64;
            let t = (row / 4) as f64 * 0.04;
            stmt.execute(params![
                obj_id,
                t,
                center_x + rng.jitter(5.0),
                center_y + rng.jitter(5.0)
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}

fn write_site(dir: &Path, site: (&str, u32, u32, f64, f64)) -> Result<()> {
    let (name, width, height, east, north) = site;

    let image_path = dir.join(format!("{name}.jpg"));
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(&image_path)
        .with_context(|| format!("writing {}", image_path.display()))?;

    // x pixel size, two rotation terms, negative y pixel size, upper-left centre
    let params = [PIXEL_SIZE, 0.0, 0.0, -PIXEL_SIZE, east, north];
    let text: String = params.iter().map(|v| format!("{v}\n")).collect();
    let world_path = image_path.with_extension(WORLD_FILE_EXTENSION);
    fs::write(&world_path, text).with_context(|| format!("writing {}", world_path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_dataset"));
    let images_dir = root.join(IMAGES_DIR);
    fs::create_dir_all(&images_dir)
        .with_context(|| format!("creating {}", images_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    write_store(&root.join(SESSION_STORE_FILE), &mut rng)?;
    for site in SITES {
        write_site(&images_dir, site)?;
    }

    println!(
        "Wrote {} sessions and {} sites to {}",
        SESSIONS.len(),
        SITES.len(),
        root.display()
    );
    Ok(())
}
