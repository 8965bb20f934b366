//! Pre-rendered lunar disc textures and nearest-entry lookup.

use super::CharGrid;
use crate::error::{MoonError, Result};
use crate::model::Libration;
use once_cell::sync::Lazy;
use serde::Deserialize;

/// Kilometre weight in the nearest-texture metric.
pub const DISTANCE_WEIGHT: f64 = 1.0;
/// Libration-degree weight; libration spans about ±8° against ~50,000 km of
/// distance, so each degree counts as ten thousand kilometres.
pub const LIBRATION_WEIGHT: f64 = 10_000.0;

const EMBEDDED_JSON: &str = include_str!("../../assets/moon_textures.json");

static EMBEDDED: Lazy<TextureCatalog> = Lazy::new(|| {
    TextureCatalog::from_json(EMBEDDED_JSON).expect("bundled texture catalog must parse")
});

#[derive(Deserialize)]
struct CatalogFile {
    moons: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    index: u32,
    distance_km: f64,
    libration_elat: f64,
    libration_elon: f64,
    ascii: String,
}

#[derive(Clone, Debug)]
pub struct TextureCatalogEntry {
    pub index: u32,
    pub distance_km: f64,
    pub libration: Libration,
    raster: CharGrid,
}

impl TextureCatalogEntry {
    pub fn new(index: u32, distance_km: f64, libration: Libration, ascii: &str) -> Self {
        Self {
            index,
            distance_km,
            libration,
            raster: CharGrid::from_text(ascii),
        }
    }

    pub fn raster(&self) -> &CharGrid {
        &self.raster
    }

    fn score(&self, distance_km: f64, libration: Libration) -> f64 {
        (self.distance_km - distance_km).abs() * DISTANCE_WEIGHT
            + (self.libration.elat_deg - libration.elat_deg).abs() * LIBRATION_WEIGHT
            + (self.libration.elon_deg - libration.elon_deg).abs() * LIBRATION_WEIGHT
    }
}

/// Immutable, never-empty set of textures.
#[derive(Clone, Debug)]
pub struct TextureCatalog {
    entries: Vec<TextureCatalogEntry>,
}

impl TextureCatalog {
    pub fn new(entries: Vec<TextureCatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(MoonError::EmptyCatalog);
        }
        Ok(Self { entries })
    }

    /// Parses the `{"moons": [...]}` catalog format.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let entries = file
            .moons
            .into_iter()
            .map(|m| {
                TextureCatalogEntry::new(
                    m.index,
                    m.distance_km,
                    Libration {
                        elon_deg: m.libration_elon,
                        elat_deg: m.libration_elat,
                    },
                    &m.ascii,
                )
            })
            .collect();
        Self::new(entries)
    }

    pub fn embedded() -> &'static TextureCatalog {
        &EMBEDDED
    }

    pub fn entries(&self) -> &[TextureCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry minimising the weighted distance/libration metric. The first
    /// entry in catalog order wins ties.
    pub fn nearest(&self, distance_km: f64, libration: Libration) -> &TextureCatalogEntry {
        let mut best = &self.entries[0];
        let mut best_score = best.score(distance_km, libration);
        for entry in &self.entries[1..] {
            let score = entry.score(distance_km, libration);
            if score < best_score {
                best = entry;
                best_score = score;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib(elat_deg: f64, elon_deg: f64) -> Libration {
        Libration { elon_deg, elat_deg }
    }

    fn catalog() -> TextureCatalog {
        TextureCatalog::new(vec![
            TextureCatalogEntry::new(1, 360_000.0, lib(0.0, 0.0), "#"),
            TextureCatalogEntry::new(2, 380_000.0, lib(0.0, 0.0), "#"),
            TextureCatalogEntry::new(3, 380_000.0, lib(5.0, 0.0), "#"),
            TextureCatalogEntry::new(4, 400_000.0, lib(0.0, 0.0), "#"),
        ])
        .unwrap()
    }

    #[test]
    fn nearest_by_distance() {
        let c = catalog();
        assert_eq!(c.nearest(361_000.0, lib(0.0, 0.0)).index, 1);
        assert_eq!(c.nearest(395_000.0, lib(0.0, 0.0)).index, 4);
    }

    #[test]
    fn libration_outweighs_kilometres() {
        // 20,000 km away but libration matches exactly.
        let c = catalog();
        assert_eq!(c.nearest(360_000.0, lib(5.0, 0.0)).index, 3);
    }

    #[test]
    fn ties_resolve_to_first_entry() {
        let c = catalog();
        assert_eq!(c.nearest(370_000.0, lib(0.0, 0.0)).index, 1);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(TextureCatalog::new(Vec::new()), Err(MoonError::EmptyCatalog)));
        assert!(matches!(
            TextureCatalog::from_json(r#"{"moons": []}"#),
            Err(MoonError::EmptyCatalog)
        ));
        assert!(matches!(
            TextureCatalog::from_json("not json"),
            Err(MoonError::CatalogParse(_))
        ));
    }

    #[test]
    fn embedded_catalog_loads() {
        let c = TextureCatalog::embedded();
        assert!(!c.is_empty());
        for entry in c.entries() {
            assert!(entry.raster().non_blank_count() > 0, "entry {}", entry.index);
            assert!(entry.raster().width() <= crate::render::FRAME_WIDTH);
            assert!(entry.raster().height() <= crate::render::FRAME_HEIGHT);
        }
    }
}
