//! Boundary Map Module
//! Loads GeoJSON state boundaries for the choropleth map.

use super::options::SpecialArea;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Failed to read boundary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Boundary file contains no named polygons")]
    Empty,
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Deserialize, Default)]
struct Properties {
    name: Option<String>,
}

/// Positions may carry altitude; only the first two values are used.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

/// One named region, as a list of closed rings in (lng, lat).
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub rings: Vec<Vec<[f64; 2]>>,
}

impl Region {
    /// (min_x, min_y, max_x, max_y); `None` for a region without points.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        bounds_of(self.rings.iter().flatten())
    }

    /// Move and scale the region so its bounding box starts at
    /// (`left`, `top`) with the given width, keeping its aspect ratio.
    pub fn relocate(&mut self, area: SpecialArea) {
        let Some([min_x, _, max_x, max_y]) = self.bounds() else {
            return;
        };
        let width = max_x - min_x;
        if width <= 0.0 {
            return;
        }
        let scale = area.width / width;
        for point in self.rings.iter_mut().flatten() {
            point[0] = area.left + (point[0] - min_x) * scale;
            point[1] = area.top - (max_y - point[1]) * scale;
        }
    }
}

fn bounds_of<'a>(points: impl Iterator<Item = &'a [f64; 2]>) -> Option<[f64; 4]> {
    points.fold(None, |acc, p| {
        Some(match acc {
            None => [p[0], p[1], p[0], p[1]],
            Some([a, b, c, d]) => [a.min(p[0]), b.min(p[1]), c.max(p[0]), d.max(p[1])],
        })
    })
}

fn ring(positions: Vec<Vec<f64>>) -> Vec<[f64; 2]> {
    positions
        .into_iter()
        .filter(|p| p.len() >= 2)
        .map(|p| [p[0], p[1]])
        .collect()
}

/// All regions of a boundary map.
#[derive(Debug, Clone, Default)]
pub struct BoundaryMap {
    pub regions: Vec<Region>,
}

impl BoundaryMap {
    /// Read a GeoJSON FeatureCollection from disk.
    pub fn load(path: &Path, special_areas: &[(&str, SpecialArea)]) -> Result<Self, GeoError> {
        let text = std::fs::read_to_string(path).map_err(|source| GeoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = Self::from_geojson(&text, special_areas)?;
        tracing::info!(path = %path.display(), regions = map.regions.len(), "boundary map loaded");
        Ok(map)
    }

    /// Parse a GeoJSON FeatureCollection. Only polygon features with a
    /// `name` property are kept.
    pub fn from_geojson(text: &str, special_areas: &[(&str, SpecialArea)]) -> Result<Self, GeoError> {
        let collection: FeatureCollection = serde_json::from_str(text)?;

        let mut regions = Vec::new();
        for feature in collection.features {
            let (Some(name), Some(geometry)) = (feature.properties.name, feature.geometry) else {
                continue;
            };
            let rings: Vec<Vec<[f64; 2]>> = match geometry {
                Geometry::Polygon { coordinates } => coordinates.into_iter().map(ring).collect(),
                Geometry::MultiPolygon { coordinates } => {
                    coordinates.into_iter().flatten().map(ring).collect()
                }
                Geometry::Unsupported => continue,
            };
            let mut region = Region { name, rings };
            if let Some((_, area)) = special_areas.iter().find(|(n, _)| *n == region.name) {
                region.relocate(*area);
            }
            regions.push(region);
        }

        if regions.is_empty() {
            return Err(GeoError::Empty);
        }
        Ok(Self { regions })
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }
}
