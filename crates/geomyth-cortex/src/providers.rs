//! Mocked imagery, topography, and overlay providers
//!
//! Every response here is constructed metadata: provider-shaped URLs built
//! from the request plus generated identifiers. Real provider integrations
//! sit behind the same response shapes.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use geomyth_common::BoundingBox;

use crate::config::CortexConfig;

/// Available satellite imagery sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImagerySource {
    Landsat8,
    Sentinel2,
    Auto,
}

/// Available digital elevation model sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemSource {
    Srtm,
    Aster,
    Gebco,
    Auto,
}

#[derive(Debug, Deserialize)]
pub struct ImageryRequest {
    pub bbox: BoundingBox,
    #[serde(default = "default_imagery_resolution")]
    pub resolution: String,
    #[serde(default = "default_bands")]
    pub bands: Vec<String>,
    #[serde(default = "default_cloud_cover_max")]
    pub cloud_cover_max: f64,
    #[serde(default = "default_imagery_source")]
    pub source: ImagerySource,
}

fn default_imagery_resolution() -> String {
    "10m".to_string()
}

fn default_bands() -> Vec<String> {
    vec!["RGB".to_string()]
}

fn default_cloud_cover_max() -> f64 {
    0.2
}

fn default_imagery_source() -> ImagerySource {
    ImagerySource::Auto
}

#[derive(Debug, Serialize)]
pub struct ImageryResponse {
    pub imagery_id: Uuid,
    pub source: ImagerySource,
    pub acquisition_date: DateTime<Utc>,
    pub resolution: String,
    pub bands: Vec<String>,
    pub url: String,
    pub thumbnail_url: String,
    pub cloud_cover: f64,
    pub bbox: BoundingBox,
    pub metadata: serde_json::Value,
}

/// Build the mocked imagery response for a validated request
pub fn imagery(config: &CortexConfig, req: &ImageryRequest) -> ImageryResponse {
    let imagery_id = Uuid::new_v4();
    let source = match req.source {
        ImagerySource::Auto => ImagerySource::Sentinel2,
        other => other,
    };

    ImageryResponse {
        imagery_id,
        source,
        acquisition_date: Utc::now(),
        resolution: req.resolution.clone(),
        bands: req.bands.clone(),
        url: format!("{}/imagery/{imagery_id}.tiff", config.data_base_url),
        thumbnail_url: format!("{}/imagery/{imagery_id}_thumb.jpg", config.cdn_base_url),
        cloud_cover: 0.05,
        bbox: req.bbox,
        metadata: serde_json::json!({
            "projection": "EPSG:4326",
            "note": "MOCK DATA - production connects to real satellite APIs",
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct TopographyRequest {
    pub bbox: BoundingBox,
    #[serde(default = "default_dem_source")]
    pub dem_source: DemSource,
    #[serde(default = "default_topography_resolution")]
    pub resolution: String,
    #[serde(default)]
    pub include_bathymetry: bool,
}

fn default_dem_source() -> DemSource {
    DemSource::Auto
}

fn default_topography_resolution() -> String {
    "30m".to_string()
}

#[derive(Debug, Serialize)]
pub struct TopographyResponse {
    pub terrain_id: Uuid,
    pub source: DemSource,
    pub resolution: String,
    pub elevation_range: serde_json::Value,
    pub url: String,
    pub bathymetry_url: Option<String>,
    pub bbox: BoundingBox,
    pub visualization_url: String,
}

/// Build the mocked topography response for a validated request
pub fn topography(config: &CortexConfig, req: &TopographyRequest) -> TopographyResponse {
    let terrain_id = Uuid::new_v4();
    let source = match req.dem_source {
        DemSource::Auto => DemSource::Srtm,
        other => other,
    };

    TopographyResponse {
        terrain_id,
        source,
        resolution: req.resolution.clone(),
        elevation_range: serde_json::json!({ "min": -200.0, "max": 4500.0 }),
        url: format!("{}/topography/{terrain_id}.tiff", config.data_base_url),
        bathymetry_url: req.include_bathymetry.then(|| {
            format!("{}/bathymetry/{terrain_id}_gebco.tiff", config.data_base_url)
        }),
        bbox: req.bbox,
        visualization_url: format!(
            "{}/topography/{terrain_id}_hillshade.jpg",
            config.cdn_base_url
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct ConstellationOverlayRequest {
    pub base_imagery_id: String,
    pub constellation: String,
    pub observation_date: String,
    pub observation_location: serde_json::Value,
    #[serde(default = "default_alignment_algorithm")]
    pub alignment_algorithm: String,
}

fn default_alignment_algorithm() -> String {
    "auto_align".to_string()
}

#[derive(Debug, Serialize)]
pub struct ConstellationOverlayResponse {
    pub overlay_id: Uuid,
    pub constellation: String,
    /// Mocked correlation strength in [0.65, 0.95]
    pub alignment_score: f64,
    pub overlaid_image_url: String,
    pub metadata: serde_json::Value,
}

/// Build the mocked constellation overlay response
pub fn constellation_overlay(req: &ConstellationOverlayRequest) -> ConstellationOverlayResponse {
    let overlay_id = Uuid::new_v4();
    let alignment_score =
        (rand::thread_rng().gen_range(0.65f64..=0.95) * 100.0).round() / 100.0;

    ConstellationOverlayResponse {
        overlay_id,
        constellation: req.constellation.clone(),
        alignment_score,
        overlaid_image_url: format!("ipfs://Qm{}", overlay_id.simple()),
        metadata: serde_json::json!({
            "alignment_algorithm": req.alignment_algorithm,
            "observation_date": req.observation_date,
            "observation_location": req.observation_location,
            "base_imagery_id": req.base_imagery_id,
            "note": "MOCK DATA - production computes real star positions and correlations",
        }),
    }
}
