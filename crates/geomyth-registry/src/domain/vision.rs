//! Vision layer URL composition
//!
//! Builds external-provider URL strings per requested data layer. Nothing is
//! fetched here; GEBCO serves bathymetry directly and the remaining layers
//! point at the cortex service.

use serde::{Deserialize, Serialize};

use geomyth_common::GeoPoint;

const GEBCO_WMS_BASE: &str =
    "https://www.gebco.net/data_and_products/gebco_web_services/web_map_service/";

/// Constructed per-layer URLs for one vision request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionLinks {
    pub gebco_bathymetry_url: Option<String>,
    pub satellite_imagery_url: Option<String>,
    pub topography_url: Option<String>,
    pub preview_url: Option<String>,
}

/// Compose provider URLs for the requested layers
pub fn build_links(point: &GeoPoint, radius_km: f64, layers: &[String], cortex_url: &str) -> VisionLinks {
    let mut links = VisionLinks::default();

    for layer in layers {
        match layer.as_str() {
            "bathymetry" => {
                links.gebco_bathymetry_url = Some(format!(
                    "{GEBCO_WMS_BASE}?service=WMS&version=1.3.0&request=GetMap\
                     &layers=GEBCO_LATEST\
                     &bbox={},{},{},{}\
                     &width=1024&height=1024&crs=EPSG:4326&format=image/png",
                    point.longitude - 0.5,
                    point.latitude - 0.5,
                    point.longitude + 0.5,
                    point.latitude + 0.5,
                ));
            }
            "satellite" => {
                links.satellite_imagery_url = Some(format!(
                    "{cortex_url}/satellite?lat={}&lon={}&radius={radius_km}",
                    point.latitude, point.longitude,
                ));
            }
            "topography" => {
                links.topography_url = Some(format!(
                    "{cortex_url}/topography?lat={}&lon={}&radius={radius_km}",
                    point.latitude, point.longitude,
                ));
            }
            _ => {}
        }
    }

    // bathymetry doubles as the preview
    links.preview_url = links.gebco_bathymetry_url.clone();
    links
}
