//! Static dataset catalog
//!
//! A browseable library of the visual resources the mocked providers claim
//! to serve. Filtering is a linear predicate pass plus truncation.

use serde::{Deserialize, Serialize};

/// One catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub dataset_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub region: String,
    pub resolution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal_coverage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The built-in catalog
pub fn datasets() -> Vec<Dataset> {
    vec![
        Dataset {
            dataset_id: "landsat8_pacific_2024".to_string(),
            kind: "imagery".to_string(),
            region: "Pacific Ring of Fire".to_string(),
            resolution: "30m".to_string(),
            temporal_coverage: Some("2024-01-01 to 2024-12-31".to_string()),
            coverage: None,
            cloud_free: Some(true),
            note: None,
        },
        Dataset {
            dataset_id: "srtm_global_v3".to_string(),
            kind: "topography".to_string(),
            region: "Global".to_string(),
            resolution: "30m".to_string(),
            temporal_coverage: None,
            coverage: Some("60N to 60S".to_string()),
            cloud_free: None,
            note: None,
        },
        Dataset {
            dataset_id: "gebco_2023".to_string(),
            kind: "bathymetry".to_string(),
            region: "Global Oceans".to_string(),
            resolution: "15 arc-seconds".to_string(),
            temporal_coverage: None,
            coverage: None,
            cloud_free: None,
            note: Some("Seafloor topography for overlay analysis".to_string()),
        },
    ]
}

/// Filter the catalog by type and region substring, then truncate
pub fn filter(
    dataset_type: Option<&str>,
    region: Option<&str>,
    limit: usize,
) -> Vec<Dataset> {
    datasets()
        .into_iter()
        .filter(|d| dataset_type.map_or(true, |t| d.kind == t))
        .filter(|d| {
            region.map_or(true, |r| {
                d.region.to_lowercase().contains(&r.to_lowercase())
            })
        })
        .take(limit)
        .collect()
}
