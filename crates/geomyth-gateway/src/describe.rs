//! Static-map description
//!
//! The one path in the gateway that performs real outbound calls: fetch a
//! static map image for a bounding box and forward it to an external
//! captioning endpoint. Every failure is folded into a descriptive error
//! payload rather than a server fault.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use geomyth_common::BoundingBox;

use crate::config::GatewayConfig;

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    description: String,
}

/// Describe the mapped region, returning `{description}` or `{error}`
pub async fn describe(
    client: &reqwest::Client,
    config: &GatewayConfig,
    bbox: &BoundingBox,
) -> serde_json::Value {
    match describe_inner(client, config, bbox).await {
        Ok(description) => json!({ "description": description }),
        Err(err) => {
            warn!("vision describe failed: {err:#}");
            json!({ "error": format!("Failed to describe map region: {err:#}") })
        }
    }
}

async fn describe_inner(
    client: &reqwest::Client,
    config: &GatewayConfig,
    bbox: &BoundingBox,
) -> Result<String> {
    bbox.validate()?;

    let key = config
        .map_api_key
        .as_deref()
        .context("no map provider API key configured")?;
    let caption_endpoint = config
        .caption_endpoint
        .as_deref()
        .context("no caption endpoint configured")?;

    let map_url = map_url(&config.map_provider_base, bbox, key);
    let image = client
        .get(&map_url)
        .send()
        .await
        .context("map image fetch failed")?
        .error_for_status()
        .context("map provider returned an error status")?
        .bytes()
        .await
        .context("map image body read failed")?;

    let caption: CaptionResponse = client
        .post(caption_endpoint)
        .header("content-type", "image/png")
        .body(image)
        .send()
        .await
        .context("caption request failed")?
        .error_for_status()
        .context("caption service returned an error status")?
        .json()
        .await
        .context("caption response decode failed")?;

    Ok(caption.description)
}

fn map_url(base: &str, bbox: &BoundingBox, key: &str) -> String {
    format!(
        "{base}/{},{},{},{}/512x512.png?key={key}",
        bbox.west, bbox.south, bbox.east, bbox.north,
    )
}
