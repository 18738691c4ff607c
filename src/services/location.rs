//! Device location lookup
//!
//! The position comes from the config file when set there, otherwise from an
//! optional HTTP endpoint. The lookup never takes longer than
//! [`LOCATION_TIMEOUT`]; on any failure the map keeps its default centre.

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use kelitui::config::Config;
use kelitui::logic::map::GeoPoint;

pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct LocationDto {
    latitude: f64,
    longitude: f64,
}

fn validate(dto: LocationDto) -> Option<GeoPoint> {
    let valid = dto.latitude.is_finite()
        && dto.longitude.is_finite()
        && (-90.0..=90.0).contains(&dto.latitude)
        && (-180.0..=180.0).contains(&dto.longitude);
    valid.then(|| GeoPoint::new(dto.latitude, dto.longitude))
}

async fn fetch_location(url: &str) -> anyhow::Result<Option<GeoPoint>> {
    let client = reqwest::Client::builder().timeout(LOCATION_TIMEOUT).build()?;
    let dto: LocationDto = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(validate(dto))
}

/// Resolve the device position
pub async fn locate(configured: Option<GeoPoint>, url: Option<String>) -> Option<GeoPoint> {
    if let Some(point) = configured {
        tracing::debug!("Using configured location {:?}", point);
        return Some(point);
    }
    let url = url?;

    match timeout(LOCATION_TIMEOUT, fetch_location(&url)).await {
        Ok(Ok(Some(point))) => {
            tracing::debug!("Location from {}: {:?}", url, point);
            Some(point)
        }
        Ok(Ok(None)) => {
            tracing::warn!("Location endpoint {} returned an invalid position", url);
            None
        }
        Ok(Err(e)) => {
            tracing::warn!("Location lookup failed: {}", e);
            None
        }
        Err(_) => {
            tracing::warn!("Location lookup timed out after {:?}", LOCATION_TIMEOUT);
            None
        }
    }
}

/// Spawn the lookup; the result arrives once on the returned channel
pub fn spawn_location_lookup(config: &Config) -> mpsc::UnboundedReceiver<Option<GeoPoint>> {
    let (tx, rx) = mpsc::unbounded_channel();
    let configured = config.location.map(GeoPoint::from);
    let url = config.location_url.clone();

    tokio::spawn(async move {
        let position = locate(configured, url).await;
        let _ = tx.send(position);
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(validate(LocationDto {
            latitude: 95.0,
            longitude: 10.0
        })
        .is_none());
        assert!(validate(LocationDto {
            latitude: f64::NAN,
            longitude: 10.0
        })
        .is_none());
        assert_eq!(
            validate(LocationDto {
                latitude: 65.0,
                longitude: 25.5
            }),
            Some(GeoPoint::new(65.0, 25.5))
        );
    }

    #[tokio::test]
    async fn test_configured_location_wins() {
        let here = GeoPoint::new(60.17, 24.94);
        assert_eq!(locate(Some(here), Some("http://unused".into())).await, Some(here));
    }

    #[tokio::test]
    async fn test_no_source_means_no_location() {
        assert_eq!(locate(None, None).await, None);
    }
}
