use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Errors raised at the HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("report rejected by server: {0}")]
    Rejected(String),
}

impl ApiError {
    fn malformed(url: &str, reason: impl Into<String>) -> Self {
        ApiError::MalformedResponse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// A road-camera station as shown on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub updated_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Normalized station detail (cameras, status, localized titles)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationDetail {
    pub cameras: Vec<Camera>,
    pub operational: bool,
    pub updated: Option<DateTime<Utc>>,
    pub localized_names: BTreeMap<String, String>,
}

impl StationDetail {
    /// Localized display name for a locale code, if the payload carried one
    pub fn localized_name(&self, locale: &str) -> Option<&str> {
        self.localized_names
            .get(locale)
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestingStation {
    #[serde(deserialize_with = "deserialize_id")]
    pub station_id: String,
    pub count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StationDto {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    name: String,
    coordinates: Vec<f64>,
    #[serde(default)]
    updated_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct StationDetailDto {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    cameras: Vec<Camera>,
    #[serde(default = "default_true")]
    operational: bool,
    #[serde(default)]
    updated: Option<DateTime<Utc>>,
    #[serde(default)]
    names: Option<BTreeMap<String, String>>,
}

/// Older backends answer the detail endpoint with a bare camera array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetailPayload {
    Full(StationDetailDto),
    Cameras(Vec<Camera>),
}

#[derive(Debug, Deserialize)]
struct ReportEnvelope {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Ids arrive as strings from most endpoints but as numbers from some
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(s) => Ok(s),
        RawId::Number(n) => Ok(n.to_string()),
    }
}

/// Helper function to deserialize null as empty vector
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Decode and validate the station list payload
pub fn parse_stations(url: &str, body: &[u8]) -> Result<Vec<Station>, ApiError> {
    let dtos: Vec<StationDto> =
        serde_json::from_slice(body).map_err(|e| ApiError::malformed(url, e.to_string()))?;

    dtos.into_iter()
        .map(|dto| {
            let (longitude, latitude) = match dto.coordinates.as_slice() {
                &[lon, lat] if lon.is_finite() && lat.is_finite() => (lon, lat),
                other => {
                    return Err(ApiError::malformed(
                        url,
                        format!(
                            "station {} has {} coordinates, expected [lon, lat]",
                            dto.id,
                            other.len()
                        ),
                    ))
                }
            };
            if !(-180.0..=180.0).contains(&longitude) || !(-90.0..=90.0).contains(&latitude) {
                return Err(ApiError::malformed(
                    url,
                    format!("station {} has coordinates out of range", dto.id),
                ));
            }
            Ok(Station {
                id: dto.id,
                name: dto.name,
                longitude,
                latitude,
                updated_time: dto.updated_time,
            })
        })
        .collect()
}

/// Decode and normalize a station detail payload
pub fn parse_station_detail(url: &str, body: &[u8]) -> Result<StationDetail, ApiError> {
    let payload: DetailPayload =
        serde_json::from_slice(body).map_err(|e| ApiError::malformed(url, e.to_string()))?;

    let detail = match payload {
        DetailPayload::Full(dto) => StationDetail {
            cameras: dto.cameras,
            operational: dto.operational,
            updated: dto.updated,
            localized_names: dto.names.unwrap_or_default(),
        },
        DetailPayload::Cameras(cameras) => StationDetail {
            cameras,
            operational: true,
            updated: None,
            localized_names: BTreeMap::new(),
        },
    };

    Ok(detail)
}

pub fn parse_interesting(url: &str, body: &[u8]) -> Result<Vec<InterestingStation>, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::malformed(url, e.to_string()))
}

/// Interpret the report envelope; an empty or non-JSON 2xx body counts as success
pub fn parse_report_envelope(body: &[u8]) -> Result<(), ApiError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(());
    }
    match serde_json::from_slice::<ReportEnvelope>(body) {
        Ok(envelope) if !envelope.success => Err(ApiError::Rejected(
            envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "unknown reason".to_string()),
        )),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct KeliClient {
    base_url: String,
    client: Client,
}

impl KeliClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.clone(),
                source,
            })?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform a GET and return the body of a 2xx response
    async fn get_body(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        Ok(body.to_vec())
    }

    pub async fn get_stations(&self) -> Result<Vec<Station>, ApiError> {
        let url = format!("{}/api/stations", self.base_url);
        let body = self.get_body(&url).await?;
        parse_stations(&url, &body)
    }

    pub async fn get_station_detail(&self, station_id: &str) -> Result<StationDetail, ApiError> {
        let url = format!(
            "{}/api/stations/{}",
            self.base_url,
            urlencoding::encode(station_id)
        );
        let body = self.get_body(&url).await?;
        parse_station_detail(&url, &body)
    }

    /// Fetch raw image bytes for a camera (full size or thumbnail)
    pub async fn get_camera_image(&self, camera_id: &str, thumbnail: bool) -> Result<Vec<u8>, ApiError> {
        let mut url = format!(
            "{}/api/cameras/{}",
            self.base_url,
            urlencoding::encode(camera_id)
        );
        if thumbnail {
            url.push_str("?thumbnail=true");
        }
        self.get_body(&url).await
    }

    pub async fn get_interesting_stations(&self) -> Result<Vec<InterestingStation>, ApiError> {
        let url = format!("{}/api/stuffhappens", self.base_url);
        let body = self.get_body(&url).await?;
        parse_interesting(&url, &body)
    }

    /// Report a station as interesting
    pub async fn report_interesting(&self, station_id: &str) -> Result<(), ApiError> {
        let url = format!("{}/api/stuffhappens", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "stationId": station_id }))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        parse_report_envelope(&body)
    }
}
