use std::collections::{HashSet, VecDeque};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use kelitui::api::{ApiError, InterestingStation, KeliClient, Station, StationDetail};
use kelitui::query::Ticket;

/// Priority level for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,   // User-initiated actions (opening a station, reporting)
    Medium, // Data the current screen is waiting for
    Low,    // Thumbnails, background refreshes
}

/// Unique identifier for tracking in-flight requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum RequestKey {
    Stations(u64),
    Detail { station_id: String, ticket: u64 },
    Interesting(u64),
    Report { station_id: String, seq: u64 },
    Image { camera_id: String, thumbnail: bool, generation: u64 },
}

/// API request types
#[derive(Debug, Clone)]
pub enum ApiRequest {
    /// Fetch the station list
    GetStations { ticket: Ticket },

    /// Fetch cameras and metadata for one station
    GetStationDetail { station_id: String, ticket: Ticket },

    /// Fetch the stations flagged by user reports
    GetInteresting { ticket: Ticket },

    /// Report a station as interesting (always high priority)
    ReportInteresting { station_id: String },

    /// Fetch camera image bytes
    GetCameraImage {
        station_id: String,
        generation: u64,
        camera_id: String,
        thumbnail: bool,
        priority: Priority,
    },
}

impl ApiRequest {
    /// Extract priority from request
    fn priority(&self) -> Priority {
        match self {
            ApiRequest::GetCameraImage { priority, .. } => *priority,
            ApiRequest::GetStations { .. } | ApiRequest::GetInteresting { .. } => Priority::Medium,
            ApiRequest::GetStationDetail { .. } | ApiRequest::ReportInteresting { .. } => {
                Priority::High
            }
        }
    }

    /// Generate a unique key for in-flight tracking
    fn key(&self, seq: u64) -> RequestKey {
        match self {
            ApiRequest::GetStations { ticket } => RequestKey::Stations(ticket.0),
            ApiRequest::GetStationDetail { station_id, ticket } => RequestKey::Detail {
                station_id: station_id.clone(),
                ticket: ticket.0,
            },
            ApiRequest::GetInteresting { ticket } => RequestKey::Interesting(ticket.0),
            // Write operations are never merged
            ApiRequest::ReportInteresting { station_id } => RequestKey::Report {
                station_id: station_id.clone(),
                seq,
            },
            ApiRequest::GetCameraImage {
                camera_id,
                thumbnail,
                generation,
                ..
            } => RequestKey::Image {
                camera_id: camera_id.clone(),
                thumbnail: *thumbnail,
                generation: *generation,
            },
        }
    }
}

/// API response types
#[derive(Debug)]
pub enum ApiResponse {
    StationsResult {
        ticket: Ticket,
        stations: Result<Vec<Station>, ApiError>,
    },

    StationDetailResult {
        station_id: String,
        ticket: Ticket,
        detail: Result<StationDetail, ApiError>,
    },

    InterestingResult {
        ticket: Ticket,
        stations: Result<Vec<InterestingStation>, ApiError>,
    },

    ReportResult {
        station_id: String,
        result: Result<(), ApiError>,
    },

    CameraImageResult {
        station_id: String,
        generation: u64,
        camera_id: String,
        thumbnail: bool,
        bytes: Result<Vec<u8>, ApiError>,
    },
}

/// Internal message for tracking completed requests
pub(crate) enum InternalMessage {
    Completed(RequestKey),
}

/// API service worker that processes requests in the background
pub struct ApiService {
    client: KeliClient,
    request_queue: VecDeque<(ApiRequest, Priority)>,
    in_flight: HashSet<RequestKey>,
    response_tx: mpsc::UnboundedSender<ApiResponse>,
    completion_tx: mpsc::UnboundedSender<InternalMessage>,
    max_concurrent: usize,
    seq: u64,
}

impl ApiService {
    pub(crate) fn new(
        client: KeliClient,
        response_tx: mpsc::UnboundedSender<ApiResponse>,
        completion_tx: mpsc::UnboundedSender<InternalMessage>,
    ) -> Self {
        Self {
            client,
            request_queue: VecDeque::new(),
            in_flight: HashSet::new(),
            response_tx,
            completion_tx,
            max_concurrent: 6, // Limit concurrent API calls
            seq: 0,
        }
    }

    /// Add a request to the queue
    fn enqueue(&mut self, request: ApiRequest) {
        let priority = request.priority();

        // Insert based on priority (high priority at front)
        let insert_pos = self
            .request_queue
            .iter()
            .position(|(_, p)| *p > priority)
            .unwrap_or(self.request_queue.len());

        self.request_queue.insert(insert_pos, (request, priority));
    }

    /// Process the next request from the queue
    fn process_next(&mut self) {
        if self.in_flight.len() >= self.max_concurrent {
            return; // At capacity, wait for some to complete
        }

        let Some((request, _)) = self.request_queue.pop_front() else {
            return; // Queue is empty
        };

        self.seq += 1;
        let key = request.key(self.seq);
        self.in_flight.insert(key.clone());

        // Clone what we need for the async task
        let client = self.client.clone();
        let response_tx = self.response_tx.clone();
        let completion_tx = self.completion_tx.clone();

        // No per-request retries: the user retries by reopening or refreshing
        tokio::spawn(async move {
            let response = Self::execute_request(&client, request).await;
            let _ = response_tx.send(response);

            // Notify service that this request is complete
            let _ = completion_tx.send(InternalMessage::Completed(key));
        });
    }

    /// Execute an API request and return the response
    async fn execute_request(client: &KeliClient, request: ApiRequest) -> ApiResponse {
        match request {
            ApiRequest::GetStations { ticket } => {
                let stations = client.get_stations().await;
                ApiResponse::StationsResult { ticket, stations }
            }

            ApiRequest::GetStationDetail { station_id, ticket } => {
                tracing::debug!("Fetching detail for station {}", station_id);
                let detail = client.get_station_detail(&station_id).await;
                ApiResponse::StationDetailResult {
                    station_id,
                    ticket,
                    detail,
                }
            }

            ApiRequest::GetInteresting { ticket } => {
                let stations = client.get_interesting_stations().await;
                ApiResponse::InterestingResult { ticket, stations }
            }

            ApiRequest::ReportInteresting { station_id } => {
                tracing::info!("Reporting station {} as interesting", station_id);
                let result = client.report_interesting(&station_id).await;
                ApiResponse::ReportResult { station_id, result }
            }

            ApiRequest::GetCameraImage {
                station_id,
                generation,
                camera_id,
                thumbnail,
                ..
            } => {
                let bytes = client.get_camera_image(&camera_id, thumbnail).await;
                ApiResponse::CameraImageResult {
                    station_id,
                    generation,
                    camera_id,
                    thumbnail,
                    bytes,
                }
            }
        }
    }
}

/// Spawn the API service worker
pub fn spawn_api_service(
    client: KeliClient,
) -> (
    mpsc::UnboundedSender<ApiRequest>,
    mpsc::UnboundedReceiver<ApiResponse>,
) {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ApiRequest>();
    let (response_tx, response_rx) = mpsc::unbounded_channel::<ApiResponse>();
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<InternalMessage>();

    tokio::spawn(async move {
        let mut service = ApiService::new(client, response_tx, completion_tx);

        // Ticker for processing queue
        let mut tick = interval(Duration::from_millis(10));

        loop {
            tokio::select! {
                request = request_rx.recv() => {
                    match request {
                        Some(request) => service.enqueue(request),
                        // UI side is gone
                        None => break,
                    }
                }

                Some(InternalMessage::Completed(key)) = completion_rx.recv() => {
                    service.in_flight.remove(&key);
                }

                _ = tick.tick() => {
                    // Process multiple requests per tick if queue has items
                    for _ in 0..5 {
                        if service.request_queue.is_empty() {
                            break;
                        }
                        service.process_next();
                    }
                }
            }
        }
        tracing::debug!("API service stopped");
    });

    (request_tx, response_rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ApiService {
        let client = KeliClient::new("http://localhost:1".to_string(), Duration::from_secs(1))
            .expect("client");
        let (response_tx, _response_rx) = mpsc::unbounded_channel();
        let (completion_tx, _completion_rx) = mpsc::unbounded_channel();
        ApiService::new(client, response_tx, completion_tx)
    }

    fn image(camera_id: &str, priority: Priority) -> ApiRequest {
        ApiRequest::GetCameraImage {
            station_id: "S".into(),
            generation: 1,
            camera_id: camera_id.into(),
            thumbnail: true,
            priority,
        }
    }

    #[test]
    fn test_priority_order_is_kept() {
        let mut svc = service();
        svc.enqueue(image("low", Priority::Low));
        svc.enqueue(ApiRequest::GetStations { ticket: Ticket(1) });
        svc.enqueue(ApiRequest::ReportInteresting {
            station_id: "S".into(),
        });
        svc.enqueue(image("low2", Priority::Low));

        let order: Vec<Priority> = svc.request_queue.iter().map(|(_, p)| *p).collect();
        assert_eq!(
            order,
            vec![Priority::High, Priority::Medium, Priority::Low, Priority::Low]
        );
        // FIFO within a priority
        assert!(matches!(
            &svc.request_queue[2].0,
            ApiRequest::GetCameraImage { camera_id, .. } if camera_id == "low"
        ));
    }

    #[test]
    fn test_report_keys_never_collide() {
        let report = ApiRequest::ReportInteresting {
            station_id: "S".into(),
        };
        assert_ne!(report.key(1), report.key(2));
    }
}
