//! Third-party weather lookup, run off the event loop on a worker thread.
//!
//! The credential is read once by the caller before the fetch starts, so
//! nothing mutated elsewhere mid-flight can leak into an in-flight request.
//! Overlapping fetches are superseded: each fetch gets a monotonically
//! increasing generation, and the app loop drops any resolution whose
//! generation is older than the latest one requested.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::prefs::{Coordinate, StartPageConfig};
use crate::runtime::app::{AppEvent, AppEventSender};
use crate::runtime::view::WeatherView;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Geolocation capability. Implementations must give up after roughly
/// `timeout`; the service then falls back to the configured coordinate.
pub trait LocatePosition: Send + Sync {
    fn locate(&self, timeout: Duration) -> Option<Coordinate>;
}

/// Headless environments have nothing to ask, so this always falls back.
pub struct NoGeolocation;

impl LocatePosition for NoGeolocation {
    fn locate(&self, _timeout: Duration) -> Option<Coordinate> {
        None
    }
}

#[derive(Debug, Error)]
enum WeatherError {
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

pub struct WeatherService {
    generation: Arc<AtomicU64>,
    locator: Arc<dyn LocatePosition>,
}

impl WeatherService {
    pub fn new(locator: Arc<dyn LocatePosition>) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            locator,
        }
    }

    /// Kicks off a fetch on a worker thread and returns its generation. The
    /// result arrives back on the event loop as
    /// [`AppEvent::WeatherResolved`]; failures become
    /// [`WeatherView::Error`], never an `Err` to the caller.
    pub fn spawn_fetch(
        &self,
        credential: String,
        config: &StartPageConfig,
        app_tx: AppEventSender,
    ) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let locator = self.locator.clone();
        let endpoint = config.weather_endpoint.clone();
        let fallback = config.weather_fallback;
        let timeout = config.geolocation_timeout;

        thread::spawn(move || {
            let coordinate = locator.locate(timeout).unwrap_or(fallback);
            let view = match fetch(&endpoint, &credential, coordinate) {
                Ok(view) => view,
                Err(err) => {
                    warn!("{}", err);
                    WeatherView::Error
                }
            };
            // The loop may already be gone by the time a slow response
            // lands; that is not an error.
            app_tx.try_emit(AppEvent::WeatherResolved { generation, view });
        });

        generation
    }
}

fn fetch(
    endpoint: &str,
    credential: &str,
    coordinate: Coordinate,
) -> Result<WeatherView, WeatherError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let response = client
        .get(endpoint)
        .query(&[
            ("key", credential.to_string()),
            ("q", format!("{},{}", coordinate.lat, coordinate.lon)),
            ("aqi", "no".to_string()),
        ])
        .send()?
        .error_for_status()?;

    let data: ApiResponse = response.json()?;
    Ok(WeatherView::Report {
        temp_c: data.current.temp_c.round() as i32,
        condition: data.current.condition.text,
        icon: normalize_icon(&data.current.condition.icon),
    })
}

/// The provider returns protocol-relative icon URLs (`//cdn...`).
fn normalize_icon(icon: &str) -> String {
    if icon.starts_with("//") {
        format!("https:{}", icon)
    } else {
        icon.to_string()
    }
}
