//! The persisted preference records and the injected start-page
//! configuration. Every record here maps 1:1 onto a storage key in [`keys`];
//! mutation happens only through the owning module in [`crate::registry`].

use std::fmt;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::util::uuid_5;

/// Storage keys. These names and the shapes of the records stored under them
/// are a durable contract: changing either requires a migration.
pub mod keys {
    pub const THEME: &str = "theme";
    pub const BACKGROUND_MODE: &str = "background-mode";
    pub const BACKGROUND_CHOICE: &str = "background-choice";
    pub const SEARCH_ENGINE: &str = "search-engine";
    pub const WEATHER_CREDENTIAL: &str = "weather-credential";
    pub const PINS: &str = "pins";
    pub const NOTES: &str = "notes";
    pub const NOTES_POSITION: &str = "notes-window-position";
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Directory name within the backgrounds path.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq,
)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Auto,
    Manual,
}

/// A manually pinned background. Only meaningful while the stored mode is
/// [`BackgroundMode::Manual`]; ignored whenever `theme` no longer matches the
/// active theme.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct BackgroundChoice {
    pub theme: Theme,
    pub image_name: String,
}

/// URL prefix that forms a well-formed search URL once a urlencoded query is
/// appended.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SearchEngine(pub String);

impl SearchEngine {
    pub fn search_url(&self, query: &str) -> String {
        let encoded: String =
            url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}{}", self.0, encoded)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self("https://www.google.com/search?q=".to_string())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Pin {
    /// Stable identity for this entry. Lists persisted before ids existed
    /// round-trip fine; missing ids are regenerated on read and stick after
    /// the next write.
    #[serde(default = "uuid_5")]
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Pin {
    pub fn new(title: &str, url: &str, icon: Option<&str>) -> Self {
        Self {
            id: uuid_5(),
            title: title.to_string(),
            url: url.to_string(),
            icon: icon.map(str::to_string),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Note {
    #[serde(default = "uuid_5")]
    pub id: String,
    pub text: String,
    pub done: bool,
}

impl Note {
    pub fn new(text: &str) -> Self {
        Self {
            id: uuid_5(),
            text: text.to_string(),
            done: false,
        }
    }
}

/// Top-left corner of the notes widget, clamped to the viewport at drag time
/// (not at load time; a stored off-screen position is re-clamped on the next
/// drag, never rewritten on read).
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct WindowPosition {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Latitude/longitude pair handed to the weather lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Everything the core needs that is not user state: static catalogs,
/// defaults and tuning knobs. Constructed once and passed by reference into
/// each component; nothing here lives in a global.
#[derive(Clone, Debug)]
pub struct StartPageConfig {
    /// Base path prepended to `<theme>/<image_name>` when building a
    /// background URL.
    pub backgrounds_path: String,
    /// Per-theme ordered catalog of image identifiers. Static; not
    /// user-editable.
    pub catalog: IndexMap<Theme, Vec<String>>,
    pub default_search: SearchEngine,
    /// Seeded into the store on first run only (see
    /// [`crate::registry::pins::seed_if_absent`]).
    pub default_pins: Vec<(&'static str, &'static str)>,
    pub notes_widget: Size,
    /// Used by the terminal front-end, which has no real viewport to measure.
    pub fallback_viewport: Viewport,
    pub weather_endpoint: String,
    /// Where the weather points when geolocation does not resolve in time.
    pub weather_fallback: Coordinate,
    pub geolocation_timeout: Duration,
}

impl Default for StartPageConfig {
    fn default() -> Self {
        let dark = [
            "1.png", "10.jpg", "11.png", "12.png", "13.png", "2.jpg", "3.png",
            "4.jpg", "5.jpg", "6.jpg", "7.jpg", "8.png", "9.jpg",
        ];
        let light = [
            "1.jpg", "10.png", "11.jpg", "12.png", "13.jpg", "2.png", "3.jpg",
            "4.png", "5.png", "6.png", "7.jpg", "8.png", "9.png",
        ];

        let mut catalog = IndexMap::new();
        catalog.insert(
            Theme::Dark,
            dark.iter().map(|s| s.to_string()).collect(),
        );
        catalog.insert(
            Theme::Light,
            light.iter().map(|s| s.to_string()).collect(),
        );

        Self {
            backgrounds_path: "./backgrounds".to_string(),
            catalog,
            default_search: SearchEngine::default(),
            default_pins: vec![
                ("YouTube", "https://www.youtube.com"),
                ("GitHub", "https://github.com"),
                ("Reddit", "https://reddit.com"),
            ],
            notes_widget: Size {
                width: 260.0,
                height: 320.0,
            },
            fallback_viewport: Viewport {
                width: 1280.0,
                height: 800.0,
            },
            weather_endpoint: "https://api.weatherapi.com/v1/current.json"
                .to_string(),
            weather_fallback: Coordinate {
                lat: 28.7041,
                lon: 77.1025,
            },
            geolocation_timeout: Duration::from_secs(5),
        }
    }
}
