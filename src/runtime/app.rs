//! Single-threaded, event-driven runtime.
//!
//! All mutations arrive as [`AppEvent`]s on one mpsc channel and run to
//! completion (read list -> validate -> mutate -> persist -> refresh) before
//! the next event is consumed, so registry operations never interleave. The
//! only suspending work is the weather fetch, which runs on a worker thread
//! and reports back through the same channel.

use std::sync::Arc;
use std::sync::mpsc;

use log::{debug, warn};

use crate::core::util;
use crate::prefs::{
    BackgroundMode, SearchEngine, StartPageConfig, Theme, Viewport, keys,
};
use crate::registry::{background, notes, pins};
use crate::runtime::storage::Store;
use crate::runtime::view::{
    RenderSink, ViewSynchronizer, WeatherView, current_theme,
};
use crate::runtime::weather::{LocatePosition, WeatherService};

/// Everything the UI layer (or a worker thread) can ask the core to do.
#[derive(Clone, Debug)]
pub enum AppEvent {
    AddNote(String),
    AddPin {
        title: String,
        url: String,
        icon: Option<String>,
    },
    ClearCompletedNotes,
    DeleteNote(usize),
    DeletePin(usize),
    FetchWeather,
    NotesDragEnd,
    NotesDragMove {
        x: f32,
        y: f32,
    },
    NotesDragStart {
        x: f32,
        y: f32,
    },
    Quit,
    Resize {
        width: f32,
        height: f32,
    },
    /// The settings form writes all of its fields at once.
    SaveSettings {
        search_engine: String,
        theme: Theme,
        weather_key: String,
    },
    Search(String),
    SelectBackground(String),
    SetBackgroundMode(BackgroundMode),
    SetSearchEngine(String),
    SetTheme(Theme),
    SetWeatherCredential(String),
    Tick,
    ToggleNote(usize),
    ToggleTheme,
    UpdatePin {
        index: usize,
        title: String,
        url: String,
        icon: Option<String>,
    },
    /// Posted by the weather worker; dropped when `generation` is stale.
    WeatherResolved {
        generation: u64,
        view: WeatherView,
    },
}

#[derive(Clone)]
pub struct AppEventSender {
    tx: mpsc::Sender<AppEvent>,
}

impl AppEventSender {
    fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }

    pub fn emit(&self, event: AppEvent) {
        self.tx.send(event).expect("Failed to send event");
    }

    /// For long-lived producer threads (clock tick, stdin reader) that should
    /// wind down quietly once the loop is gone.
    pub fn try_emit(&self, event: AppEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

pub type AppEventReceiver = mpsc::Receiver<AppEvent>;

/// Transient drag gesture state; exists only between press and release.
struct DragGesture {
    x: f32,
    y: f32,
}

pub struct AppModel<S: RenderSink> {
    app_rx: AppEventReceiver,
    app_tx: AppEventSender,
    config: StartPageConfig,
    drag: Option<DragGesture>,
    store: Store,
    viewport: Viewport,
    views: ViewSynchronizer<S>,
    weather: WeatherService,
    weather_generation: u64,
}

impl<S: RenderSink> AppModel<S> {
    pub fn new(
        config: StartPageConfig,
        store: Store,
        sink: S,
        locator: Arc<dyn LocatePosition>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let viewport = config.fallback_viewport;

        Self {
            app_rx: rx,
            app_tx: AppEventSender::new(tx),
            config,
            drag: None,
            store,
            viewport,
            views: ViewSynchronizer::new(sink),
            weather: WeatherService::new(locator),
            weather_generation: 0,
        }
    }

    pub fn event_sender(&self) -> AppEventSender {
        self.app_tx.clone()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn views_mut(&mut self) -> &mut ViewSynchronizer<S> {
        &mut self.views
    }

    /// First-run seeding plus the initial full render, then the first
    /// weather fetch.
    pub fn init(&mut self) {
        pins::seed_if_absent(&mut self.store, &self.config);
        background::seed_mode_if_absent(&mut self.store);
        self.views.refresh_all(&self.store, &self.config);
        self.views.show_clock(&util::formatted_now());
        self.fetch_weather();
    }

    pub fn run(&mut self) {
        self.init();
        while let Ok(event) = self.app_rx.recv() {
            if matches!(event, AppEvent::Quit) {
                debug!("Quit received; leaving event loop");
                break;
            }
            self.on_event(event);
        }
    }

    pub fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AddNote(text) => {
                if let Err(err) = notes::add(&mut self.store, &text) {
                    self.alert_and_log(&err.to_string());
                } else {
                    self.views.refresh_notes(&self.store);
                }
            }
            AppEvent::AddPin { title, url, icon } => {
                match pins::add(&mut self.store, &title, &url, icon.as_deref())
                {
                    Ok(_) => self.views.refresh_pins(&self.store),
                    Err(err) => self.alert_and_log(&err.to_string()),
                }
            }
            AppEvent::ClearCompletedNotes => {
                notes::clear_completed(&mut self.store);
                self.views.refresh_notes(&self.store);
            }
            AppEvent::DeleteNote(index) => {
                if let Err(err) = notes::delete(&mut self.store, index) {
                    self.alert_and_log(&err.to_string());
                } else {
                    self.views.refresh_notes(&self.store);
                }
            }
            AppEvent::DeletePin(index) => {
                if let Err(err) = pins::delete(&mut self.store, index) {
                    self.alert_and_log(&err.to_string());
                } else {
                    self.views.refresh_pins(&self.store);
                }
            }
            AppEvent::FetchWeather => {
                self.fetch_weather();
            }
            AppEvent::NotesDragEnd => {
                if let Some(gesture) = self.drag.take() {
                    notes::save_position(
                        &mut self.store,
                        &self.config,
                        gesture.x,
                        gesture.y,
                        self.viewport,
                    );
                    self.views.refresh_notes(&self.store);
                }
            }
            AppEvent::NotesDragMove { x, y } => {
                // In-memory only; nothing persists until release.
                if let Some(gesture) = &mut self.drag {
                    gesture.x = x;
                    gesture.y = y;
                }
            }
            AppEvent::NotesDragStart { x, y } => {
                self.drag = Some(DragGesture { x, y });
            }
            AppEvent::Quit => {}
            AppEvent::Resize { width, height } => {
                self.viewport = Viewport { width, height };
            }
            AppEvent::SaveSettings {
                search_engine,
                theme,
                weather_key,
            } => {
                self.store
                    .set(keys::SEARCH_ENGINE, &SearchEngine(search_engine));
                self.store
                    .set(keys::WEATHER_CREDENTIAL, &weather_key.trim());
                self.apply_theme(theme);
                self.views.refresh_settings_form(&self.store, &self.config);
                self.fetch_weather();
            }
            AppEvent::Search(query) => {
                let Some(query) = util::non_blank(&query) else {
                    return;
                };
                let engine: SearchEngine = self
                    .store
                    .get(keys::SEARCH_ENGINE, self.config.default_search.clone());
                let url = engine.search_url(query);
                self.views.sink_mut().navigate(&url);
            }
            AppEvent::SelectBackground(image_name) => {
                let theme = current_theme(&self.store);
                match background::select_explicit(
                    &mut self.store,
                    &self.config,
                    theme,
                    &image_name,
                ) {
                    Ok(name) => {
                        let url =
                            background::image_url(&self.config, theme, &name);
                        self.views.sink_mut().set_background(Some(&url));
                        self.views
                            .refresh_thumbnails(&self.store, &self.config);
                        self.views
                            .refresh_settings_form(&self.store, &self.config);
                    }
                    Err(err) => self.alert_and_log(&err.to_string()),
                }
            }
            AppEvent::SetBackgroundMode(mode) => {
                let theme = current_theme(&self.store);
                let picked = background::set_mode(
                    &mut self.store,
                    &self.config,
                    theme,
                    mode,
                );
                let url = picked.map(|name| {
                    background::image_url(&self.config, theme, &name)
                });
                self.views.sink_mut().set_background(url.as_deref());
                self.views.refresh_thumbnails(&self.store, &self.config);
                self.views.refresh_settings_form(&self.store, &self.config);
            }
            AppEvent::SetSearchEngine(prefix) => {
                self.store.set(keys::SEARCH_ENGINE, &SearchEngine(prefix));
                self.views.refresh_settings_form(&self.store, &self.config);
            }
            AppEvent::SetTheme(theme) => {
                self.apply_theme(theme);
            }
            AppEvent::SetWeatherCredential(key) => {
                self.store.set(keys::WEATHER_CREDENTIAL, &key.trim());
                self.views.refresh_settings_form(&self.store, &self.config);
                self.fetch_weather();
            }
            AppEvent::Tick => {
                self.views.show_clock(&util::formatted_now());
            }
            AppEvent::ToggleNote(index) => {
                if let Err(err) = notes::toggle(&mut self.store, index) {
                    self.alert_and_log(&err.to_string());
                } else {
                    self.views.refresh_notes(&self.store);
                }
            }
            AppEvent::ToggleTheme => {
                let theme = current_theme(&self.store).toggled();
                self.apply_theme(theme);
            }
            AppEvent::UpdatePin {
                index,
                title,
                url,
                icon,
            } => {
                match pins::update(
                    &mut self.store,
                    index,
                    &title,
                    &url,
                    icon.as_deref(),
                ) {
                    Ok(()) => self.views.refresh_pins(&self.store),
                    Err(err) => self.alert_and_log(&err.to_string()),
                }
            }
            AppEvent::WeatherResolved { generation, view } => {
                if generation != self.weather_generation {
                    debug!(
                        "Dropping superseded weather response \
                        (generation {} < {})",
                        generation, self.weather_generation
                    );
                    return;
                }
                self.views.show_weather(&view);
            }
        }
    }

    /// Persisting the theme and re-rolling the background always travel
    /// together; that is what makes a theme toggle refresh the wallpaper.
    fn apply_theme(&mut self, theme: Theme) {
        self.store.set(keys::THEME, &theme);
        self.views.refresh_background(&self.store, &self.config);
        self.views.refresh_thumbnails(&self.store, &self.config);
        self.views.refresh_settings_form(&self.store, &self.config);
    }

    /// Reads the credential once, up front. State mutated while the worker
    /// is in flight cannot affect the request.
    fn fetch_weather(&mut self) {
        let credential: String =
            self.store.get(keys::WEATHER_CREDENTIAL, String::new());
        if credential.is_empty() {
            self.views.show_weather(&WeatherView::NoKey);
            return;
        }

        self.views.show_weather(&WeatherView::Pending);
        self.weather_generation = self.weather.spawn_fetch(
            credential,
            &self.config,
            self.app_tx.clone(),
        );
    }

    fn alert_and_log(&mut self, message: &str) {
        warn!("{}", message);
        self.views.sink_mut().alert(message);
    }
}
