//! The only path by which state reaches the screen.
//!
//! A [`RenderSink`] is the abstract render target (DOM, terminal, native UI,
//! test double) and the [`ViewSynchronizer`] maps current store state onto
//! it. Every mutating operation in [`crate::registry`] is followed by the
//! matching targeted refresh before control returns to the caller, so the
//! rendered view is never observably stale relative to the store.

use crate::prefs::{
    BackgroundMode, SearchEngine, StartPageConfig, Theme, WindowPosition,
    keys,
};
use crate::registry::{background, notes, pins};
use crate::runtime::storage::Store;

#[derive(Clone, Debug, PartialEq)]
pub struct PinTile {
    pub id: String,
    pub title: String,
    pub url: String,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoteLine {
    pub id: String,
    pub text: String,
    pub done: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Thumbnail {
    pub name: String,
    pub url: String,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SettingsForm {
    pub theme: Theme,
    pub background_mode: BackgroundMode,
    pub search_engine: String,
    pub weather_key: String,
}

/// What the weather readout currently shows. Failures surface here as a
/// display state, never as an error to the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum WeatherView {
    NoKey,
    Pending,
    Report {
        temp_c: i32,
        condition: String,
        icon: String,
    },
    Error,
}

/// Abstract render operations the core calls. An empty slice passed to
/// `set_pin_grid`/`set_note_list` means "render the empty-state affordance",
/// not "skip rendering".
pub trait RenderSink {
    fn set_background(&mut self, url: Option<&str>);
    fn set_pin_grid(&mut self, tiles: &[PinTile]);
    fn set_note_list(&mut self, notes: &[NoteLine], position: WindowPosition);
    fn set_bg_thumbnails(&mut self, thumbnails: &[Thumbnail]);
    fn set_settings_form(&mut self, form: &SettingsForm);
    fn set_weather(&mut self, weather: &WeatherView);
    fn set_clock(&mut self, formatted: &str);
    /// Success/failure feedback for the user (validation errors, save
    /// confirmations).
    fn alert(&mut self, message: &str);
    /// Follow a search or pin URL.
    fn navigate(&mut self, url: &str);
}

pub struct ViewSynchronizer<S: RenderSink> {
    sink: S,
}

impl<S: RenderSink> ViewSynchronizer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn refresh_all(&mut self, store: &Store, config: &StartPageConfig) {
        self.refresh_background(store, config);
        self.refresh_pins(store);
        self.refresh_notes(store);
        self.refresh_thumbnails(store, config);
        self.refresh_settings_form(store, config);
    }

    pub fn refresh_pins(&mut self, store: &Store) {
        let tiles: Vec<PinTile> = pins::list(store)
            .iter()
            .map(|pin| PinTile {
                id: pin.id.clone(),
                title: pin.title.clone(),
                url: pin.url.clone(),
                icon: pins::resolve_icon(pin),
            })
            .collect();
        self.sink.set_pin_grid(&tiles);
    }

    pub fn refresh_notes(&mut self, store: &Store) {
        let lines: Vec<NoteLine> = notes::list(store)
            .iter()
            .map(|note| NoteLine {
                id: note.id.clone(),
                text: note.text.clone(),
                done: note.done,
            })
            .collect();
        self.sink.set_note_list(&lines, notes::position(store));
    }

    /// In auto mode this re-rolls the random pick, so refreshing the
    /// background is what gives every theme apply a fresh image.
    pub fn refresh_background(
        &mut self,
        store: &Store,
        config: &StartPageConfig,
    ) {
        let theme = current_theme(store);
        let url = background::select_for_theme(store, config, theme)
            .map(|name| background::image_url(config, theme, &name));
        self.sink.set_background(url.as_deref());
    }

    pub fn refresh_thumbnails(
        &mut self,
        store: &Store,
        config: &StartPageConfig,
    ) {
        let theme = current_theme(store);
        let active = background::choice(store)
            .filter(|choice| choice.theme == theme)
            .map(|choice| choice.image_name);

        let thumbnails: Vec<Thumbnail> = config
            .catalog
            .get(&theme)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|name| Thumbnail {
                name: name.clone(),
                url: background::image_url(config, theme, name),
                active: active.as_deref() == Some(name.as_str()),
            })
            .collect();
        self.sink.set_bg_thumbnails(&thumbnails);
    }

    pub fn refresh_settings_form(
        &mut self,
        store: &Store,
        config: &StartPageConfig,
    ) {
        let engine: SearchEngine =
            store.get(keys::SEARCH_ENGINE, config.default_search.clone());
        let form = SettingsForm {
            theme: current_theme(store),
            background_mode: background::mode(store),
            search_engine: engine.0,
            weather_key: store.get(keys::WEATHER_CREDENTIAL, String::new()),
        };
        self.sink.set_settings_form(&form);
    }

    pub fn show_weather(&mut self, weather: &WeatherView) {
        self.sink.set_weather(weather);
    }

    pub fn show_clock(&mut self, formatted: &str) {
        self.sink.set_clock(formatted);
    }
}

pub fn current_theme(store: &Store) -> Theme {
    store.get(keys::THEME, Theme::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every call so tests can assert on what reached the screen.
    #[derive(Default)]
    pub struct RecordingSink {
        pub background: Option<Option<String>>,
        pub pin_grids: Vec<Vec<PinTile>>,
        pub note_lists: Vec<Vec<NoteLine>>,
        pub thumbnails: Vec<Vec<Thumbnail>>,
        pub forms: Vec<SettingsForm>,
        pub alerts: Vec<String>,
    }

    impl RenderSink for RecordingSink {
        fn set_background(&mut self, url: Option<&str>) {
            self.background = Some(url.map(str::to_string));
        }
        fn set_pin_grid(&mut self, tiles: &[PinTile]) {
            self.pin_grids.push(tiles.to_vec());
        }
        fn set_note_list(
            &mut self,
            notes: &[NoteLine],
            _position: WindowPosition,
        ) {
            self.note_lists.push(notes.to_vec());
        }
        fn set_bg_thumbnails(&mut self, thumbnails: &[Thumbnail]) {
            self.thumbnails.push(thumbnails.to_vec());
        }
        fn set_settings_form(&mut self, form: &SettingsForm) {
            self.forms.push(form.clone());
        }
        fn set_weather(&mut self, _weather: &WeatherView) {}
        fn set_clock(&mut self, _formatted: &str) {}
        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
        fn navigate(&mut self, _url: &str) {}
    }

    #[test]
    fn test_refresh_pins_renders_empty_grid() {
        let store = Store::in_memory();
        let mut views = ViewSynchronizer::new(RecordingSink::default());

        views.refresh_pins(&store);
        // The sink is still called so it can render its empty state.
        assert_eq!(views.sink_mut().pin_grids.len(), 1);
        assert!(views.sink_mut().pin_grids[0].is_empty());
    }

    #[test]
    fn test_refresh_pins_resolves_icons() {
        let mut store = Store::in_memory();
        pins::add(&mut store, "GitHub", "https://github.com", None).unwrap();

        let mut views = ViewSynchronizer::new(RecordingSink::default());
        views.refresh_pins(&store);

        let grid = &views.sink_mut().pin_grids[0];
        assert_eq!(
            grid[0].icon,
            "https://www.google.com/s2/favicons?domain=github.com&sz=64"
        );
    }

    #[test]
    fn test_refresh_background_clears_on_empty_catalog() {
        let store = Store::in_memory();
        let mut config = StartPageConfig::default();
        config.catalog.insert(Theme::Dark, Vec::new());

        let mut views = ViewSynchronizer::new(RecordingSink::default());
        views.refresh_background(&store, &config);
        assert_eq!(views.sink_mut().background, Some(None));
    }

    #[test]
    fn test_thumbnails_flag_the_active_manual_choice() {
        let mut store = Store::in_memory();
        let config = StartPageConfig::default();
        crate::registry::background::select_explicit(
            &mut store,
            &config,
            Theme::Dark,
            "3.png",
        )
        .unwrap();

        let mut views = ViewSynchronizer::new(RecordingSink::default());
        views.refresh_thumbnails(&store, &config);

        let thumbnails = &views.sink_mut().thumbnails[0];
        let active: Vec<&Thumbnail> =
            thumbnails.iter().filter(|t| t.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "3.png");
    }

    #[test]
    fn test_settings_form_reflects_defaults_when_unset() {
        let store = Store::in_memory();
        let config = StartPageConfig::default();

        let mut views = ViewSynchronizer::new(RecordingSink::default());
        views.refresh_settings_form(&store, &config);

        let form = &views.sink_mut().forms[0];
        assert_eq!(form.theme, Theme::Dark);
        assert_eq!(form.background_mode, BackgroundMode::Auto);
        assert_eq!(form.search_engine, config.default_search.0);
        assert_eq!(form.weather_key, "");
    }
}
