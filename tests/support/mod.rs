use tabula::prefs::WindowPosition;
use tabula::runtime::view::{
    NoteLine, PinTile, RenderSink, SettingsForm, Thumbnail, WeatherView,
};

/// Records every render call so tests can assert on exactly what reached the
/// screen, and in what order.
#[derive(Default)]
pub struct RecordingSink {
    pub backgrounds: Vec<Option<String>>,
    pub pin_grids: Vec<Vec<PinTile>>,
    pub note_lists: Vec<(Vec<NoteLine>, WindowPosition)>,
    pub thumbnails: Vec<Vec<Thumbnail>>,
    pub forms: Vec<SettingsForm>,
    pub weather: Vec<WeatherView>,
    pub clocks: Vec<String>,
    pub alerts: Vec<String>,
    pub navigations: Vec<String>,
}

impl RenderSink for RecordingSink {
    fn set_background(&mut self, url: Option<&str>) {
        self.backgrounds.push(url.map(str::to_string));
    }

    fn set_pin_grid(&mut self, tiles: &[PinTile]) {
        self.pin_grids.push(tiles.to_vec());
    }

    fn set_note_list(&mut self, notes: &[NoteLine], position: WindowPosition) {
        self.note_lists.push((notes.to_vec(), position));
    }

    fn set_bg_thumbnails(&mut self, thumbnails: &[Thumbnail]) {
        self.thumbnails.push(thumbnails.to_vec());
    }

    fn set_settings_form(&mut self, form: &SettingsForm) {
        self.forms.push(form.clone());
    }

    fn set_weather(&mut self, weather: &WeatherView) {
        self.weather.push(weather.clone());
    }

    fn set_clock(&mut self, formatted: &str) {
        self.clocks.push(formatted.to_string());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }
}
