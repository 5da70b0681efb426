//! A plain-text render target plus the command parser that turns typed lines
//! into [`AppEvent`]s. Exists so the core can run (and be demoed) without any
//! graphical front-end; a DOM or native sink implements the same trait.

use crate::prefs::{BackgroundMode, Theme, WindowPosition};
use crate::runtime::app::AppEvent;
use crate::runtime::view::{
    NoteLine, PinTile, RenderSink, SettingsForm, Thumbnail, WeatherView,
};

#[derive(Default)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }
}

impl RenderSink for TerminalSink {
    fn set_background(&mut self, url: Option<&str>) {
        match url {
            Some(url) => println!("background: {}", url),
            None => println!("background: (cleared)"),
        }
    }

    fn set_pin_grid(&mut self, tiles: &[PinTile]) {
        println!("pinned sites:");
        if tiles.is_empty() {
            println!("  No pinned sites. Add some in Settings.");
            return;
        }
        for (index, tile) in tiles.iter().enumerate() {
            println!(
                "  [{}] {} - {} ({})",
                index, tile.title, tile.url, tile.icon
            );
        }
    }

    fn set_note_list(&mut self, notes: &[NoteLine], position: WindowPosition) {
        println!("notes @ ({:.0}, {:.0}):", position.x, position.y);
        if notes.is_empty() {
            println!("  Nothing here yet. `note add <text>` to start.");
            return;
        }
        for (index, note) in notes.iter().enumerate() {
            let mark = if note.done { "x" } else { " " };
            println!("  [{}] [{}] {}", index, mark, note.text);
        }
    }

    fn set_bg_thumbnails(&mut self, thumbnails: &[Thumbnail]) {
        println!("backgrounds:");
        for thumbnail in thumbnails {
            let marker = if thumbnail.active { "*" } else { " " };
            println!("  {} {}", marker, thumbnail.name);
        }
    }

    fn set_settings_form(&mut self, form: &SettingsForm) {
        println!(
            "settings: theme={} mode={:?} engine={} key={}",
            form.theme,
            form.background_mode,
            form.search_engine,
            if form.weather_key.is_empty() {
                "(unset)"
            } else {
                "(set)"
            }
        );
    }

    fn set_weather(&mut self, weather: &WeatherView) {
        match weather {
            WeatherView::NoKey => println!("weather: No key"),
            WeatherView::Pending => println!("weather: …"),
            WeatherView::Report {
                temp_c,
                condition,
                icon,
            } => println!("weather: {}° • {} ({})", temp_c, condition, icon),
            WeatherView::Error => println!("weather: Weather error"),
        }
    }

    fn set_clock(&mut self, formatted: &str) {
        println!("{}", formatted);
    }

    fn alert(&mut self, message: &str) {
        println!("! {}", message);
    }

    fn navigate(&mut self, url: &str) {
        println!("-> {}", url);
    }
}

/// Maps one typed line to the events it should produce. `None` means the
/// line was not understood.
pub fn parse_command(line: &str) -> Option<Vec<AppEvent>> {
    let mut words = line.split_whitespace();
    let event = |e: AppEvent| Some(vec![e]);

    match words.next()? {
        "quit" | "exit" => event(AppEvent::Quit),
        "tick" => event(AppEvent::Tick),
        "weather" => event(AppEvent::FetchWeather),
        "theme" => match words.next() {
            None => event(AppEvent::ToggleTheme),
            Some("dark") => event(AppEvent::SetTheme(Theme::Dark)),
            Some("light") => event(AppEvent::SetTheme(Theme::Light)),
            Some(_) => None,
        },
        "bg" => match words.next()? {
            "auto" => event(AppEvent::SetBackgroundMode(BackgroundMode::Auto)),
            "manual" => {
                event(AppEvent::SetBackgroundMode(BackgroundMode::Manual))
            }
            name => event(AppEvent::SelectBackground(name.to_string())),
        },
        "search" => {
            event(AppEvent::Search(words.collect::<Vec<_>>().join(" ")))
        }
        "engine" => event(AppEvent::SetSearchEngine(
            words.collect::<Vec<_>>().join(" "),
        )),
        "key" => event(AppEvent::SetWeatherCredential(
            words.next().unwrap_or_default().to_string(),
        )),
        "pin" => match words.next()? {
            "add" => {
                let title = words.next()?.to_string();
                let url = words.next()?.to_string();
                let icon = words.next().map(str::to_string);
                event(AppEvent::AddPin { title, url, icon })
            }
            "edit" => {
                let index = words.next()?.parse().ok()?;
                let title = words.next()?.to_string();
                let url = words.next()?.to_string();
                let icon = words.next().map(str::to_string);
                event(AppEvent::UpdatePin {
                    index,
                    title,
                    url,
                    icon,
                })
            }
            "rm" => {
                event(AppEvent::DeletePin(words.next()?.parse().ok()?))
            }
            _ => None,
        },
        "note" => match words.next()? {
            "add" => event(AppEvent::AddNote(
                words.collect::<Vec<_>>().join(" "),
            )),
            "done" => {
                event(AppEvent::ToggleNote(words.next()?.parse().ok()?))
            }
            "rm" => {
                event(AppEvent::DeleteNote(words.next()?.parse().ok()?))
            }
            "clear" => event(AppEvent::ClearCompletedNotes),
            // One whole drag gesture: press, move, release.
            "move" => {
                let x: f32 = words.next()?.parse().ok()?;
                let y: f32 = words.next()?.parse().ok()?;
                Some(vec![
                    AppEvent::NotesDragStart { x: 0.0, y: 0.0 },
                    AppEvent::NotesDragMove { x, y },
                    AppEvent::NotesDragEnd,
                ])
            }
            _ => None,
        },
        _ => None,
    }
}
