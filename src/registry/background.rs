//! Picks the background image for the current theme.
//!
//! In auto mode every call re-rolls a random pick from the theme's catalog
//! and nothing is persisted; a theme toggle or reload deliberately gets a
//! fresh background. In manual mode the stored choice wins, but only while
//! its theme matches the active one; a choice pinned under the other theme is
//! ignored rather than rendered against the wrong palette.

use log::debug;
use rand::seq::IndexedRandom;

use crate::error::StateError;
use crate::prefs::{
    BackgroundChoice, BackgroundMode, StartPageConfig, Theme, keys,
};
use crate::runtime::storage::Store;

pub fn mode(store: &Store) -> BackgroundMode {
    store.get(keys::BACKGROUND_MODE, BackgroundMode::default())
}

pub fn choice(store: &Store) -> Option<BackgroundChoice> {
    store.get(keys::BACKGROUND_CHOICE, None)
}

/// The mode key is written once on first run so later tooling can tell "user
/// left it on auto" from "predates the setting".
pub fn seed_mode_if_absent(store: &mut Store) {
    if !store.contains(keys::BACKGROUND_MODE) {
        store.set(keys::BACKGROUND_MODE, &BackgroundMode::default());
    }
}

/// Returns the image to show for `theme`, or `None` when the theme's catalog
/// is empty (the render sink then clears the background; an empty catalog is
/// not an error).
pub fn select_for_theme(
    store: &Store,
    config: &StartPageConfig,
    theme: Theme,
) -> Option<String> {
    if mode(store) == BackgroundMode::Manual
        && let Some(choice) = choice(store)
        && choice.theme == theme
    {
        return Some(choice.image_name);
    }
    random_pick(config, theme)
}

/// Pins `image_name` as the manual choice for `theme` after checking it is
/// actually in that theme's catalog, and returns it for immediate render.
pub fn select_explicit(
    store: &mut Store,
    config: &StartPageConfig,
    theme: Theme,
    image_name: &str,
) -> Result<String, StateError> {
    let known = config
        .catalog
        .get(&theme)
        .is_some_and(|images| images.iter().any(|name| name == image_name));
    if !known {
        return Err(StateError::UnknownImage {
            name: image_name.to_string(),
        });
    }

    store.set(keys::BACKGROUND_MODE, &BackgroundMode::Manual);
    store.set(
        keys::BACKGROUND_CHOICE,
        &BackgroundChoice {
            theme,
            image_name: image_name.to_string(),
        },
    );
    Ok(image_name.to_string())
}

/// Persists the mode and returns the image to display right away. Switching
/// to auto keeps the stored choice around so flipping back to manual restores
/// the previous pick.
pub fn set_mode(
    store: &mut Store,
    config: &StartPageConfig,
    theme: Theme,
    mode: BackgroundMode,
) -> Option<String> {
    debug!("Background mode -> {:?}", mode);
    store.set(keys::BACKGROUND_MODE, &mode);
    select_for_theme(store, config, theme)
}

pub fn image_url(
    config: &StartPageConfig,
    theme: Theme,
    image_name: &str,
) -> String {
    format!("{}/{}/{}", config.backgrounds_path, theme.as_str(), image_name)
}

fn random_pick(config: &StartPageConfig, theme: Theme) -> Option<String> {
    config
        .catalog
        .get(&theme)
        .and_then(|images| images.choose(&mut rand::rng()).cloned())
}
