//! CRUD over the ordered pin list.
//!
//! Identity is positional at the operation boundary (the UI hands back the
//! index it rendered), so every mutating operation re-reads the list and
//! validates the index against its current length; a stale index after a
//! concurrent delete fails closed with [`StateError::Index`] instead of
//! mutating the wrong entry. Entries additionally carry a stable `id`
//! generated at creation, which is what render sinks key their tiles off.

use log::info;
use url::Url;

use crate::core::util::non_blank;
use crate::error::StateError;
use crate::prefs::{Pin, StartPageConfig, keys};
use crate::runtime::storage::Store;

/// Icon reference used when a pin's URL cannot be parsed at all.
pub const GENERIC_ICON: &str = "/favicon.png";

pub fn list(store: &Store) -> Vec<Pin> {
    store.get(keys::PINS, Vec::new())
}

/// Writes the fixed default list on first run only. "First run" means the
/// key has never been written; a user who deleted every pin keeps their
/// empty list.
pub fn seed_if_absent(store: &mut Store, config: &StartPageConfig) {
    if store.contains(keys::PINS) {
        return;
    }

    let defaults: Vec<Pin> = config
        .default_pins
        .iter()
        .map(|(title, url)| Pin::new(title, url, None))
        .collect();

    info!("Seeding {} default pins", defaults.len());
    store.set(keys::PINS, &defaults);
}

/// Appends a pin and returns its index.
pub fn add(
    store: &mut Store,
    title: &str,
    url: &str,
    icon: Option<&str>,
) -> Result<usize, StateError> {
    let (title, url, icon) = validated(title, url, icon)?;

    let mut pins = list(store);
    pins.push(Pin::new(title, url, icon));
    store.set(keys::PINS, &pins);
    Ok(pins.len() - 1)
}

/// Replaces the pin at `index` in place, preserving its id.
pub fn update(
    store: &mut Store,
    index: usize,
    title: &str,
    url: &str,
    icon: Option<&str>,
) -> Result<(), StateError> {
    let mut pins = list(store);
    check_index(index, pins.len())?;
    let (title, url, icon) = validated(title, url, icon)?;

    let id = pins[index].id.clone();
    pins[index] = Pin {
        id,
        title: title.to_string(),
        url: url.to_string(),
        icon: icon.map(str::to_string),
    };
    store.set(keys::PINS, &pins);
    Ok(())
}

pub fn delete(store: &mut Store, index: usize) -> Result<(), StateError> {
    let mut pins = list(store);
    check_index(index, pins.len())?;
    pins.remove(index);
    store.set(keys::PINS, &pins);
    Ok(())
}

/// An explicitly set icon wins; otherwise a favicon lookup URL is derived
/// from the pin's hostname. Never raises: a malformed URL degrades to the
/// generic icon.
pub fn resolve_icon(pin: &Pin) -> String {
    if let Some(icon) = pin.icon.as_deref()
        && !icon.is_empty()
    {
        return icon.to_string();
    }
    favicon_url(&pin.url)
}

/// Pure derivation `url -> favicon URL`; the lookup itself is a third-party
/// HTTP call performed by whatever renders the tile.
pub fn favicon_url(raw: &str) -> String {
    match Url::parse(raw).ok().and_then(|u| u.host_str().map(str::to_owned)) {
        Some(host) => {
            format!("https://www.google.com/s2/favicons?domain={}&sz=64", host)
        }
        None => GENERIC_ICON.to_string(),
    }
}

fn validated<'a>(
    title: &'a str,
    url: &'a str,
    icon: Option<&'a str>,
) -> Result<(&'a str, &'a str, Option<&'a str>), StateError> {
    let title =
        non_blank(title).ok_or(StateError::Validation { field: "title" })?;
    let url = non_blank(url).ok_or(StateError::Validation { field: "url" })?;
    Ok((title, url, icon.and_then(non_blank)))
}

fn check_index(index: usize, len: usize) -> Result<(), StateError> {
    if index >= len {
        return Err(StateError::Index { index, len });
    }
    Ok(())
}
