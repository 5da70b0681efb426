//! CRUD + toggle over the ordered note list, newest first, plus persistence
//! of the draggable widget's position.

use crate::core::util::non_blank;
use crate::error::StateError;
use crate::prefs::{Note, StartPageConfig, Viewport, WindowPosition, keys};
use crate::runtime::storage::Store;

/// Minimum gap kept between the widget and every viewport edge.
const EDGE_MARGIN: f32 = 8.0;

pub fn list(store: &Store) -> Vec<Note> {
    store.get(keys::NOTES, Vec::new())
}

pub fn position(store: &Store) -> WindowPosition {
    store.get(keys::NOTES_POSITION, WindowPosition::default())
}

/// Inserts at the front so the most recent note renders on top. Returns the
/// new note's index (always 0).
pub fn add(store: &mut Store, text: &str) -> Result<usize, StateError> {
    let text =
        non_blank(text).ok_or(StateError::Validation { field: "text" })?;

    let mut notes = list(store);
    notes.insert(0, Note::new(text));
    store.set(keys::NOTES, &notes);
    Ok(0)
}

/// Flips `done` in place.
pub fn toggle(store: &mut Store, index: usize) -> Result<(), StateError> {
    let mut notes = list(store);
    check_index(index, notes.len())?;
    notes[index].done = !notes[index].done;
    store.set(keys::NOTES, &notes);
    Ok(())
}

pub fn delete(store: &mut Store, index: usize) -> Result<(), StateError> {
    let mut notes = list(store);
    check_index(index, notes.len())?;
    notes.remove(index);
    store.set(keys::NOTES, &notes);
    Ok(())
}

/// Drops every completed note. Idempotent: a second call is a no-op.
pub fn clear_completed(store: &mut Store) {
    let mut notes = list(store);
    notes.retain(|note| !note.done);
    store.set(keys::NOTES, &notes);
}

/// Clamps the dragged position to the viewport and persists it. Called once
/// at drag release, not per move event, so a drag is exactly one write.
pub fn save_position(
    store: &mut Store,
    config: &StartPageConfig,
    x: f32,
    y: f32,
    viewport: Viewport,
) -> WindowPosition {
    let position = WindowPosition {
        x: clamp_axis(x, viewport.width, config.notes_widget.width),
        y: clamp_axis(y, viewport.height, config.notes_widget.height),
    };
    store.set(keys::NOTES_POSITION, &position);
    position
}

fn clamp_axis(value: f32, viewport_extent: f32, widget_extent: f32) -> f32 {
    let max = (viewport_extent - widget_extent - EDGE_MARGIN)
        .max(EDGE_MARGIN);
    value.clamp(EDGE_MARGIN, max)
}

fn check_index(index: usize, len: usize) -> Result<(), StateError> {
    if index >= len {
        return Err(StateError::Index { index, len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_inserts_at_front() {
        let mut store = Store::in_memory();
        add(&mut store, "first").unwrap();
        let index = add(&mut store, "second").unwrap();
        assert_eq!(index, 0);

        let notes = list(&store);
        assert_eq!(notes[0].text, "second");
        assert_eq!(notes[1].text, "first");
        assert!(!notes[0].done);
    }

    #[test]
    fn test_add_rejects_whitespace_text() {
        let mut store = Store::in_memory();
        assert_eq!(
            add(&mut store, "  \t "),
            Err(StateError::Validation { field: "text" })
        );
        assert!(list(&store).is_empty());
    }

    #[test]
    fn test_toggle_out_of_bounds_leaves_list_unchanged() {
        let mut store = Store::in_memory();
        add(&mut store, "a").unwrap();
        add(&mut store, "b").unwrap();
        let before = list(&store);

        assert_eq!(
            toggle(&mut store, 5),
            Err(StateError::Index { index: 5, len: 2 })
        );
        assert_eq!(list(&store), before);
    }

    #[test]
    fn test_clear_completed_is_idempotent() {
        let mut store = Store::in_memory();
        add(&mut store, "keep").unwrap();
        add(&mut store, "drop").unwrap();
        toggle(&mut store, 0).unwrap();

        clear_completed(&mut store);
        let after_first = list(&store);
        assert_eq!(after_first.len(), 1);
        assert_eq!(after_first[0].text, "keep");

        clear_completed(&mut store);
        assert_eq!(list(&store), after_first);
    }

    #[test]
    fn test_save_position_clamps_to_viewport() {
        let mut store = Store::in_memory();
        let config = StartPageConfig::default();
        let viewport = Viewport {
            width: 1000.0,
            height: 600.0,
        };

        let saved =
            save_position(&mut store, &config, -50.0, 5000.0, viewport);
        assert_eq!(saved.x, EDGE_MARGIN);
        assert_eq!(saved.y, 600.0 - config.notes_widget.height - EDGE_MARGIN);
        assert_eq!(position(&store), saved);
    }

    #[test]
    fn test_save_position_survives_tiny_viewport() {
        let mut store = Store::in_memory();
        let config = StartPageConfig::default();
        let viewport = Viewport {
            width: 100.0,
            height: 100.0,
        };

        // Widget larger than the viewport: pins to the margin, no panic.
        let saved = save_position(&mut store, &config, 40.0, 40.0, viewport);
        assert_eq!(saved.x, EDGE_MARGIN);
        assert_eq!(saved.y, EDGE_MARGIN);
    }
}
