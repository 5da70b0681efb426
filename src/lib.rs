pub mod core;
pub mod error;
pub mod prefs;
pub mod registry;
pub mod runtime;

pub use crate::core::logging::init_logger;
pub use crate::core::logging::{debug, error, info, trace, warn};
pub use crate::core::util::uuid_5;
pub use crate::error::StateError;
pub use crate::prefs::{
    BackgroundChoice, BackgroundMode, Note, Pin, SearchEngine,
    StartPageConfig, Theme, Viewport, WindowPosition,
};
pub use crate::runtime::storage::{
    Backend, FileBackend, MemoryBackend, Store,
};
pub use crate::runtime::view::{RenderSink, ViewSynchronizer};
