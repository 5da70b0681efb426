//! State-mutation operations over the persisted records. Each module owns one
//! list or selector: operations read fresh from the [`Store`], validate,
//! mutate, and write the record back whole. No incremental patching.
//!
//! [`Store`]: crate::runtime::storage::Store

pub mod background;
pub mod notes;
pub mod pins;
