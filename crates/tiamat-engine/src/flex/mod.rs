//! Flexbox-style layout over the scene graph.
//!
//! Responsibilities:
//! - container and item facets attached to scene nodes ([`FlexContainer`],
//!   [`FlexItem`], bundled in [`FlexState`]);
//! - dirty propagation from property changes up to frame-level layout
//!   roots (`target`);
//! - the solver itself (`layout`): line partitioning, grow/shrink
//!   distribution, justify/align, coordinate finalization.
//!
//! Sizes are content-box: a container's `w`/`h` exclude its own padding,
//! and an item's footprint in its line is size plus padding plus margin.

pub(crate) mod axis;
mod config;
mod container;
mod error;
mod item;
pub(crate) mod layout;
pub(crate) mod spacing;
mod target;

pub use config::{ContentAlign, FlexDirection, ItemAlign, JustifyContent};
pub use container::FlexContainer;
pub use error::KeywordError;
pub use item::FlexItem;
pub use target::FlexState;
