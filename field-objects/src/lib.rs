//! Comparison star selection for differential photometry.
//!
//! Given the stars returned by a catalog cone query around a target, this
//! crate computes each candidate's separation and magnitude difference from
//! the target, filters on observation count and a magnitude window, and ranks
//! the survivors for presentation.
//!
//! # Modules
//!
//! - [`coords`]: position/identity value object and sexagesimal helpers
//! - [`field_object`]: one catalog star with its target-relative fields
//! - [`settings`]: magnitude-window and observation-count settings
//! - [`collection`]: the candidate set and the selection pipeline
//!
//! Every pipeline operation is a total function. Only coordinate parsing and
//! settings file handling return [`CatalogError`].

pub mod collection;
pub mod coords;
pub mod error;
pub mod field_object;
pub mod settings;

pub use collection::FieldObjectCollection;
pub use coords::SkyPosition;
pub use error::CatalogError;
pub use field_object::{FieldObject, FilterGates};
pub use settings::{CatalogSettings, MagLimit};
