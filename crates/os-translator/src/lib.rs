//! Translators between the HVAC object model and EnergyPlus IDF.
//!
//! - [`ForwardTranslator`] turns a [`Model`](os_model::Model) into an IDF
//!   [`Workspace`](os_idf::Workspace), flattening splice nodes and terminals
//!   into the node names EnergyPlus expects.
//! - [`ReverseTranslator`] rebuilds zones, zone splitters and mixers,
//!   terminals, coils and daylighting controls from a workspace.
//!
//! Problems with individual objects never abort a translation; they are
//! collected as [`TranslationMessage`]s.

pub mod config;
pub mod error;
pub mod forward;
mod messages;
pub mod reverse;

pub use config::{ForwardOptions, ReverseOptions, TranslatorConfig, load_config};
pub use error::{TranslatorError, TranslatorResult};
pub use forward::{ForwardTranslator, IDF_VERSION};
pub use messages::{MessageLevel, TranslationMessage};
pub use reverse::ReverseTranslator;
