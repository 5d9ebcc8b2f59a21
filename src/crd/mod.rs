//! # Generator Configuration Types
//!
//! Types describing the generator's declarative input.
//!
//! ## Module Structure
//!
//! - `generator.rs` - The config document and its validated form
//! - `source.rs` - Secret store selection (GCP, AWS)
//! - `behavior.rs` - Generator behavior (create, replace, merge)

mod behavior;
mod generator;
mod source;

pub use behavior::Behavior;
pub use generator::{GeneratorConfig, ValidatedConfig};
pub use source::{SourceKind, SourceSelector};
