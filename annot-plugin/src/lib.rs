//! Annotation plugin model.
//!
//! Plugins are registered explicitly into a [`Catalog`]; each [`PluginClass`]
//! carries its display name, group tags, argument schema and a factory that
//! produces a runnable [`Annotator`]. The [`GroupRegistry`] indexes classes by
//! group tag and decides which tags may be requested.

pub mod annotation;
pub mod catalog;
pub mod class;
pub mod groups;
pub mod record;
pub mod types;
pub mod validation;

pub use annotation::{Annotator, Attributes, GenotypeAnnotation, InfoAnnotation};
pub use catalog::Catalog;
pub use class::{GenotypeFactory, InfoFactory, PluginClass};
pub use groups::{GroupRegistry, ROOT_GROUP};
pub use record::{Allele, Genotype, ReadEvidence, VariantRecord};
pub use types::{ArgumentKind, ArgumentSpec, Capability, GroupTag, PluginArguments};
pub use validation::RESERVED_ARGUMENT_NAMES;
