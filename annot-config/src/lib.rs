//! Annotation set resolution.
//!
//! This crate turns a tool's default annotation configuration and the user's
//! command-line directives into the final, validated [`ResolvedSet`].
//!
//! ## Main Features
//! - Tool defaults and embedded tool profiles
//! - Directive model and command-line directive parsing
//! - Resolution with exclude > explicit name > group > tool default precedence
//! - Dependency validation of plugin arguments against the enabled set

pub mod cli;
pub mod context;
pub mod defaults;
pub mod dependency;
pub mod directives;
mod embedded_profiles;
pub mod profile;
pub mod resolved;
pub mod resolver;

pub use context::ResolutionContext;
pub use defaults::{DefaultAnnotation, ToolDefaults};
pub use dependency::DependencyValidator;
pub use directives::{ConfigurationArgument, Directive, Directives};
pub use embedded_profiles::{get_profile_content, get_profile_names};
pub use profile::{ProfileAnnotation, ProfileValues, ToolProfile};
pub use resolved::{AnnotatedRecord, InstanceSummary, Origin, PluginInstance, ResolvedSet};
pub use resolver::resolve;
