//! Built-in annotations.
//!
//! Each annotation module exposes a `register` function; [`standard_catalog`]
//! calls them in a fixed order so the catalog and its listing are stable.

pub mod depth;
pub mod inbreeding;
pub mod mapping_quality;
pub mod rank_sum;

use annot_core::Result;
use annot_plugin::{Catalog, GroupRegistry, PluginClass};
use once_cell::sync::OnceCell;

/// Annotations every caller gets unless told otherwise.
pub const STANDARD_ANNOTATION: &str = "StandardAnnotation";
/// Extra annotations for haplotype-based callers.
pub const STANDARD_HC_ANNOTATION: &str = "StandardHCAnnotation";
/// Tag carried only by the [`REDUCIBLE_MARKER`] classification.
pub const REDUCIBLE_GROUP: &str = "Reducible";
pub const REDUCIBLE_MARKER: &str = "ReducibleAnnotation";

static CATALOG: OnceCell<Catalog> = OnceCell::new();
static GROUPS: OnceCell<GroupRegistry> = OnceCell::new();

/// Builds a fresh catalog holding every built-in annotation.
pub fn build_catalog() -> Result<Catalog> {
    let mut catalog = Catalog::new();
    depth::register(&mut catalog)?;
    inbreeding::register(&mut catalog)?;
    mapping_quality::register(&mut catalog)?;
    rank_sum::register(&mut catalog)?;
    catalog.register(
        PluginClass::marker(REDUCIBLE_MARKER)
            .in_group(REDUCIBLE_GROUP)
            .describe("Classification for annotations whose raw values are combined later"),
    )?;
    tracing::debug!(count = catalog.len(), "Built standard annotation catalog");
    Ok(catalog)
}

/// Process-wide catalog, built on first use.
pub fn standard_catalog() -> Result<&'static Catalog> {
    CATALOG.get_or_try_init(build_catalog)
}

/// Group registry for [`standard_catalog`].
pub fn standard_groups() -> Result<&'static GroupRegistry> {
    GROUPS.get_or_try_init(|| GroupRegistry::build(standard_catalog()?))
}
