//! Message templates grouped by command.
//!
//! - `resolve` - output of `annot resolve`
//! - `catalog` - output of `annot list` and `annot profiles`
//! - `common` - shared messages

mod catalog;
mod common;
mod resolve;

pub use catalog::{CatalogMessages, CATALOG_MESSAGES};
pub use common::{CommonMessages, COMMON_MESSAGES};
pub use resolve::{ResolveMessages, RESOLVE_MESSAGES};

pub struct Messages {
    pub resolve: ResolveMessages,
    pub catalog: CatalogMessages,
    pub common: CommonMessages,
}

pub const MESSAGES: Messages = Messages {
    resolve: RESOLVE_MESSAGES,
    catalog: CATALOG_MESSAGES,
    common: COMMON_MESSAGES,
};
