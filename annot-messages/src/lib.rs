//! annot-messages
//!
//! Message templates for everything the `annot` binary prints, plus the
//! `msg!` macro that fills `{placeholder}` variables in a template.

pub mod builder;
pub mod macros;
pub mod messages;

pub use messages::MESSAGES;
