pub mod error;

pub use error::{AnnotError, Result};
