//! Model dispatcher: backend chain, fallback dispatch, result cache, and
//! lazy adapter extension.
mod error;
mod model;

pub use error::ModelError;
pub use model::{ExtensionProc, Model};
