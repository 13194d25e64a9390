//! Adobe Analytics API service implementations.

mod discovery;
mod reports;

pub use discovery::*;
pub use reports::*;
