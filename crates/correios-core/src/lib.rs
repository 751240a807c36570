pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod paths;
pub mod store;
pub mod tracker;
pub mod types;

pub use error::{CorreiosError, Result};
