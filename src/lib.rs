pub mod error;
pub mod generator;
pub mod model;
pub mod vendor;

pub use error::{GenerateError, VendorError};
pub use model::config::Settings;
