use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = VendorError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum VendorError {
    #[error("unknown vendor url scheme: {uri}")]
    UnknownScheme { uri: String },

    #[error("invalid vendor at '{uri}': metadata not found")]
    InvalidVendor { uri: String },

    #[error("invalid vendor name '{name}' fetched from '{uri}'")]
    InvalidBundleName { uri: String, name: String },

    #[error("vendor `{0}` doesn't exist")]
    VendorNotFound(String),

    #[error("can't update vendor `{0}`: fetch_uri undefined")]
    MissingSource(String),

    #[error("fetch of '{uri}' failed: {source}")]
    Fetch {
        uri: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("handler '{handler}' exited with {status} while fetching '{uri}'")]
    HandlerFailed {
        handler: String,
        uri: String,
        status: std::process::ExitStatus,
    },

    #[error("invalid metadata at '{path}': {reason}")]
    Metadata { path: PathBuf, reason: String },

    #[error("IO operation '{operation}' failed on path '{path}': {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl VendorError {
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            operation,
            path,
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("can't generate {0} in your couchapp: generator is unknown")]
    UnknownKind(String),

    #[error("can't generate {0} function: name is missing")]
    MissingName(String),

    #[error("the view {0} already exists")]
    ViewExists(String),

    #[error("the vendor generator needs a template")]
    MissingTemplate,

    #[error("default templates not found in '{0}', check your install")]
    TemplatesNotFound(PathBuf),

    #[error("IO operation '{operation}' failed on path '{path}': {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}
