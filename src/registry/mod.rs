pub mod loader;
pub mod model;

use thiserror::Error;

pub use loader::{load_catalogs, refresh_catalogs};
pub use model::{CatalogKind, Catalogs};

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request failed or the server answered with a non-success status.
    #[error("catalog {url} is unavailable: {reason}")]
    UpstreamUnavailable { url: String, reason: String },
    /// The payload is not a list of entries, nor an object holding one.
    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),
}
