//! Track catalog: the record format and the loader that turns the published
//! count/data resources into a [`Catalog`].

mod loader;
mod model;
pub mod record;

pub use loader::{CatalogError, DirFetcher, FetchError, ResourceFetcher, load_catalog};
pub use model::{Catalog, Track};
