pub mod error;
pub mod ids;
pub mod types;

pub use error::CatalogError;
pub use ids::{MediaId, ShowId};
pub use types::{FeedCategory, ShowKind, ShowStatus};
