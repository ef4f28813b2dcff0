//! Catalog façade: reconciles the primary provider with the enrichment
//! sources into one canonical model, and exposes the public operation set
//! (search, show detail, episode list, video assets, curated feeds).

pub mod archive;
pub mod assets;
pub mod facade;
pub mod map;
pub mod model;
pub mod reconcile;
pub mod seasons;

pub use facade::{Catalog, CatalogOptions};
pub use model::{Episode, FeedCollection, Season, Show, ShowEntry, VideoAsset};
pub use reconcile::ArtworkPrecedence;
