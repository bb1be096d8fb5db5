//! Image enrichment subsystem: Wikipedia lookup, deterministic placeholder
//! fallback, and the concurrent enrichment orchestrator.

pub mod enrich;
pub mod placeholder;
pub mod wiki;

pub use enrich::Enricher;
pub use placeholder::{classify, placeholder_url, sanitize_destination, Category};
pub use wiki::{ImageSource, WikiImageClient};
