//! Workspace umbrella crate.
//!
//! Re-exports the artist identity resolver and its runtime so a host
//! application can depend on `identity-workspace` and pick features instead
//! of wiring each workspace crate by hand.
//!
//! - `resolver`: the resolution pipeline and runtime configuration
//! - `musicbrainz` (default): adds the MusicBrainz catalog adapter

#[cfg(feature = "resolver")]
pub use core_identity as identity;

#[cfg(feature = "resolver")]
pub use core_runtime as runtime;

#[cfg(feature = "resolver")]
pub use core_identity::{ArtistResolver, Candidate, CatalogClient, RawRecord, Resolution};
