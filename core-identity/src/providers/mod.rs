//! Catalog provider implementations

#[cfg(feature = "musicbrainz")]
pub mod musicbrainz;

#[cfg(feature = "musicbrainz")]
pub use musicbrainz::MusicBrainzCatalog;
