//! Destination catalogs that a library can be migrated into

pub mod spotify;

pub use spotify::SpotifyClient;
