//! Spotify Web API integration
//!
//! Implements [`DestinationCatalog`](crate::migration::traits::DestinationCatalog)
//! on top of the search, playlist and library endpoints.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod dto;
mod adapter;
mod client;

pub use client::SpotifyClient;
