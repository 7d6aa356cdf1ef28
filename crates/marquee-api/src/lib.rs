//! API client library for marquee.
//!
//! Provides a typed client for the TMDB movie/TV catalog and the URL
//! builders needed to display its images and trailers.

/// TMDB catalog client.
pub mod catalog;
