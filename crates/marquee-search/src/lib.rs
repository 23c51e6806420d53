//! Recommendations for marquee.
//!
//! Ranks catalog movies against a query title using the precomputed
//! similarity matrix held by a [`marquee_core::Library`].

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod recommend;

pub use error::{Error, Result};
pub use recommend::{recommend, Recommendation, Recommender, DEFAULT_TOP_K};
