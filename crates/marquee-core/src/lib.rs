//! Core data model for marquee.
//!
//! This crate defines the movie [`Catalog`], the precomputed
//! [`SimilarityMatrix`], and the [`Library`] that binds the two together
//! so that catalog positions and matrix rows always line up.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod library;
pub mod matrix;
pub mod model;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use library::Library;
pub use matrix::SimilarityMatrix;
pub use model::Item;
