// src/packages/mod.rs

//! Package format support for debforge
//!
//! This module reads Debian binary packages: the outer `ar` container, the
//! `control.tar.gz` member and the control text inside it. The entry point is
//! [`deb::extract`], or [`deb::DebExtractor`] through the
//! [`MetadataExtractor`] trait.

pub mod ar;
pub mod common;
pub mod control;
pub mod deb;
pub mod traits;

pub use common::{PackageMetadata, PackageMetadataBuilder};
pub use deb::DebExtractor;
pub use traits::MetadataExtractor;
