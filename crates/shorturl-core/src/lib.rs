//! Core types and traits for the shorturl admin panel.
//!
//! This crate provides the types shared by the HTTP client and the panel:
//! the [`Mapping`] entity, the [`ApiVariant`] endpoint table, the wire codecs
//! and the [`AdminApi`] trait every backend client implements.

pub mod api;
pub mod codec;
pub mod error;
pub mod mapping;
pub mod shortcode;
pub mod variant;

pub use api::AdminApi;
pub use codec::{CreateBody, ListFormat, Payload};
pub use error::{CoreError, Result};
pub use mapping::{AccessLog, Mapping};
pub use shortcode::ShortCode;
pub use variant::{ApiVariant, ProbeRule};
