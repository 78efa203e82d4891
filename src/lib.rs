//! Client for an external caption-generation service.
//!
//! A [`form::FormController`] owns the caption form (image, description, tone,
//! writing style, context, emoji/hashtag toggles), talks to the service through
//! a [`client::CaptionService`] and exposes what the [`render::ResultRenderer`]
//! needs to draw the caption list.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod render;
pub mod utils;

pub use client::{CaptionService, HttpCaptionService};
pub use config::AppConfig;
pub use error::{FailureKind, ServiceError};
pub use form::{FormController, ImageFile, Tone, WritingStyle};
pub use render::ResultRenderer;
