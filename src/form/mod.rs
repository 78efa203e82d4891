//! The caption form: editable fields, the selected image and the actions
//! that talk to the caption service.

pub mod controller;
pub mod fields;
pub mod image;


pub use controller::{CaptionStatus, FormController, SelectImageError, SubmitError, DESCRIPTION_REQUIRED_MESSAGE};
pub use fields::{FormFields, Tone, WritingStyle};
pub use image::{EncodedImage, ImageFile, ImageKind, MAX_IMAGE_BYTES};
