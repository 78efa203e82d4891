use std::io;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::client::CaptionService;
use crate::error::{FailureKind, ServiceError};
use crate::form::fields::{FormFields, Tone, WritingStyle};
use crate::form::image::{
    EncodedImage, ImageFile, MAX_IMAGE_BYTES, SIZE_LIMIT_MESSAGE, UNSUPPORTED_TYPE_MESSAGE, UPLOAD_HINT,
};
use crate::render::CaptionView;

/// Inline message for a submit without description
pub const DESCRIPTION_REQUIRED_MESSAGE: &str = "Description is required";

/// Why an image selection was not applied
#[derive(Debug, Error)]
pub enum SelectImageError {
    #[error("file is {size} bytes, the limit is {limit} bytes", limit = MAX_IMAGE_BYTES)]
    TooLarge { size: u64 },

    #[error("only PNG and JPEG images are supported")]
    UnsupportedType,

    #[error("failed to read image: {0}")]
    Io(#[from] io::Error),

    #[error("image description failed: {0}")]
    Service(#[from] ServiceError),
}

/// Why a submit did not produce captions
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{}", DESCRIPTION_REQUIRED_MESSAGE)]
    Validation,

    #[error("caption generation failed: {0}")]
    Service(#[from] ServiceError),
}

/// Outcome of the most recent submit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Failed(String),
}

/// Holds a field in its in-flight value until `finish` stores the outcome.
///
/// Dropped without `finish` (the request future was abandoned), it puts the
/// field back to `reset`.
struct Pending<'a, T> {
    slot: &'a mut T,
    reset: Option<T>,
}

impl<'a, T> Pending<'a, T> {
    fn start(slot: &'a mut T, in_flight: T, reset: T) -> Self {
        *slot = in_flight;
        Self { slot, reset: Some(reset) }
    }

    fn finish(mut self, outcome: T) {
        self.reset = None;
        *self.slot = outcome;
    }
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        if let Some(reset) = self.reset.take() {
            *self.slot = reset;
        }
    }
}

/// State and actions of the caption form.
///
/// All actions take `&mut self`, so a controller never has two requests of
/// its own in flight. Dropping a pending `submit` or `select_image` future
/// abandons that request and returns the form to idle; the next `submit`
/// starts over from the current fields.
pub struct FormController<S> {
    service: S,
    fields: FormFields,
    preview: Option<EncodedImage>,
    image_loading: bool,
    upload_hint: &'static str,
    validation_message: Option<&'static str>,
    error: Option<String>,
    status: CaptionStatus,
    captions: Vec<String>,
    generation: u64,
}

impl<S: CaptionService> FormController<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            fields: FormFields::default(),
            preview: None,
            image_loading: false,
            upload_hint: UPLOAD_HINT,
            validation_message: None,
            error: None,
            status: CaptionStatus::Idle,
            captions: Vec::new(),
            generation: 0,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// The uploaded image, if any, as a data URL
    pub fn preview(&self) -> Option<&EncodedImage> {
        self.preview.as_ref()
    }

    pub fn is_image_loading(&self) -> bool {
        self.image_loading
    }

    pub fn is_loading(&self) -> bool {
        self.status == CaptionStatus::Loading
    }

    /// Hint under the upload control (size limit or rejection reason)
    pub fn upload_hint(&self) -> &str {
        self.upload_hint
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message
    }

    /// User-facing error from the last failed submit
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> &CaptionStatus {
        &self.status
    }

    pub fn captions(&self) -> &[String] {
        &self.captions
    }

    /// Bumped every time the caption list is replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// What the result area should show right now
    pub fn caption_view(&self) -> CaptionView<'_> {
        if self.is_loading() {
            CaptionView::Loading
        } else {
            CaptionView::Captions(&self.captions)
        }
    }

    // A finished submit goes back to idle on the next user action
    fn touch(&mut self) {
        if matches!(self.status, CaptionStatus::Success | CaptionStatus::Failed(_)) {
            self.status = CaptionStatus::Idle;
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.touch();
        self.fields.description = description.into();
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.touch();
        self.fields.tone = tone;
    }

    pub fn set_style(&mut self, style: WritingStyle) {
        self.touch();
        self.fields.style = style;
    }

    pub fn set_additional_context(&mut self, context: impl Into<String>) {
        self.touch();
        self.fields.additional_context = context.into();
    }

    pub fn set_emojis(&mut self, emojis: bool) {
        self.touch();
        self.fields.emojis = emojis;
    }

    pub fn set_hashtags(&mut self, hashtags: bool) {
        self.touch();
        self.fields.hashtags = hashtags;
    }

    pub fn toggle_emojis(&mut self) {
        self.set_emojis(!self.fields.emojis);
    }

    pub fn toggle_hashtags(&mut self) {
        self.set_hashtags(!self.fields.hashtags);
    }

    /// Uploads an image and fills the description from the service.
    ///
    /// Rejected or failed selections leave the fields and the preview as
    /// they were.
    #[instrument(skip(self, file), fields(name = %file.name(), size = file.size()))]
    pub async fn select_image(&mut self, file: ImageFile) -> Result<(), SelectImageError> {
        self.touch();
        self.upload_hint = UPLOAD_HINT;

        if !file.within_size_limit() {
            warn!("Rejected {}: {} bytes exceeds the size limit", file.name(), file.size());
            self.upload_hint = SIZE_LIMIT_MESSAGE;
            return Err(SelectImageError::TooLarge { size: file.size() });
        }

        let bytes = file.read().await?;
        if bytes.len() as u64 >= MAX_IMAGE_BYTES {
            warn!("Rejected {}: grew to {} bytes after it was opened", file.name(), bytes.len());
            self.upload_hint = SIZE_LIMIT_MESSAGE;
            return Err(SelectImageError::TooLarge { size: bytes.len() as u64 });
        }

        let encoded = match EncodedImage::encode(&bytes) {
            Some(encoded) => encoded,
            None => {
                warn!("Rejected {}: not a PNG or JPEG image", file.name());
                self.upload_hint = UNSUPPORTED_TYPE_MESSAGE;
                return Err(SelectImageError::UnsupportedType);
            }
        };
        debug!("Encoded {} as {}", file.name(), encoded.kind().mime_type());

        let loading = Pending::start(&mut self.image_loading, true, false);
        let result = self.service.describe_image(encoded.data_url()).await;
        loading.finish(false);

        match result {
            Ok(description) => {
                info!("Received description for {}", file.name());
                self.fields.description = description;
                self.preview = Some(encoded);
                Ok(())
            }
            Err(e) => {
                log_failure(&e);
                Err(e.into())
            }
        }
    }

    /// Resets every field, the image and the caption list to their defaults
    pub fn clear(&mut self) {
        debug!("Clearing form");
        self.fields = FormFields::default();
        self.preview = None;
        self.image_loading = false;
        self.upload_hint = UPLOAD_HINT;
        self.validation_message = None;
        self.error = None;
        self.status = CaptionStatus::Idle;
        self.captions.clear();
        self.generation += 1;
    }

    /// Whether `submit` would pass validation and contact the service
    pub fn can_submit(&self) -> bool {
        !self.fields.description.is_empty()
    }

    /// Requests captions for the current fields.
    ///
    /// On failure the previous captions stay on display and `error()` holds
    /// the message for the failure kind.
    #[instrument(skip(self), fields(tone = %self.fields.tone, style = %self.fields.style))]
    pub async fn submit(&mut self) -> Result<&[String], SubmitError> {
        if !self.can_submit() {
            debug!("Submit blocked: description is empty");
            self.validation_message = Some(DESCRIPTION_REQUIRED_MESSAGE);
            return Err(SubmitError::Validation);
        }
        self.validation_message = None;

        let request = self.fields.to_request();
        let status = Pending::start(&mut self.status, CaptionStatus::Loading, CaptionStatus::Idle);

        let result = self.service.generate_captions(&request).await;
        match result {
            Ok(captions) => {
                info!("Generated {} captions", captions.len());
                self.captions = captions;
                self.generation += 1;
                self.error = None;
                status.finish(CaptionStatus::Success);
                Ok(self.captions.as_slice())
            }
            Err(e) => {
                log_failure(&e);
                let message = e.user_message().to_string();
                self.error = Some(message.clone());
                status.finish(CaptionStatus::Failed(message));
                Err(e.into())
            }
        }
    }
}

fn log_failure(error: &ServiceError) {
    match error.kind() {
        FailureKind::Network => error!("{}: No response from server: {}", error.kind(), error),
        kind => error!("{}: {}", kind, error),
    }
}
