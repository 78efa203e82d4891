use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::ImageFormat;
use std::io;
use std::path::{Path, PathBuf};

/// Largest accepted upload is just under 10 MiB
pub const MAX_IMAGE_MB: u64 = 10;
pub const MAX_IMAGE_BYTES: u64 = MAX_IMAGE_MB * 1024 * 1024;

/// Hint shown next to the upload control
pub const UPLOAD_HINT: &str = "JPG, PNG files less than 10MB";

/// Hint shown when the selected file is too large
pub const SIZE_LIMIT_MESSAGE: &str = "File is exceeding the size limit";

/// Hint shown when the selected file is not a PNG or JPEG
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Only JPG and PNG images are supported";

#[derive(Debug, Clone)]
enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file the user picked for upload.
///
/// The size is known up front; the content is only read once the size check passed.
#[derive(Debug, Clone)]
pub struct ImageFile {
    name: String,
    size: u64,
    source: ImageSource,
}

impl ImageFile {
    /// Opens a file on disk, reading only its metadata
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            source: ImageSource::Path(path.to_path_buf()),
        })
    }

    /// Wraps content that is already in memory
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: ImageSource::Bytes(bytes),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn within_size_limit(&self) -> bool {
        self.size < MAX_IMAGE_BYTES
    }

    /// Reads the full content
    pub async fn read(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            ImageSource::Path(path) => tokio::fs::read(path).await,
            ImageSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Image formats the service accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Detects the format from the file's magic bytes
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
        }
    }
}

/// An accepted image encoded as a base64 data URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    kind: ImageKind,
    data_url: String,
}

impl EncodedImage {
    /// Encodes raw image bytes, returning `None` for anything but PNG or JPEG
    pub fn encode(bytes: &[u8]) -> Option<Self> {
        let kind = ImageKind::detect(bytes)?;
        let data_url = format!("data:{};base64,{}", kind.mime_type(), BASE64.encode(bytes));
        Some(Self { kind, data_url })
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// The `data:` URL, usable both as request payload and as preview source
    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Smallest valid PNG header the format guesser recognises
    pub const PNG_BYTES: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
        0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
        0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89,
    ];

    /// JPEG SOI + APP0 marker
    pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00];
}
