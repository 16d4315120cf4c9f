use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

/// Image types accepted for news photos and advertisement banners.
const ALLOWED: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

#[derive(Debug)]
pub enum UploadError {
    /// Uploaded part carried no bytes.
    Empty,
    /// Payload exceeds the configured size limit.
    TooLarge { limit: u64 },
    /// Extension does not map to an allowed image MIME type.
    UnsupportedType,
    /// Crop rectangle falls outside the image.
    OutOfBounds,
    Io(std::io::Error),
    Image(image::ImageError),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "File is empty"),
            Self::TooLarge { limit } => {
                write!(f, "File exceeds the maximum upload size of {limit} bytes")
            }
            Self::UnsupportedType => {
                write!(f, "Unsupported file type (allowed: jpeg, png, gif, webp)")
            }
            Self::OutOfBounds => write!(f, "Crop rectangle is outside the image bounds"),
            Self::Io(e) => write!(f, "Failed to store file: {e}"),
            Self::Image(e) => write!(f, "Failed to process image: {e}"),
        }
    }
}

impl std::error::Error for UploadError {}

impl From<std::io::Error> for UploadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<image::ImageError> for UploadError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

/// Checks the extension of an uploaded filename against the image
/// whitelist and returns the normalized extension to store under.
pub fn validate_image_name(original_name: &str) -> Result<&'static str, UploadError> {
    let mime = mime_guess::from_path(original_name)
        .first_raw()
        .ok_or(UploadError::UnsupportedType)?;
    ALLOWED
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
        .ok_or(UploadError::UnsupportedType)
}

/// Builds a collision-free stored filename: `{prefix}_{uuid}_{unix-ts}.{ext}`.
pub fn stored_filename(prefix: &str, ext: &str) -> String {
    format!("{prefix}_{}_{}.{ext}", Uuid::new_v4(), Utc::now().timestamp())
}

/// Persist uploaded bytes under the upload directory. Returns the
/// stored filename (relative to the directory).
pub async fn save_image(
    upload_dir: &Path,
    prefix: &str,
    original_name: &str,
    bytes: &[u8],
    max_size: u64,
) -> Result<String, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() as u64 > max_size {
        return Err(UploadError::TooLarge { limit: max_size });
    }
    let ext = validate_image_name(original_name)?;
    let name = stored_filename(prefix, ext);

    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(upload_dir.join(&name), bytes).await?;
    Ok(name)
}

/// Remove a stored file. A file that is already gone is not an error.
pub async fn delete_image(upload_dir: &Path, name: &str) -> Result<(), UploadError> {
    match tokio::fs::remove_file(upload_dir.join(name)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn cropped_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_cropped.{ext}"),
        None => format!("{name}_cropped"),
    }
}

/// Crop a stored image to the given rectangle, writing a `_cropped`
/// sibling file. Returns the cropped filename.
pub fn crop_image(
    upload_dir: &Path,
    name: &str,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<String, UploadError> {
    if width == 0 || height == 0 {
        return Err(UploadError::OutOfBounds);
    }

    let source: PathBuf = upload_dir.join(name);
    let img = image::open(&source)?;

    let (w, h) = (img.width(), img.height());
    if x.checked_add(width).is_none_or(|r| r > w) || y.checked_add(height).is_none_or(|b| b > h) {
        return Err(UploadError::OutOfBounds);
    }

    let out_name = cropped_name(name);
    img.crop_imm(x, y, width, height)
        .save(upload_dir.join(&out_name))?;
    Ok(out_name)
}
