//! Validation for uploaded images.
//!
//! [`ImageUploadField`] enforces an optional byte limit and an optional exact pixel
//! size. A file that has disappeared by the time it is validated is not an error.

use std::fmt;
use std::fs;
use std::io::{self, Cursor};
use std::path::Path;

use image::ImageReader;
use thiserror::Error;

/// Pixel size, written as `(height, width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub height: u32,
    pub width: u32,
}

impl Dimensions {
    pub const fn new(height: u32, width: u32) -> Self {
        Dimensions { height, width }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.height, self.width)
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Please keep file size under {max}. Current file size is {size}")]
    TooLarge { max: u64, size: u64 },

    #[error("Not a valid image file")]
    NotAnImage,

    #[error("valid dimension is {expected} but got {actual}")]
    WrongDimensions {
        expected: Dimensions,
        actual: Dimensions,
    },

    #[error("Could not read uploaded file: {0}")]
    Unreadable(#[from] io::Error),
}

/// Size and dimension rules for an image upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageUploadField {
    pub max_size: Option<u64>,
    pub valid_dimensions: Option<Dimensions>,
}

impl ImageUploadField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound in bytes. A limit of `0` means no limit.
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    pub fn valid_dimensions(mut self, height: u32, width: u32) -> Self {
        self.valid_dimensions = Some(Dimensions::new(height, width));
        self
    }

    /// Validate an upload held in memory.
    pub fn clean_bytes(&self, bytes: &[u8]) -> Result<(), ValidationError> {
        self.check_size(bytes.len() as u64)?;

        if let Some(expected) = self.valid_dimensions {
            let actual = ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .map_err(|_| ValidationError::NotAnImage)
                .and_then(|reader| {
                    reader
                        .into_dimensions()
                        .map_err(|_| ValidationError::NotAnImage)
                })?;
            check_dimensions(expected, actual)?;
        }

        Ok(())
    }

    /// Validate an upload stored on disk. A missing file passes.
    pub fn clean_path(&self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        let path = path.as_ref();
        let result = self.clean_file(path);
        match result {
            Err(ValidationError::Unreadable(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "upload missing, skipping validation");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "upload rejected");
                Err(e)
            }
            Ok(()) => Ok(()),
        }
    }

    fn clean_file(&self, path: &Path) -> Result<(), ValidationError> {
        let size = fs::metadata(path)?.len();
        self.check_size(size)?;

        if let Some(expected) = self.valid_dimensions {
            let reader = ImageReader::open(path)?
                .with_guessed_format()
                .map_err(|_| ValidationError::NotAnImage)?;
            let actual = reader
                .into_dimensions()
                .map_err(|_| ValidationError::NotAnImage)?;
            check_dimensions(expected, actual)?;
        }

        Ok(())
    }

    fn check_size(&self, size: u64) -> Result<(), ValidationError> {
        match self.max_size {
            Some(max) if max > 0 && size > max => Err(ValidationError::TooLarge { max, size }),
            _ => Ok(()),
        }
    }
}

/// `actual` is `(width, height)` as reported by the decoder.
fn check_dimensions(expected: Dimensions, actual: (u32, u32)) -> Result<(), ValidationError> {
    let (width, height) = actual;
    let actual = Dimensions::new(height, width);
    if actual == expected {
        Ok(())
    } else {
        Err(ValidationError::WrongDimensions { expected, actual })
    }
}
