/// Re-encoding of source images
///
/// The encoder receives the original [`SourceFile`], not the sniffed
/// buffer, and performs its own decode.

use std::io::Cursor;

use async_trait::async_trait;
use image::{ImageFormat, ImageReader};

use super::error::ConvertError;
use super::source::SourceFile;

/// Output formats the tool can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
        }
    }
}

/// External re-encoding routine driven by the conversion gate
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Decode `file` and return it encoded as `format`
    async fn encode(&self, file: &SourceFile, format: OutputFormat) -> Result<Vec<u8>, ConvertError>;
}

/// Encoder backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder;

#[async_trait]
impl Encoder for ImageEncoder {
    async fn encode(&self, file: &SourceFile, format: OutputFormat) -> Result<Vec<u8>, ConvertError> {
        let bytes = file.read_bytes().await?;

        // Decoding is CPU-bound, keep it off the async executor
        tokio::task::spawn_blocking(move || encode_blocking(&bytes, format))
            .await
            .map_err(|e| ConvertError::Task(e.to_string()))?
    }
}

/// Blocking implementation of the decode/encode pass
fn encode_blocking(bytes: &[u8], format: OutputFormat) -> Result<Vec<u8>, ConvertError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()
        .map_err(ConvertError::Decode)?;

    tracing::debug!(
        width = img.width(),
        height = img.height(),
        "decoded source image"
    );

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), format.image_format())
        .map_err(ConvertError::Encode)?;

    Ok(out)
}
