use thiserror::Error;

/// Failures raised while reading or re-encoding a source file.
///
/// An unsupported or unrecognised file type is *not* an error; the gate
/// reports it as [`super::Conversion::Unsupported`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source bytes could not be read
    #[error("failed to read source file: {0}")]
    Read(#[from] std::io::Error),

    /// The encoder could not decode the source image
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The decoded image could not be written as the target format
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The blocking worker died before producing a result
    #[error("conversion task failed: {0}")]
    Task(String),
}
