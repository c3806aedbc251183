use std::sync::Arc;

use super::encoder::{Encoder, ImageEncoder, OutputFormat};
use super::error::ConvertError;
use super::sniff::{SignatureSniffer, SniffedType, Sniffer};
use super::source::SourceFile;

/// Sniffed extensions accepted for conversion.
///
/// `svg` and `ico` are accepted here even though the encoder may refuse
/// them; that refusal surfaces as an encoder error.
pub const SUPPORTED_INPUTS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "ico"];

/// Check a sniffed extension label against [`SUPPORTED_INPUTS`]
pub fn is_supported(extension: &str) -> bool {
    SUPPORTED_INPUTS.contains(&extension)
}

/// The PNG produced by a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedArtifact {
    pub name: String,
    pub media_type: &'static str,
    pub bytes: Arc<[u8]>,
}

/// Outcome of a conversion that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// The encoder produced a PNG
    Converted(ConvertedArtifact),
    /// No signature was found, or the sniffed type is not on the allow-list.
    /// The encoder was never called.
    Unsupported { sniffed: Option<SniffedType> },
}

/// Classifies a file by content and drives the PNG re-encode
#[derive(Clone)]
pub struct ConversionGate {
    sniffer: Arc<dyn Sniffer>,
    encoder: Arc<dyn Encoder>,
}

impl std::fmt::Debug for ConversionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionGate").finish_non_exhaustive()
    }
}

impl Default for ConversionGate {
    fn default() -> Self {
        Self::new(Arc::new(SignatureSniffer), Arc::new(ImageEncoder))
    }
}

impl ConversionGate {
    pub fn new(sniffer: Arc<dyn Sniffer>, encoder: Arc<dyn Encoder>) -> Self {
        Self { sniffer, encoder }
    }

    /// Convert `file` to PNG.
    ///
    /// Returns `Ok(Conversion::Unsupported)` when the content is not
    /// recognised or not allowed. Read and encoder failures are returned
    /// as errors untouched.
    pub async fn convert(&self, file: &SourceFile) -> Result<Conversion, ConvertError> {
        let bytes = file.read_bytes().await?;

        let Some(sniffed) = self.sniffer.sniff(&bytes) else {
            tracing::warn!(file = file.name(), "could not determine file type");
            return Ok(Conversion::Unsupported { sniffed: None });
        };
        tracing::debug!(
            file = file.name(),
            ext = %sniffed.extension,
            mime = %sniffed.media_type,
            "sniffed file type"
        );

        if !is_supported(&sniffed.extension) {
            tracing::warn!(
                file = file.name(),
                ext = %sniffed.extension,
                "file type is not supported for conversion"
            );
            return Ok(Conversion::Unsupported { sniffed: Some(sniffed) });
        }

        let format = OutputFormat::Png;
        let encoded = self.encoder.encode(file, format).await?;

        let artifact = ConvertedArtifact {
            name: output_name(file.name(), format),
            media_type: format.media_type(),
            bytes: encoded.into(),
        };
        tracing::info!(
            from = file.name(),
            to = %artifact.name,
            size = artifact.bytes.len(),
            "converted image"
        );

        Ok(Conversion::Converted(artifact))
    }
}

/// Name of the converted file: the source name without a trailing
/// `.<word>` extension, followed by the target extension.
pub fn output_name(source_name: &str, format: OutputFormat) -> String {
    format!("{}.{}", strip_extension(source_name), format.extension())
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => {
            let ext = &name[dot + 1..];
            let is_word = !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if is_word {
                &name[..dot]
            } else {
                name
            }
        }
        None => name,
    }
}
