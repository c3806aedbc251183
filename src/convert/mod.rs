/// Conversion gate
///
/// This module handles:
/// - Describing the file the user picked (source.rs)
/// - Classifying it by content signature (sniff.rs)
/// - Re-encoding it as PNG through the `image` crate (encoder.rs)
/// - Tying the steps together behind an allow-list (gate.rs)

pub mod encoder;
pub mod error;
pub mod gate;
pub mod sniff;
pub mod source;

pub use encoder::{Encoder, ImageEncoder, OutputFormat};
pub use error::ConvertError;
pub use gate::{Conversion, ConversionGate, ConvertedArtifact};
pub use sniff::{SignatureSniffer, SniffedType, Sniffer};
pub use source::SourceFile;
