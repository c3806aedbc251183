/// Content sniffing
///
/// Classifies a byte buffer by its signature. File names and declared
/// media types are never consulted.

use image::ImageFormat;

/// How far into a text file we look for an `<svg` root element
const SVG_SCAN_LIMIT: usize = 1024;

/// Result of content inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffedType {
    /// Canonical extension label, e.g. "png", "jpg", "gif"
    pub extension: String,
    /// Media type matching the signature
    pub media_type: String,
}

impl SniffedType {
    pub fn new(extension: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            media_type: media_type.into(),
        }
    }
}

/// Content-signature detector consulted by the conversion gate
pub trait Sniffer: Send + Sync {
    /// Best-effort signature match, `None` when nothing is recognised
    fn sniff(&self, bytes: &[u8]) -> Option<SniffedType>;
}

/// Default detector built on the `image` crate's magic-byte table,
/// plus PDF and SVG which `image` does not know about.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureSniffer;

impl Sniffer for SignatureSniffer {
    fn sniff(&self, bytes: &[u8]) -> Option<SniffedType> {
        if let Ok(format) = image::guess_format(bytes) {
            return Some(from_image_format(format));
        }

        if bytes.starts_with(b"%PDF-") {
            return Some(SniffedType::new("pdf", "application/pdf"));
        }

        if looks_like_svg(bytes) {
            return Some(SniffedType::new("svg", "image/svg+xml"));
        }

        None
    }
}

fn from_image_format(format: ImageFormat) -> SniffedType {
    // First listed extension is the canonical one ("jpg" for JPEG)
    let extension = format.extensions_str().first().copied().unwrap_or("bin");
    SniffedType::new(extension, format.to_mime_type())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(SVG_SCAN_LIMIT)];
    let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
    svg_prefix(&String::from_utf8_lossy(head))
}

fn svg_prefix(text: &str) -> bool {
    let text = text.trim_start();
    if text.starts_with("<svg") {
        return true;
    }
    (text.starts_with("<?xml") || text.starts_with("<!DOCTYPE svg")) && text.contains("<svg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), format)
            .unwrap();
        buf
    }

    #[test]
    fn test_sniffs_common_image_formats() {
        let sniffer = SignatureSniffer;

        let png = sniffer.sniff(&encoded(ImageFormat::Png)).unwrap();
        assert_eq!(png, SniffedType::new("png", "image/png"));

        let jpeg = sniffer.sniff(&encoded(ImageFormat::Jpeg)).unwrap();
        assert_eq!(jpeg.extension, "jpg");
        assert_eq!(jpeg.media_type, "image/jpeg");

        let gif = sniffer.sniff(b"GIF89a\x01\x00\x01\x00\x00\x00\x00").unwrap();
        assert_eq!(gif.extension, "gif");

        let bmp = sniffer.sniff(&encoded(ImageFormat::Bmp)).unwrap();
        assert_eq!(bmp.extension, "bmp");
    }

    #[test]
    fn test_sniffs_pdf() {
        let sniffed = SignatureSniffer.sniff(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n").unwrap();
        assert_eq!(sniffed.extension, "pdf");
    }

    #[test]
    fn test_sniffs_svg() {
        let plain = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"/>"#;
        assert_eq!(SignatureSniffer.sniff(plain).unwrap().extension, "svg");

        let with_prolog = b"\xEF\xBB\xBF<?xml version=\"1.0\"?>\n<svg></svg>";
        assert_eq!(SignatureSniffer.sniff(with_prolog).unwrap().extension, "svg");
    }

    #[test]
    fn test_plain_xml_is_not_svg() {
        assert_eq!(SignatureSniffer.sniff(b"<?xml version=\"1.0\"?><feed/>"), None);
    }

    #[test]
    fn test_unknown_content() {
        assert_eq!(SignatureSniffer.sniff(b"just some text"), None);
        assert_eq!(SignatureSniffer.sniff(&[]), None);
    }
}
