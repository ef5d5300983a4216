//! Image type detection for embedded artwork

/// MIME type from image signature bytes
pub(crate) fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if data.starts_with(b"BM") {
        Some("image/bmp")
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// MIME type from a file name extension
pub(crate) fn mime_from_name(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Best MIME type for picture bytes, trusting the signature over the declared type
pub(crate) fn resolve_mime(declared: &str, data: &[u8]) -> String {
    if let Some(mime) = sniff_mime(data) {
        return mime.to_string();
    }
    let declared = declared.trim().to_ascii_lowercase();
    match declared.as_str() {
        "" => "application/octet-stream".to_string(),
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        _ if declared.contains('/') => declared,
        _ => format!("image/{}", declared),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_common_signatures() {
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(
            sniff_mime(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0]),
            Some("image/png")
        );
        assert_eq!(sniff_mime(b"nothing"), None);
    }

    #[test]
    fn falls_back_to_declared_type() {
        assert_eq!(resolve_mime("JPG", b"xx"), "image/jpeg");
        assert_eq!(resolve_mime("image/tiff", b"xx"), "image/tiff");
        assert_eq!(resolve_mime("", b"xx"), "application/octet-stream");
        assert_eq!(resolve_mime("image/png", &[0xFF, 0xD8, 0xFF]), "image/jpeg");
        assert_eq!(mime_from_name("cover.JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_name("cover"), None);
    }
}
