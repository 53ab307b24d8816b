use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// MIME type for an upload: sniffed from the bytes first, then the
/// client-declared content type, then a generic fallback.
pub fn detect_mime(bytes: &[u8], declared: Option<&str>) -> String {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type().to_string();
    }
    match declared {
        Some(ct) if !ct.is_empty() => ct.to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

/// Encode an upload as a self-contained `data:` URI. No size limit.
pub fn to_data_uri(bytes: &[u8], declared: Option<&str>) -> String {
    let mime = detect_mime(bytes, declared);
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
