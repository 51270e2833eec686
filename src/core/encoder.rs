use crate::domain::model::ImagePayload;
use crate::utils::error::{LocaError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Encodes the payload bytes as bare base64 (no `data:` prefix).
///
/// Encoding runs on the blocking pool so large photographs do not stall the
/// executor.
pub async fn encode_image(image: &ImagePayload) -> Result<String> {
    if image.is_empty() {
        return Err(LocaError::encoding("image payload is empty"));
    }
    if !image.mime_type().starts_with("image/") {
        return Err(LocaError::encoding(format!(
            "'{}' is not an image MIME type",
            image.mime_type()
        )));
    }

    let data = image.shared_data();
    let encoded = tokio::task::spawn_blocking(move || BASE64.encode(&data))
        .await
        .map_err(|e| LocaError::encoding(format!("encoder task failed: {}", e)))?;

    tracing::debug!(
        "Encoded {} bytes of {} into {} base64 chars",
        image.len(),
        image.mime_type(),
        encoded.len()
    );
    Ok(encoded)
}

/// Returns the base64 part of a `data:<mime>;base64,<data>` URL.
pub fn base64_from_data_url(data_url: &str) -> Result<&str> {
    let (_, data) = split_data_url(data_url)?;
    Ok(data)
}

/// Builds an [`ImagePayload`] from the data-URL form browsers hand out.
pub fn payload_from_data_url(data_url: &str) -> Result<ImagePayload> {
    let (mime_type, data) = split_data_url(data_url)?;
    let bytes = BASE64
        .decode(data.as_bytes())
        .map_err(|e| LocaError::encoding(format!("invalid base64 image data: {}", e)))?;
    Ok(ImagePayload::new(bytes, mime_type))
}

fn split_data_url(data_url: &str) -> Result<(&str, &str)> {
    let rest = data_url
        .trim()
        .strip_prefix(DATA_URL_SCHEME)
        .ok_or_else(|| LocaError::encoding("missing 'data:' prefix"))?;
    let (mime_type, data) = rest
        .split_once(BASE64_MARKER)
        .ok_or_else(|| LocaError::encoding("missing ';base64,' marker"))?;
    if data.is_empty() {
        return Err(LocaError::encoding("could not extract base64 data"));
    }
    Ok((mime_type, data))
}
