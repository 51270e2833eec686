use crate::utils::error::{LocaError, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\s*").expect("opening fence pattern"));

static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("closing fence pattern"));

/// Trims the text and removes a leading code-fence marker (optionally tagged
/// `json`) and a trailing one. Interior content is left untouched.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let opened = FENCE_OPEN.replace(trimmed, "");
    FENCE_CLOSE.replace(&opened, "").into_owned()
}

/// Slice from the first `{` to the last `}` of `text`, if both exist in that order.
pub fn extract_braced(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end >= start).then_some(&text[start..=end])
}

/// Parses model output into `T`: first the fence-stripped text, then the
/// outermost brace-delimited span of the raw text.
pub fn normalize<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let cleaned = strip_code_fences(raw);
    let direct_error = match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };
    tracing::debug!("Direct JSON parse failed ({}), trying brace extraction", direct_error);

    let Some(braced) = extract_braced(raw) else {
        return Err(LocaError::malformed(format!(
            "no JSON object found in response ({})",
            direct_error
        )));
    };

    serde_json::from_str::<T>(braced)
        .map_err(|e| LocaError::malformed(format!("invalid JSON response: {}", e)))
}
