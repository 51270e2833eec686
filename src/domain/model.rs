use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Binary image content captured from the caller, plus its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    data: Arc<[u8]>,
    mime_type: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<Arc<[u8]>>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One remote model configuration in the fallback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAttempt {
    pub model: String,
    #[serde(default)]
    pub thinking_budget: u32,
    pub label: String,
}

impl ModelAttempt {
    pub fn new(model: impl Into<String>, thinking_budget: u32, label: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            thinking_budget,
            label: label.into(),
        }
    }

    /// The reasoning directive to send, if any. A zero budget sends nothing.
    pub fn reasoning_budget(&self) -> Option<u32> {
        (self.thinking_budget > 0).then_some(self.thinking_budget)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationGuess {
    #[serde(default)]
    pub place: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(deserialize_with = "deserialize_confidence")]
    pub confidence: i64,
    #[serde(default)]
    pub reasoning: String,
}

impl LocationGuess {
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn confidence_tier(&self) -> ConfidenceTier {
        match self.confidence {
            c if c > 80 => ConfidenceTier::High,
            c if c > 50 => ConfidenceTier::Medium,
            _ => ConfidenceTier::Low,
        }
    }

    pub fn google_maps_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.latitude, self.longitude
        )
    }

    pub fn osm_embed_url(&self) -> String {
        const PAD: f64 = 0.005;
        format!(
            "https://www.openstreetmap.org/export/embed.html?bbox={},{},{},{}&layer=mapnik&marker={},{}",
            self.longitude - PAD,
            self.latitude - PAD,
            self.longitude + PAD,
            self.latitude + PAD,
            self.latitude,
            self.longitude
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfidence {
    Number(serde_json::Number),
    Text(String),
}

// Models sometimes emit 87.5 or "85" where an integer is asked for.
fn deserialize_confidence<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawConfidence::deserialize(deserializer)? {
        RawConfidence::Number(number) => number,
        RawConfidence::Text(text) => text.trim().trim_end_matches('%').trim().parse().map_err(
            |_| serde::de::Error::custom(format!("confidence '{}' is not a number", text)),
        )?,
    };
    if let Some(int) = value.as_i64() {
        return Ok(int);
    }
    value
        .as_f64()
        .map(|f| f.round() as i64)
        .ok_or_else(|| serde::de::Error::custom("confidence is not a finite number"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub clue: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// The structured answer for one photograph. `sources` is never read from the
/// model body; it is filled from grounding metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub guesses: Vec<LocationGuess>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
    pub summary: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl AnalysisResult {
    pub fn best_guess(&self) -> Option<&LocationGuess> {
        self.guesses.first()
    }
}

/// A citation as attached by the remote service; either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCitation {
    pub title: Option<String>,
    pub uri: Option<String>,
}

impl RawCitation {
    pub fn new(title: Option<&str>, uri: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            uri: uri.map(str::to_string),
        }
    }
}

/// Base64 image data as it travels to the model service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineImage<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

/// One outbound call: a single model, the instruction text and the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub image: InlineImage<'a>,
    pub web_search: bool,
    pub reasoning_budget: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResponse {
    pub text: String,
    pub citations: Vec<RawCitation>,
}

/// A successful analysis along with the attempt that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub model: String,
    pub label: String,
    pub attempts_made: usize,
}
