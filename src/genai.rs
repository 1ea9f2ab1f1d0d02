//! Optional generated content: daily challenges and mood affirmations.
//!
//! The text service is never required. Every failure (no key, network,
//! unparseable reply) is logged and replaced by fixed fallback copy.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;
use crate::error::GenerationUnavailable;

const CHALLENGE_PROMPT: &str = "Generate a simple, quick (under 5 mins), non-clinical mental wellbeing \
challenge for a teenager. Examples: 'Take a photo of something yellow', 'Write down 3 wins'. \
Return valid JSON with 'title' and 'description'.";

pub const FALLBACK_CHALLENGE_TITLE: &str = "Nature Spotting";
pub const FALLBACK_CHALLENGE_DESCRIPTION: &str = "Look out the window and find 3 things that are green.";
pub const FALLBACK_AFFIRMATION: &str = "You are doing your best, and that is enough.";
pub const EMPTY_AFFIRMATION: &str = "It's okay to feel how you feel.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String, GenerationUnavailable>;
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Challenge {
    pub title: String,
    pub description: String,
}

impl Challenge {
    pub fn fallback() -> Self {
        Self {
            title: FALLBACK_CHALLENGE_TITLE.to_string(),
            description: FALLBACK_CHALLENGE_DESCRIPTION.to_string(),
        }
    }
}

pub async fn daily_challenge(generator: &dyn TextGenerator) -> Challenge {
    let parsed = match generator.generate(CHALLENGE_PROMPT, ResponseFormat::Json).await {
        Ok(text) => parse_challenge(&text),
        Err(e) => Err(e),
    };
    parsed.unwrap_or_else(|e| {
        tracing::warn!("AI unavailable (challenge): {e}");
        Challenge::fallback()
    })
}

fn parse_challenge(text: &str) -> Result<Challenge, GenerationUnavailable> {
    // Models sometimes wrap JSON in a fenced block even when asked not to.
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(trimmed).map_err(|e| GenerationUnavailable::Malformed(e.to_string()))
}

fn affirmation_prompt(mood: &str) -> String {
    format!(
        "The user is feeling \"{mood}\". Give a short, 1-sentence validating and supportive \
         affirmation for a teenager. No advice, just validation."
    )
}

pub async fn mood_affirmation(generator: &dyn TextGenerator, mood: &str) -> String {
    match generator.generate(&affirmation_prompt(mood), ResponseFormat::Text).await {
        Ok(text) if text.trim().is_empty() => EMPTY_AFFIRMATION.to_string(),
        Ok(text) => text.trim().to_string(),
        Err(GenerationUnavailable::Empty) => EMPTY_AFFIRMATION.to_string(),
        Err(e) => {
            tracing::warn!("AI unavailable (affirmation): {e}");
            FALLBACK_AFFIRMATION.to_string()
        }
    }
}

// ── Gemini ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: cfg.gemini_url.trim_end_matches('/').to_string(),
            model: cfg.gemini_model.clone(),
            api_key: cfg.gemini_api_key.clone(),
        }
    }

    fn key(&self) -> Result<&str, GenerationUnavailable> {
        match self.api_key.as_deref().map(str::trim) {
            Some(k) if !k.is_empty() && !k.contains("YOUR_GEMINI") => Ok(k),
            _ => Err(GenerationUnavailable::MissingKey),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String, GenerationUnavailable> {
        let key = self.key()?;

        let mut body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });
        if format == ResponseFormat::Json {
            body["generationConfig"] = serde_json::json!({ "responseMimeType": "application/json" });
        }

        let resp = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(GenerationUnavailable::Network(format!("HTTP {}", resp.status())));
        }

        let parsed: GenerateResponse = resp.json().await?;
        parsed.text().ok_or(GenerationUnavailable::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Result<&'static str, fn() -> GenerationUnavailable>);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _prompt: &str, _format: ResponseFormat) -> Result<String, GenerationUnavailable> {
            match &self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(make) => Err(make()),
            }
        }
    }

    #[tokio::test]
    async fn test_challenge_parses_json() {
        let generator = Canned(Ok(r#"{"title":"Three Wins","description":"Write down 3 wins."}"#));
        let c = daily_challenge(&generator).await;
        assert_eq!(c.title, "Three Wins");
    }

    #[tokio::test]
    async fn test_challenge_accepts_fenced_json() {
        let generator = Canned(Ok("```json\n{\"title\":\"Yellow\",\"description\":\"Photo of yellow.\"}\n```"));
        assert_eq!(daily_challenge(&generator).await.title, "Yellow");
    }

    #[tokio::test]
    async fn test_challenge_falls_back() {
        let generator = Canned(Ok("not json"));
        assert_eq!(daily_challenge(&generator).await, Challenge::fallback());
        let generator = Canned(Err(|| GenerationUnavailable::MissingKey));
        assert_eq!(daily_challenge(&generator).await, Challenge::fallback());
    }

    #[tokio::test]
    async fn test_affirmation_fallbacks() {
        let generator = Canned(Err(|| GenerationUnavailable::Network("down".into())));
        assert_eq!(mood_affirmation(&generator, "sad").await, FALLBACK_AFFIRMATION);
        let generator = Canned(Ok("  "));
        assert_eq!(mood_affirmation(&generator, "sad").await, EMPTY_AFFIRMATION);
        let generator = Canned(Ok("Feeling sad is valid."));
        assert_eq!(mood_affirmation(&generator, "sad").await, "Feeling sad is valid.");
    }

    #[tokio::test]
    async fn test_placeholder_key_is_unavailable() {
        let cfg = Config { gemini_api_key: Some("YOUR_GEMINI_KEY".into()), ..Config::default() };
        let client = GeminiClient::new(&cfg);
        let err = client.generate("hi", ResponseFormat::Text).await.unwrap_err();
        assert!(matches!(err, GenerationUnavailable::MissingKey));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.text().as_deref(), Some("ab"));
        let resp: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(resp.text(), None);
    }
}
