use super::models::{AiConfig, AiMessage, AiProviderResponse, EntryAnalysis};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("AI provider error: {status} - {body}")]
    Provider { status: u16, body: String },

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Sends a chat completion request to the AI provider.
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<AiProviderResponse, AiError>;
}

// Blanket implementation for Box<dyn AiProvider> so the provider can be
// picked at runtime.
#[async_trait]
impl AiProvider for Box<dyn AiProvider> {
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<AiProviderResponse, AiError> {
        (**self).chat_complete(messages, config).await
    }
}

/// Temperature for the structured sentiment/theme extraction.
const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Temperature for the conversational follow-up question.
const FOLLOW_UP_TEMPERATURE: f32 = 0.7;

pub struct AiService<P: AiProvider> {
    provider: P,
    model: String,
}

impl<P: AiProvider> AiService<P> {
    /// Each call picks its own temperature; only the model is shared.
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Send a single user prompt and return the model's text.
    async fn complete(&self, prompt: String, temperature: f32) -> Result<String, AiError> {
        let config = AiConfig {
            model: self.model.clone(),
            temperature,
            max_tokens: None,
        };
        let response = self
            .provider
            .chat_complete(&[AiMessage::user(prompt)], &config)
            .await?;

        Ok(response.content)
    }

    /// Extract sentiment, themes and emotions from an entry.
    pub async fn analyze_entry(&self, content: &str) -> Result<EntryAnalysis, AiError> {
        let raw = self
            .complete(analysis_prompt(content), ANALYSIS_TEMPERATURE)
            .await?;
        parse_analysis(&raw)
    }

    /// Generate one empathetic follow-up question for an entry.
    pub async fn follow_up_question(
        &self,
        content: &str,
        recent_themes: &[String],
    ) -> Result<String, AiError> {
        let raw = self
            .complete(follow_up_prompt(content, recent_themes), FOLLOW_UP_TEMPERATURE)
            .await?;
        Ok(raw.trim().to_string())
    }
}

fn analysis_prompt(content: &str) -> String {
    format!(
        r#"Analyze this journal entry for sentiment and themes. Return JSON only.

Entry: "{}"

Return format:
{{
  "sentiment": {{
    "score": <-1 to 1>,
    "label": "positive|neutral|negative"
  }},
  "themes": ["theme1", "theme2"],
  "emotions": ["emotion1", "emotion2"]
}}"#,
        content
    )
}

fn follow_up_prompt(content: &str, recent_themes: &[String]) -> String {
    let themes = if recent_themes.is_empty() {
        "none".to_string()
    } else {
        recent_themes.join(", ")
    };

    format!(
        r#"Based on this journal entry and recent context, generate ONE empathetic follow-up question.

Current entry: "{}"
Recent themes: {}

Generate a thoughtful question that encourages deeper reflection. Be warm and conversational."#,
        content, themes
    )
}

/// Parse the model's analysis JSON.
///
/// Models sometimes wrap JSON in a Markdown code fence; that wrapper is
/// removed before parsing. Scores are clamped to [-1, 1].
pub fn parse_analysis(raw: &str) -> Result<EntryAnalysis, AiError> {
    let json = strip_code_fence(raw);
    let mut analysis: EntryAnalysis =
        serde_json::from_str(json).map_err(|e| AiError::MalformedResponse(e.to_string()))?;

    if !analysis.sentiment.score.is_finite() {
        return Err(AiError::MalformedResponse(
            "sentiment score is not a number".to_string(),
        ));
    }
    analysis.sentiment.score = analysis.sentiment.score.clamp(-1.0, 1.0);

    Ok(analysis)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop an optional language tag on the opening fence
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::super::models::SentimentLabel;
    use super::*;
    use std::sync::Mutex;

    /// Returns canned responses and records what it was sent.
    struct ScriptedProvider {
        responses: Mutex<Vec<Result<String, AiError>>>,
        seen: Mutex<Vec<(String, f32, String)>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Result<String, AiError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AiProvider for ScriptedProvider {
        async fn chat_complete(
            &self,
            messages: &[AiMessage],
            config: &AiConfig,
        ) -> Result<AiProviderResponse, AiError> {
            self.seen
                .lock()
                .unwrap()
                .push((messages[0].content.clone(), config.temperature, config.model.clone()));
            let next = self.responses.lock().unwrap().remove(0);
            next.map(|content| AiProviderResponse { content })
        }
    }

    const MODEL: &str = "gpt-3.5-turbo";

    const ANALYSIS_JSON: &str = r#"{"sentiment":{"score":0.6,"label":"positive"},"themes":["family"],"emotions":["gratitude"]}"#;

    #[test]
    fn test_parse_plain_json() {
        let analysis = parse_analysis(ANALYSIS_JSON).unwrap();
        assert_eq!(analysis.sentiment.label, SentimentLabel::Positive);
        assert_eq!(analysis.themes, vec!["family".to_string()]);
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = format!("```json\n{}\n```", ANALYSIS_JSON);
        let analysis = parse_analysis(&raw).unwrap();
        assert_eq!(analysis.emotions, vec!["gratitude".to_string()]);
    }

    #[test]
    fn test_parse_clamps_score() {
        let analysis =
            parse_analysis(r#"{"sentiment":{"score":-3.5,"label":"negative"}}"#).unwrap();
        assert_eq!(analysis.sentiment.score, -1.0);
        assert!(analysis.themes.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_analysis("I think this entry is positive!").unwrap_err();
        assert!(matches!(err, AiError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_rejects_unknown_label() {
        assert!(parse_analysis(r#"{"sentiment":{"score":0.1,"label":"ecstatic"}}"#).is_err());
    }

    #[tokio::test]
    async fn test_analyze_uses_low_temperature() {
        let provider = ScriptedProvider::new(vec![Ok(ANALYSIS_JSON.to_string())]);
        let service = AiService::new(provider, MODEL);

        let analysis = service.analyze_entry("A lovely dinner with my family").await.unwrap();

        assert_eq!(analysis.sentiment.score, 0.6);
        let seen = service.provider.seen.lock().unwrap();
        assert!(seen[0].0.contains("A lovely dinner with my family"));
        assert_eq!(seen[0].1, ANALYSIS_TEMPERATURE);
        assert_eq!(seen[0].2, MODEL);
    }

    #[tokio::test]
    async fn test_follow_up_includes_recent_themes() {
        let provider = ScriptedProvider::new(vec![Ok("  What made dinner special?\n".to_string())]);
        let service = AiService::new(provider, MODEL);

        let question = service
            .follow_up_question("Dinner was great", &["family".to_string(), "food".to_string()])
            .await
            .unwrap();

        assert_eq!(question, "What made dinner special?");
        let seen = service.provider.seen.lock().unwrap();
        assert!(seen[0].0.contains("Recent themes: family, food"));
        assert_eq!(seen[0].1, FOLLOW_UP_TEMPERATURE);
        assert_eq!(seen[0].2, MODEL);
    }

    #[tokio::test]
    async fn test_follow_up_without_themes_says_none() {
        let provider = ScriptedProvider::new(vec![Ok("How are you?".to_string())]);
        let service = AiService::new(provider, MODEL);

        service.follow_up_question("Quiet day", &[]).await.unwrap();

        let seen = service.provider.seen.lock().unwrap();
        assert!(seen[0].0.contains("Recent themes: none"));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = ScriptedProvider::new(vec![Err(AiError::Transport("down".to_string()))]);
        let service = AiService::new(provider, MODEL);

        let err = service.analyze_entry("Anything at all").await.unwrap_err();
        assert!(matches!(err, AiError::Transport(_)));
    }
}
