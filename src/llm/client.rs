//! Gemini client

use crate::config::LlmConfig;
use crate::error::{AppError, Result};

use super::types::{ChatTurn, Content, GenerateContentRequest, GenerateContentResponse};

/// Instruction for turning page text into an illustration prompt.
const RENDER_PROMPT_INSTRUCTION: &str = "You turn one page of a children's storybook into a \
    single English prompt for an illustration model. Describe the scene as comma-separated \
    visual phrases in a warm storybook watercolor style. Do not use character names or \
    quotation marks. Reply with the prompt only.";

/// Instruction for the per-page comprehension question.
const READING_QUESTION_INSTRUCTION: &str = "You are a friendly reading companion for a young \
    child. Given the text of a storybook page, ask one short, warm question that checks whether \
    the child understood the page. Reply with the question only.";

/// Instruction for reacting to a chat message.
const CHAT_REACTION_INSTRUCTION: &str = "You are a friendly reading companion chatting with a \
    young child about a storybook. React to the child's latest message in one or two short, \
    encouraging sentences.";

/// Instruction for summarizing a chat history.
const SUMMARY_INSTRUCTION: &str = "Summarize the following conversation between a child and \
    their reading companion in two or three sentences, focusing on what the child said and felt.";

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl GeminiClient {
    pub fn new(config: LlmConfig, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY is not set".to_string()))
    }

    /// Build an illustration prompt from extracted page text.
    ///
    /// The completion is returned unvalidated; whatever the model says is
    /// what the renderer gets.
    pub async fn build_render_prompt(&self, page_text: &str) -> Result<String> {
        self.generate(RENDER_PROMPT_INSTRUCTION, vec![Content::user(page_text)])
            .await
    }

    /// Build one short comprehension question about the page.
    pub async fn build_reading_question(&self, page_text: &str) -> Result<String> {
        self.generate(READING_QUESTION_INSTRUCTION, vec![Content::user(page_text)])
            .await
    }

    /// React to the child's latest chat message given the prior turns.
    pub async fn chat_reaction(&self, message: &str, history: &[ChatTurn]) -> Result<String> {
        let mut contents = contents_from_history(history);
        contents.push(Content::user(message));
        self.generate(CHAT_REACTION_INSTRUCTION, contents).await
    }

    /// Summarize a chat history.
    ///
    /// The history is rendered as one transcript block so the request always
    /// ends on a user turn, which `generateContent` requires.
    pub async fn summarize_history(&self, history: &[ChatTurn]) -> Result<String> {
        let transcript = render_transcript(history);
        self.generate(SUMMARY_INSTRUCTION, vec![Content::user(transcript)])
            .await
    }

    async fn generate(&self, instruction: &str, contents: Vec<Content>) -> Result<String> {
        let key = self.api_key()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            key
        );

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::system(instruction)),
        };

        let response = self.http.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Vendor(format!(
                "Gemini returned {}: {}",
                status, body
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .text()
            .ok_or_else(|| AppError::Vendor("Gemini response contained no text".to_string()))
    }
}

fn contents_from_history(history: &[ChatTurn]) -> Vec<Content> {
    history
        .iter()
        .map(|turn| match turn.gemini_role() {
            "model" => Content::model(turn.text.clone()),
            _ => Content::user(turn.text.clone()),
        })
        .collect()
}

fn render_transcript(history: &[ChatTurn]) -> String {
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.gemini_role(), turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;

    fn turn(role: &str, text: &str) -> ChatTurn {
        ChatTurn {
            role: role.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let config = LlmConfig {
            api_base: "http://localhost:1".to_string(),
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
        };
        let client = GeminiClient::new(config, reqwest::Client::new());
        let err = client.build_render_prompt("some text").await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.to_string(), "GEMINI_API_KEY is not set");
    }

    #[test]
    fn test_history_roles_are_collapsed() {
        let history = vec![turn("child", "I liked the fox"), turn("ai", "Me too!")];
        let contents = contents_from_history(&history);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[1].role.as_deref(), Some("model"));
    }

    #[test]
    fn test_transcript_rendering() {
        let history = vec![turn("user", "hello"), turn("model", "hi!")];
        assert_eq!(render_transcript(&history), "user: hello\nmodel: hi!");
    }
}
