use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OPENROUTER_URL;
use crate::{CleanError, Result};

/// System instruction: the model must answer with the cleaned text only
const SYSTEM_PROMPT: &str = "Only perform the action the user specifies. \
Do not add a greeting, preface, or summary of your work.";

/// The cleaning instructions sent ahead of every passage. Wording matters:
/// models follow the ellipsis/paragraph rule much more reliably when the
/// marker is spelled out as "three dots".
const CLEANING_INSTRUCTIONS: &str = "I need your help cleaning up some book notes from Readwise. \
These passages are too long and need to be broken into readable chunks. When you see three dots \
(...) that means there was a concatenation from the book, so it's a good place to make a new \
paragraph (please remove the 3 dots). If there are no dots, look for a logical place to start a \
new paragraph. Don't give an explanation of your work. If the last part of the text looks like \
'(Author Name, Book Title)' that's the source - don't include it in your results. Also, don't \
include any leading or trailing quotation marks in your response. I'll post the passages one at \
a time for you to clean up. Remove meta information as well such as the word 'Transcript' and \
the 'Speaker 1', 'Speaker 2' annotations.\n\
* Remove filler words and phrases like 'you know' and 'kind of' to make the text more concise.\n\
* Keep paragraphs relatively short, with each focusing on a single main idea or point.\n\
* Remove redundant information or repetitive phrases but keep the tone of the speaker.\n\
* If there is a title, keep it\n\
* Use bullet points for structured processes or lists.\n\
* Transform streams of questions into bullet points when they form a coherent list\n\
Highlight is as follows:";

/// Build the user message for one passage
pub fn build_user_prompt(text: &str) -> String {
    format!("{CLEANING_INSTRUCTIONS}\n\n{text}")
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// A capability that rewrites one passage of text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextCleaner: Send + Sync {
    /// Clean one passage, returning the rewritten text
    async fn clean(&self, text: &str) -> Result<String>;
}

/// Cleaner backed by the OpenRouter chat-completions API.
///
/// Each call is stateless and independent: one request, two messages, the
/// first choice's content back. No retries, no streaming.
pub struct OpenRouterCleaner {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenRouterCleaner {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, model, OPENROUTER_URL)
    }

    /// Point the cleaner at a non-default endpoint (used by tests)
    pub fn with_endpoint(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextCleaner for OpenRouterCleaner {
    async fn clean(&self, text: &str) -> Result<String> {
        let user_prompt = build_user_prompt(text);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        tracing::debug!("Sending cleaning request to {} with model {}", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CleanError::ApiStatus { status, body }.into());
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| CleanError::MalformedResponse.into())
    }
}
