use serde::{Deserialize, Serialize};
use serde_json::json;

use super::types::TextBackend;
use super::BackendError;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

fn map_transport_error(e: reqwest::Error, base_url: &str, timeout_secs: u64) -> BackendError {
    if e.is_connect() {
        BackendError::Connection(base_url.to_string())
    } else if e.is_timeout() {
        BackendError::Timeout(timeout_secs)
    } else {
        BackendError::Http(e.to_string())
    }
}

// ─── OpenAI chat completions ─────────────────────────────────────────────────

/// Chat-completions client used for symptom extraction. Temperature is
/// pinned to 0.0 and output is bounded so repeated runs stay comparable.
pub struct OpenAiBackend {
    api_key: String,
    model: String,
    system: String,
    max_tokens: u32,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiBackend {
    pub fn new(
        api_key: &str,
        model: &str,
        system: &str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            system: system.to_string(),
            max_tokens,
            timeout_secs,
            client,
        }
    }
}

impl TextBackend for OpenAiBackend {
    fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{OPENAI_BASE_URL}/chat/completions");
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: &self.system },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: 0.0,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| map_transport_error(e, OPENAI_BASE_URL, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| BackendError::Decode("response contained no choices".into()))
    }
}

// ─── Gemini generateContent ──────────────────────────────────────────────────

/// `generateContent` client used for medicine prediction. The backend
/// supports structured output, so responses are constrained to an array of
/// {name, composition, reason, confidence} objects.
pub struct GeminiBackend {
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: String,
}

/// Response schema: an array of medicine suggestion objects.
fn medicine_response_schema() -> serde_json::Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "composition": {"type": "string"},
                "reason": {"type": "string"},
                "confidence": {"type": "number"}
            }
        }
    })
}

impl GeminiBackend {
    pub fn new(api_key: &str, model: &str, max_tokens: u32, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            timeout_secs,
            client,
        }
    }
}

impl TextBackend for GeminiBackend {
    fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{GEMINI_BASE_URL}/models/{}:generateContent", self.model);
        let body = GenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: self.max_tokens,
                response_mime_type: "application/json",
                response_schema: medicine_response_schema(),
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| map_transport_error(e, GEMINI_BASE_URL, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(BackendError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| BackendError::Decode("response contained no candidates".into()))
    }
}

// ─── Test doubles ────────────────────────────────────────────────────────────

/// Mock backend for testing — returns a configurable response.
pub struct MockBackend {
    response: String,
}

impl MockBackend {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl TextBackend for MockBackend {
    fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        Ok(self.response.clone())
    }
}

/// Mock backend that always fails with a connection error, for exercising
/// the gateway's fallback path.
pub struct FailingBackend;

impl TextBackend for FailingBackend {
    fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        Err(BackendError::Connection("http://localhost:0".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_backend_returns_configured_response() {
        let backend = MockBackend::new(r#"{"symptoms": []}"#);
        assert_eq!(backend.generate("anything").unwrap(), r#"{"symptoms": []}"#);
    }

    #[test]
    fn failing_backend_reports_connection_error() {
        let result = FailingBackend.generate("anything");
        assert!(matches!(result, Err(BackendError::Connection(_))));
    }

    #[test]
    fn chat_request_serializes_expected_shape() {
        let body = ChatRequest {
            model: "gpt-4",
            messages: vec![
                ChatMessage { role: "system", content: "sys" },
                ChatMessage { role: "user", content: "hello" },
            ],
            temperature: 0.0,
            max_tokens: 600,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["max_tokens"], 600);
    }

    #[test]
    fn generate_request_serializes_camel_case() {
        let body = GenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 600,
                response_mime_type: "application/json",
                response_schema: medicine_response_schema(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "array");
    }

    #[test]
    fn chat_response_deserializes() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": "{}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "{}");
    }

    #[test]
    fn generate_response_deserializes() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "[]"}], "role": "model"}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "[]");
    }

    #[test]
    fn backend_constructors() {
        let openai = OpenAiBackend::new("key", "gpt-4", "sys", 600, 60);
        assert_eq!(openai.model, "gpt-4");
        assert_eq!(openai.timeout_secs, 60);

        let gemini = GeminiBackend::new("key", "gemini-2.5-flash", 600, 60);
        assert_eq!(gemini.model, "gemini-2.5-flash");
        assert_eq!(gemini.max_tokens, 600);
    }
}
