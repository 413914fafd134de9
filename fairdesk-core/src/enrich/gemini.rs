//! Gemini `generateContent` client.
//!
//! Two request shapes are used: a free-text prompt with Google Search
//! grounding enabled, and a free-text prompt with an enforced JSON response
//! schema.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{prompts, Enricher};
use crate::config::FairDeskConfig;
use crate::error::{FairDeskError, FairDeskResult};
use crate::fair::{FairEnrichment, GroundingSource, PrepResult};

/// Title given to citations that arrive without one.
const UNTITLED_SOURCE: &str = "Source";

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// A missing API key is not an error here; calls fail with
    /// [`FairDeskError::MissingApiKey`] instead, so read-only commands work
    /// without one.
    pub fn new(
        api_key: Option<String>,
        model: &str,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> FairDeskResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| FairDeskError::Config(format!("Could not build HTTP client: {}", e)))?;

        Ok(Self::with_http(http, api_key, model, base_url))
    }

    fn with_http(
        http: reqwest::Client,
        api_key: Option<String>,
        model: &str,
        base_url: &str,
    ) -> Self {
        GeminiClient {
            http,
            api_key: api_key.filter(|k| !k.is_empty()),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &FairDeskConfig) -> FairDeskResult<Self> {
        Self::new(
            config.api_key.clone(),
            &config.model,
            &config.base_url,
            config.request_timeout(),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> FairDeskResult<GenerateContentResponse> {
        let api_key = self.api_key.as_deref().ok_or(FairDeskError::MissingApiKey)?;

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(FairDeskError::Enrichment(format!(
                "Gemini API error {}: {}",
                status, text
            )));
        }

        resp.json::<GenerateContentResponse>().await.map_err(|e| {
            FairDeskError::Enrichment(format!("Failed to parse Gemini response: {}", e))
        })
    }
}

#[async_trait]
impl Enricher for GeminiClient {
    async fn enrich_fair(&self, name: &str) -> FairDeskResult<FairEnrichment> {
        tracing::debug!(fair = name, model = %self.model, "Requesting fair enrichment");
        let response = self.generate(&fair_request(name)).await?;

        let enrichment = FairEnrichment {
            description: response.text(),
            sources: response.grounding_sources(),
        };
        tracing::debug!(sources = enrichment.sources.len(), "Fair enrichment received");
        Ok(enrichment)
    }

    async fn prepare_meeting_brief(&self, details: &str) -> FairDeskResult<PrepResult> {
        tracing::debug!(model = %self.model, "Requesting meeting prep");
        let response = self.generate(&prep_request(details)).await?;
        parse_prep(&response.text())
    }
}

// ============================================================================
// Request shapes
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

fn user_turn(text: String) -> Content {
    Content {
        role: "user".to_string(),
        parts: vec![Part {
            text: Some(text),
            thought: false,
        }],
    }
}

fn fair_request(name: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![user_turn(prompts::fair_lookup(name))],
        tools: vec![Tool {
            google_search: GoogleSearch {},
        }],
        generation_config: None,
    }
}

fn prep_request(details: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![user_turn(prompts::meeting_prep(details))],
        tools: Vec::new(),
        generation_config: Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: prep_schema(),
        }),
    }
}

/// `{summary: string, suggestedQuestions: string[]}`, both required.
fn prep_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": { "type": "STRING" },
            "suggestedQuestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["summary", "suggestedQuestions"]
    })
}

// ============================================================================
// Response shapes
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    thought: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct WebChunk {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

impl GenerateContentResponse {
    fn first_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Concatenated non-thought text parts of the first candidate.
    fn text(&self) -> String {
        self.first_candidate()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Web citations of the first candidate, in order. Chunks without a uri
    /// are dropped.
    fn grounding_sources(&self) -> Vec<GroundingSource> {
        let Some(metadata) = self.first_candidate().and_then(|c| c.grounding_metadata.as_ref())
        else {
            return Vec::new();
        };

        metadata
            .grounding_chunks
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .filter_map(|web| {
                let uri = web.uri.as_deref().filter(|u| !u.is_empty())?;
                let title = web
                    .title
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .unwrap_or(UNTITLED_SOURCE);
                Some(GroundingSource {
                    title: title.to_string(),
                    uri: uri.to_string(),
                })
            })
            .collect()
    }
}

fn parse_prep(text: &str) -> FairDeskResult<PrepResult> {
    serde_json::from_str(text)
        .map_err(|e| FairDeskError::Enrichment(format!("Meeting prep was not valid JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    /// Serves one canned HTTP response on a local port and hands back the raw
    /// request it received.
    async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let reply = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });

        (base_url, handle)
    }

    /// Reads headers plus a `content-length` body.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn local_client(base_url: &str) -> GeminiClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        GeminiClient::with_http(http, Some("test-key".into()), "gemini-test", base_url)
    }

    #[test]
    fn test_fair_request_enables_search() {
        let body = serde_json::to_value(fair_request("MWC Barcelona 2025")).unwrap();
        assert_eq!(body["tools"], json!([{ "googleSearch": {} }]));
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("MWC Barcelona 2025"));
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_prep_request_declares_schema() {
        let body = serde_json::to_value(prep_request("Contact: Jane Doe")).unwrap();
        let config = &body["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["required"], json!(["summary", "suggestedQuestions"]));
        assert_eq!(
            config["responseSchema"]["properties"]["suggestedQuestions"]["items"]["type"],
            "STRING"
        );
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_text_joins_parts_and_skips_thoughts() {
        let resp = response(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "thinking...", "thought": true },
                        { "text": "MWC runs Feb 24–27, " },
                        { "text": "Barcelona." }
                    ]
                }
            }]
        }));
        assert_eq!(resp.text(), "MWC runs Feb 24–27, Barcelona.");
    }

    #[test]
    fn test_text_empty_without_candidates() {
        assert_eq!(response(json!({})).text(), "");
        assert_eq!(response(json!({ "candidates": [{}] })).text(), "");
    }

    #[test]
    fn test_grounding_sources_defaults_and_filters() {
        let resp = response(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "answer" }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "title": "mwcbarcelona.com", "uri": "https://a.example/1" } },
                        { "web": { "uri": "https://a.example/2" } },
                        { "web": { "title": "no uri" } },
                        { "web": { "title": "empty uri", "uri": "" } },
                        { "retrievedContext": { "uri": "gs://bucket" } }
                    ]
                }
            }]
        }));

        assert_eq!(
            resp.grounding_sources(),
            vec![
                GroundingSource {
                    title: "mwcbarcelona.com".to_string(),
                    uri: "https://a.example/1".to_string(),
                },
                GroundingSource {
                    title: "Source".to_string(),
                    uri: "https://a.example/2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_grounding_sources_absent_metadata() {
        let resp = response(json!({ "candidates": [{ "content": { "parts": [] } }] }));
        assert!(resp.grounding_sources().is_empty());
    }

    #[test]
    fn test_parse_prep() {
        let prep = parse_prep(
            r#"{"summary": "Acme wants exclusivity.", "suggestedQuestions": ["Volume?", "Timeline?", "Margins?"]}"#,
        )
        .unwrap();
        assert_eq!(prep.summary, "Acme wants exclusivity.");
        assert_eq!(prep.suggested_questions.len(), 3);
    }

    #[test]
    fn test_parse_prep_rejects_missing_fields() {
        assert!(parse_prep("{}").is_err());
        assert!(parse_prep(r#"{"summary": "only a summary"}"#).is_err());
    }

    #[test]
    fn test_parse_prep_rejects_non_json() {
        assert!(parse_prep("Here is your summary: ...").is_err());
        assert!(parse_prep("").is_err());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = GeminiClient::new(None, "gemini-test", "http://127.0.0.1:9", None).unwrap();

        let err = client.enrich_fair("Expo X").await.unwrap_err();
        assert!(matches!(err, FairDeskError::MissingApiKey));

        let err = client.prepare_meeting_brief("details").await.unwrap_err();
        assert!(matches!(err, FairDeskError::MissingApiKey));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(
            Some("k".into()),
            "gemini-3-flash-preview",
            "https://host/",
            None,
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://host/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn test_enrich_fair_over_http() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "MWC runs Feb 24–27 at Fira Gran Via." }]
                },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "title": "mwcbarcelona.com", "uri": "https://a.example/1" } }
                    ]
                }
            }]
        });
        let (base_url, server) = serve_once("200 OK", body.to_string()).await;

        let enrichment = local_client(&base_url).enrich_fair("MWC Barcelona 2025").await.unwrap();
        assert_eq!(enrichment.description, "MWC runs Feb 24–27 at Fira Gran Via.");
        assert_eq!(enrichment.sources.len(), 1);
        assert_eq!(enrichment.sources[0].title, "mwcbarcelona.com");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1beta/models/gemini-test:generateContent "));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains("googleSearch"));
        assert!(request.contains("MWC Barcelona 2025"));
    }

    #[tokio::test]
    async fn test_prepare_meeting_brief_over_http() {
        let brief = json!({
            "summary": "Acme wants exclusivity.",
            "suggestedQuestions": ["Volume?", "Timeline?", "Margins?"]
        });
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": brief.to_string() }] } }]
        });
        let (base_url, server) = serve_once("200 OK", body.to_string()).await;

        let prep = local_client(&base_url)
            .prepare_meeting_brief("Contact: Jane Doe")
            .await
            .unwrap();
        assert_eq!(prep.summary, "Acme wants exclusivity.");
        assert_eq!(prep.suggested_questions, vec!["Volume?", "Timeline?", "Margins?"]);

        let request = server.await.unwrap();
        assert!(request.contains("responseSchema"));
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let (base_url, server) =
            serve_once("503 Service Unavailable", r#"{"error":"overloaded"}"#.to_string()).await;

        let err = local_client(&base_url).enrich_fair("Expo X").await.unwrap_err();
        match err {
            FairDeskError::Enrichment(message) => {
                assert!(message.contains("503"));
                assert!(message.contains("overloaded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_undecodable_envelope_is_an_error() {
        let (base_url, server) = serve_once("200 OK", "<html>not json</html>".to_string()).await;

        let err = local_client(&base_url).enrich_fair("Expo X").await.unwrap_err();
        assert!(matches!(err, FairDeskError::Enrichment(_)));
        server.await.unwrap();
    }
}
