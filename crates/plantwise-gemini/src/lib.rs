// SPDX-FileCopyrightText: 2026 Plantwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini model backend for the Plantwise RAG assistant.
//!
//! Implements [`ModelBackend`] over the stateless `generateContent` endpoint
//! by keeping each session's contents locally and replaying them on every
//! request.

pub mod client;
pub mod types;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use plantwise_config::PlantwiseConfig;
use plantwise_core::{
    AdapterType, FunctionCall, HealthStatus, ModelBackend, ModelReply, ModelRole,
    ModelSessionConfig, ModelTurn, PlantwiseError, PluginAdapter, PromptPart, SessionHandle,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::types::{
    Content, FunctionDeclaration, FunctionResponsePart, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, InlineData, Part, ToolSet,
};

/// State of one open chat session.
#[derive(Debug, Clone)]
struct ChatState {
    system_instruction: String,
    temperature: f32,
    tools: Vec<FunctionDeclaration>,
    contents: Vec<Content>,
}

impl ChatState {
    fn request(&self) -> GenerateContentRequest {
        let tools = if self.tools.is_empty() {
            Vec::new()
        } else {
            vec![ToolSet {
                function_declarations: self.tools.clone(),
            }]
        };
        GenerateContentRequest {
            contents: self.contents.clone(),
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(self.system_instruction.clone())],
            }),
            tools,
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        }
    }
}

/// Gemini backend implementing [`ModelBackend`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiBackend {
    client: GeminiClient,
    sessions: Mutex<HashMap<String, ChatState>>,
}

impl GeminiBackend {
    /// Creates a backend from the `gemini` configuration section.
    pub fn new(config: &PlantwiseConfig) -> Result<Self, PlantwiseError> {
        let api_key = resolve_api_key(&config.gemini.api_key)?;
        let client = GeminiClient::new(
            &api_key,
            config.gemini.model.clone(),
            config.gemini.base_url.clone(),
            Duration::from_secs(config.gemini.timeout_secs),
            config.gemini.max_retries,
        )?;

        info!(model = %config.gemini.model, "Gemini backend initialized");
        Ok(Self::with_client(client))
    }

    /// Creates a backend over an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self {
            client,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Number of open sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Sends the conversation plus `turn` and records both on success.
    ///
    /// Nothing is committed until a reply with content arrives, so a failed,
    /// timed-out or cancelled request leaves the session as it was.
    async fn exchange(
        &self,
        handle: &SessionHandle,
        turn: Content,
    ) -> Result<GenerateContentResponse, PlantwiseError> {
        let request = {
            let sessions = self.sessions.lock().await;
            let state = sessions.get(&handle.0).ok_or_else(|| PlantwiseError::NotFound {
                kind: "model session",
                id: handle.0.clone(),
            })?;
            let mut request = state.request();
            request.contents.push(turn.clone());
            request
        };

        let response = self.client.generate_content(&request).await?;

        let reply = response
            .candidates
            .first()
            .and_then(|c| c.content.clone())
            .filter(|c| !c.parts.is_empty());
        let Some(reply) = reply else {
            // Blocked or empty candidate: an empty model turn would poison
            // every later request, so the exchange is not recorded.
            warn!(
                session = %handle.0,
                finish_reason = ?response.candidates.first().and_then(|c| c.finish_reason.clone()),
                "Gemini returned no content"
            );
            return Ok(response);
        };

        let mut sessions = self.sessions.lock().await;
        if let Some(state) = sessions.get_mut(&handle.0) {
            state.contents.push(turn);
            state.contents.push(Content {
                role: Some("model".into()),
                ..reply
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl PluginAdapter for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Model
    }

    async fn health_check(&self) -> Result<HealthStatus, PlantwiseError> {
        // No probe request: it would consume quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PlantwiseError> {
        self.sessions.lock().await.clear();
        debug!("Gemini backend shutting down");
        Ok(())
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn create_session(
        &self,
        config: ModelSessionConfig,
    ) -> Result<SessionHandle, PlantwiseError> {
        let handle = SessionHandle(uuid::Uuid::new_v4().to_string());
        let state = ChatState {
            system_instruction: config.system_instruction,
            temperature: config.temperature,
            tools: config
                .tools
                .into_iter()
                .map(|t| FunctionDeclaration {
                    name: t.name,
                    description: t.description,
                    parameters: t.parameters,
                })
                .collect(),
            contents: config.history.iter().map(turn_to_content).collect(),
        };

        debug!(
            session = %handle.0,
            history = state.contents.len(),
            model = %self.client.model(),
            "opened Gemini chat session"
        );
        self.sessions.lock().await.insert(handle.0.clone(), state);
        Ok(handle)
    }

    async fn send(
        &self,
        handle: &SessionHandle,
        parts: Vec<PromptPart>,
    ) -> Result<ModelReply, PlantwiseError> {
        let turn = Content::new("user", parts.into_iter().map(prompt_part).collect());
        let response = self.exchange(handle, turn).await?;
        Ok(reply_from_response(&response))
    }

    async fn send_tool_result(
        &self,
        handle: &SessionHandle,
        name: &str,
        result: serde_json::Value,
    ) -> Result<ModelReply, PlantwiseError> {
        let turn = Content::new(
            "user",
            vec![Part {
                function_response: Some(FunctionResponsePart {
                    name: name.to_string(),
                    response: result,
                }),
                ..Default::default()
            }],
        );
        let response = self.exchange(handle, turn).await?;
        Ok(reply_from_response(&response))
    }

    async fn close_session(&self, handle: &SessionHandle) -> Result<(), PlantwiseError> {
        if self.sessions.lock().await.remove(&handle.0).is_some() {
            debug!(session = %handle.0, "closed Gemini chat session");
        }
        Ok(())
    }
}

fn prompt_part(part: PromptPart) -> Part {
    match part {
        PromptPart::Text(text) => Part::text(text),
        PromptPart::InlineImage { mime_type, data } => Part {
            inline_data: Some(InlineData { mime_type, data }),
            ..Default::default()
        },
    }
}

fn turn_to_content(turn: &ModelTurn) -> Content {
    let role = match turn.role {
        ModelRole::User => "user",
        ModelRole::Model => "model",
    };
    Content::new(role, turn.parts.iter().cloned().map(prompt_part).collect())
}

/// Joins the text parts of the first candidate and collects its function calls.
fn reply_from_response(response: &GenerateContentResponse) -> ModelReply {
    let Some(content) = response.candidates.first().and_then(|c| c.content.as_ref()) else {
        return ModelReply::default();
    };

    let text = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("");
    let function_calls = content
        .parts
        .iter()
        .filter_map(|p| p.function_call.as_ref())
        .map(|c| FunctionCall {
            name: c.name.clone(),
            args: c.args.clone(),
        })
        .collect();

    ModelReply {
        text,
        function_calls,
    }
}

/// Resolves the API key: config value first, then `GEMINI_API_KEY`.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, PlantwiseError> {
    if let Some(key) = config_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    std::env::var("GEMINI_API_KEY").map_err(|_| {
        PlantwiseError::Config(
            "Gemini API key not found. Set gemini.api_key in config or GEMINI_API_KEY environment variable.".into(),
        )
    })
}
