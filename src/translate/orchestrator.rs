use futures_util::future::join_all;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::config::{Config, UnclassifiedPolicy};
use crate::error::{Result, TsuyakuError};
use crate::message::InputMessage;
use crate::reply::{ReplyAssembler, ReplyPayload, ReplySink};
use crate::script::classify;
use super::backend::{BackendFactory, TranslationClient};
use super::prompt::PromptBuilder;
use super::retry::RetryPolicy;
use super::sanitize::sanitize_against;
use super::{directions_for, TranslationRequest, TranslationResult};

/// Classifies incoming text, runs one pipeline per direction and assembles
/// the reply. Holds no per-request state.
pub struct Translator {
    client: TranslationClient,
    prompts: PromptBuilder,
    retry: RetryPolicy,
    assembler: ReplyAssembler,
    unclassified: UnclassifiedPolicy,
    failure_message: String,
    guidance_message: String,
}

impl Translator {
    pub fn new(client: TranslationClient, config: &Config) -> Self {
        Self {
            client,
            prompts: PromptBuilder::from_config(&config.translate, config.backend.structured_output),
            retry: RetryPolicy::from_config(&config.translate),
            assembler: ReplyAssembler::from_config(&config.reply),
            unclassified: config.translate.unclassified,
            failure_message: config.reply.failure_message.clone(),
            guidance_message: config.reply.guidance_message.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = BackendFactory::create(&config.backend)?;
        info!("Using {} backend with model {}", backend.name(), config.backend.model);
        Ok(Self::new(TranslationClient::new(backend, &config.backend), config))
    }

    /// Translate `text` into every language its script calls for.
    ///
    /// Directions run concurrently and fail independently; a failed
    /// direction shows up as a placeholder block. Only when every direction
    /// failed is the whole call an error.
    pub async fn translate(&self, text: &str) -> Result<ReplyPayload> {
        let category = classify(text);
        let directions = directions_for(category, self.unclassified);
        info!("Detected {} script, {} direction(s)", category, directions.len());

        if directions.is_empty() {
            return Ok(ReplyPayload::single(self.guidance_message.clone()));
        }

        let requests: Vec<TranslationRequest> = directions
            .iter()
            .map(|direction| TranslationRequest { text: text.to_string(), target: direction.target })
            .collect();
        let outcomes = join_all(requests.iter().map(|request| self.translate_one(request))).await;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (direction, outcome) in directions.iter().zip(outcomes) {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Translation to {} failed: {}", direction.target, e);
                    failures.push(format!("{}: {}", direction.target, e));
                    results.push(TranslationResult::empty(direction.target));
                }
            }
        }

        if failures.len() == directions.len() {
            return Err(TsuyakuError::TranslationFailure(failures.join("; ")));
        }

        Ok(self.assembler.assemble(results))
    }

    /// Run a single direction: prompt, call, clean, and retry on echo.
    pub async fn translate_one(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        let (text, target) = (request.text.as_str(), request.target);
        let prompt = self.prompts.build(text, target);
        let mut output = sanitize_against(text, &self.client.invoke(&prompt).await?);
        let mut retried = false;

        let mut attempt = 0;
        while attempt < self.retry.max_retries() && self.retry.should_retry(text, &output) {
            attempt += 1;
            retried = true;
            info!("Output for {} echoes the source, retry {}/{}", target, attempt, self.retry.max_retries());

            match self.client.invoke(&prompt).await {
                Ok(raw) => {
                    let candidate = sanitize_against(text, &raw);
                    if candidate.is_empty() {
                        warn!("Retry for {} returned nothing, keeping previous output", target);
                        break;
                    }
                    output = candidate;
                }
                Err(e) => {
                    warn!("Retry for {} failed, keeping previous output: {}", target, e);
                    break;
                }
            }
        }

        info!("{} => {}", target, output);
        Ok(TranslationResult { target, text: output, retried })
    }

    /// Always produces a reply; total failure becomes the fixed failure message.
    pub async fn respond(&self, message: &InputMessage) -> ReplyPayload {
        match self.translate(message.text()).await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Translation error: {}", e);
                ReplyPayload::single(self.failure_message.clone())
            }
        }
    }

    /// Translate a message and hand the reply to `sink`.
    pub async fn handle(&self, message: &InputMessage, sink: &dyn ReplySink) -> Result<()> {
        let span = tracing::info_span!(
            "message",
            request_id = %Uuid::new_v4(),
            sender = %message.sender(),
        );

        async {
            info!("Received at {}: {}", message.received_at().to_rfc3339(), message.text());
            let payload = self.respond(message).await;
            sink.deliver(message, &payload).await
        }
        .instrument(span)
        .await
    }
}
