//! Prompt selection
//!
//! Picks one template from a fixed pool, uniformly at random per run, and
//! renders it into a [`GenerationRequest`]. Template diversity keeps the
//! phrasing from repeating while the format constraints stay the same.

mod templates;

pub use templates::{PromptTemplate, Tone, PROMPT_POOL};

use crate::config::GenerationConfig;
use crate::generation::GenerationRequest;
use crate::price::TokenIdentity;
use handlebars::Handlebars;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::json;
use thiserror::Error;

/// Prompt rendering errors
#[derive(Debug, Error)]
pub enum PromptError {
    /// The template pool is empty
    #[error("Prompt pool is empty")]
    EmptyPool,
    /// A template failed to compile
    #[error("Invalid prompt template: {0}")]
    Template(#[from] handlebars::TemplateError),
    /// A template failed to render
    #[error("Failed to render prompt: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Pick a template uniformly at random
///
/// Each call is an independent draw. Returns `None` only for an empty pool.
pub fn select_prompt<'a, R: Rng + ?Sized>(
    pool: &'a [PromptTemplate],
    rng: &mut R,
) -> Option<&'a PromptTemplate> {
    pool.choose(rng)
}

/// Renders prompt templates into generation requests
pub struct PromptSelector {
    handlebars: Handlebars<'static>,
    pool: Vec<PromptTemplate>,
    system_instruction: Option<String>,
    max_output_tokens: u32,
}

impl PromptSelector {
    /// Create a selector over the built-in pool
    pub fn new(config: &GenerationConfig) -> Result<Self, PromptError> {
        Self::with_pool(
            PROMPT_POOL.to_vec(),
            config.system_instruction.clone(),
            config.max_output_tokens,
        )
    }

    /// Create a selector over a custom pool
    pub fn with_pool(
        pool: Vec<PromptTemplate>,
        system_instruction: Option<String>,
        max_output_tokens: u32,
    ) -> Result<Self, PromptError> {
        if pool.is_empty() {
            return Err(PromptError::EmptyPool);
        }

        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_partial("constraints", templates::CONSTRAINTS_PARTIAL)?;
        for (index, template) in pool.iter().enumerate() {
            handlebars.register_template_string(&template_name(index), template.body)?;
        }

        Ok(Self {
            handlebars,
            pool,
            system_instruction,
            max_output_tokens,
        })
    }

    /// The template pool
    pub fn pool(&self) -> &[PromptTemplate] {
        &self.pool
    }

    /// Render the template at `index` for a token
    pub fn render(
        &self,
        index: usize,
        identity: &TokenIdentity,
        max_chars: usize,
    ) -> Result<String, PromptError> {
        let data = json!({
            "address": identity.address,
            "ticker": identity.ticker_symbol,
            "name": identity.display_name,
            "max_chars": max_chars,
        });
        let rendered = self.handlebars.render(&template_name(index), &data)?;
        Ok(rendered)
    }

    /// Draw a template and build a fresh generation request from it
    pub fn build_request<R: Rng + ?Sized>(
        &self,
        identity: &TokenIdentity,
        max_chars: usize,
        rng: &mut R,
    ) -> Result<GenerationRequest, PromptError> {
        let template = select_prompt(&self.pool, rng).ok_or(PromptError::EmptyPool)?;
        let index = self
            .pool
            .iter()
            .position(|t| std::ptr::eq(t, template))
            .ok_or(PromptError::EmptyPool)?;
        let tone = template.tone;
        let prompt_text = self.render(index, identity, max_chars)?;

        tracing::debug!(?tone, address = %identity.address, "Selected prompt template");

        Ok(GenerationRequest {
            prompt_text,
            system_instruction: self.system_instruction.clone(),
            max_output_tokens: self.max_output_tokens,
        })
    }
}

fn template_name(index: usize) -> String {
    format!("prompt-{}", index)
}
