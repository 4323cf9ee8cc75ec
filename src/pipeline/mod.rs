//! Event pipeline
//!
//! One run per transfer event: lookup, filter, prompt, generate, format,
//! publish. Runs share nothing but the read-only components held here, so
//! any number of them may proceed concurrently.

mod filter;
mod types;

pub use filter::{EligibilityFilter, FilterResult, RejectReason};
pub use types::{PipelineError, PipelineOutcome, TransferEvent};

use crate::config::{Config, Credentials};
use crate::generation::{
    GenerationRequest, OpenAiClient, OpenAiConfig, TextGenerator, TextService,
};
use crate::post::{
    ContentFormatter, DryRunFeed, Publisher, SocialFeed, TwitterClient, TwitterConfig,
};
use crate::price::{DexScreenerClient, DexScreenerConfig, PriceLookup, TokenIdentity};
use crate::prompt::{PromptError, PromptSelector};
use crate::telemetry::record_run;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Orchestrates a single transfer event through to a published post
pub struct EventPipeline {
    lookup: Arc<dyn PriceLookup>,
    filter: EligibilityFilter,
    prompts: PromptSelector,
    generator: TextGenerator,
    formatter: ContentFormatter,
    publisher: Publisher,
}

impl EventPipeline {
    /// Assemble a pipeline from explicit service implementations
    pub fn new(
        config: &Config,
        lookup: Arc<dyn PriceLookup>,
        text_service: Arc<dyn TextService>,
        feed: Arc<dyn SocialFeed>,
    ) -> Result<Self, PromptError> {
        Ok(Self {
            lookup,
            filter: EligibilityFilter::new(&config.pipeline),
            prompts: PromptSelector::new(&config.generation)?,
            generator: TextGenerator::new(text_service, &config.generation),
            formatter: ContentFormatter::new(&config.publish),
            publisher: Publisher::new(feed, &config.publish),
        })
    }

    /// Build the production pipeline: DexScreener, OpenAI and X (or dry run)
    pub fn from_config(config: &Config, credentials: &Credentials) -> anyhow::Result<Self> {
        let lookup = Arc::new(DexScreenerClient::with_config(DexScreenerConfig::from(
            &config.price,
        )));

        let text_service = Arc::new(OpenAiClient::new(OpenAiConfig::from_generation(
            &config.generation,
            credentials.require_openai()?,
        )));

        let feed: Arc<dyn SocialFeed> = if config.publish.dry_run {
            tracing::warn!("Dry run enabled, posts will be logged but not sent");
            Arc::new(DryRunFeed::new())
        } else {
            Arc::new(TwitterClient::new(TwitterConfig::from_publish(
                &config.publish,
                credentials.require_twitter()?,
            )))
        };

        Ok(Self::new(config, lookup, text_service, feed)?)
    }

    /// Process one transfer event under a fresh run id
    pub async fn process(&self, event: TransferEvent) -> Result<PipelineOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "pipeline_run",
            %run_id,
            token = %event.token_address,
        );

        async move {
            let started = Instant::now();
            let result = self.run(&event).await;
            let elapsed = started.elapsed();

            match &result {
                Ok(outcome) => record_run(outcome.label(), elapsed),
                Err(e) => record_run(e.label(), elapsed),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, event: &TransferEvent) -> Result<PipelineOutcome, PipelineError> {
        tracing::info!(amount = %event.amount_transferred, "Processing transfer");

        if let FilterResult::Reject(reason) = self.filter.check_address(&event.token_address) {
            tracing::info!(%reason, "Skipping transfer");
            return Ok(PipelineOutcome::Skipped(reason));
        }

        let identity = self
            .lookup
            .lookup(&event.token_address, Some(event.amount_transferred))
            .await;

        if let FilterResult::Reject(reason) = self.filter.apply(&identity) {
            tracing::info!(%reason, "Skipping transfer");
            return Ok(PipelineOutcome::Skipped(reason));
        }

        let ticker = identity.ticker_symbol.as_deref().unwrap_or_default();
        let budget = self.formatter.message_budget(ticker);
        let request = self.build_request(&identity, budget.min(self.generator.hard_cap()))?;

        let message = self.generator.generate(&request, budget).await?;

        let post = match self.formatter.format(&message.text, ticker) {
            Ok(post) => post,
            Err(e) => {
                tracing::error!(error = %e, "Generated message does not fit the post limit");
                return Err(e.into());
            }
        };

        let published = self.publisher.publish(&post).await?;

        tracing::info!(
            post_id = %published.external_id,
            hashtag = %post.hashtag,
            source_latency_ok = message.source_latency_ok,
            "Transfer published"
        );

        Ok(PipelineOutcome::Published {
            post_id: published.external_id,
            text: post.text,
        })
    }

    /// Draw a prompt; the RNG never outlives this call
    fn build_request(
        &self,
        identity: &TokenIdentity,
        max_chars: usize,
    ) -> Result<GenerationRequest, PromptError> {
        let mut rng = rand::rng();
        self.prompts.build_request(identity, max_chars, &mut rng)
    }
}
