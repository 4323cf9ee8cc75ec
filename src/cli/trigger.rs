//! Trigger command implementation

use crate::config::{Config, Credentials};
use crate::pipeline::{EventPipeline, PipelineOutcome, TransferEvent};
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug)]
pub struct TriggerArgs {
    /// Token mint address
    #[arg(short, long)]
    pub mint: String,

    /// Amount transferred, in whole tokens
    #[arg(short, long, default_value = "0")]
    pub amount: Decimal,

    /// Log the post instead of publishing it
    #[arg(long)]
    pub dry_run: bool,
}

impl TriggerArgs {
    pub async fn execute(
        &self,
        mut config: Config,
        credentials: &Credentials,
    ) -> anyhow::Result<()> {
        if self.dry_run {
            config.publish.dry_run = true;
        }

        let pipeline = EventPipeline::from_config(&config, credentials)?;
        let event = TransferEvent::new(self.mint.trim(), self.amount);

        match pipeline.process(event).await? {
            PipelineOutcome::Published { post_id, text } => {
                println!("Published {}:", post_id);
                println!("{}", text);
            }
            PipelineOutcome::Skipped(reason) => {
                println!("Skipped: {}", reason);
            }
            PipelineOutcome::NoTransfer => {
                println!("Nothing to do");
            }
        }

        Ok(())
    }
}
