//! Serve command implementation

use crate::config::{Config, Credentials};
use crate::pipeline::EventPipeline;
use crate::webhook::{build_router, run_server, AppState};
use clap::Args;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides config and PORT)
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,
}

impl ServeArgs {
    pub async fn execute(
        &self,
        mut config: Config,
        credentials: &Credentials,
    ) -> anyhow::Result<()> {
        if let Some(listen) = self.listen {
            config.server.listen = listen;
        }

        let pipeline = Arc::new(EventPipeline::from_config(&config, credentials)?);
        let state = AppState::new(pipeline, config.server.run_deadline());
        let router = build_router(state, &config.server.webhook_path);

        tracing::info!(
            path = %config.server.webhook_path,
            dry_run = config.publish.dry_run,
            "Starting webhook server"
        );

        run_server(router, config.server.listen).await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}
