use crate::aggregate::collect_namespace_usage;
use crate::cli::{Cli, Commands};
use crate::config::{CredentialSource, ServeConfig};
use crate::k8s::K8sClient;
use crate::metrics::NamespaceCollector;
use crate::{report, server, Result};
use std::sync::Arc;
use tracing::info;

pub async fn handle_command(cli: &Cli, command: Commands) -> Result<()> {
    let credentials = cli.credential_source()?;

    match command {
        Commands::Report => handle_report(&credentials).await,
        Commands::Serve {
            listen,
            scrape_timeout,
            log_samples,
        } => {
            let config = ServeConfig::new(&listen, scrape_timeout)?.with_log_samples(log_samples);
            handle_serve(&credentials, config).await
        }
    }
}

async fn handle_report(credentials: &CredentialSource) -> Result<()> {
    info!("Namespace usage report requested");

    let client = K8sClient::connect(credentials).await?;
    let totals = collect_namespace_usage(&client).await?;

    print!("{}", report::render(&totals));
    Ok(())
}

async fn handle_serve(credentials: &CredentialSource, config: ServeConfig) -> Result<()> {
    let client = K8sClient::connect(credentials).await?;
    let collector = NamespaceCollector::new(Arc::new(client), config.scrape_timeout)
        .with_sample_log(config.log_samples);

    server::serve(&config, collector).await
}
