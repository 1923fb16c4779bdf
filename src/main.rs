use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use goldprice::{extract, logger, Config, DocumentSource, HttpSource, ReportFormat, Reporter};

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let config = Config::from_env().context("failed to load configuration")?;
    let format: ReportFormat = config.format.parse()?;
    let registry = config.registry().context("invalid field registry")?;
    info!(url = %config.url, fields = registry.len(), "starting");

    let source = HttpSource::new(config.timeout)?.with_user_agent(config.user_agent.clone());

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted");
            on_ctrl_c.cancel();
        }
    });

    let doc = source
        .fetch_with_cancel(&config.url, &cancel)
        .await
        .with_context(|| format!("failed to fetch {}", config.url))?;

    let snapshot = extract(&doc, &registry).await;
    let report = Reporter::new(config.title.clone()).render(snapshot, format)?;
    print!("{report}");

    Ok(())
}
