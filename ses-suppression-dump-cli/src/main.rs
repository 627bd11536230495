use clap::Parser;
use ses_suppression_dump::{
    models::SuppressionReason, write_addresses, Client, RateLimit, SuppressionListReader,
};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser, Clone)]
#[command(name = "ses-suppression-dump")]
#[command(about = "Prints every address on the SES account suppression list, one per line")]
struct Cli {
    /// AWS region of the SES account (defaults to the AWS_REGION / profile region)
    #[arg(long)]
    region: Option<String>,
    /// Talk to this endpoint instead of the regional SES one (defaults to AWS_ENDPOINT_URL)
    #[arg(long)]
    endpoint_url: Option<String>,
    /// Length of the rate limit window, in seconds
    #[arg(long, default_value_t = 3)]
    rate_limit_period: u64,
    /// Calls allowed within one window
    #[arg(long, default_value_t = 1)]
    calls_per_period: u32,
    /// Suppression reasons to list (repeatable)
    #[arg(
        long = "reason",
        default_values_t = [SuppressionReason::Bounce, SuppressionReason::Complaint]
    )]
    reasons: Vec<SuppressionReason>,
    /// Entries per page requested from SES
    #[arg(long)]
    page_size: Option<u32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let args = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let limit = RateLimit::new(
        Duration::from_secs(args.rate_limit_period),
        args.calls_per_period,
    )?;
    let client = Client::from_env(args.region, args.endpoint_url).await?;
    tracing::debug!(endpoint = %client.endpoint(), region = client.region(), ?limit, "Starting dump");

    let reader = SuppressionListReader::with_rate_limit(client, limit)
        .reasons(args.reasons)
        .page_size(args.page_size);

    let written = write_addresses(reader.drain(), &mut std::io::stdout().lock()).await?;
    tracing::info!(written, "Done");

    Ok(())
}
