//! # heldline Main Entry Point
//!
//! Interactive HELD location client.

use anyhow::{Context, Result};
use heldline::cmd_args::CommandLineArgs;
use heldline::config::{self, ClientSettings};
use heldline::{logging, Dereferencer, HeldClient, HttpFetcher, ReplController};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cmd_args = CommandLineArgs::parse();
    let profile_path = config::get_profile_path();
    let profile = config::load_profile(&profile_path, cmd_args.profile())?;
    let settings = ClientSettings::resolve(&cmd_args, profile)?;
    tracing::debug!("Resolved settings: {:?}", settings);

    let client = HeldClient::new(&settings.endpoint, &settings.headers, settings.timeout)
        .context("failed to create HELD client")?;
    let fetcher = HttpFetcher::new(settings.timeout).context("failed to create HTTP client")?;

    let mut app = ReplController::new(
        Box::new(client),
        Dereferencer::new(Box::new(fetcher)),
        Box::new(std::io::stdout()),
    );
    app.state_mut().set_verbose(settings.verbose);
    app.state_mut().set_exact(settings.exact);

    app.run(BufReader::new(tokio::io::stdin())).await?;

    tracing::info!("Session ended");
    Ok(())
}
