//! faxme server binary.
//!
//! ```text
//!   Twilio ──POST /fax/receive?to=──▶ ┌──────────┐   lookup   ┌───────────┐
//!          ◀── Receive / Reject ───── │ webhooks │ ─────────▶ │ directory │◀── refresher (10s)
//!   Twilio ──POST /fax/received?to=─▶ │          │            └───────────┘
//!                                     └────┬─────┘
//!                                          │ one SMS per contact
//!                                          ▼
//!                                   Twilio Messaging
//! ```

use clap::Parser;

use faxme::config::{load_config, Cli};
use faxme::lifecycle::{self, signals, Shutdown};
use faxme::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    logging::init_logging(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config,
        "faxme starting"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    lifecycle::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
