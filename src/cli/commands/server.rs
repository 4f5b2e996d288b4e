use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::{load_config, save_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at a server (clears any saved session)")]
    Set {
        #[arg(help = "Server URL, e.g. http://127.0.0.1:5001")]
        url: String,
    },

    #[command(about = "Show the configured server")]
    Current,

    #[command(about = "Check server health via the /health endpoint")]
    Health,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Set { url } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", url, e))?;

            let mut config = load_config()?;
            config.server_url = url.trim_end_matches('/').to_string();
            // A token from one server means nothing to another
            config.clear_session();
            save_config(&config)?;

            output_success(
                &output_format,
                &format!("Server set to {}", config.server_url),
                Some(json!({ "server_url": config.server_url })),
            )
        }
        ServerCommands::Current => {
            let config = load_config()?;
            output_success(
                &output_format,
                &format!("Current server: {}", config.server_url),
                Some(json!({ "server_url": config.server_url })),
            )
        }
        ServerCommands::Health => {
            let config = load_config()?;
            let client = ApiClient::new(&config.server_url)?;
            let health = client
                .health()
                .await
                .with_context(|| format!("Server {} is unhealthy", client.base_url()))?;

            output_success(
                &output_format,
                &format!("Server {} is healthy", client.base_url()),
                Some(json!({ "health": health })),
            )
        }
    }
}
