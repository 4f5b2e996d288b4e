use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::{load_config, save_config};
use crate::cli::utils::{output_success, resolve_password};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Create an account and start a session")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the saved session token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Register { username, password } => {
            let password = resolve_password(password)?;
            let mut config = load_config()?;
            let client = ApiClient::new(&config.server_url)?;

            let token = client.register(&username, &password).await?;
            config.set_session(&username, token);
            save_config(&config)?;

            output_success(
                &output_format,
                &format!("Registered and logged in as {}", username),
                Some(json!({ "username": username })),
            )
        }
        AuthCommands::Login { username, password } => {
            let password = resolve_password(password)?;
            let mut config = load_config()?;
            let client = ApiClient::new(&config.server_url)?;

            let token = client.login(&username, &password).await?;
            config.set_session(&username, token);
            save_config(&config)?;

            output_success(
                &output_format,
                &format!("Logged in as {}", username),
                Some(json!({ "username": username })),
            )
        }
        AuthCommands::Logout => {
            let mut config = load_config()?;
            config.clear_session();
            save_config(&config)?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let config = load_config()?;
            match (&config.username, &config.token) {
                (Some(username), Some(_)) => output_success(
                    &output_format,
                    &format!("Logged in as {} on {}", username, config.server_url),
                    Some(json!({
                        "username": username,
                        "server_url": config.server_url,
                        "logged_in_at": config.logged_in_at,
                    })),
                ),
                _ => output_success(
                    &output_format,
                    &format!("Not logged in ({})", config.server_url),
                    Some(json!({ "username": null, "server_url": config.server_url })),
                ),
            }
        }
    }
}
