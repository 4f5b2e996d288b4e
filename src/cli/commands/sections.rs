use std::fs;
use std::io::{self, Read};

use clap::Subcommand;
use serde_json::json;

use super::edit_sections;
use crate::cli::client::ApiClient;
use crate::cli::config::load_config;
use crate::cli::utils::{output_sections, output_success};
use crate::cli::OutputFormat;
use crate::database::models::{next_section_id, Section};

#[derive(Subcommand)]
pub enum SectionCommands {
    #[command(about = "Show all sections and their tasks")]
    List,

    #[command(about = "Append a new empty section")]
    Add {
        #[arg(help = "Section title")]
        title: String,
    },

    #[command(about = "Rename a section")]
    Rename {
        #[arg(help = "Section id")]
        id: i64,
        #[arg(help = "New title")]
        title: String,
    },

    #[command(about = "Remove a section and all of its tasks")]
    Remove {
        #[arg(help = "Section id")]
        id: i64,
    },

    #[command(about = "Write the full plan as JSON to a file (stdout if omitted)")]
    Export {
        #[arg(help = "Output file path")]
        output: Option<String>,
    },

    #[command(about = "Replace the full plan with a JSON file ('-' for stdin)")]
    Import {
        #[arg(help = "Input file path")]
        input: String,
    },
}

pub async fn handle(cmd: SectionCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SectionCommands::List => {
            let sections = fetch_sections().await?;
            output_sections(&output_format, &sections)
        }
        SectionCommands::Add { title } => {
            let id = edit_sections(|sections| Ok(add_section(sections, &title))).await?;
            output_success(
                &output_format,
                &format!("Added section {} '{}'", id, title),
                Some(json!({ "id": id })),
            )
        }
        SectionCommands::Rename { id, title } => {
            edit_sections(|sections| rename_section(sections, id, &title)).await?;
            output_success(&output_format, &format!("Renamed section {}", id), None)
        }
        SectionCommands::Remove { id } => {
            edit_sections(|sections| remove_section(sections, id)).await?;
            output_success(&output_format, &format!("Removed section {}", id), None)
        }
        SectionCommands::Export { output } => {
            let sections = fetch_sections().await?;
            let content = serde_json::to_string_pretty(&sections)?;
            match output {
                Some(path) => {
                    fs::write(&path, content)?;
                    output_success(
                        &output_format,
                        &format!("Exported {} sections to {}", sections.len(), path),
                        Some(json!({ "count": sections.len() })),
                    )
                }
                None => {
                    println!("{}", content);
                    Ok(())
                }
            }
        }
        SectionCommands::Import { input } => {
            let content = if input == "-" {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                fs::read_to_string(&input)?
            };
            let imported: Vec<Section> = serde_json::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid sections JSON: {}", e))?;

            let config = load_config()?;
            let client = ApiClient::new(&config.server_url)?;
            client.save_sections(config.require_token()?, &imported).await?;

            output_success(
                &output_format,
                &format!("Imported {} sections", imported.len()),
                Some(json!({ "count": imported.len() })),
            )
        }
    }
}

async fn fetch_sections() -> anyhow::Result<Vec<Section>> {
    let config = load_config()?;
    let client = ApiClient::new(&config.server_url)?;
    client.get_sections(config.require_token()?).await
}

pub fn add_section(sections: &mut Vec<Section>, title: &str) -> i64 {
    let id = next_section_id(sections);
    sections.push(Section::new(id, title));
    id
}

pub fn rename_section(sections: &mut [Section], id: i64, title: &str) -> anyhow::Result<()> {
    super::find_section(sections, id)?.title = title.to_string();
    Ok(())
}

pub fn remove_section(sections: &mut Vec<Section>, id: i64) -> anyhow::Result<()> {
    let index = sections
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| anyhow::anyhow!("Section {} not found", id))?;
    sections.remove(index);
    Ok(())
}
