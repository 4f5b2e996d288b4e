pub mod auth;
pub mod sections;
pub mod server;
pub mod tasks;

use crate::cli::client::ApiClient;
use crate::cli::config::load_config;
use crate::database::models::Section;

/// Fetch the full plan, edit it locally, and save the full plan back.
///
/// Returns whatever the edit closure returns once the save succeeded.
pub(crate) async fn edit_sections<F, R>(edit: F) -> anyhow::Result<R>
where
    F: FnOnce(&mut Vec<Section>) -> anyhow::Result<R>,
{
    let config = load_config()?;
    let token = config.require_token()?;
    let client = ApiClient::new(&config.server_url)?;

    let mut sections = client.get_sections(token).await?;
    let result = edit(&mut sections)?;
    client.save_sections(token, &sections).await?;

    Ok(result)
}

pub(crate) fn find_section(sections: &mut [Section], id: i64) -> anyhow::Result<&mut Section> {
    sections
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| anyhow::anyhow!("Section {} not found", id))
}
