use clap::Subcommand;
use serde_json::json;

use super::{edit_sections, find_section};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::models::Section;

#[derive(Subcommand)]
pub enum TaskCommands {
    #[command(about = "Add a task to a section")]
    Add {
        #[arg(help = "Section id")]
        section: i64,
        #[arg(help = "Task description")]
        text: String,
    },

    #[command(about = "Flip a task between done and not done")]
    Toggle {
        #[arg(help = "Section id")]
        section: i64,
        #[arg(help = "Task id")]
        task: i64,
    },

    #[command(about = "Replace a task's notes")]
    Note {
        #[arg(help = "Section id")]
        section: i64,
        #[arg(help = "Task id")]
        task: i64,
        #[arg(help = "Notes text (empty string clears)")]
        notes: String,
    },

    #[command(about = "Remove a task")]
    Remove {
        #[arg(help = "Section id")]
        section: i64,
        #[arg(help = "Task id")]
        task: i64,
    },
}

pub async fn handle(cmd: TaskCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TaskCommands::Add { section, text } => {
            let id = edit_sections(|sections| add_task(sections, section, &text)).await?;
            output_success(
                &output_format,
                &format!("Added task {} to section {}", id, section),
                Some(json!({ "section": section, "id": id })),
            )
        }
        TaskCommands::Toggle { section, task } => {
            let completed = edit_sections(|sections| toggle_task(sections, section, task)).await?;
            let state = if completed { "done" } else { "not done" };
            output_success(
                &output_format,
                &format!("Task {} marked {}", task, state),
                Some(json!({ "section": section, "id": task, "completed": completed })),
            )
        }
        TaskCommands::Note { section, task, notes } => {
            edit_sections(|sections| set_notes(sections, section, task, &notes)).await?;
            output_success(&output_format, &format!("Updated notes for task {}", task), None)
        }
        TaskCommands::Remove { section, task } => {
            edit_sections(|sections| remove_task(sections, section, task)).await?;
            output_success(&output_format, &format!("Removed task {}", task), None)
        }
    }
}

pub fn add_task(sections: &mut [Section], section_id: i64, text: &str) -> anyhow::Result<i64> {
    Ok(find_section(sections, section_id)?.push_task(text))
}

/// Returns the task's new completed state
pub fn toggle_task(sections: &mut [Section], section_id: i64, task_id: i64) -> anyhow::Result<bool> {
    let task = find_section(sections, section_id)?
        .task_mut(task_id)
        .ok_or_else(|| anyhow::anyhow!("Task {} not found in section {}", task_id, section_id))?;
    task.completed = !task.completed;
    Ok(task.completed)
}

pub fn set_notes(
    sections: &mut [Section],
    section_id: i64,
    task_id: i64,
    notes: &str,
) -> anyhow::Result<()> {
    let task = find_section(sections, section_id)?
        .task_mut(task_id)
        .ok_or_else(|| anyhow::anyhow!("Task {} not found in section {}", task_id, section_id))?;
    task.notes = notes.to_string();
    Ok(())
}

pub fn remove_task(sections: &mut [Section], section_id: i64, task_id: i64) -> anyhow::Result<()> {
    if !find_section(sections, section_id)?.remove_task(task_id) {
        anyhow::bail!("Task {} not found in section {}", task_id, section_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> Vec<Section> {
        let mut math = Section::new(1, "Math");
        math.push_task("Read ch.1");
        vec![math, Section::new(2, "Art")]
    }

    #[test]
    fn add_task_targets_section() {
        let mut sections = plan();
        assert_eq!(add_task(&mut sections, 1, "Exercises").unwrap(), 2);
        assert_eq!(add_task(&mut sections, 2, "Sketch").unwrap(), 1);
        assert!(add_task(&mut sections, 3, "Nowhere").is_err());
    }

    #[test]
    fn toggle_flips_completion() {
        let mut sections = plan();
        assert!(toggle_task(&mut sections, 1, 1).unwrap());
        assert!(!toggle_task(&mut sections, 1, 1).unwrap());
        assert!(toggle_task(&mut sections, 1, 7).is_err());
    }

    #[test]
    fn notes_and_removal() {
        let mut sections = plan();
        set_notes(&mut sections, 1, 1, "pages 1-20").unwrap();
        assert_eq!(sections[0].tasks[0].notes, "pages 1-20");

        remove_task(&mut sections, 1, 1).unwrap();
        assert!(sections[0].tasks.is_empty());
        assert!(remove_task(&mut sections, 1, 1).is_err());
    }
}
