use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::Section;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(fields)) = data {
                if let Some(object) = response.as_object_mut() {
                    object.extend(fields);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print a plan as JSON or as an indented checklist
pub fn output_sections(output_format: &OutputFormat, sections: &[Section]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(sections)?);
        }
        OutputFormat::Text => {
            if sections.is_empty() {
                println!("No sections yet");
            }
            for line in render_sections(sections) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

pub fn render_sections(sections: &[Section]) -> Vec<String> {
    let mut lines = Vec::new();
    for section in sections {
        lines.push(format!(
            "[{}] {} ({}/{} done)",
            section.id,
            section.title,
            section.completed_count(),
            section.tasks.len()
        ));
        for task in &section.tasks {
            let mark = if task.completed { "x" } else { " " };
            lines.push(format!("    [{}] {}. {}", mark, task.id, task.text));
            if !task.notes.is_empty() {
                lines.push(format!("          {}", task.notes));
            }
        }
    }
    lines
}

/// Use the given password or read one line from stdin
pub fn resolve_password(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();

    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Task;

    #[test]
    fn renders_checklist_with_notes() {
        let mut section = Section::new(1, "Math");
        section.tasks.push(Task::new(1, "Read ch.1"));
        let mut done = Task::new(2, "Exercises");
        done.completed = true;
        done.notes = "p. 42".to_string();
        section.tasks.push(done);

        assert_eq!(
            render_sections(&[section]),
            vec![
                "[1] Math (1/2 done)".to_string(),
                "    [ ] 1. Read ch.1".to_string(),
                "    [x] 2. Exercises".to_string(),
                "          p. 42".to_string(),
            ]
        );
    }

    #[test]
    fn provided_password_is_used_verbatim() {
        assert_eq!(resolve_password(Some("pw 123".into())).unwrap(), "pw 123");
    }
}
