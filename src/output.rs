use crate::error::Result;
use crate::model::TodoItem;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

pub fn render_tasks(tasks: &[TodoItem], format: Format) -> Result<String> {
    let mut out = String::new();
    match format {
        Format::Json => out.push_str(&serde_json::to_string(tasks)?),
        Format::Pretty => {
            for task in tasks {
                let mark = if task.is_completed { "x" } else { " " };
                out.push_str(&format!("[{mark}] {} {}\n", task.id, task.title));
                if !task.description.is_empty() {
                    out.push_str(&format!("    {}\n", task.description));
                }
            }
        }
        Format::Minimal => {
            out.push_str(&format!("{:>4} {:24} DONE\n", "ID", "TITLE"));
            out.push_str(&"-".repeat(34));
            out.push('\n');
            for task in tasks {
                let done = if task.is_completed { "yes" } else { "no" };
                out.push_str(&format!(
                    "{:>4} {:24} {}\n",
                    task.id,
                    truncate_title(&task.title, 24),
                    done
                ));
            }
        }
    }
    Ok(out)
}

pub fn print_tasks(tasks: &[TodoItem], format: Format) -> Result<()> {
    let rendered = render_tasks(tasks, format)?;
    if format == Format::Json {
        println!("{rendered}");
    } else {
        print!("{rendered}");
    }
    Ok(())
}

pub fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() > max_len {
        let truncated: String = title.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        title.to_string()
    }
}
