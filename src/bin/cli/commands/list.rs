use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    query: Option<&str>,
    unknown_only: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let controller = &app.controller;
    let items: Vec<_> = controller
        .catalog()
        .search(query.unwrap_or(""))
        .into_iter()
        .filter(|item| !unknown_only || controller.is_unknown(item.id))
        .collect();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = items
                .iter()
                .map(|item| {
                    serde_json::json!({
                        "id": item.id,
                        "front": item.front,
                        "back": item.back,
                        "unknown": controller.is_unknown(item.id),
                        "level": controller.state().reviews().get(item.id).level,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if items.is_empty() {
                println!("No words match.");
                return Ok(());
            }

            let front_width = items.iter().map(|i| i.front.chars().count()).max().unwrap_or(4).min(30);
            for item in &items {
                let unknown = controller.is_unknown(item.id);
                let front = format!("{:<fw$}", item.front, fw = front_width);
                let front = if unknown { paint(&front, Color::RED, use_color) } else { front };
                let badge = if unknown { paint(" [struggling]", Color::RED, use_color) } else { String::new() };
                println!("{:>6}  {}  {}{}", item.id, front, item.back, badge);
            }
        }
    }

    Ok(())
}

pub fn run_chunks(app: &App, format: &OutputFormat) -> Result<()> {
    let chunks = app.controller.catalog().chunks(app.controller.chunk_size());

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&chunks)?);
        }
        OutputFormat::Plain => {
            if chunks.is_empty() {
                println!("The catalog is empty.");
            }
            for chunk in &chunks {
                println!("{}  {} words", chunk.label(), chunk.len);
            }
        }
    }

    Ok(())
}
