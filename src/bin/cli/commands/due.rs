use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let due = app.controller.due_items();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing is due. All caught up.");
                return Ok(());
            }

            let reviews = app.controller.state().reviews();
            let front_width = due.iter().map(|i| i.front.chars().count()).max().unwrap_or(4).min(30);

            for item in &due {
                let badge = if reviews.contains(item.id) {
                    format!("L{}", reviews.get(item.id).level)
                } else {
                    "new".to_string()
                };
                println!(
                    "{:>6}  {:<fw$}  {:<20}  {}",
                    item.id,
                    item.front,
                    item.back,
                    paint(&badge, Color::GRAY, use_color),
                    fw = front_width,
                );
            }
            println!();
            println!("{} due", due.len());
        }
    }

    Ok(())
}
