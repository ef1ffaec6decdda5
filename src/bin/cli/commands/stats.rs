use anyhow::Result;

use kelime_lib::srs::algorithm::format_interval;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat) -> Result<()> {
    let stats = app.controller.stats();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Words:       {}", stats.total_items);
            println!("Never rated: {}", stats.new_items);
            println!("Due now:     {}", stats.due_items);
            println!("Struggling:  {}", stats.unknown_items);
            println!();
            println!("Level  Interval  Words");
            let delays = app.controller.intervals().delays();
            for (level, count) in stats.levels.iter().enumerate() {
                println!("{:>5}  {:>8}  {}", level, format_interval(delays[level]), count);
            }
        }
    }

    Ok(())
}
