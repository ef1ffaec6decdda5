use anyhow::Result;

use kelime_lib::study::{MembershipChange, Outcome};
use kelime_lib::ItemId;

use crate::app::App;
use crate::render::terminal::render_schedule;
use crate::OutputFormat;

pub fn run_rate(app: &mut App, id: ItemId, success: bool, format: &OutputFormat) -> Result<()> {
    app.find_item(id)?;
    let outcome = app.controller.rate(id, success);
    report(app, id, &outcome, format)
}

pub fn run_toggle(app: &mut App, id: ItemId, format: &OutputFormat) -> Result<()> {
    app.find_item(id)?;
    let outcome = app.controller.toggle_unknown(id);
    report(app, id, &outcome, format)
}

fn report(app: &App, id: ItemId, outcome: &Outcome, format: &OutputFormat) -> Result<()> {
    let item = app.find_item(id)?;
    let record = app.controller.state().reviews().get(id);
    let unknown = app.controller.is_unknown(id);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": item.id,
                "front": item.front,
                "level": record.level,
                "nextReviewAt": record.next_review_at,
                "unknown": unknown,
                "membership": outcome.changes.membership,
                "saved": outcome.persist.is_saved(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            match outcome.changes.membership {
                Some(MembershipChange::Added) => println!("Added \"{}\" to the review list", item.front),
                Some(MembershipChange::Removed) => println!("Learned \"{}\"", item.front),
                None => println!("Rated \"{}\"", item.front),
            }
            println!("  {}", render_schedule(&record, app.controller.now()));
            if !outcome.persist.is_saved() {
                eprintln!("Warning: change could not be saved");
            }
        }
    }

    Ok(())
}
