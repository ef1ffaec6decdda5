use std::io::{self, BufRead, Write};

use anyhow::Result;

use kelime_lib::srs::algorithm::{format_interval, preview_intervals};
use kelime_lib::study::{Advance, PendingAdvance, SessionStatus, StudyController};

use super::read_key;
use crate::app::App;
use crate::render::terminal::{paint, render_back, render_front, Color};

const HELP: &str = "enter: flip  y: knew it  n: missed it  q: quit";

pub fn run(app: &mut App, use_color: bool) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_loop(&mut app.controller, &mut stdin.lock(), &mut stdout.lock(), use_color)
}

/// Drive one due-review pass until it completes, the user quits or input ends
pub fn run_loop<I: BufRead, O: Write>(
    controller: &mut StudyController,
    input: &mut I,
    output: &mut O,
    use_color: bool,
) -> Result<()> {
    let mut session = controller.start_due_review();

    if session.is_empty() {
        writeln!(output, "Nothing is due. All caught up.")?;
        return Ok(());
    }

    writeln!(output, "{}", paint(HELP, Color::DIM, use_color))?;

    loop {
        let (position, total) = match session.status() {
            SessionStatus::Active { position, total } => (position, total),
            _ => break,
        };
        let item = match controller.current_item(&session) {
            Some(item) => item.clone(),
            None => break,
        };

        let [on_miss, on_hit] = preview_intervals(&controller.state().reviews().get(item.id), controller.intervals());
        writeln!(output, "{}", render_front(&item, position, total, false, use_color))?;
        writeln!(
            output,
            "{}",
            paint(&format!("    n: {}  y: {}", format_interval(on_miss), format_interval(on_hit)), Color::GRAY, use_color)
        )?;
        output.flush()?;

        let key = match read_key(input)? {
            Some(key) => key,
            None => return Ok(()),
        };

        match key.as_str() {
            "" | "f" => writeln!(output, "{}", render_back(&item, use_color))?,
            "y" | "n" => {
                if let Some(answer) = controller.answer(&mut session, key == "y") {
                    if !answer.outcome.persist.is_saved() {
                        writeln!(output, "Warning: progress could not be saved")?;
                    }
                    if answer.advance == PendingAdvance::Done(Advance::Complete) {
                        break;
                    }
                }
            }
            "q" => return Ok(()),
            _ => writeln!(output, "{}", HELP)?,
        }
    }

    writeln!(output, "{}", paint("All due words reviewed. Well done!", Color::GREEN, use_color))?;
    Ok(())
}
