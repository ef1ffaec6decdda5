use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::Result;
use rand::Rng;

use kelime_lib::study::{MembershipChange, PendingAdvance, Scope, Selection, SessionStatus, StudyController};

use super::read_key;
use crate::app::App;
use crate::render::terminal::{paint, render_back, render_front, Color};

const HELP: &str = "enter: flip  y: knew it  n: missed it  t: mark/unmark  s: shuffle  q: quit";

pub fn run(app: &mut App, scope: Scope, unknown_only: bool, shuffle: bool, use_color: bool) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_loop(
        &mut app.controller,
        Selection::new(scope, unknown_only),
        shuffle,
        &mut rand::thread_rng(),
        &mut stdin.lock(),
        &mut stdout.lock(),
        use_color,
    )
}

/// Drive a free-study pass until the user quits or input ends
pub fn run_loop<R: Rng + ?Sized, I: BufRead, O: Write>(
    controller: &mut StudyController,
    selection: Selection,
    shuffle: bool,
    rng: &mut R,
    input: &mut I,
    output: &mut O,
    use_color: bool,
) -> Result<()> {
    let mut session = controller.build_session(selection, shuffle, rng);

    if session.status() == SessionStatus::Empty {
        writeln!(output, "No words match this selection.")?;
        if selection.unknown_only {
            writeln!(output, "Nothing is marked as struggling yet; try without --unknown-only.")?;
        }
        return Ok(());
    }

    writeln!(output, "{}", paint(HELP, Color::DIM, use_color))?;

    loop {
        let (position, total) = match session.status() {
            SessionStatus::Active { position, total } => (position, total),
            SessionStatus::Empty => {
                writeln!(output, "No words left in this selection.")?;
                return Ok(());
            }
            SessionStatus::Complete => return Ok(()),
        };
        let item = match controller.current_item(&session) {
            Some(item) => item.clone(),
            None => return Ok(()),
        };

        writeln!(output, "{}", render_front(&item, position, total, controller.is_unknown(item.id), use_color))?;
        output.flush()?;

        let key = match read_key(input)? {
            Some(key) => key,
            None => return Ok(()),
        };

        match key.as_str() {
            "" | "f" => {
                writeln!(output, "{}", render_back(&item, use_color))?;
                continue;
            }
            "y" | "n" => {
                let success = key == "y";
                let Some(answer) = controller.answer(&mut session, success) else {
                    return Ok(());
                };

                match answer.outcome.changes.membership {
                    Some(MembershipChange::Added) => {
                        writeln!(output, "{}", paint("Added to the review list", Color::YELLOW, use_color))?
                    }
                    Some(MembershipChange::Removed) => {
                        writeln!(output, "{}", paint("Learned!", Color::GREEN, use_color))?
                    }
                    None => {}
                }
                if !answer.outcome.persist.is_saved() {
                    writeln!(output, "Warning: progress could not be saved")?;
                }

                if let PendingAdvance::After(delay) = answer.advance {
                    thread::sleep(delay);
                    session.advance();
                }
            }
            "t" => {
                let outcome = controller.toggle_unknown(item.id);
                let message = match outcome.changes.membership {
                    Some(MembershipChange::Added) => "Marked as struggling",
                    _ => "Unmarked",
                };
                writeln!(output, "{}", message)?;
                controller.refresh(&mut session);
            }
            "s" => {
                session.shuffle(rng);
                writeln!(output, "Shuffled")?;
            }
            "q" => return Ok(()),
            _ => writeln!(output, "{}", HELP)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    use kelime_lib::{Catalog, IntervalTable, ManualClock, MemoryStore, VocabularyItem};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn controller() -> StudyController {
        let catalog = Catalog::new(vec![
            VocabularyItem::new(1, "abandon", "terk etmek"),
            VocabularyItem::new(2, "ability", "yetenek"),
        ])
        .unwrap();
        StudyController::open(
            catalog,
            Box::new(MemoryStore::new()),
            Box::new(ManualClock::new(0)),
            IntervalTable::reference(),
        )
        .with_advance_delay(Duration::ZERO)
    }

    fn drive(controller: &mut StudyController, selection: Selection, keys: &str) -> String {
        let mut input = Cursor::new(keys.as_bytes().to_vec());
        let mut output = Vec::new();
        let mut rng = StdRng::seed_from_u64(0);
        run_loop(controller, selection, false, &mut rng, &mut input, &mut output, false).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_miss_flags_and_moves_on() {
        let mut controller = controller();
        let text = drive(&mut controller, Selection::new(Scope::All, false), "\nn\nq\n");

        assert!(text.contains("[1/2] abandon"));
        assert!(text.contains("terk etmek"));
        assert!(text.contains("Added to the review list"));
        assert!(text.contains("[2/2] ability"));
        assert!(controller.is_unknown(1));
    }

    #[test]
    fn test_wraps_around() {
        let mut controller = controller();
        let text = drive(&mut controller, Selection::new(Scope::All, false), "y\ny\n");
        assert_eq!(text.matches("[1/2] abandon").count(), 2);
    }

    #[test]
    fn test_empty_selection() {
        let mut controller = controller();
        let text = drive(&mut controller, Selection::new(Scope::All, true), "");
        assert!(text.contains("No words match this selection."));
    }

    #[test]
    fn test_unknown_only_pass_ends_when_everything_is_learned() {
        let mut controller = controller();
        controller.toggle_unknown(1);
        let text = drive(&mut controller, Selection::new(Scope::All, true), "y\n");

        assert!(text.contains("[1/1] abandon"));
        assert!(text.contains("Learned!"));
        assert!(text.contains("No words left in this selection."));
        assert!(!controller.is_unknown(1));
    }

    #[test]
    fn test_unmarking_in_unknown_only_pass_moves_on() {
        let mut controller = controller();
        controller.toggle_unknown(1);
        controller.toggle_unknown(2);
        let text = drive(&mut controller, Selection::new(Scope::All, true), "t\nq\n");

        assert!(text.contains("[1/2] abandon"));
        assert!(text.contains("Unmarked"));
        assert!(text.contains("[1/1] ability"));
    }
}
