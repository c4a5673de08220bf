//! Line-driven play loop: each input line is either a command or a scanned payload.

use tokio::io::{AsyncBufReadExt, BufReader};

use qrlearn_core::model::RunId;
use services::{AppServices, NextStep, ScanSession, SessionError, SessionPhase};

use crate::report;

const HELP: &str = "\
commands:
  <text>     submit scanned text for the current step
  :hint      show hints for the current step
  :capture   attach an image to the current step
  :next      go to the next step after a correct scan
  :progress  show step, score and elapsed time
  :finish    record a completed run (retries a failed save)
  :reset     start over
  :quit      leave";

enum Input<'a> {
    Scan(&'a str),
    Hint,
    Capture,
    Next,
    Progress,
    Finish,
    Reset,
    Help,
    Quit,
    Unknown(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    match line {
        ":hint" => Input::Hint,
        ":capture" => Input::Capture,
        ":next" => Input::Next,
        ":progress" => Input::Progress,
        ":finish" => Input::Finish,
        ":reset" => Input::Reset,
        ":help" => Input::Help,
        ":quit" | ":q" => Input::Quit,
        other if other.starts_with(':') => Input::Unknown(other),
        other => Input::Scan(other),
    }
}

fn show_current(session: &ScanSession) {
    if let Some(question) = session.current_question() {
        let total = session.questions().len();
        println!();
        println!("step {}/{}: {}", question.step(), total, question.prompt());
        if !question.description().is_empty() {
            println!("  {}", question.description());
        }
    }
}

pub async fn play(app: &mut AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = app.start_session()?;
    let mut run = current_run(&session)?;
    println!("{HELP}");
    show_current(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match classify(line) {
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
            Input::Unknown(cmd) => println!("unknown command {cmd}; try :help"),
            Input::Progress => {
                let progress = app.sessions().progress(&session);
                println!(
                    "step {}/{} ({}%), score {}, time {}",
                    progress.current_step,
                    progress.total_steps,
                    progress.percent,
                    progress.score,
                    progress.elapsed_label()
                );
            }
            Input::Reset => {
                run = app.sessions().restart(&mut session)?;
                println!("starting over");
                show_current(&session);
            }
            Input::Hint => match session.reveal_hints() {
                Ok(hints) if hints.is_empty() => println!("no hints for this step"),
                Ok(hints) => hints.iter().for_each(|hint| println!("  hint: {hint}")),
                Err(err) => reject(&err)?,
            },
            Input::Capture => match app.sessions().capture_image(&mut session, run) {
                Ok(count) => println!("image captured ({count} so far)"),
                Err(err) => reject(&err)?,
            },
            Input::Next => match session.advance() {
                Ok(_) => show_current(&session),
                Err(err) => reject(&err)?,
            },
            Input::Finish => finish(app, &mut session).await?,
            Input::Scan(text) => match session.submit_scan(run, text) {
                Ok(result) if result.is_correct => {
                    println!("correct! +{} points", result.points_awarded);
                    match result.next {
                        NextStep::Complete => finish(app, &mut session).await?,
                        _ => println!("(:capture to save an image, :next to continue)"),
                    }
                }
                Ok(result) => println!(
                    "scanned {:?}, expected {:?}; try again",
                    result.scanned_text, result.expected_answer
                ),
                Err(err) => reject(&err)?,
            },
        }
    }

    if session.phase() == SessionPhase::Completed && !session.is_recorded() {
        eprintln!("warning: the completed run was not recorded");
    }
    Ok(())
}

fn current_run(session: &ScanSession) -> Result<RunId, SessionError> {
    session.run_id().ok_or(SessionError::NotStarted)
}

/// Print a wrong-state error and keep playing; anything else ends the loop.
fn reject(err: &SessionError) -> Result<(), Box<dyn std::error::Error>> {
    if err.is_invalid_transition() {
        println!("{err}");
        Ok(())
    } else {
        Err(err.to_string().into())
    }
}

async fn finish(
    app: &mut AppServices,
    session: &mut ScanSession,
) -> Result<(), Box<dyn std::error::Error>> {
    match app.finish_session(session).await {
        Ok(report) => {
            print!("{}", report::completion(&report));
            println!(":reset to play again, :quit to leave");
        }
        Err(SessionError::Statistics(err)) => {
            println!("could not save this run ({err}); :finish to retry");
        }
        Err(err) => reject(&err)?,
    }
    Ok(())
}
