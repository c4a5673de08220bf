mod args;
mod play;
mod report;

use std::path::Path;

use args::{Args, Command, prepare_sqlite_file, print_usage};
use services::{AppServices, Clock, ExportDocument};
use storage::StorageKeys;

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let clock = Clock::default_clock();
    let mut app = AppServices::new_sqlite(
        &parsed.db_url,
        clock,
        StorageKeys::with_prefix(&parsed.key_prefix),
    )
    .await?;
    tracing::debug!(db = %parsed.db_url, prefix = %parsed.key_prefix, "storage ready");
    for warning in app.warnings() {
        eprintln!("warning: {warning}");
    }

    match parsed.command {
        Command::Play => play::play(&mut app).await?,
        Command::ListQuestions => print!("{}", report::question_list(app.questions().questions())),
        Command::AddQuestion(draft) => {
            let question = app.questions_mut().add(draft).await?;
            println!("added {}", report::question_line(&question));
        }
        Command::UpdateQuestion(id, draft) => {
            if app.questions_mut().update(&id, draft).await? {
                println!("updated {id}");
            } else {
                eprintln!("no question with id {id}");
            }
        }
        Command::DeleteQuestion(id) => {
            if app.questions_mut().delete(&id).await? {
                println!("deleted {id}; {} questions left", app.questions().len());
            } else {
                eprintln!("no question with id {id}");
            }
        }
        Command::ResetQuestions => {
            app.questions_mut().reset_to_default().await?;
            println!("restored {} default questions", app.questions().len());
        }
        Command::Stats => print!(
            "{}",
            report::statistics(app.statistics().statistics(), app.statistics().history())
        ),
        Command::History => print!("{}", report::history(app.statistics().history())),
        Command::Export { out } => {
            let json = app.export().to_json_pretty()?;
            match out.as_deref() {
                Some(path) if path == Path::new("-") => println!("{json}"),
                Some(path) => {
                    std::fs::write(path, &json)?;
                    println!("exported to {}", path.display());
                }
                None => {
                    let name = ExportDocument::file_name(clock.now());
                    std::fs::write(&name, &json)?;
                    println!("exported to {name}");
                }
            }
        }
        Command::Help => print_usage(),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
