use std::fmt;
use std::path::PathBuf;

use qrlearn_core::model::{Points, QuestionDraft, QuestionId};
use storage::gateway::DEFAULT_KEY_PREFIX;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    MissingId { command: &'static str },
    MissingField { flag: &'static str },
    UnexpectedFlag { flag: &'static str, command: &'static str },
    InvalidDbUrl { raw: String },
    InvalidId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::MissingId { command } => write!(f, "{command} requires a question id"),
            ArgsError::MissingField { flag } => write!(f, "{flag} is required"),
            ArgsError::UnexpectedFlag { flag, command } => {
                write!(f, "{flag} is not valid for {command}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidId { raw } => write!(f, "invalid question id: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  qrlearn [--db <sqlite_url>] [--prefix <key_prefix>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  play                              play the challenge sequence (default)");
    eprintln!("  questions list");
    eprintln!("  questions add    --prompt <text> --answer <text> [question options]");
    eprintln!("  questions update <id> --prompt <text> --answer <text> [question options]");
    eprintln!("  questions delete <id>");
    eprintln!("  questions reset                   restore the default challenges");
    eprintln!("  stats");
    eprintln!("  history");
    eprintln!("  export [--out <file>]             `--out -` writes to stdout");
    eprintln!();
    eprintln!("Question options:");
    eprintln!("  --description <text>  --hint <text> (repeatable)  --points <1-100>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://qrlearn.sqlite3");
    eprintln!("  --prefix {DEFAULT_KEY_PREFIX}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QRLEARN_DB_URL, QRLEARN_KEY_PREFIX, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play,
    ListQuestions,
    AddQuestion(QuestionDraft),
    UpdateQuestion(QuestionId, QuestionDraft),
    DeleteQuestion(QuestionId),
    ResetQuestions,
    Stats,
    History,
    Export { out: Option<PathBuf> },
    Help,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::ListQuestions => "questions list",
            Command::AddQuestion(_) => "questions add",
            Command::UpdateQuestion(..) => "questions update",
            Command::DeleteQuestion(_) => "questions delete",
            Command::ResetQuestions => "questions reset",
            Command::Stats => "stats",
            Command::History => "history",
            Command::Export { .. } => "export",
            Command::Help => "help",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub db_url: String,
    pub key_prefix: String,
    pub command: Command,
}

#[derive(Default)]
struct DraftFlags {
    prompt: Option<String>,
    answer: Option<String>,
    description: Option<String>,
    hints: Vec<String>,
    points: Option<String>,
}

impl DraftFlags {
    fn is_empty(&self) -> bool {
        self.prompt.is_none()
            && self.answer.is_none()
            && self.description.is_none()
            && self.hints.is_empty()
            && self.points.is_none()
    }

    fn first_flag(&self) -> &'static str {
        if self.prompt.is_some() {
            "--prompt"
        } else if self.answer.is_some() {
            "--answer"
        } else if self.description.is_some() {
            "--description"
        } else if !self.hints.is_empty() {
            "--hint"
        } else {
            "--points"
        }
    }

    fn into_draft(self) -> Result<QuestionDraft, ArgsError> {
        let prompt = self
            .prompt
            .ok_or(ArgsError::MissingField { flag: "--prompt" })?;
        let answer = self
            .answer
            .ok_or(ArgsError::MissingField { flag: "--answer" })?;
        let points = self
            .points
            .as_deref()
            .map_or_else(Points::default, Points::parse_lenient);
        Ok(QuestionDraft::new(prompt, answer)
            .with_description(self.description.unwrap_or_default())
            .with_hints(self.hints)
            .with_points(points))
    }
}

impl Args {
    /// Parse everything after the program name. Flags may appear anywhere.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QRLEARN_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| "sqlite://qrlearn.sqlite3".into(), normalize_sqlite_url);
        let mut key_prefix =
            std::env::var("QRLEARN_KEY_PREFIX").unwrap_or_else(|_| DEFAULT_KEY_PREFIX.into());
        let mut draft = DraftFlags::default();
        let mut out: Option<PathBuf> = None;
        let mut help = false;
        let mut positional = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--prefix" => key_prefix = require_value(&mut args, "--prefix")?,
                "--prompt" => draft.prompt = Some(require_value(&mut args, "--prompt")?),
                "--answer" => draft.answer = Some(require_value(&mut args, "--answer")?),
                "--description" => {
                    draft.description = Some(require_value(&mut args, "--description")?);
                }
                "--hint" => draft.hints.push(require_value(&mut args, "--hint")?),
                "--points" => draft.points = Some(require_value(&mut args, "--points")?),
                "--out" => out = Some(PathBuf::from(require_value(&mut args, "--out")?)),
                "--help" | "-h" => help = true,
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let command = if help {
            Command::Help
        } else {
            parse_command(&positional, draft, out)?
        };

        Ok(Self {
            db_url,
            key_prefix,
            command,
        })
    }
}

fn parse_command(
    positional: &[String],
    draft: DraftFlags,
    out: Option<PathBuf>,
) -> Result<Command, ArgsError> {
    let words: Vec<&str> = positional.iter().map(String::as_str).collect();
    let command = match words.as_slice() {
        [] | ["play"] => Command::Play,
        ["questions"] | ["questions", "list"] => Command::ListQuestions,
        ["questions", "add"] => {
            reject_out(out, "questions add")?;
            return Ok(Command::AddQuestion(draft.into_draft()?));
        }
        ["questions", "update", id] => {
            let id = parse_id(id)?;
            reject_out(out, "questions update")?;
            return Ok(Command::UpdateQuestion(id, draft.into_draft()?));
        }
        ["questions", "update"] => {
            return Err(ArgsError::MissingId {
                command: "questions update",
            });
        }
        ["questions", "delete", id] => Command::DeleteQuestion(parse_id(id)?),
        ["questions", "delete"] => {
            return Err(ArgsError::MissingId {
                command: "questions delete",
            });
        }
        ["questions", "reset"] => Command::ResetQuestions,
        ["stats"] => Command::Stats,
        ["history"] => Command::History,
        ["export"] => {
            if !draft.is_empty() {
                return Err(ArgsError::UnexpectedFlag {
                    flag: draft.first_flag(),
                    command: "export",
                });
            }
            return Ok(Command::Export { out });
        }
        _ => return Err(ArgsError::UnknownCommand(positional.join(" "))),
    };

    if !draft.is_empty() {
        return Err(ArgsError::UnexpectedFlag {
            flag: draft.first_flag(),
            command: command.name(),
        });
    }
    reject_out(out, command.name())?;
    Ok(command)
}

fn reject_out(out: Option<PathBuf>, command: &'static str) -> Result<(), ArgsError> {
    match out {
        Some(_) => Err(ArgsError::UnexpectedFlag {
            flag: "--out",
            command,
        }),
        None => Ok(()),
    }
}

fn parse_id(raw: &str) -> Result<QuestionId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidId {
        raw: raw.to_string(),
    })
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
