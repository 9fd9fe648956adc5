//! Line-oriented terminal front end for the mood screen.

use std::io::Write;

use anyhow::{anyhow, bail, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::presentation::MoodController;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub const HELP: &str = "\
commands:
  tap <label|n>       log an emotion (by name or button number)
  note <id> <text>    set the comment of a record (empty text clears it)
  delete <id>         remove a record
  show                redraw the screen
  help                this message
  quit                save pending comments and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tap(String),
    Note { id: i64, text: String },
    Delete(i64),
    Show,
    Help,
    Quit,
}

fn parse_id(raw: Option<&str>) -> Result<i64> {
    let raw = raw.ok_or_else(|| anyhow!("missing record id"))?;
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| anyhow!("'{raw}' is not a record id"))
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "tap" | "t" => {
            if rest.is_empty() {
                bail!("tap needs a label or button number");
            }
            Command::Tap(rest.to_string())
        }
        "note" | "n" => {
            let (id, text) = match rest.split_once(char::is_whitespace) {
                Some((id, text)) => (id, text.trim()),
                None => (rest, ""),
            };
            Command::Note {
                id: parse_id(Some(id).filter(|id| !id.is_empty()))?,
                text: text.to_string(),
            }
        }
        "delete" | "del" | "rm" => {
            Command::Delete(parse_id(Some(rest).filter(|id| !id.is_empty()))?)
        }
        "show" | "ls" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };

    Ok(Some(command))
}

/// Read commands until `quit` or end of input, printing the screen after
/// every change.
pub async fn run<R, W>(controller: &MoodController, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let initial = controller.refresh().await?;
    log_info!("loaded {} records", initial.records.len());
    let screen = controller.screen().await;
    write!(output, "{screen}")?;
    output.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                writeln!(output, "! {err}")?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        if let Err(err) = apply(controller, command, output).await {
            log_error!("command failed: {err:#}");
            writeln!(output, "! {err}")?;
        }
        output.flush()?;
    }

    controller.settle().await;
    Ok(())
}

async fn apply<W: Write>(controller: &MoodController, command: Command, output: &mut W) -> Result<()> {
    match command {
        Command::Tap(input) => {
            let label = controller
                .catalog()
                .resolve(&input)
                .map(|emotion| emotion.label.clone())
                .ok_or_else(|| anyhow!("no emotion matches '{input}'"))?;
            controller.record_emotion(&label).await?;
        }
        Command::Note { id, text } => {
            controller.edit_comment(id, &text).await?;
        }
        Command::Delete(id) => {
            controller.delete_record(id).await?;
        }
        Command::Show => {}
        Command::Help => {
            writeln!(output, "{HELP}")?;
            return Ok(());
        }
        Command::Quit => return Ok(()),
    }

    let screen = controller.screen().await;
    write!(output, "\n{screen}")?;
    Ok(())
}
