//! Line-oriented résumé editor: reads commands from stdin, applies them to the
//! session, and runs the submission pipeline on `submit`.

pub mod command;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::errors::AppError;
use crate::preview::render_preview;
use crate::state::AppState;

use command::{parse, Command, HELP};

pub async fn run(state: AppState) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"Rizzume editor. Type 'help' for commands.\n")
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let reply = match parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => execute(&state, command).await,
            Err(e) => Err(e),
        };

        let text = match reply {
            Ok(text) => text,
            Err(e) => format!("error [{}]: {}", e.code(), e.user_message()),
        };
        stdout.write_all(text.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }

    info!("Editor session closed");
    Ok(())
}

/// Executes one command and returns the text to show.
pub async fn execute(state: &AppState, command: Command) -> Result<String, AppError> {
    match command {
        Command::Edit(edit) => {
            state.session.apply(&edit)?;
            Ok("ok".to_string())
        }
        Command::Undo => {
            let reply = if state.session.undo() {
                "undone"
            } else {
                "nothing to undo"
            };
            Ok(reply.to_string())
        }
        Command::Redo => {
            let reply = if state.session.redo() {
                "redone"
            } else {
                "nothing to redo"
            };
            Ok(reply.to_string())
        }
        Command::Preview => Ok(render_preview(&state.session.snapshot())),
        Command::Json => serde_json::to_string_pretty(&*state.session.snapshot())
            .map_err(|e| AppError::Internal(e.into())),
        Command::Submit => submit(state).await,
        Command::Help => Ok(HELP.to_string()),
        Command::Quit => Ok(String::new()),
    }
}

async fn submit(state: &AppState) -> Result<String, AppError> {
    let doc = state.session.snapshot();
    info!("Submitting résumé to {}", state.config.render_service_url);

    // busy indicator, stopped once the pipeline reaches a terminal state
    let mut states = state.pipeline.subscribe();
    let indicator = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let current = states.borrow_and_update().clone();
            if current.is_busy() {
                eprintln!("... {current}");
            }
        }
    });

    let result = state.pipeline.submit(&doc).await;
    indicator.abort();

    let path = result?;
    Ok(format!("Saved résumé to {}", path.display()))
}
