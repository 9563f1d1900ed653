//! # Responder
//!
//! Runs the user's external responder command for one prompt.
//!
//! The command is run through `sh -c` with the prompt written to stdin and
//! the selected model exported as `RONIN_MODEL`. Each stdout line is
//! forwarded as `Action::ResponseChunk`; the run always ends with either
//! `ResponseDone` or `ResponseFailed`. Every action carries the request's
//! `run` id so output from an aborted run can be told apart from the next.
//!
//! Stdin is written and stderr drained on their own tasks while stdout is
//! read, so a child never blocks on a full pipe.
//!
//! The child is spawned with `kill_on_drop`, so aborting the task that owns
//! it terminates the process.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::mpsc::Sender;

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::core::action::Action;

/// Everything needed to run the responder once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderRequest {
    pub run: u64,
    pub command: String,
    pub prompt: String,
    pub model: Option<String>,
    pub working_dir: PathBuf,
}

/// Run the responder to completion, streaming its output into `tx`.
pub async fn run(request: ResponderRequest, tx: Sender<Action>) {
    let outcome = stream_output(&request, &tx).await;
    let run = request.run;
    let action = match outcome {
        Ok(()) => Action::ResponseDone { run },
        Err(message) => {
            warn!("Responder run {} failed: {}", run, message);
            Action::ResponseFailed { run, message }
        }
    };
    if tx.send(action).is_err() {
        warn!("Failed to send responder result: receiver dropped");
    }
}

async fn stream_output(request: &ResponderRequest, tx: &Sender<Action>) -> Result<(), String> {
    info!(
        "Spawning responder run {}: {} (model={:?}, prompt={} bytes)",
        request.run,
        request.command,
        request.model,
        request.prompt.len()
    );

    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(&request.command)
        .current_dir(&request.working_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(model) = &request.model {
        command.env("RONIN_MODEL", model);
    }

    let mut child = command
        .spawn()
        .map_err(|e| format!("could not start `{}`: {e}", request.command))?;

    // Dropping stdin at the end of the write closes the pipe. A responder
    // that exits without reading it is not an error.
    if let Some(mut stdin) = child.stdin.take() {
        let prompt = request.prompt.clone();
        tokio::spawn(async move {
            if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                debug!("Responder closed stdin early: {}", e);
            }
        });
    }

    let stderr_reader = child.stderr.take().map(|mut err| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = err.read_to_end(&mut buf).await {
                debug!("Reading responder stderr failed: {}", e);
            }
            String::from_utf8_lossy(&buf).into_owned()
        })
    });

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| "responder stdout unavailable".to_string())?;
    let mut lines = BufReader::new(stdout).lines();
    let mut forwarded = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("reading responder output: {e}"))?
    {
        forwarded += 1;
        let chunk = Action::ResponseChunk {
            run: request.run,
            text: format!("{line}\n"),
        };
        if tx.send(chunk).is_err() {
            warn!("Failed to forward responder output: receiver dropped");
            return Ok(());
        }
    }

    let stderr = match stderr_reader {
        Some(reader) => reader.await.unwrap_or_else(|e| {
            debug!("Responder stderr task ended abnormally: {}", e);
            String::new()
        }),
        None => String::new(),
    };

    let status = child
        .wait()
        .await
        .map_err(|e| format!("waiting for responder: {e}"))?;
    info!("Responder exited with {} after {} lines", status, forwarded);

    if status.success() {
        Ok(())
    } else {
        let detail = stderr.trim();
        if detail.is_empty() {
            Err(format!("responder exited with {status}"))
        } else {
            Err(format!("responder exited with {status}: {detail}"))
        }
    }
}
