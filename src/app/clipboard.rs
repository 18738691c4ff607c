//! Clipboard
//!
//! Text is piped to the configured clipboard command's stdin. The outcome
//! comes back on the clipboard channel and is applied by the run loop.

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::App;

impl App {
    pub(crate) fn copy_to_clipboard(&mut self, text: String) {
        let Some(command) = self.clipboard_command.clone() else {
            tracing::warn!("No clipboard_command configured - set clipboard_command in config.yaml");
            let _ = self
                .clipboard_tx
                .send(Err("clipboard_command not configured".to_string()));
            return;
        };

        let tx = self.clipboard_tx.clone();
        tokio::spawn(async move {
            let result = pipe_to_command(&command, &text).await.map_err(|e| {
                tracing::warn!("Failed to execute clipboard command '{}': {}", command, e);
                format!("Failed to copy with '{}'", command)
            });
            if result.is_ok() {
                tracing::debug!("Copied to clipboard via {}: {}", command, text);
            }
            let _ = tx.send(result);
        });
    }
}

async fn pipe_to_command(command: &str, text: &str) -> std::io::Result<()> {
    let mut child = Command::new(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes()).await?;
        // Close stdin to signal EOF
        drop(stdin);
    }

    let status = child.wait().await?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("exited with {}", status),
        ))
    }
}
