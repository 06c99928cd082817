//! Terminal backend for the permission prompts.

use async_trait::async_trait;
use safecircle_permissions::{PermissionApi, PermissionApiError, PermissionKind, PermissionStatus};
use safecircle_storage::KeyValueStore;
use std::sync::Arc;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;

#[async_trait]
pub trait Prompter: Send + Sync {
    async fn confirm(&self, question: &str) -> bool;
}

/// y/n prompts over one shared reader and writer.
///
/// The lock is held from writing the question until the answer line is read,
/// so concurrent prompts are asked one after another.
pub struct TerminalPrompter<R = Stdin, W = Stdout> {
    io: Mutex<(BufReader<R>, W)>,
}

impl TerminalPrompter {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R: AsyncRead, W> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((BufReader::new(reader), writer)),
        }
    }
}

#[async_trait]
impl<R, W> Prompter for TerminalPrompter<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn confirm(&self, question: &str) -> bool {
        let mut io = self.io.lock().await;
        let (reader, writer) = &mut *io;

        let _ = writer
            .write_all(format!("⚠️  {} (y/n): ", question).as_bytes())
            .await;
        let _ = writer.flush().await;

        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) | Err(_) => false,
            Ok(_) => line.trim().to_lowercase().starts_with('y'),
        }
    }
}

/// Stands in for the platform permission service on a desktop terminal.
///
/// Decisions are kept under `os:<kind>` in their own store, apart from the
/// app's cached flags. Like a phone, it never asks twice after a denial.
pub struct ConsolePermissionApi {
    decisions: Arc<dyn KeyValueStore>,
    prompter: Arc<dyn Prompter>,
}

impl ConsolePermissionApi {
    pub fn new(decisions: Arc<dyn KeyValueStore>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            decisions,
            prompter,
        }
    }

    fn decision_key(kind: PermissionKind) -> String {
        format!("os:{}", kind.as_str().to_lowercase())
    }

    fn question(kind: PermissionKind) -> &'static str {
        match kind {
            PermissionKind::Location => {
                "Allow SafeCircle to share your live location with your circle during an alert?"
            }
            PermissionKind::Contacts => {
                "Allow SafeCircle to read your contacts to pick trusted guardians?"
            }
        }
    }
}

#[async_trait]
impl PermissionApi for ConsolePermissionApi {
    async fn status(&self, kind: PermissionKind) -> Result<PermissionStatus, PermissionApiError> {
        let value = self
            .decisions
            .get(&Self::decision_key(kind))
            .await
            .map_err(|e| PermissionApiError::Unavailable(e.to_string()))?;

        Ok(match value.as_deref() {
            Some("granted") => PermissionStatus::Granted,
            Some("denied") => PermissionStatus::Denied,
            _ => PermissionStatus::Undetermined,
        })
    }

    async fn request(&self, kind: PermissionKind) -> Result<PermissionStatus, PermissionApiError> {
        let current = self.status(kind).await?;
        if current != PermissionStatus::Undetermined {
            return Ok(current);
        }

        let status = if self.prompter.confirm(Self::question(kind)).await {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };

        let value = if status.is_granted() { "granted" } else { "denied" };
        self.decisions
            .set(&Self::decision_key(kind), value)
            .await
            .map_err(|e| PermissionApiError::RequestFailed(e.to_string()))?;

        Ok(status)
    }
}
