//! services/client/src/adapters/console.rs
//!
//! Confirmation dialog for the interactive shell. The question is printed and
//! the next line the user types answers it instead of being run as a command.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use docqa_client_core::ports::ConfirmationPrompt;
use tokio::sync::oneshot;
use tracing::debug;

#[derive(Debug, Default)]
struct PromptSlot {
    pending: Option<oneshot::Sender<bool>>,
    /// Set once input has ended. Every later question is declined.
    closed: bool,
}

#[derive(Debug, Default)]
pub struct ConsoleConfirm {
    slot: Mutex<PromptSlot>,
}

impl ConsoleConfirm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_waiting(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Routes an input line to the open question, if there is one.
    /// Returns `false` when nothing was waiting for an answer.
    pub fn answer(&self, line: &str) -> bool {
        let Some(sender) = self.lock().pending.take() else {
            return false;
        };
        let accepted = matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes");
        if sender.send(accepted).is_err() {
            debug!("Confirmation answered after the asker went away.");
        }
        true
    }

    /// Declines the open question and every later one.
    pub fn close(&self) {
        let mut slot = self.lock();
        slot.closed = true;
        if let Some(sender) = slot.pending.take() {
            debug!("Input closed with a confirmation open; declining.");
            sender.send(false).ok();
        }
    }

    fn lock(&self) -> MutexGuard<'_, PromptSlot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ConfirmationPrompt for ConsoleConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let receiver = {
            let mut slot = self.lock();
            if slot.closed {
                debug!("Declining '{}': input is closed.", prompt);
                return false;
            }
            let (sender, receiver) = oneshot::channel();
            // A newer question supersedes an unanswered one, which reads as "no".
            slot.pending = Some(sender);
            receiver
        };
        println!("{} [y/N]", prompt);
        receiver.await.unwrap_or(false)
    }
}
