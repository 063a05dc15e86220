//! Confirmation prompts for policy-gated side effects
//!
//! The `ask` policy needs a yes/no answer from somewhere. Putting that
//! behind a trait keeps the operations testable and lets `--yes` runs
//! substitute a canned answer.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::Result;

/// Source of yes/no answers for optional side effects
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask a yes/no question; `false` means the user declined
    async fn confirm(&self, question: &str) -> Result<bool>;
}

/// Prompter that reads answers from the terminal
pub struct TerminalPrompter;

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, question: &str) -> Result<bool> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{question} [y/N] ").as_bytes())
            .await?;
        stdout.flush().await?;

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        reader.read_line(&mut line).await?;

        let answer = line.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

/// Prompter that always gives the same answer
///
/// Backs the `--yes` / `--no` CLI flags and non-interactive use.
pub struct PresetPrompter {
    answer: bool,
}

impl PresetPrompter {
    /// Prompter answering `answer` to every question
    pub fn new(answer: bool) -> Self {
        Self { answer }
    }
}

#[async_trait]
impl Prompter for PresetPrompter {
    async fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.answer)
    }
}
