//! Turns input text into a title, key facts and a short summary by asking
//! the text generation provider three independent questions.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{ProviderError, SummarizerError};
use crate::llm::TextGenerator;

pub const TITLE_INSTRUCTION: &str = "You are a title generation expert. Create a concise, engaging title for the given text. Return only the title text.";

pub const FACTS_INSTRUCTION: &str = "You are a fact extraction expert. Extract exactly two of the most interesting facts from the given text. Return only the facts, each on a new line.";

pub const SUMMARY_INSTRUCTION: &str = "You are a text summarization expert. Provide a 3-sentence summary of the given text that captures the key points while maintaining readability and coherence. Return only the summary text.";

/// Title used when the provider returns no title text.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Result of analyzing one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextAnalysis {
    pub title: String,
    pub facts: Vec<String>,
    pub summary: String,
}

pub struct TextAnalyzer {
    generator: Arc<dyn TextGenerator>,
    call_timeout: Duration,
    parallel: bool,
}

impl TextAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, call_timeout: Duration) -> Self {
        Self {
            generator,
            call_timeout,
            parallel: false,
        }
    }

    /// Issue the three provider calls concurrently instead of one after another.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Analyze `text`. Any failed call fails the whole analysis.
    pub async fn analyze(&self, text: &str) -> Result<TextAnalysis, SummarizerError> {
        let (title, facts, summary) = if self.parallel {
            tokio::try_join!(
                self.ask("title", TITLE_INSTRUCTION, text),
                self.ask("facts", FACTS_INSTRUCTION, text),
                self.ask("summary", SUMMARY_INSTRUCTION, text),
            )?
        } else {
            let title = self.ask("title", TITLE_INSTRUCTION, text).await?;
            let facts = self.ask("facts", FACTS_INSTRUCTION, text).await?;
            let summary = self.ask("summary", SUMMARY_INSTRUCTION, text).await?;
            (title, facts, summary)
        };

        Ok(TextAnalysis {
            title: parse_title(&title),
            facts: parse_facts(&facts),
            summary: summary.trim().to_string(),
        })
    }

    async fn ask(
        &self,
        step: &'static str,
        instruction: &str,
        text: &str,
    ) -> Result<String, ProviderError> {
        debug!(step, "requesting completion");
        timeout(self.call_timeout, self.generator.generate(instruction, text))
            .await
            .map_err(|_| ProviderError::Timeout {
                step,
                after: self.call_timeout,
            })?
    }
}

fn parse_title(raw: &str) -> String {
    let title = raw.trim();
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

fn parse_facts(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
