//! Advisory Text Generator
//!
//! Builds prompts from the user's parameters and their allocation and sends
//! them to the configured `LlmProvider`. Provider failures are returned to
//! the caller as `AdvisorError::Agent`.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider, Message};

use crate::error::{AdvisorError, Result};
use crate::model::{Allocation, RiskProfile, UserProfile};

/// System message for the portfolio explanation
pub const EXPLAIN_SYSTEM_PROMPT: &str = "You are a helpful financial advisor.";

/// System message for follow-up questions
pub const QUESTION_SYSTEM_PROMPT: &str = "You are a financial advisor.";

/// Everything a prompt may mention about the user
///
/// Free text (goal, question) is embedded as a quoted, escaped literal so it
/// cannot break out of its slot in the prompt.
#[derive(Clone, Debug)]
pub struct AdvisoryPrompt {
    pub age: u8,
    pub risk: RiskProfile,
    pub goal: String,
    pub allocation: Allocation,
}

impl AdvisoryPrompt {
    pub fn new(profile: &UserProfile, allocation: Allocation) -> Self {
        Self {
            age: profile.age,
            risk: profile.risk,
            goal: profile.goal.clone(),
            allocation,
        }
    }

    /// Prompt asking for an explanation of the allocation
    pub fn explanation(&self) -> String {
        format!(
            "Act like a professional financial advisor. Explain this portfolio allocation for a \
             {}-year-old user with {} risk tolerance and goal: {:?}.\n\
             The allocation is: {}.",
            self.age,
            self.risk,
            self.goal,
            self.allocation.describe(),
        )
    }

    /// Prompt for a follow-up question about the same portfolio
    pub fn question(&self, question: &str) -> String {
        format!(
            "The user has a portfolio: {}, age {}, goal: {:?}. Question: {:?}",
            self.allocation.describe(),
            self.age,
            self.goal,
            question.trim(),
        )
    }
}

/// Sends advisory prompts to a text-generation backend
#[derive(Clone)]
pub struct Advisor {
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
}

impl Advisor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            options: GenerationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Explain `allocation` for this user
    pub async fn explain(&self, profile: &UserProfile, allocation: Allocation) -> Result<String> {
        let prompt = AdvisoryPrompt::new(profile, allocation);
        self.send(EXPLAIN_SYSTEM_PROMPT, prompt.explanation()).await
    }

    /// Answer a follow-up question; blank questions are rejected
    pub async fn ask(
        &self,
        profile: &UserProfile,
        allocation: Allocation,
        question: &str,
    ) -> Result<String> {
        if question.trim().is_empty() {
            return Err(AdvisorError::EmptyQuestion);
        }

        let prompt = AdvisoryPrompt::new(profile, allocation);
        self.send(QUESTION_SYSTEM_PROMPT, prompt.question(question)).await
    }

    async fn send(&self, system: &str, prompt: String) -> Result<String> {
        let messages = [Message::system(system), Message::user(prompt)];

        tracing::debug!(
            provider = self.provider.name(),
            model = %self.options.model,
            "Requesting advisory text"
        );

        let completion = self.provider.complete(&messages, &self.options).await?;
        Ok(completion.content)
    }
}
