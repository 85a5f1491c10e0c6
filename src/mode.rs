//! Invocation modes and the prompts that go with them.

use crate::completion::types::CompletionRequest;
use crate::config::ModelSettings;

/// Label prepended to text sent for proofreading.
pub const PROOFREAD_PREFIX: &str = "Check this text: \n ";

const PROOFREAD_SYSTEM_PROMPT: &str = r#"Return only the enhanced version of the input text with the following improvements:
1. Fix spelling and grammar errors
2. Improve word choice with more precise and sophisticated vocabulary where appropriate
3. Correct capitalization and punctuation
4. Enhance sentence structure for better readability
5. Format paragraphs properly

Do not include any explanations, comments, or other text besides the corrected version. Output only the improved text."#;

const QUESTION_SYSTEM_PROMPT: &str = "you are an expert software and devops engineer, give short and concise answers except if explicitly asked for explanations";

/// What a single invocation asks the model to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fix spelling, grammar and style; the result also goes to the clipboard.
    Proofread,
    /// Short answers to programming and devops questions.
    Question,
}

impl Mode {
    /// The CLI flag that selects this mode.
    pub fn flag(self) -> &'static str {
        match self {
            Mode::Proofread => "-s",
            Mode::Question => "-q",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Proofread => "proofread",
            Mode::Question => "question",
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Mode::Proofread => PROOFREAD_SYSTEM_PROMPT,
            Mode::Question => QUESTION_SYSTEM_PROMPT,
        }
    }

    /// Model configured for this mode.
    pub fn model(self, models: &ModelSettings) -> &str {
        match self {
            Mode::Proofread => &models.proofread,
            Mode::Question => &models.question,
        }
    }

    /// Wrap the user's input into the message content sent to the model.
    pub fn user_content(self, input: &str) -> String {
        match self {
            Mode::Proofread => format!("{PROOFREAD_PREFIX}{input}"),
            Mode::Question => input.to_string(),
        }
    }

    /// Build the completion request for `input`.
    pub fn request(self, input: &str, models: &ModelSettings) -> CompletionRequest {
        CompletionRequest::new(
            self.model(models),
            models.max_tokens,
            self.system_prompt(),
            self.user_content(input),
        )
    }

    /// Whether the result should be copied to the clipboard.
    pub fn copies_to_clipboard(self) -> bool {
        matches!(self, Mode::Proofread)
    }
}
