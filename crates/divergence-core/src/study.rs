//! Study assistance: prompt construction for note summaries and feedback, and
//! the chat-completion wire types shared with HTTP backends.
//!
//! Nothing here performs I/O. A [`CompletionBackend`] implementation (see the
//! `divergence` binary) sends the [`ChatRequest`] and returns the generated
//! text.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  subject::{Note, Subject},
};

const FEEDBACK_SYSTEM_PROMPT: &str = "You are a helpful educational assistant \
  specializing in neurodivergent-friendly learning strategies. Analyze the \
  provided notes and suggest concrete, structured approaches for studying and \
  understanding the material. Include specific schedule suggestions, break down \
  complex topics, and provide memory aids where appropriate.";

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 1.0;

// ─── Learning style ──────────────────────────────────────────────────────────

/// How the model should rework a block of notes.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  strum::Display,
  strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum LearningStyle {
  /// Key bullet points.
  #[default]
  Summarized,
  /// Plainer wording.
  Simplified,
  /// Detailed analysis.
  InDepth,
}

impl LearningStyle {
  /// The instruction placed before the notes.
  pub fn instruction(self) -> &'static str {
    match self {
      Self::Summarized => "Summarize these notes into key bullet points:",
      Self::Simplified => "Simplify these notes for easier understanding:",
      Self::InDepth => "Provide an in-depth analysis and explanation of these notes:",
    }
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
  Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role:    Role,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: Role::System, content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }
}

/// Body of a chat-completions request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
  pub messages:          Vec<ChatMessage>,
  pub temperature:       f32,
  pub top_p:             f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub frequency_penalty: Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub presence_penalty:  Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
  pub message: ChatMessage,
}

/// Body of a successful chat-completions response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
  #[serde(default)]
  pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
  pub fn from_json(body: &str) -> Result<Self> { Ok(serde_json::from_str(body)?) }

  /// The first choice's content, trimmed.
  pub fn into_text(self) -> Result<String> {
    self
      .choices
      .into_iter()
      .next()
      .map(|c| c.message.content.trim().to_owned())
      .ok_or(Error::EmptyCompletion)
  }
}

/// Something that can turn a [`ChatRequest`] into generated text.
pub trait CompletionBackend: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn complete(
    &self,
    request: ChatRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;
}

// ─── Prompt builders ─────────────────────────────────────────────────────────

/// Rework free-form `notes` in the given `style`.
pub fn revision_request(style: LearningStyle, notes: &str) -> Result<ChatRequest> {
  let notes = notes.trim();
  if notes.is_empty() {
    return Err(Error::EmptyNotes);
  }
  Ok(ChatRequest {
    messages:          vec![ChatMessage::user(format!("{}\n\n{notes}", style.instruction()))],
    temperature:       TEMPERATURE,
    top_p:             TOP_P,
    frequency_penalty: Some(0.0),
    presence_penalty:  Some(0.0),
  })
}

/// Ask for study feedback on all of `subject`'s notes.
pub fn feedback_request(subject: &Subject) -> Result<ChatRequest> {
  if subject.notes.is_empty() {
    return Err(Error::NoNotes(subject.name.clone()));
  }
  let user = format!(
    "Here are my notes for {}:\n\n{}\n\nPlease provide neurodivergent-friendly \
     feedback on how to approach studying this material, including suggested \
     schedules and learning strategies.",
    subject.name,
    format_notes(&subject.notes),
  );
  Ok(ChatRequest {
    messages:          vec![ChatMessage::system(FEEDBACK_SYSTEM_PROMPT), ChatMessage::user(user)],
    temperature:       TEMPERATURE,
    top_p:             TOP_P,
    frequency_penalty: None,
    presence_penalty:  None,
  })
}

/// Render notes as `Date: ...\nContent: ...` blocks separated by blank lines.
pub fn format_notes(notes: &[Note]) -> String {
  notes
    .iter()
    .map(|n| format!("Date: {}\nContent: {}", n.date, n.content))
    .collect::<Vec<_>>()
    .join("\n\n")
}
