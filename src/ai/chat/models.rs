//! The core models for managing a stateful chat with an LLM.
use chrono::Local;
use serde::Serialize;

use crate::gemini::{Content, Role};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
    /// Who produced the message, `User` or the model name.
    pub model: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            model: String::from("User"),
        }
    }

    pub fn model(content: &str, model_label: &str) -> Self {
        Self {
            role: Role::Model,
            content: content.to_string(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            model: model_label.to_string(),
        }
    }

    pub fn caption(&self) -> String {
        format!("Sent: {} | Model: {}", self.timestamp, self.model)
    }

    pub fn to_content(&self) -> Content {
        Content::new(self.role.clone(), &self.content)
    }
}

#[derive(Default)]
pub struct Transcript(Vec<ChatMessage>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, msg: ChatMessage) {
        self.0.push(msg)
    }

    pub fn pop(&mut self) -> Option<ChatMessage> {
        self.0.pop()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.0.last()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.0.iter()
    }

    /// The transcript in the shape the model API expects.
    pub fn contents(&self) -> Vec<Content> {
        self.0.iter().map(ChatMessage::to_content).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = ChatMessage::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.model, "User");
        assert_eq!(msg.timestamp.len(), 19);
        assert!(msg.caption().ends_with("| Model: User"));
    }

    #[test]
    fn test_transcript_contents() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("Hi"));
        transcript.push(ChatMessage::model("Hello!", "gemini-test"));

        let contents = transcript.contents();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, Some(Role::User));
        assert_eq!(contents[1].role, Some(Role::Model));
        assert_eq!(contents[1].text(), "Hello!");
    }
}
