//! Status messages shown in the message bar

use std::time::{Duration, Instant};

/// How long a message stays in the bar
const MESSAGE_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub message_type: MessageType,
    pub text: String,
    pub timestamp: Instant,
}

impl Message {
    pub fn new(message_type: MessageType, text: impl Into<String>) -> Self {
        Self {
            message_type,
            text: text.into(),
            timestamp: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.timestamp.elapsed() > MESSAGE_TTL
    }

    pub fn icon(&self) -> &str {
        match self.message_type {
            MessageType::Info => "ℹ",
            MessageType::Success => "✓",
            MessageType::Warning => "⚠",
            MessageType::Error => "✗",
        }
    }
}

/// Most recent messages, newest last
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    const CAPACITY: usize = 20;

    pub fn push(&mut self, message_type: MessageType, text: impl Into<String>) {
        self.messages.push(Message::new(message_type, text));
        if self.messages.len() > Self::CAPACITY {
            let overflow = self.messages.len() - Self::CAPACITY;
            self.messages.drain(..overflow);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(MessageType::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(MessageType::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(MessageType::Error, text);
    }

    /// Drop messages older than the display window
    pub fn prune(&mut self) {
        self.messages.retain(|m| !m.is_expired());
    }

    /// Up to `n` of the newest messages, oldest first
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
