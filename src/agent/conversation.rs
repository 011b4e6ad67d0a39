//! Conversation message history.

use crate::types::Message;

/// Append-only message history.
///
/// The order of messages is the context sent to the provider, so there is
/// no way to remove or edit an entry once appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Create a conversation, optionally opened by a system message.
    pub fn new(system: Option<String>) -> Self {
        let messages = system.map(Message::system).into_iter().collect();
        Self { messages }
    }

    /// Add a message to the end.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full ordered history.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> IntoIterator for &'a Conversation {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
