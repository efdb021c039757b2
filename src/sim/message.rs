//! Bottom bar message with expiry and priority

use serde::{Deserialize, Serialize};

use crate::consts::MAXIMUM_MESSAGE_SIZE;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: String,
    pub expire_frame: u64,
    pub priority: u32,
}

impl Message {
    /// Build a message, truncating the text to the bounded size
    pub fn new(text: &str, expire_frame: u64, priority: u32) -> Self {
        Self {
            text: truncate_with_ellipsis(text, MAXIMUM_MESSAGE_SIZE),
            expire_frame,
            priority,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_expired(&self, frame: u64) -> bool {
        frame >= self.expire_frame
    }
}

/// Replace the current message unless a live one has higher priority.
/// Returns whether the new message was stored.
pub fn set_message(slot: &mut Option<Message>, message: Message, frame: u64) -> bool {
    if let Some(current) = slot.as_ref() {
        if !current.is_expired(frame) && current.priority > message.priority {
            return false;
        }
    }
    *slot = Some(message);
    true
}

/// Drop the message once it expires
pub fn expire_message(slot: &mut Option<Message>, frame: u64) {
    if slot.as_ref().is_some_and(|m| m.is_expired(frame)) {
        *slot = None;
    }
}

/// Cut `text` to at most `size` bytes, marking the cut with an ellipsis
fn truncate_with_ellipsis(text: &str, size: usize) -> String {
    if text.len() <= size {
        return text.to_string();
    }
    if size < 2 * ELLIPSIS.len() {
        return text[..floor_boundary(text, size)].to_string();
    }
    let end = floor_boundary(text, size - ELLIPSIS.len());
    format!("{}{ELLIPSIS}", &text[..end])
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_text_is_truncated() {
        let text = "a".repeat(100);
        let message = Message::new(&text, 10, 0);
        assert_eq!(message.text().len(), MAXIMUM_MESSAGE_SIZE);
        assert!(message.text().ends_with("..."));
        assert_eq!(Message::new("short", 10, 0).text(), "short");
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = "é".repeat(40);
        let cut = truncate_with_ellipsis(&text, 10);
        assert!(cut.len() <= 10);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_with_ellipsis("abcdefgh", 4), "abcd");
    }

    #[test]
    fn test_higher_priority_is_kept_until_expiry() {
        let mut slot = None;
        assert!(set_message(&mut slot, Message::new("important", 100, 2), 0));
        assert!(!set_message(&mut slot, Message::new("chatter", 100, 1), 10));
        assert_eq!(slot.as_ref().map(Message::text), Some("important"));

        // Equal priority replaces
        assert!(set_message(&mut slot, Message::new("also important", 100, 2), 10));

        // Expired messages never block
        assert!(set_message(&mut slot, Message::new("chatter", 200, 1), 100));
        assert_eq!(slot.as_ref().map(Message::text), Some("chatter"));
    }

    #[test]
    fn test_expire_message() {
        let mut slot = Some(Message::new("hello", 5, 0));
        expire_message(&mut slot, 4);
        assert!(slot.is_some());
        expire_message(&mut slot, 5);
        assert!(slot.is_none());
    }
}
