//! Message model and priority classes.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Shared handle to a message.
///
/// A message can sit in several folders and in a server queue at once; all
/// of them hold the same allocation, so read and priority changes are seen
/// everywhere.
pub type MessageRef = Rc<Message>;

/// Priority class of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Processed first.
    High,
    /// Default class.
    #[default]
    Medium,
    /// Processed last.
    Low,
}

impl Priority {
    /// Parse a priority name, falling back to `Medium` for anything unknown.
    ///
    /// Matching is case-insensitive and accepts the Spanish names used by
    /// older clients (`Alta`, `Media`, `Baja`).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" | "alta" => Self::High,
            "low" | "baja" => Self::Low,
            _ => Self::Medium,
        }
    }

    /// Queue ordinal: lower numbers are processed first.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Unique identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(String);

impl MessageId {
    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential message identifier generator.
///
/// Generates identifiers in the format "M000000", "M000001", etc.
#[derive(Debug)]
pub struct IdGenerator {
    counter: AtomicU64,
    prefix: char,
}

impl IdGenerator {
    /// Creates a new generator with the given prefix.
    #[must_use]
    pub const fn new(prefix: char) -> Self {
        Self {
            counter: AtomicU64::new(0),
            prefix,
        }
    }

    /// Generates the next identifier.
    #[must_use]
    pub fn next_id(&self) -> MessageId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        MessageId(format!("{}{:06}", self.prefix, n))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new('M')
    }
}

static MESSAGE_IDS: IdGenerator = IdGenerator::new('M');

/// An email message.
///
/// Everything except the read flag and the priority is fixed at
/// construction.
#[derive(Debug)]
pub struct Message {
    id: MessageId,
    sender: String,
    recipient: String,
    subject: String,
    body: String,
    created_at: DateTime<Local>,
    priority: Cell<Priority>,
    read: Cell<bool>,
}

impl Message {
    /// Creates a new unread message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRecipient`] if `recipient` is empty.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        priority: Priority,
    ) -> Result<Self> {
        let recipient = recipient.into();
        if recipient.is_empty() {
            return Err(Error::EmptyRecipient);
        }

        Ok(Self {
            id: MESSAGE_IDS.next_id(),
            sender: sender.into(),
            recipient,
            subject: subject.into(),
            body: body.into(),
            created_at: Local::now(),
            priority: Cell::new(priority),
            read: Cell::new(false),
        })
    }

    /// Wraps the message in a shared handle.
    #[must_use]
    pub fn into_shared(self) -> MessageRef {
        Rc::new(self)
    }

    /// Unique identifier.
    #[must_use]
    pub const fn id(&self) -> &MessageId {
        &self.id
    }

    /// Sender address.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Recipient address.
    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Subject line.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Message body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Current priority.
    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority.get()
    }

    /// Changes the priority.
    ///
    /// Queues order by the priority at insertion time; this does not
    /// reorder a queue the message already sits in.
    pub fn set_priority(&self, priority: Priority) {
        self.priority.set(priority);
    }

    /// Whether the message has been read.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read.get()
    }

    /// Marks the message as read.
    pub fn mark_read(&self) {
        self.read.set(true);
    }

    /// Marks the message as unread.
    pub fn mark_unread(&self) {
        self.read.set(false);
    }

    /// Read-state marker used in listings.
    #[must_use]
    pub fn marker(&self) -> char {
        if self.is_read() { '✓' } else { '•' }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Message {}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{} {} ({})>",
            self.marker(),
            self.subject,
            self.priority()
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use super::*;

    fn sample(priority: Priority) -> Message {
        Message::new("luis@a.com", "ana@b.com", "Hello", "Body", priority).unwrap()
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(Priority::parse("High"), Priority::High);
        assert_eq!(Priority::parse("low"), Priority::Low);
        assert_eq!(Priority::parse("Alta"), Priority::High);
        assert_eq!(Priority::parse("Baja"), Priority::Low);
        assert_eq!(Priority::parse("Media"), Priority::Medium);
    }

    #[test]
    fn test_unknown_priority_defaults_to_medium() {
        assert_eq!(Priority::parse("Urgent"), Priority::Medium);
        assert_eq!(Priority::parse(""), Priority::Medium);
        assert_eq!("whatever".parse::<Priority>().unwrap(), Priority::Medium);
    }

    #[test]
    fn test_priority_ordinals() {
        assert_eq!(Priority::High.ordinal(), 1);
        assert_eq!(Priority::Medium.ordinal(), 2);
        assert_eq!(Priority::Low.ordinal(), 3);
    }

    #[test]
    fn test_empty_recipient_rejected() {
        let result = Message::new("luis@a.com", "", "Hi", "", Priority::High);
        assert!(matches!(result, Err(Error::EmptyRecipient)));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = sample(Priority::Medium);
        let b = sample(Priority::Medium);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_generator_format() {
        let generator = IdGenerator::new('X');
        assert_eq!(generator.next_id().as_str(), "X000000");
        assert_eq!(generator.next_id().as_str(), "X000001");
    }

    #[test]
    fn test_new_message_is_unread() {
        let message = sample(Priority::Low);
        assert!(!message.is_read());
        assert_eq!(message.to_string(), "<• Hello (Low)>");
    }

    #[test]
    fn test_mutation_visible_through_every_handle() {
        let message = sample(Priority::Medium).into_shared();
        let other = Rc::clone(&message);

        other.mark_read();
        other.set_priority(Priority::High);

        assert!(message.is_read());
        assert_eq!(message.priority(), Priority::High);
        assert_eq!(message.to_string(), "<✓ Hello (High)>");

        message.mark_unread();
        assert!(!other.is_read());
    }
}
