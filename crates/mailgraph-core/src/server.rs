//! Mail servers: registered users, keyword filters and the outbound queue.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::{FilterRule, ServerConfig};
use crate::error::{Error, Result};
use crate::message::{MessageRef, Priority};
use crate::queue::PriorityQueue;
use crate::user::{INBOX, SENT, User};

/// Capability to send and read mail.
pub trait Mailer {
    /// Accepts a message for delivery.
    ///
    /// Never fails: mail for recipients this mailer does not know is left to
    /// the network layer.
    fn send(&mut self, message: MessageRef);

    /// Snapshot of the user's Inbox.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if `email` is not registered.
    fn receive(&self, email: &str) -> Result<Vec<MessageRef>>;

    /// Snapshot of one of the user's top-level folders.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if `email` is not registered.
    fn list(&self, email: &str, folder: &str) -> Result<Vec<MessageRef>>;
}

/// An in-memory mail server.
#[derive(Debug)]
pub struct MailServer {
    name: String,
    users: HashMap<String, User>,
    filters: Vec<FilterRule>,
    queue: PriorityQueue,
}

impl MailServer {
    /// Creates a server with the default filter table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_filters(name, FilterRule::defaults())
    }

    /// Creates a server with the given filter table.
    #[must_use]
    pub fn with_filters(name: impl Into<String>, filters: Vec<FilterRule>) -> Self {
        let mut server = Self {
            name: name.into(),
            users: HashMap::new(),
            filters: Vec::with_capacity(filters.len()),
            queue: PriorityQueue::new(),
        };
        for rule in filters {
            server.add_filter(&rule.keyword, rule.folder);
        }
        server
    }

    /// Creates a server from configuration, registering its users.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateUser`] if two configured users share an
    /// email address.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let mut server = Self::with_filters(config.name.as_str(), config.filters.clone());
        for user in &config.users {
            server.register_user(User::new(user.name.as_str(), user.email.as_str()))?;
        }
        Ok(server)
    }

    /// Server name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a user under its email address.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateUser`] if the email is taken; the existing
    /// registration is left untouched.
    pub fn register_user(&mut self, user: User) -> Result<()> {
        if self.users.contains_key(user.email()) {
            return Err(Error::DuplicateUser(user.email().to_string()));
        }
        debug!(server = %self.name, email = user.email(), "registered user");
        self.users.insert(user.email().to_string(), user);
        Ok(())
    }

    /// Registered user by email.
    #[must_use]
    pub fn user(&self, email: &str) -> Option<&User> {
        self.users.get(email)
    }

    /// Registered user by email, mutably.
    pub fn user_mut(&mut self, email: &str) -> Option<&mut User> {
        self.users.get_mut(email)
    }

    /// Registered email addresses, sorted.
    #[must_use]
    pub fn emails(&self) -> Vec<&str> {
        let mut emails: Vec<_> = self.users.keys().map(String::as_str).collect();
        emails.sort_unstable();
        emails
    }

    /// Adds a keyword rule, or retargets an existing one in place.
    pub fn add_filter(&mut self, keyword: &str, folder: impl Into<String>) {
        let rule = FilterRule::new(keyword, folder);
        match self.filters.iter_mut().find(|r| r.keyword == rule.keyword) {
            Some(existing) => existing.folder = rule.folder,
            None => self.filters.push(rule),
        }
    }

    /// Filter table in evaluation order.
    #[must_use]
    pub fn filters(&self) -> &[FilterRule] {
        &self.filters
    }

    /// Folder the first matching filter routes `message` to, Inbox if none.
    #[must_use]
    pub fn route(&self, message: &MessageRef) -> &str {
        let text = format!("{} {}", message.subject(), message.body()).to_lowercase();
        self.filters
            .iter()
            .find(|rule| text.contains(&rule.keyword))
            .map_or(INBOX, |rule| rule.folder.as_str())
    }

    fn lookup(&self, email: &str) -> Result<&User> {
        self.users.get(email).ok_or_else(|| Error::UserNotFound {
            email: email.to_string(),
            server: self.name.clone(),
        })
    }

    /// Composes a message as registered user `sender` and sends it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] if `sender` is not registered here,
    /// or [`Error::EmptyRecipient`] if `recipient` is empty.
    pub fn send_from(
        &mut self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
        priority: Priority,
    ) -> Result<MessageRef> {
        let message = self
            .lookup(sender)?
            .compose(recipient, subject, body, priority)?;
        self.send(MessageRef::clone(&message));
        Ok(message)
    }

    /// Number of messages waiting in the priority queue.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drains the priority queue, High first, returning the processing
    /// order.
    pub fn process_priority_messages(&mut self) -> Vec<MessageRef> {
        let processed: Vec<_> = self.queue.drain().collect();
        for message in &processed {
            info!(
                server = %self.name,
                priority = %message.priority(),
                subject = message.subject(),
                recipient = message.recipient(),
                "processed message"
            );
        }
        processed
    }
}

impl Mailer for MailServer {
    fn send(&mut self, message: MessageRef) {
        if let Some(sender) = self.users.get_mut(message.sender()) {
            sender.deliver(SENT, MessageRef::clone(&message));
        }

        self.queue.push(MessageRef::clone(&message));

        let folder = self.route(&message).to_string();
        match self.users.get_mut(message.recipient()) {
            Some(recipient) => {
                info!(
                    server = %self.name,
                    message = %message.id(),
                    recipient = message.recipient(),
                    folder = %folder,
                    "delivered locally"
                );
                recipient.deliver(&folder, message);
            }
            None => debug!(
                server = %self.name,
                recipient = message.recipient(),
                "recipient not local, left for network delivery"
            ),
        }
    }

    fn receive(&self, email: &str) -> Result<Vec<MessageRef>> {
        self.list(email, INBOX)
    }

    fn list(&self, email: &str, folder: &str) -> Result<Vec<MessageRef>> {
        let user = self.lookup(email)?;
        Ok(user
            .find_folder(folder)
            .map(|id| user.folders().folder(id).messages())
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::config::ServerConfig;
    use crate::user::PRIORITIZED;

    fn server() -> MailServer {
        let mut server = MailServer::new("Local");
        server
            .register_user(User::new("Luis", "luis@mail.com"))
            .unwrap();
        server
            .register_user(User::new("Ana", "ana@mail.com"))
            .unwrap();
        server
    }

    #[test]
    fn test_duplicate_user_rejected() {
        let mut server = server();
        server
            .user_mut("luis@mail.com")
            .unwrap()
            .set_name("Original")
            .unwrap();

        let result = server.register_user(User::new("Impostor", "luis@mail.com"));

        assert!(matches!(result, Err(Error::DuplicateUser(email)) if email == "luis@mail.com"));
        assert_eq!(server.user("luis@mail.com").unwrap().name(), "Original");
        assert_eq!(server.emails(), ["ana@mail.com", "luis@mail.com"]);
    }

    #[test]
    fn test_local_send_fills_sent_and_inbox() {
        let mut server = server();
        let message = server
            .send_from("luis@mail.com", "ana@mail.com", "Lunch", "At noon?", Priority::Medium)
            .unwrap();

        let sent = server.list("luis@mail.com", SENT).unwrap();
        let inbox = server.receive("ana@mail.com").unwrap();
        assert!(Rc::ptr_eq(&sent[0], &message));
        assert!(Rc::ptr_eq(&inbox[0], &message));
        assert_eq!(server.pending(), 1);

        inbox[0].mark_read();
        assert!(sent[0].is_read());
    }

    #[test]
    fn test_filter_routes_on_subject_or_body() {
        let mut server = server();
        server
            .send_from("luis@mail.com", "ana@mail.com", "URGENT reply", "", Priority::High)
            .unwrap();
        server
            .send_from("luis@mail.com", "ana@mail.com", "Deals", "special offer inside", Priority::Low)
            .unwrap();

        assert_eq!(server.list("ana@mail.com", PRIORITIZED).unwrap().len(), 1);
        assert_eq!(server.list("ana@mail.com", "Promotions").unwrap().len(), 1);
        assert!(server.receive("ana@mail.com").unwrap().is_empty());
    }

    #[test]
    fn test_spanish_keywords_route_like_english() {
        let mut server = server();
        server
            .send_from("luis@mail.com", "ana@mail.com", "Gran oferta", "", Priority::Low)
            .unwrap();
        server
            .send_from("luis@mail.com", "ana@mail.com", "Aviso", "universidad nacional", Priority::Medium)
            .unwrap();
        server
            .send_from("luis@mail.com", "ana@mail.com", "Prueba urgente", "", Priority::High)
            .unwrap();

        assert!(server.receive("ana@mail.com").unwrap().is_empty());
        assert_eq!(server.list("ana@mail.com", "Promotions").unwrap().len(), 1);
        assert_eq!(server.list("ana@mail.com", "Academic").unwrap().len(), 1);
        assert_eq!(server.list("ana@mail.com", PRIORITIZED).unwrap().len(), 1);
    }

    #[test]
    fn test_first_matching_filter_wins() {
        let mut server = server();
        let message = server
            .send_from(
                "luis@mail.com",
                "ana@mail.com",
                "university offer",
                "urgent",
                Priority::Medium,
            )
            .unwrap();

        assert_eq!(server.route(&message), PRIORITIZED);
    }

    #[test]
    fn test_add_filter_overwrites_in_place() {
        let mut server = server();
        server.add_filter("Offer", "Deals");
        server.add_filter("Invoice", "Billing");

        let table: Vec<_> = server
            .filters()
            .iter()
            .map(|r| (r.keyword.as_str(), r.folder.as_str()))
            .collect();
        assert_eq!(
            table,
            [
                ("urgent", PRIORITIZED),
                ("offer", "Deals"),
                ("oferta", "Promotions"),
                ("university", "Academic"),
                ("universidad", "Academic"),
                ("invoice", "Billing"),
            ]
        );
    }

    #[test]
    fn test_unknown_recipient_is_absorbed() {
        let mut server = server();
        let message = server
            .send_from("luis@mail.com", "ghost@elsewhere.com", "Hi", "", Priority::Low)
            .unwrap();

        assert_eq!(server.pending(), 1);
        assert!(Rc::ptr_eq(
            &server.list("luis@mail.com", SENT).unwrap()[0],
            &message
        ));
    }

    #[test]
    fn test_unregistered_sender_via_user_send_message() {
        let mut server = server();
        let outsider = User::new("Visitor", "visitor@other.com");

        outsider
            .send_message(&mut server, "ana@mail.com", "Hello", "", Priority::Medium)
            .unwrap();

        assert_eq!(server.receive("ana@mail.com").unwrap().len(), 1);
        assert_eq!(server.pending(), 1);
    }

    #[test]
    fn test_unknown_user_errors() {
        let mut server = server();
        assert!(matches!(
            server.receive("nobody@mail.com"),
            Err(Error::UserNotFound { email, server }) if email == "nobody@mail.com" && server == "Local"
        ));
        assert!(server.list("nobody@mail.com", INBOX).is_err());
        assert!(
            server
                .send_from("nobody@mail.com", "ana@mail.com", "x", "", Priority::Low)
                .is_err()
        );
        assert_eq!(server.pending(), 0);
    }

    #[test]
    fn test_list_missing_folder_is_empty() {
        let server = server();
        assert!(server.list("ana@mail.com", "Nowhere").unwrap().is_empty());
    }

    #[test]
    fn test_process_priority_messages_drains() {
        let mut server = server();
        for (subject, priority) in [
            ("low", Priority::Low),
            ("high", Priority::High),
            ("medium", Priority::Medium),
            ("high again", Priority::High),
        ] {
            server
                .send_from("luis@mail.com", "ana@mail.com", subject, "", priority)
                .unwrap();
        }

        let order: Vec<_> = server
            .process_priority_messages()
            .iter()
            .map(|m| m.subject().to_string())
            .collect();

        assert_eq!(order, ["high", "high again", "medium", "low"]);
        assert_eq!(server.pending(), 0);
        assert!(server.process_priority_messages().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = ServerConfig::new("Configured")
            .with_user("Luis", "luis@a.com")
            .with_user("Ana", "ana@a.com");
        let server = MailServer::from_config(&config).unwrap();

        assert_eq!(server.name(), "Configured");
        assert_eq!(server.emails(), ["ana@a.com", "luis@a.com"]);
        assert_eq!(server.filters(), FilterRule::defaults().as_slice());
    }

    #[test]
    fn test_from_config_duplicate_user() {
        let config = ServerConfig::new("Configured")
            .with_user("Luis", "luis@a.com")
            .with_user("Luis again", "luis@a.com");
        assert!(matches!(
            MailServer::from_config(&config),
            Err(Error::DuplicateUser(_))
        ));
    }

    #[test]
    fn test_mailer_as_trait_object() {
        let mut server = server();
        let message = server
            .user("luis@mail.com")
            .unwrap()
            .compose("ana@mail.com", "dyn", "", Priority::Medium)
            .unwrap();

        let mailer: &mut dyn Mailer = &mut server;
        mailer.send(message);
        assert_eq!(mailer.receive("ana@mail.com").unwrap().len(), 1);
    }
}
