//! Mail users and their folder trees.

use crate::error::{Error, Result};
use crate::folder::{FolderArena, FolderId};
use crate::message::{Message, MessageRef, Priority};
use crate::server::Mailer;
use crate::tree::FolderTree;

/// Name of the root folder of every user.
pub const ROOT: &str = "Root";
/// Incoming mail that no filter claimed.
pub const INBOX: &str = "Inbox";
/// Copies of mail the user sent.
pub const SENT: &str = "Sent";
/// Urgent mail.
pub const PRIORITIZED: &str = "Prioritized";

/// A mail user with its own folder tree.
#[derive(Debug)]
pub struct User {
    name: String,
    email: String,
    folders: FolderArena,
}

impl User {
    /// Creates a user whose root already holds Inbox, Sent and Prioritized.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let mut folders = FolderArena::new(ROOT);
        let root = folders.root();
        for standard in [INBOX, SENT, PRIORITIZED] {
            folders.subfolder_or_create(root, standard);
        }

        Self {
            name: name.into(),
            email: email.into(),
            folders,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyName`] if `name` is empty; the old name is kept.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Root folder of the user's tree.
    #[must_use]
    pub const fn root(&self) -> FolderId {
        self.folders.root()
    }

    /// The user's folders.
    #[must_use]
    pub const fn folders(&self) -> &FolderArena {
        &self.folders
    }

    /// The user's folders, mutably.
    pub const fn folders_mut(&mut self) -> &mut FolderArena {
        &mut self.folders
    }

    /// Path navigation, search and moves over the user's whole tree.
    pub fn folder_tree(&mut self) -> FolderTree<'_> {
        let root = self.folders.root();
        FolderTree::new(&mut self.folders, root)
    }

    /// Top-level folder `name`, created on first use.
    pub fn get_folder(&mut self, name: &str) -> FolderId {
        let root = self.folders.root();
        self.folders.subfolder_or_create(root, name)
    }

    /// Top-level folder `name` if it exists.
    #[must_use]
    pub fn find_folder(&self, name: &str) -> Option<FolderId> {
        self.folders.subfolder(self.folders.root(), name)
    }

    /// Files `message` at the end of top-level folder `name`.
    pub fn deliver(&mut self, name: &str, message: MessageRef) {
        let folder = self.get_folder(name);
        self.folders.folder_mut(folder).add_message(message);
    }

    /// Builds a message from this user without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRecipient`] if `recipient` is empty.
    pub fn compose(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
        priority: Priority,
    ) -> Result<MessageRef> {
        Ok(Message::new(self.email.as_str(), recipient, subject, body, priority)?.into_shared())
    }

    /// Composes a message and hands it to `mailer`.
    ///
    /// For a user registered on the very server it sends through, use
    /// [`crate::MailServer::send_from`], which borrows the user from the
    /// server itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRecipient`] if `recipient` is empty.
    pub fn send_message<M: Mailer + ?Sized>(
        &self,
        mailer: &mut M,
        recipient: &str,
        subject: &str,
        body: &str,
        priority: Priority,
    ) -> Result<MessageRef> {
        let message = self.compose(recipient, subject, body, priority)?;
        mailer.send(MessageRef::clone(&message));
        Ok(message)
    }
}
