//! Folder nodes and the arena that owns them.
//!
//! Folders form an N-ary tree. Nodes live in a [`FolderArena`] and refer to
//! each other by [`FolderId`]: children are owned ids in a per-node
//! name map, the parent is a plain back-reference id.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::rc::Rc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::message::MessageRef;

/// Identifier of a folder inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FolderId(usize);

impl FolderId {
    /// Position of the folder in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A mail folder.
#[derive(Debug)]
pub struct Folder {
    name: String,
    messages: Vec<MessageRef>,
    children: HashMap<String, FolderId>,
    /// Child ids in creation order.
    order: Vec<FolderId>,
    parent: Option<FolderId>,
}

impl Folder {
    fn new(name: String, parent: Option<FolderId>) -> Self {
        Self {
            name,
            messages: Vec::new(),
            children: HashMap::new(),
            order: Vec::new(),
            parent,
        }
    }

    /// Folder name, unique among its siblings.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent folder, `None` for a root.
    #[must_use]
    pub const fn parent(&self) -> Option<FolderId> {
        self.parent
    }

    /// Appends a message.
    pub fn add_message(&mut self, message: MessageRef) {
        self.messages.push(message);
    }

    /// Removes the first occurrence of `message`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MessageNotFound`] if the folder does not hold it.
    pub fn remove_message(&mut self, message: &MessageRef) -> Result<()> {
        let position = self
            .messages
            .iter()
            .position(|m| Rc::ptr_eq(m, message))
            .ok_or_else(|| Error::MessageNotFound(message.id().to_string()))?;
        self.messages.remove(position);
        Ok(())
    }

    /// Snapshot of the messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> Vec<MessageRef> {
        self.messages.clone()
    }

    /// Iterates over the messages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageRef> {
        self.messages.iter()
    }

    /// Message at `index`, if any.
    #[must_use]
    pub fn message_at(&self, index: usize) -> Option<MessageRef> {
        self.messages.get(index).cloned()
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the folder holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of unread messages.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.is_read()).count()
    }

    /// Looks up a direct child by name.
    #[must_use]
    pub fn subfolder(&self, name: &str) -> Option<FolderId> {
        self.children.get(name).copied()
    }

    /// Direct children in creation order.
    #[must_use]
    pub fn children(&self) -> &[FolderId] {
        &self.order
    }

    pub(crate) fn take_message(&mut self, index: usize) -> Option<MessageRef> {
        (index < self.messages.len()).then(|| self.messages.remove(index))
    }
}

/// Owner of a folder tree.
#[derive(Debug)]
pub struct FolderArena {
    nodes: Vec<Folder>,
}

impl FolderArena {
    /// Creates an arena holding a single root folder.
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Folder::new(root_name.into(), None)],
        }
    }

    /// The root folder.
    #[must_use]
    pub const fn root(&self) -> FolderId {
        FolderId(0)
    }

    /// Returns the folder behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different arena and is out of bounds.
    #[must_use]
    pub fn folder(&self, id: FolderId) -> &Folder {
        &self.nodes[id.0]
    }

    /// Returns the folder behind `id` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different arena and is out of bounds.
    pub fn folder_mut(&mut self, id: FolderId) -> &mut Folder {
        &mut self.nodes[id.0]
    }

    /// Total number of folders, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: an arena holds at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates a child folder under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFolder`] if `parent` already has a child
    /// with that name.
    pub fn create_subfolder(&mut self, parent: FolderId, name: &str) -> Result<FolderId> {
        if self.folder(parent).children.contains_key(name) {
            return Err(Error::DuplicateFolder(name.to_string()));
        }
        Ok(self.push_child(parent, name))
    }

    /// Child `name` of `parent`, created if it does not exist yet.
    pub fn subfolder_or_create(&mut self, parent: FolderId, name: &str) -> FolderId {
        match self.subfolder(parent, name) {
            Some(id) => id,
            None => self.push_child(parent, name),
        }
    }

    /// Whether `id` names a folder of this arena.
    #[must_use]
    pub fn contains(&self, id: FolderId) -> bool {
        id.0 < self.nodes.len()
    }

    fn push_child(&mut self, parent: FolderId, name: &str) -> FolderId {
        let id = FolderId(self.nodes.len());
        self.nodes.push(Folder::new(name.to_string(), Some(parent)));

        let node = self.folder_mut(parent);
        node.children.insert(name.to_string(), id);
        node.order.push(id);

        debug!(folder = name, parent = %self.folder(parent).name, "created folder");
        id
    }

    /// Looks up a direct child of `parent` by name.
    #[must_use]
    pub fn subfolder(&self, parent: FolderId, name: &str) -> Option<FolderId> {
        self.folder(parent).subfolder(name)
    }

    /// Slash-separated path from the root down to `id`, root excluded.
    #[must_use]
    pub fn path(&self, id: FolderId) -> String {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.folder(current).parent {
            segments.push(self.folder(current).name.as_str());
            current = parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Preorder dump of `id` and everything below it.
    ///
    /// Each folder prints as `📁 name`, each message as its read marker and
    /// subject, indented two spaces per level.
    #[must_use]
    pub fn list_contents(&self, id: FolderId) -> String {
        let mut out = String::new();
        self.write_contents(id, 0, &mut out);
        out
    }

    fn write_contents(&self, id: FolderId, level: usize, out: &mut String) {
        let folder = self.folder(id);
        let indent = "  ".repeat(level);
        let _ = writeln!(out, "{indent}📁 {}", folder.name);
        for message in &folder.messages {
            let _ = writeln!(out, "{indent}   {} {}", message.marker(), message.subject());
        }
        for &child in &folder.order {
            self.write_contents(child, level + 1, out);
        }
    }
}
