//! Path navigation, recursive search and message moves over a folder tree.
//!
//! Complexity (worst case), with N messages, C folders and depth D:
//! - [`FolderTree::search`]: O(N + C) time, O(N + D) extra space
//! - [`FolderTree::move_message`]: O(len of source folder)

use std::rc::Rc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::folder::{FolderArena, FolderId};
use crate::message::MessageRef;

/// A search match: the folder holding the message and the message itself.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Folder the message was found in.
    pub folder: FolderId,
    /// The matching message.
    pub message: MessageRef,
}

/// View over the folder tree rooted at a given folder.
///
/// Holds no state of its own; everything lives in the borrowed arena.
#[derive(Debug)]
pub struct FolderTree<'a> {
    arena: &'a mut FolderArena,
    root: FolderId,
}

impl<'a> FolderTree<'a> {
    /// Creates a view rooted at `root`.
    pub const fn new(arena: &'a mut FolderArena, root: FolderId) -> Self {
        Self { arena, root }
    }

    /// Root of this view.
    #[must_use]
    pub const fn root(&self) -> FolderId {
        self.root
    }

    /// The underlying arena.
    #[must_use]
    pub fn arena(&self) -> &FolderArena {
        &*self.arena
    }

    /// The underlying arena, mutably.
    pub fn arena_mut(&mut self) -> &mut FolderArena {
        &mut *self.arena
    }

    /// Resolves a path like `Inbox/Work/2025` below the root.
    ///
    /// Leading and trailing slashes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] naming the first segment that has no
    /// matching child.
    pub fn resolve_path(&self, path: &str) -> Result<FolderId> {
        let mut current = self.root;
        for segment in path.trim_matches('/').split('/') {
            current = self
                .arena
                .subfolder(current, segment)
                .ok_or_else(|| Error::PathNotFound {
                    segment: segment.to_string(),
                    path: path.to_string(),
                })?;
        }
        Ok(current)
    }

    /// Finds messages whose subject or sender contains `text`,
    /// case-insensitively, across the whole tree in preorder.
    #[must_use]
    pub fn search(&self, text: &str) -> Vec<SearchHit> {
        let needle = text.to_lowercase();
        let mut hits = Vec::new();
        self.search_from(self.root, &needle, &mut hits);
        hits
    }

    fn search_from(&self, id: FolderId, needle: &str, hits: &mut Vec<SearchHit>) {
        let folder = self.arena.folder(id);
        for message in folder.iter() {
            if message.subject().to_lowercase().contains(needle)
                || message.sender().to_lowercase().contains(needle)
            {
                hits.push(SearchHit {
                    folder: id,
                    message: Rc::clone(message),
                });
            }
        }
        for &child in folder.children() {
            self.search_from(child, needle, hits);
        }
    }

    /// Moves the message at `index` in `source` to the end of `destination`.
    ///
    /// The same message handle is transferred; nothing is copied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFolder`] if either id is not part of this
    /// tree's arena and [`Error::IndexOutOfRange`] if `index` is not a valid
    /// position in `source`. Neither folder changes in those cases.
    pub fn move_message(
        &mut self,
        source: FolderId,
        index: usize,
        destination: FolderId,
    ) -> Result<()> {
        if let Some(unknown) = [source, destination]
            .into_iter()
            .find(|&id| !self.arena.contains(id))
        {
            return Err(Error::UnknownFolder(unknown.index()));
        }

        let len = self.arena.folder(source).len();
        let message = self
            .arena
            .folder_mut(source)
            .take_message(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;

        debug!(
            message = %message.id(),
            from = %self.arena.path(source),
            to = %self.arena.path(destination),
            "moving message"
        );
        self.arena.folder_mut(destination).add_message(message);
        Ok(())
    }
}
