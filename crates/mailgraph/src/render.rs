//! Plain-text rendering of folders, searches and routes.

use std::fmt::Write as _;

use mailgraph_core::{FolderArena, FolderId, MessageRef, SearchHit, ServerGraph};

/// One line per message, numbered from 1 when `numbered` is set.
pub fn message_list(messages: &[MessageRef], numbered: bool) -> String {
    if messages.is_empty() {
        return "No messages.\n".to_string();
    }

    let mut out = String::new();
    for (i, message) in messages.iter().enumerate() {
        let prefix = if numbered {
            format!("{}. ", i + 1)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "{prefix}{} {} | From: {} | Subject: {} | Priority: {}",
            message.marker(),
            message.created_at().format("%Y-%m-%d %H:%M"),
            message.sender(),
            message.subject(),
            message.priority(),
        );
    }
    out
}

/// Search results with the folder each message was found in.
pub fn search_hits(folders: &FolderArena, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No messages found.\n".to_string();
    }

    let mut out = format!("Found {} messages:\n", hits.len());
    for hit in hits {
        let _ = writeln!(
            out,
            "📁 {} | From: {} | Subject: {} | Priority: {}",
            folders.folder(hit.folder).name(),
            hit.message.sender(),
            hit.message.subject(),
            hit.message.priority(),
        );
    }
    out
}

/// Folder tree below `root`.
pub fn tree(folders: &FolderArena, root: FolderId) -> String {
    folders.list_contents(root)
}

/// Folder tree of every user, server by server.
pub fn user_trees(network: &ServerGraph) -> String {
    let mut out = String::new();
    for name in network.server_names() {
        let Some(server) = network.server(name) else {
            continue;
        };
        for email in server.emails() {
            if let Some(user) = server.user(email) {
                let _ = writeln!(out, "\nFolder tree of {email} on {name}:");
                out.push_str(&tree(user.folders(), user.root()));
            }
        }
    }
    out
}

/// Server names joined by arrows.
pub fn route(names: &[String]) -> String {
    names.join(" -> ")
}

/// Queue processing report.
pub fn processed(messages: &[MessageRef]) -> String {
    let mut out = String::new();
    for message in messages {
        let _ = writeln!(
            out,
            " - {}: {} (to {})",
            message.priority(),
            message.subject(),
            message.recipient()
        );
    }
    out
}
