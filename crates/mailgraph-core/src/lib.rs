//! # mailgraph-core
//!
//! In-memory model of a small mail system.
//!
//! This crate provides:
//! - **Messages** shared by handle, so read and priority changes are seen
//!   from every folder and queue holding them
//! - **Folder trees** per user, stored in an arena, with path navigation,
//!   recursive search and message moves
//! - **Priority queue** ordering outbound mail High, Medium, Low
//! - **Mail servers** with registered users and keyword filters
//! - **Server networks** routed by breadth-first search
//!
//! ## Example
//!
//! ```
//! use mailgraph_core::{MailServer, Mailer, Priority, ServerGraph, User};
//!
//! let mut network = ServerGraph::new();
//! let mut a = MailServer::new("A");
//! a.register_user(User::new("Luis", "luis@a.com"))?;
//! let mut b = MailServer::new("B");
//! b.register_user(User::new("Ana", "ana@b.com"))?;
//! network.add_server(a)?;
//! network.add_server(b)?;
//! network.add_server(MailServer::new("C"))?;
//! network.connect("A", "C");
//! network.connect("C", "B");
//!
//! let message = User::new("Luis", "luis@a.com")
//!     .compose("ana@b.com", "Quarterly numbers", "See attached", Priority::High)?;
//! let route = network.deliver(message, "A", "B")?;
//! assert_eq!(route, ["A", "C", "B"]);
//!
//! let inbox = network.server("B").map(|b| b.receive("ana@b.com"));
//! assert_eq!(inbox.transpose()?.map(|m| m.len()), Some(1));
//! # Ok::<(), mailgraph_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod folder;
pub mod message;
pub mod network;
pub mod queue;
pub mod server;
pub mod tree;
pub mod user;

pub use config::{FilterRule, NetworkConfig, ServerConfig, UserConfig};
pub use error::{Error, Result};
pub use folder::{Folder, FolderArena, FolderId};
pub use message::{Message, MessageId, MessageRef, Priority};
pub use network::ServerGraph;
pub use queue::PriorityQueue;
pub use server::{MailServer, Mailer};
pub use tree::{FolderTree, SearchHit};
pub use user::{INBOX, PRIORITIZED, ROOT, SENT, User};
