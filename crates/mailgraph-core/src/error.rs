//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A message was built without a recipient.
    #[error("Message must have a recipient")]
    EmptyRecipient,

    /// A user was renamed to an empty name.
    #[error("User name cannot be empty")]
    EmptyName,

    /// A sibling folder with the same name already exists.
    #[error("Folder '{0}' already exists")]
    DuplicateFolder(String),

    /// The email address is already registered on the server.
    #[error("Email {0} is already registered")]
    DuplicateUser(String),

    /// A server with the same name is already part of the network.
    #[error("Server {0} is already part of the network")]
    DuplicateServer(String),

    /// A path segment does not name an existing folder.
    #[error("Folder '{segment}' does not exist in path '{path}'")]
    PathNotFound {
        /// First segment that could not be resolved.
        segment: String,
        /// Full path that was being resolved.
        path: String,
    },

    /// No user with that email is registered on the server.
    #[error("User {email} does not exist on server {server}")]
    UserNotFound {
        /// Email address that was looked up.
        email: String,
        /// Server that was asked.
        server: String,
    },

    /// The message is not stored in the folder.
    #[error("Message {0} not found in folder")]
    MessageNotFound(String),

    /// A folder id does not belong to the tree it was used with.
    #[error("Folder #{0} does not exist in this tree")]
    UnknownFolder(usize),

    /// No server with that name is part of the network.
    #[error("Server {0} does not exist")]
    ServerNotFound(String),

    /// A message position is outside the folder.
    #[error("Message index {index} out of range (folder holds {len})")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of messages in the folder.
        len: usize,
    },

    /// The two servers are not connected.
    #[error("No route between servers {from} and {to}")]
    NoRoute {
        /// Origin server.
        from: String,
        /// Destination server.
        to: String,
    },

    /// Configuration is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
