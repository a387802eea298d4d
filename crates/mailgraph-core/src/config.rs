//! Configuration for servers and networks.
//!
//! Everything here is plain data, (de)serializable with serde so a network
//! can be described in JSON:
//!
//! ```json
//! {
//!   "servers": [
//!     { "name": "Server_A", "users": [{ "name": "Luis", "email": "luis@a.com" }] },
//!     { "name": "Server_B", "filters": [{ "keyword": "invoice", "folder": "Billing" }] }
//!   ],
//!   "links": [["Server_A", "Server_B"]]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A keyword routing rule: incoming mail mentioning `keyword` lands in
/// `folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Keyword searched for in subject and body, case-insensitively.
    pub keyword: String,
    /// Top-level folder the message is routed to.
    pub folder: String,
}

impl FilterRule {
    /// Creates a rule, normalizing the keyword to lowercase.
    #[must_use]
    pub fn new(keyword: &str, folder: impl Into<String>) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            folder: folder.into(),
        }
    }

    /// The filter table every server starts with unless configured otherwise.
    ///
    /// Keywords come in English and Spanish; `urgent` also matches
    /// "urgente".
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("urgent", "Prioritized"),
            Self::new("offer", "Promotions"),
            Self::new("oferta", "Promotions"),
            Self::new("university", "Academic"),
            Self::new("universidad", "Academic"),
        ]
    }
}

/// A user to register on a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Display name.
    pub name: String,
    /// Email address, also the registration key.
    pub email: String,
}

/// A single mail server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name, unique within a network.
    pub name: String,
    /// Filter table in evaluation order.
    #[serde(default = "FilterRule::defaults")]
    pub filters: Vec<FilterRule>,
    /// Users registered at startup.
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl ServerConfig {
    /// Creates a server config with the default filters and no users.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filters: FilterRule::defaults(),
            users: Vec::new(),
        }
    }

    /// Adds a user to register.
    #[must_use]
    pub fn with_user(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.users.push(UserConfig {
            name: name.into(),
            email: email.into(),
        });
        self
    }
}

/// A network of servers and the links between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Servers in registration order.
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
    /// Undirected links, by server name.
    #[serde(default)]
    pub links: Vec<[String; 2]>,
}

impl NetworkConfig {
    /// Parses a network description from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serde`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the network description to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Serde`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Three servers in a line, `Server_A - Server_C - Server_B`, with one
    /// user on each end.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            servers: vec![
                ServerConfig::new("Server_A").with_user("Luis", "luis@a.com"),
                ServerConfig::new("Server_B").with_user("Ana", "ana@b.com"),
                ServerConfig::new("Server_C"),
            ],
            links: vec![
                ["Server_A".to_string(), "Server_C".to_string()],
                ["Server_C".to_string(), "Server_B".to_string()],
            ],
        }
    }
}
