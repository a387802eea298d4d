//! Network of mail servers modeled as an undirected graph.
//!
//! Remote delivery follows the shortest path (by hop count) found with a
//! breadth-first search.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, info, warn};

use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::message::MessageRef;
use crate::server::{MailServer, Mailer};

/// Servers and the links between them.
///
/// `connect` does not deduplicate: linking the same pair twice stores the
/// edge twice. Traversals skip visited servers, so routes are unaffected.
#[derive(Debug, Default)]
pub struct ServerGraph {
    servers: HashMap<String, MailServer>,
    adjacency: HashMap<String, Vec<String>>,
    /// Server names in registration order.
    order: Vec<String>,
}

impl ServerGraph {
    /// Creates an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network from configuration: every server, then every link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateServer`] or [`Error::DuplicateUser`] for
    /// repeated names, and [`Error::Config`] for a link naming an unknown
    /// server.
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        let mut graph = Self::new();
        for server in &config.servers {
            graph.add_server(MailServer::from_config(server)?)?;
        }
        for [a, b] in &config.links {
            for end in [a, b] {
                if !graph.servers.contains_key(end) {
                    return Err(Error::Config(format!("link names unknown server {end}")));
                }
            }
            graph.connect(a, b);
        }
        Ok(graph)
    }

    /// Adds a server with no links.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateServer`] if the name is taken.
    pub fn add_server(&mut self, server: MailServer) -> Result<()> {
        let name = server.name().to_string();
        if self.servers.contains_key(&name) {
            return Err(Error::DuplicateServer(name));
        }
        self.adjacency.entry(name.clone()).or_default();
        self.order.push(name.clone());
        self.servers.insert(name, server);
        Ok(())
    }

    /// Links `a` and `b` in both directions.
    pub fn connect(&mut self, a: &str, b: &str) {
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .push(b.to_string());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .push(a.to_string());
        debug!(a, b, "connected servers");
    }

    /// Server by name.
    #[must_use]
    pub fn server(&self, name: &str) -> Option<&MailServer> {
        self.servers.get(name)
    }

    /// Server by name, mutably.
    pub fn server_mut(&mut self, name: &str) -> Option<&mut MailServer> {
        self.servers.get_mut(name)
    }

    /// Server names in registration order.
    #[must_use]
    pub fn server_names(&self) -> &[String] {
        &self.order
    }

    /// Neighbors of `name` in link order, duplicates included.
    #[must_use]
    pub fn neighbors(&self, name: &str) -> &[String] {
        self.adjacency
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Shortest route from `origin` to `destination`, both ends included.
    ///
    /// Returns `None` when no route exists.
    #[must_use]
    pub fn bfs(&self, origin: &str, destination: &str) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(origin, vec![origin.to_string()])]);

        while let Some((current, path)) = queue.pop_front() {
            if current == destination {
                return Some(path);
            }
            if !visited.insert(current) {
                continue;
            }
            debug!(server = current, hops = path.len() - 1, "expanding");
            for neighbor in self.neighbors(current) {
                if !visited.contains(neighbor.as_str()) {
                    let mut next = path.clone();
                    next.push(neighbor.clone());
                    queue.push_back((neighbor.as_str(), next));
                }
            }
        }
        None
    }

    /// Every server reachable from `origin`, in depth-first preorder.
    #[must_use]
    pub fn dfs(&self, origin: &str) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        self.dfs_from(origin, &mut visited, &mut order);
        order
    }

    fn dfs_from<'a>(
        &'a self,
        current: &'a str,
        visited: &mut HashSet<&'a str>,
        order: &mut Vec<String>,
    ) {
        visited.insert(current);
        order.push(current.to_string());
        for neighbor in self.neighbors(current) {
            if !visited.contains(neighbor.as_str()) {
                self.dfs_from(neighbor, visited, order);
            }
        }
    }

    /// Delivers `message` from server `origin` to server `destination` along
    /// the breadth-first route, returning that route.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRoute`] if the servers are not connected and
    /// [`Error::ServerNotFound`] if `destination` is not registered.
    pub fn deliver(
        &mut self,
        message: MessageRef,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<String>> {
        let Some(route) = self.bfs(origin, destination) else {
            warn!(origin, destination, message = %message.id(), "no route between servers");
            return Err(Error::NoRoute {
                from: origin.to_string(),
                to: destination.to_string(),
            });
        };

        let server = self
            .servers
            .get_mut(destination)
            .ok_or_else(|| Error::ServerNotFound(destination.to_string()))?;

        info!(route = %route.join(" -> "), message = %message.id(), "routing message");
        server.send(message);
        Ok(route)
    }
}
