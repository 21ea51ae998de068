//! The server pool the adapter is bound to.
//!
//! Server choice, health polling and retry orchestration belong to the
//! load-balancing runtime. The adapter only keeps a handle to the pool so the
//! runtime can reach it through the client.

use std::fmt;

/// A backend the runtime can route an attempt to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Server {
    pub host: String,
    pub port: Option<u16>,
}

impl Server {
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{port}", self.host),
            None => f.write_str(&self.host),
        }
    }
}

/// Dynamic pool of servers maintained by the load-balancing runtime.
pub trait LoadBalancer: Send + Sync {
    /// Pick a server for the next attempt. `key` is an optional routing hint.
    fn choose_server(&self, key: Option<&str>) -> Option<Server>;

    /// Take `server` out of rotation until the runtime decides otherwise.
    fn mark_server_down(&self, server: &Server);

    fn servers(&self) -> Vec<Server>;
}
