//! What the server needs to start: where to listen, how to seal session
//! cookies and where lists are stored.

use std::net::SocketAddr;

use crate::inbound::http::session_config::SessionSettings;
use crate::outbound::persistence::DbPool;

/// Backing store for accounts and lists.
#[derive(Clone)]
pub enum Storage {
    /// Process-local maps; everything is lost on restart.
    Memory,
    Postgres(DbPool),
}

impl Storage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
}

impl ServerConfig {
    /// In-memory configuration; call [`Self::with_storage`] to use a database.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            storage: Storage::Memory,
        }
    }

    #[must_use]
    pub fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
