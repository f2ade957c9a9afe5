use std::{path::PathBuf, sync::Arc};

use crate::{
    config::{ConnectionConfig, KilnConfig},
    history::HistoryStore,
    registry::Registry,
};

pub const DEFAULT_HISTORY_FILE: &str = "./kiln-build-history.json";

/// Everything the api handlers share. Built once at startup and passed
/// around explicitly; nothing in kiln reaches for a global.
pub struct KilnState {
    pub name: Option<String>,
    pub description: Option<String>,
    pub connections: Vec<ConnectionConfig>,
    pub registry: Registry,
    pub history: HistoryStore,
}

impl KilnState {
    pub fn init(cfg: KilnConfig) -> Arc<Self> {
        let history_file = cfg
            .history_file
            .unwrap_or_else(|| DEFAULT_HISTORY_FILE.to_string());

        Arc::new(Self {
            name: cfg.name,
            description: cfg.description,
            connections: cfg.connections,
            registry: Registry::init(cfg.categories),
            history: HistoryStore::init(PathBuf::from(history_file)),
        })
    }
}
