use serde::Serialize;
use tracing::{Level, info, span};
use uuid::Uuid;

use crate::config::CategoryConfig;

/// log-line stand-in when a build reports an unknown category
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN CATEGORY";

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub uuid: String,
    pub name: String,
}

/// Category uuid -> display name lookup, fixed at startup. The uuid is the
/// stable key history is recorded under; the name is free to change between
/// restarts without touching recorded history.
pub struct Registry {
    pub categories: Vec<Category>,
}

impl Registry {
    pub fn init(cfgs: Vec<CategoryConfig>) -> Self {
        let span = span!(Level::INFO, "Registry");
        let _enter = span.enter();

        let mut categories: Vec<Category> = cfgs
            .into_iter()
            .map(|cfg| Category {
                uuid: cfg.uuid.unwrap_or_else(|| Uuid::now_v7().to_string()),
                name: cfg.name,
            })
            .collect();

        if categories.is_empty() {
            info!("no categories configured, seeding defaults");
            for name in ["Development", "QA", "Production"] {
                categories.push(Category {
                    uuid: Uuid::now_v7().to_string(),
                    name: name.to_string(),
                });
            }
        }

        info!("{} categories", categories.len());
        Self { categories }
    }

    pub fn name(&self, uuid: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.uuid == uuid)
            .map(|c| c.name.as_str())
    }
}
