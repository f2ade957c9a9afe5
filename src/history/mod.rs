pub mod error;
pub mod persist;

use std::{
    collections::{HashMap, VecDeque},
    fmt,
    path::PathBuf,
    sync::Mutex,
};

use serde::{Serialize, Serializer};
use tracing::{Level, info, span, warn};

/// builds kept per category
pub const MAX_ENTRIES: usize = 5;

/// category uuid -> builds, most recent first
pub type HistoryTable = HashMap<String, VecDeque<BuildRef>>;

/// One recorded build. Written to disk (and to the api) in its canonical
/// `job#number` form; kept structured in memory so renames compare the job
/// name as a whole field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRef {
    pub job: String,
    pub number: u64,
}

impl BuildRef {
    pub fn new(job: impl Into<String>, number: u64) -> Self {
        Self {
            job: job.into(),
            number,
        }
    }

    /// `number` is whatever follows the last `#`, since job names may
    /// themselves contain the separator
    pub fn parse(s: &str) -> Option<Self> {
        let (job, number) = s.rsplit_once('#')?;
        if job.is_empty() {
            return None;
        }
        Some(Self {
            job: job.to_string(),
            number: number.parse().ok()?,
        })
    }
}

impl fmt::Display for BuildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.job, self.number)
    }
}

impl Serialize for BuildRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AppendOutcome {
    Recorded,
    Ignored,
}

/// The one owner of recorded build history. Every operation serializes on
/// the table mutex, and mutators flush to disk while still holding it, so a
/// reader never sees a half-applied mutation and a flush never races one.
pub struct HistoryStore {
    table: Mutex<HistoryTable>,
    file: PathBuf,
}

impl HistoryStore {
    pub fn init(file: PathBuf) -> Self {
        let span = span!(Level::INFO, "History");
        let _enter = span.enter();
        info!("loading {}", file.display());

        let table = persist::load(&file);
        Self {
            table: Mutex::new(table),
            file,
        }
    }

    /// Record a build against a category. Reports with an empty category or
    /// job name are ignored outright, with no flush; history is best-effort
    /// and must never fail the build that reports it.
    pub fn append(&self, category_uuid: &str, build: BuildRef) -> AppendOutcome {
        if category_uuid.is_empty() || build.job.is_empty() {
            return AppendOutcome::Ignored;
        }

        let mut table = self.table.lock().unwrap();
        let builds = table.entry(category_uuid.to_string()).or_default();
        builds.push_front(build);
        builds.truncate(MAX_ENTRIES);
        self.flush(&table);
        AppendOutcome::Recorded
    }

    /// Last builds for a category, most recent first. Unknown categories
    /// read as empty, never as an error.
    pub fn builds(&self, category_uuid: &str) -> Vec<BuildRef> {
        let table = self.table.lock().unwrap();
        table
            .get(category_uuid)
            .map(|builds| builds.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Rewrite the job name on every ref recorded under `old`. Flushes even
    /// when nothing matched.
    pub fn rename_job(&self, old: &str, new: &str) {
        let mut table = self.table.lock().unwrap();
        for builds in table.values_mut() {
            for build in builds.iter_mut() {
                if build.job == old {
                    build.job = new.to_string();
                }
            }
        }
        self.flush(&table);
    }

    /// full snapshot for the admin view
    pub fn all(&self) -> HashMap<String, Vec<BuildRef>> {
        let table = self.table.lock().unwrap();
        table
            .iter()
            .map(|(category, builds)| (category.clone(), builds.iter().cloned().collect()))
            .collect()
    }

    // a failed flush keeps the in-memory mutation; the next flush rewrites
    // the whole table anyway
    fn flush(&self, table: &HistoryTable) {
        if let Err(e) = persist::save(&self.file, table) {
            warn!("could not save history to {}: {e}", self.file.display());
        }
    }
}
