use std::{collections::VecDeque, fs, path::Path};

use serde_json::Value;
use tracing::warn;

use super::{BuildRef, HistoryTable, error::PersistError};

/// Read the history file. A missing file is just an empty history; a file
/// that cannot be read or parsed is logged and treated the same, so a bad
/// file never takes the service down.
pub fn load(path: &Path) -> HistoryTable {
    if !path.exists() {
        return HistoryTable::new();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("could not read {}: {e}", path.display());
            return HistoryTable::new();
        }
    };

    match parse(&content) {
        Ok(table) => table,
        Err(e) => {
            warn!("could not parse {}: {e}", path.display());
            HistoryTable::new()
        }
    }
}

fn parse(content: &str) -> Result<HistoryTable, PersistError> {
    let json: Value = serde_json::from_str(content)?;
    let Value::Object(categories) = json else {
        return Err(PersistError::NotAnObject);
    };

    let mut table = HistoryTable::new();
    for (category, value) in categories {
        let Value::Array(entries) = value else {
            return Err(PersistError::NotAnArray(category));
        };

        let mut builds = VecDeque::with_capacity(entries.len());
        for entry in entries {
            // entries are written as strings, but anything else is coerced
            // through its JSON form rather than rejecting the whole file
            let s = match entry {
                Value::String(s) => s,
                other => other.to_string(),
            };
            match BuildRef::parse(&s) {
                Some(build) => builds.push_back(build),
                None => warn!("skipping malformed entry `{s}` in category {category}"),
            }
        }
        table.insert(category, builds);
    }

    Ok(table)
}

/// Whole-table rewrite, overwriting any previous content. The table is
/// bounded per category so the file stays small.
pub fn save(path: &Path, table: &HistoryTable) -> Result<(), PersistError> {
    let mut json = serde_json::Map::new();
    for (category, builds) in table {
        let entries = builds.iter().map(|b| Value::String(b.to_string())).collect();
        json.insert(category.clone(), Value::Array(entries));
    }
    fs::write(path, serde_json::to_string(&Value::Object(json))?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::*;

    fn temp_file() -> PathBuf {
        env::temp_dir().join(format!("kiln-persist-{}.json", Uuid::now_v7()))
    }

    fn table_of(category: &str, refs: &[(&str, u64)]) -> HistoryTable {
        let mut table = HistoryTable::new();
        table.insert(
            category.to_string(),
            refs.iter().map(|(job, n)| BuildRef::new(*job, *n)).collect(),
        );
        table
    }

    #[test]
    fn save_load_round_trip() {
        let file = temp_file();
        let mut table = table_of("cat-a", &[("deploy", 12), ("deploy", 11)]);
        table.extend(table_of("cat-b", &[("nightly", 3)]));

        save(&file, &table).unwrap();
        let loaded = load(&file);

        assert_eq!(loaded, table);
        let _ = fs::remove_file(file);
    }

    #[test]
    fn missing_file_loads_empty() {
        let loaded = load(&temp_file());
        assert!(loaded.is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let file = temp_file();
        fs::write(&file, "not json at all {{{").unwrap();
        assert!(load(&file).is_empty());

        fs::write(&file, "[1, 2, 3]").unwrap();
        assert!(load(&file).is_empty());

        fs::write(&file, r#"{"cat": "not an array"}"#).unwrap();
        assert!(load(&file).is_empty());

        let _ = fs::remove_file(file);
    }

    #[test]
    fn unparseable_entries_are_skipped() {
        let file = temp_file();
        fs::write(&file, r##"{"cat": ["deploy#4", "no separator", "#9", "deploy#x"]}"##).unwrap();

        let loaded = load(&file);
        assert_eq!(loaded, table_of("cat", &[("deploy", 4)]));
        let _ = fs::remove_file(file);
    }

    #[test]
    fn non_string_entries_are_coerced() {
        // nothing writes these, but hand-edited files may carry them
        let file = temp_file();
        fs::write(&file, r#"{"cat": ["a#1", 7, true]}"#).unwrap();

        let loaded = load(&file);
        assert_eq!(loaded, table_of("cat", &[("a", 1)]));
        let _ = fs::remove_file(file);
    }

    #[test]
    fn file_is_an_object_of_string_arrays() {
        let file = temp_file();
        save(&file, &table_of("cat", &[("deploy", 2), ("deploy", 1)])).unwrap();

        let content = fs::read_to_string(&file).unwrap();
        assert_eq!(content, r#"{"cat":["deploy#2","deploy#1"]}"#);
        let _ = fs::remove_file(file);
    }
}
