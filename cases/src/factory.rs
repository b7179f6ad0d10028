use crate::store::CaseSlot;
use crate::store::json::JsonFileSlot;
use std::path::Path;
use std::path::PathBuf;

#[cfg(feature = "sqlite")]
use crate::store::sqlite::SqliteSlot;

/// Backend selection for case persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Json,
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl std::str::FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" | "JSON" => Ok(Backend::Json),
            #[cfg(feature = "sqlite")]
            "sqlite" | "SQLITE" => Ok(Backend::Sqlite),
            #[cfg(not(feature = "sqlite"))]
            "sqlite" | "SQLITE" => {
                anyhow::bail!("sqlite backend not compiled; enable with `--features iurisdata-cases/sqlite`")
            }
            other => anyhow::bail!("unknown backend: {other}"),
        }
    }
}

/// Choose backend using env `IURISDATA_BACKEND` if present: `sqlite` or `json`.
/// Defaults to JSON; if `sqlite` is requested but not compiled in, falls back to JSON.
pub fn choose_backend_from_env() -> Backend {
    let v = std::env::var("IURISDATA_BACKEND").unwrap_or_default();
    match v.as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" | "SQLITE" => Backend::Sqlite,
        "" | "json" | "JSON" => Backend::Json,
        other => {
            tracing::warn!("IURISDATA_BACKEND={other} is not available; using json");
            Backend::Json
        }
    }
}

/// Resolve the data directory: explicit value, then `IURISDATA_HOME`, then `~/.iurisdata`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Ok(dir) = std::env::var("IURISDATA_HOME")
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("cannot locate home directory; set IURISDATA_HOME"))?;
    Ok(home.join(".iurisdata"))
}

/// Build the case slot inside `data_dir`.
/// Paths can be overridden via env:
/// - `IURISDATA_DB` for SQLite file path
/// - `IURISDATA_JSON` for JSON file path
pub fn open_slot(data_dir: &Path, backend: Option<Backend>) -> anyhow::Result<Box<dyn CaseSlot>> {
    let be = backend.unwrap_or_else(choose_backend_from_env);
    Ok(match be {
        Backend::Json => {
            let path = std::env::var("IURISDATA_JSON")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("cases.json"));
            tracing::debug!("opening json case slot at {}", path.display());
            Box::new(JsonFileSlot::new(path))
        }
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => {
            let path = std::env::var("IURISDATA_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("cases.db"));
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            tracing::debug!("opening sqlite case slot at {}", path.display());
            Box::new(SqliteSlot::new(path))
        }
    })
}

/// Copy the collection stored in a JSON slot into a SQLite slot.
///
/// The source goes through normal hydration, so legacy records get their ids
/// back-filled on the way. Returns the number of records copied.
#[cfg(feature = "sqlite")]
pub fn migrate_json_to_sqlite(json_path: &Path, sqlite_path: &Path) -> anyhow::Result<usize> {
    use crate::records::RecordStore;

    if !json_path.exists() {
        anyhow::bail!("source file not found: {}", json_path.display());
    }
    let source = RecordStore::open(JsonFileSlot::new(json_path));
    let mut target = RecordStore::open(SqliteSlot::new(sqlite_path));
    let cases = source.list().to_vec();
    let n = cases.len();
    target.replace_all(cases)?;
    Ok(n)
}

#[cfg(not(feature = "sqlite"))]
pub fn migrate_json_to_sqlite(_json_path: &Path, _sqlite_path: &Path) -> anyhow::Result<usize> {
    anyhow::bail!("sqlite backend not compiled; enable with `--features iurisdata-cases/sqlite`");
}
