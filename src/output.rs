use crate::github::{RepoRecord, UserDetail};
use csv::WriterBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const USERS_FILE: &str = "users.csv";
pub const REPOS_FILE: &str = "repositories.csv";

/// A record written as one CSV row. Serialized field order must match `COLUMNS`.
pub trait Tabular: Serialize {
    const COLUMNS: &'static [&'static str];
}

impl Tabular for UserDetail {
    const COLUMNS: &'static [&'static str] = &[
        "login",
        "name",
        "company",
        "location",
        "email",
        "hireable",
        "bio",
        "public_repos",
        "followers",
        "following",
        "created_at",
    ];
}

impl Tabular for RepoRecord {
    const COLUMNS: &'static [&'static str] = &[
        "login",
        "full_name",
        "created_at",
        "stargazers_count",
        "watchers_count",
        "language",
        "has_projects",
        "has_wiki",
        "license_name",
    ];
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not create {}: {}", .path.display(), .source)]
    Create {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Write `records` to `path` under a fixed header, replacing any existing file.
///
/// # Errors
/// Only failing to create the file is reported. Row and flush failures after
/// that are logged and the file is left as far as it got.
#[instrument(skip(records), fields(rows = records.len()))]
pub fn write_csv<R: Tabular>(path: &Path, records: &[R]) -> Result<(), OutputError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;

    if let Err(e) = writer.write_record(R::COLUMNS) {
        warn!("could not write header to {}: {}", path.display(), e);
    }

    for record in records {
        if let Err(e) = writer.serialize(record) {
            warn!("could not write row to {}: {}", path.display(), e);
        }
    }

    if let Err(e) = writer.flush() {
        warn!("could not flush {}: {}", path.display(), e);
    }

    info!("wrote {} rows to {}", records.len(), path.display());

    Ok(())
}

/// Write `users.csv` into `dir`.
///
/// # Errors
/// Returns an error if the file cannot be created.
pub fn write_users(dir: &Path, users: &[UserDetail]) -> Result<PathBuf, OutputError> {
    let path = dir.join(USERS_FILE);
    write_csv(&path, users)?;
    Ok(path)
}

/// Write `repositories.csv` into `dir`.
///
/// # Errors
/// Returns an error if the file cannot be created.
pub fn write_repos(dir: &Path, repos: &[RepoRecord]) -> Result<PathBuf, OutputError> {
    let path = dir.join(REPOS_FILE);
    write_csv(&path, repos)?;
    Ok(path)
}
