//! Plain-text article output.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, instrument};

use crate::config::ARTICLES_DIR;
use crate::errors::PersistError;
use crate::models::ArticleRecord;

/// `{cwd}/articles`, as an absolute path.
pub fn articles_dir() -> Result<PathBuf, PersistError> {
    let cwd = std::env::current_dir().map_err(PersistError::WorkingDir)?;
    Ok(cwd.join(ARTICLES_DIR))
}

/// Write `record` to `{dir}/{name}.txt` and return the path written.
///
/// Creates `dir` if needed and overwrites any existing file of the same name.
/// The returned path is absolute when `dir` is.
#[instrument(level = "info", skip(record, dir), fields(dir = %dir.display()))]
pub async fn save_article(
    dir: &Path,
    name: &str,
    record: &ArticleRecord,
) -> Result<PathBuf, PersistError> {
    fs::create_dir_all(dir)
        .await
        .map_err(|source| PersistError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

    let path = dir.join(format!("{name}.txt"));
    let content = record.to_text();
    fs::write(&path, &content)
        .await
        .map_err(|source| PersistError::Write {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), bytes = content.len(), "Wrote article text");
    Ok(path)
}
