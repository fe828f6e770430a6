use std::ffi::OsString;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::model::catalog::Catalog;
use crate::domain::repository::CatalogRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSONファイルによるCatalogRepository実装。
/// 1目録 = 1 JSONファイル（レコード配列、4スペースインデント）。
pub struct JsonCatalogRepository {
    path: PathBuf,
}

impl JsonCatalogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// 保存先と同じディレクトリの一時ファイル（ファイル名 + `.tmp`）
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CatalogRepository for JsonCatalogRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        if !self.exists() {
            tracing::debug!(path = %self.path.display(), "data file missing, starting empty");
            return Ok(Catalog::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let catalog: Catalog = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), books = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = to_json(catalog)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), books = catalog.len(), "catalog saved");
        Ok(())
    }
}

fn to_json(catalog: &Catalog) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    catalog.serialize(&mut ser)?;
    Ok(buf)
}
