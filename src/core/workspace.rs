use crate::utils::error::{ExtractError, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const INPUT_FILE: &str = "input_polygon.geojson";
const INTERMEDIATE_FILE: &str = "tmp_output.xml";
const OUTPUT_FILE: &str = "output.pbf";

/// 為每個請求配置獨立的暫存目錄
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    root: PathBuf,
    prefix: String,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    pub async fn acquire(&self, request_id: Uuid) -> Result<Workspace> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| ExtractError::WorkspaceError {
                path: self.root.clone(),
                source,
            })?;

        // create_dir 遇到同名目錄會失敗，保證不會共用
        let dir = self.root.join(format!("{}{}", self.prefix, request_id));
        tokio::fs::create_dir(&dir)
            .await
            .map_err(|source| ExtractError::WorkspaceError {
                path: dir.clone(),
                source,
            })?;

        tracing::info!("Working on a request in {}", dir.display());
        Ok(Workspace::new(dir))
    }
}

/// 請求專屬的暫存目錄；`release` 或 drop 時刪除
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
    input_path: PathBuf,
    intermediate_path: PathBuf,
    output_path: PathBuf,
    released: bool,
}

impl Workspace {
    fn new(dir: PathBuf) -> Self {
        Self {
            input_path: dir.join(INPUT_FILE),
            intermediate_path: dir.join(INTERMEDIATE_FILE),
            output_path: dir.join(OUTPUT_FILE),
            dir,
            released: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 邊界 GeoJSON（只含 geometry）
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    /// 第一階段的 XML 輸出
    pub fn intermediate_path(&self) -> &Path {
        &self.intermediate_path
    }

    /// 第二階段的 PBF 輸出
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// 遞迴刪除目錄。失敗只記錄，不往外拋
    pub async fn release(mut self) {
        self.released = true;
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => tracing::debug!("Removed workspace {}", self.dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                let err = ExtractError::WorkspaceError {
                    path: self.dir.clone(),
                    source: e,
                };
                tracing::warn!("Problem cleaning up {}: {}", self.dir.display(), err);
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // 只在 panic 或任務被取消、沒走到 release 時才會執行；
        // 這裡是同步刪除，會短暫佔住 runtime 的 worker 執行緒
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => tracing::debug!("Removed unreleased workspace {}", self.dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Problem cleaning up {}: {}", self.dir.display(), e),
        }
    }
}
