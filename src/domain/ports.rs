use crate::core::workspace::Workspace;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// 依邊界產生資料擷取結果
#[async_trait]
pub trait Extractor: Send + Sync {
    /// `boundary` 只包含 geometry，不是整個 Feature
    async fn extract(&self, workspace: &Workspace, boundary: &Value) -> Result<Vec<u8>>;
}
