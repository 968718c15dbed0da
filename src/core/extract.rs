use crate::config::ServiceConfig;
use crate::core::audit::AuditLogger;
use crate::core::pipeline::ToolPipeline;
use crate::core::validator::RequestValidator;
use crate::core::workspace::WorkspaceManager;
use crate::domain::model::{AuditRecord, GeoRequest};
use crate::domain::ports::Extractor;
use crate::utils::error::{ExtractError, Result};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// 單一請求的流程：驗證 → 工作區 → 兩階段擷取 → 稽核 → 清理
#[derive(Clone)]
pub struct ExtractService {
    validator: RequestValidator,
    workspaces: WorkspaceManager,
    extractor: Arc<dyn Extractor>,
    audit: Arc<AuditLogger>,
}

impl ExtractService {
    pub fn new(
        validator: RequestValidator,
        workspaces: WorkspaceManager,
        extractor: Arc<dyn Extractor>,
        audit: AuditLogger,
    ) -> Self {
        Self {
            validator,
            workspaces,
            extractor,
            audit: Arc::new(audit),
        }
    }

    /// 依設定組出使用 gol + osmium 的服務
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            RequestValidator::new(config.extract.max_area_m2),
            WorkspaceManager::new(
                config.extract.workspace_root(),
                config.extract.workspace_prefix.clone(),
            ),
            Arc::new(ToolPipeline::new(&config.extract)),
            AuditLogger::new(config.audit.log_path.clone()),
        )
    }

    pub async fn handle(&self, body: &Value) -> Result<Vec<u8>> {
        let started = Instant::now();

        // 驗證失敗直接返回，不碰檔案系統
        let request = self.validator.validate(body)?;

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("extract", %request_id);

        // 驗證之後的工作交給獨立任務；連線中斷時照樣跑完、寫稽核、清理
        let service = self.clone();
        let task = tokio::spawn(
            async move { service.process(request_id, request, started).await }.instrument(span),
        );

        task.await.map_err(|e| ExtractError::TaskError {
            message: e.to_string(),
        })?
    }

    async fn process(&self, request_id: Uuid, request: GeoRequest, started: Instant) -> Result<Vec<u8>> {
        let (outcome, workspace) = match self.workspaces.acquire(request_id).await {
            Ok(workspace) => {
                let outcome = self.extractor.extract(&workspace, &request.geometry).await;
                (outcome, Some(workspace))
            }
            Err(e) => (Err(e), None),
        };

        let duration = started.elapsed();
        let record = AuditRecord::new(
            request.properties,
            Utc::now(),
            duration,
            request.area_m2,
            outcome.as_ref().err().map(ToString::to_string),
        );
        if let Err(e) = self.audit.record(&record).await {
            tracing::error!("Problem writing to log {}: {}", self.audit.path().display(), e);
        }

        match &outcome {
            Ok(payload) => tracing::info!(
                "✅ Request succeeded, taking {} ms ({} bytes)",
                duration.as_millis(),
                payload.len()
            ),
            Err(e) => tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Stage: {:?})",
                e,
                e.category(),
                e.stage()
            ),
        }

        if let Some(workspace) = workspace {
            workspace.release().await;
        }

        outcome
    }
}
