use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// 經度、緯度（度）
pub type Position = (f64, f64);

/// 外環在前，其餘為洞
pub type Ring = Vec<Position>;

/// 通過驗證的 GeoJSON Feature
#[derive(Debug, Clone)]
pub struct GeoRequest {
    /// 原始 geometry 物件，原封不動寫給工具
    pub geometry: Value,
    pub properties: Map<String, Value>,
    pub area_m2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestStats {
    pub time: String,
    pub duration_ms: u64,
    pub area_m2: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 每個請求一筆的稽核紀錄
#[derive(Debug, Clone)]
pub struct AuditRecord {
    properties: Map<String, Value>,
    stats: RequestStats,
}

impl AuditRecord {
    pub fn new(
        properties: Map<String, Value>,
        finished_at: DateTime<Utc>,
        duration: Duration,
        area_m2: f64,
        error: Option<String>,
    ) -> Self {
        Self {
            properties,
            stats: RequestStats {
                time: finished_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                area_m2,
                error,
            },
        }
    }

    /// properties 加上 `stats`，序列化為單行 JSON（含結尾換行）
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        let mut object = self.properties.clone();
        object.insert("stats".to_string(), serde_json::to_value(&self.stats)?);

        let mut line = serde_json::to_string(&Value::Object(object))?;
        line.push('\n');
        Ok(line)
    }
}
