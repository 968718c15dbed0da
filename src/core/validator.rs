use crate::core::area;
use crate::domain::model::GeoRequest;
use crate::utils::error::{ExtractError, Result};
use serde_json::Value;

pub const SHAPE_ERROR: &str =
    "Request must be a GeoJSON Feature with a Polygon and a properties dictionary";

/// 請求驗證：結構檢查與面積上限，不做任何 I/O
#[derive(Debug, Clone)]
pub struct RequestValidator {
    max_area_m2: f64,
}

impl RequestValidator {
    pub fn new(max_area_m2: f64) -> Self {
        Self { max_area_m2 }
    }

    pub fn validate(&self, body: &Value) -> Result<GeoRequest> {
        let feature = body
            .as_object()
            .filter(|obj| obj.get("type").and_then(Value::as_str) == Some("Feature"))
            .ok_or_else(|| ExtractError::validation(SHAPE_ERROR))?;

        let geometry = feature
            .get("geometry")
            .filter(|geometry| geometry.get("type").and_then(Value::as_str) == Some("Polygon"))
            .ok_or_else(|| ExtractError::validation(SHAPE_ERROR))?;

        let properties = feature
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| ExtractError::validation(SHAPE_ERROR))?;

        let (rings, area_m2) = geometry
            .get("coordinates")
            .ok_or_else(|| area::AreaError("geometry has no coordinates".to_string()))
            .and_then(|coordinates| {
                let rings = area::parse_rings(coordinates)?;
                let area_m2 = area::polygon_area(&rings)?;
                Ok((rings, area_m2))
            })
            .map_err(|e| {
                ExtractError::validation(format!("Input doesn't look like a valid polygon: {}", e))
            })?;

        if area_m2 > self.max_area_m2 {
            return Err(ExtractError::validation(format!(
                "Polygon area {} m^2 exceeds limit of {} m^2.",
                format_thousands(area_m2),
                format_thousands(self.max_area_m2)
            )));
        }

        tracing::debug!("Validated polygon with {} ring(s), {:.0} m^2", rings.len(), area_m2);

        Ok(GeoRequest {
            geometry: geometry.clone(),
            properties: properties.clone(),
            area_m2,
        })
    }
}

/// 四捨五入後加上千分位逗號
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
