use crate::domain::model::{Position, Ring};
use serde_json::Value;
use thiserror::Error;

// 球面多邊形面積：Chamberlain & Duquette (JPL, 2007) 的近似公式
/// WGS84 赤道半徑（公尺）
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct AreaError(pub String);

/// 解析 Polygon 的 `coordinates`
pub fn parse_rings(coordinates: &Value) -> Result<Vec<Ring>, AreaError> {
    let rings = coordinates
        .as_array()
        .ok_or_else(|| AreaError("coordinates must be an array of linear rings".to_string()))?;

    if rings.is_empty() {
        return Err(AreaError("polygon has no rings".to_string()));
    }

    rings
        .iter()
        .enumerate()
        .map(|(index, ring)| parse_ring(index, ring))
        .collect()
}

fn parse_ring(index: usize, ring: &Value) -> Result<Ring, AreaError> {
    let positions = ring
        .as_array()
        .ok_or_else(|| AreaError(format!("ring {} is not an array of positions", index)))?;

    if positions.len() < 4 {
        return Err(AreaError(format!(
            "ring {} has {} positions, at least 4 are required",
            index,
            positions.len()
        )));
    }

    let ring: Ring = positions
        .iter()
        .map(parse_position)
        .collect::<Result<_, _>>()
        .map_err(|e| AreaError(format!("ring {}: {}", index, e)))?;

    if ring.first() != ring.last() {
        return Err(AreaError(format!("ring {} is not closed", index)));
    }

    Ok(ring)
}

fn parse_position(position: &Value) -> Result<Position, AreaError> {
    let values = position
        .as_array()
        .filter(|values| values.len() >= 2)
        .ok_or_else(|| AreaError("position must be an array of at least two numbers".to_string()))?;

    let lon = values[0].as_f64();
    let lat = values[1].as_f64();

    match (lon, lat) {
        (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => {
            if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
                return Err(AreaError(format!(
                    "position [{}, {}] is outside longitude/latitude bounds",
                    lon, lat
                )));
            }
            Ok((lon, lat))
        }
        _ => Err(AreaError("position coordinates must be numbers".to_string())),
    }
}

/// 單一環的帶正負號面積（平方公尺）
fn ring_area(ring: &[Position]) -> f64 {
    let len = ring.len();
    if len <= 2 {
        return 0.0;
    }

    let total: f64 = (0..len)
        .map(|i| {
            let lower = ring[i];
            let middle = ring[(i + 1) % len];
            let upper = ring[(i + 2) % len];
            (upper.0.to_radians() - lower.0.to_radians()) * middle.1.to_radians().sin()
        })
        .sum();

    total * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0
}

/// 外環面積減去所有洞
pub fn polygon_area(rings: &[Ring]) -> Result<f64, AreaError> {
    let (outer, holes) = rings
        .split_first()
        .ok_or_else(|| AreaError("polygon has no rings".to_string()))?;

    let outer_area = ring_area(outer).abs();
    if !outer_area.is_finite() {
        return Err(AreaError("area is not a finite number".to_string()));
    }
    if outer_area == 0.0 {
        return Err(AreaError("outer ring is degenerate (zero area)".to_string()));
    }

    let holes_area: f64 = holes.iter().map(|hole| ring_area(hole).abs()).sum();

    Ok((outer_area - holes_area).max(0.0))
}
