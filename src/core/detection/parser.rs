use log::debug;
use serde_json::Value;
use thiserror::Error;

use super::shop_link::ShopLinkBuilder;
use super::DetectionError;
use crate::api::models::{DetectedObject, NormalizedBox};

/// 单条记录校验失败，只丢弃该条，不影响整批
#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing or empty name")]
    MissingName,
    #[error("box_2d must be exactly 4 integers: {0}")]
    BadBox(String),
    #[error("box_2d coordinate {0} outside 0..=1000")]
    OutOfRange(i64),
    #[error("confidence is missing or not a finite number")]
    BadConfidence,
}

/// 解析识别服务返回的 JSON 数组，逐条校验
pub fn parse_detections(
    payload: &str,
    links: &ShopLinkBuilder,
) -> Result<Vec<DetectedObject>, DetectionError> {
    let cleaned = sanitize_payload(payload);
    if cleaned.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| DetectionError::Malformed(format!("payload is not JSON: {}", e)))?;
    let records = value
        .as_array()
        .ok_or_else(|| DetectionError::Malformed("payload is not a JSON array".to_string()))?;

    let mut objects = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match parse_record(record, links) {
            Ok(obj) => objects.push(obj),
            Err(e) => debug!("dropping detection record #{}: {}", index, e),
        }
    }

    Ok(objects)
}

pub fn parse_record(record: &Value, links: &ShopLinkBuilder) -> Result<DetectedObject, RecordError> {
    let fields = record.as_object().ok_or(RecordError::NotAnObject)?;

    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(RecordError::MissingName)?;

    let bbox = parse_box(fields.get("box_2d"))?;

    let confidence = fields
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .ok_or(RecordError::BadConfidence)?;

    Ok(DetectedObject {
        name: name.to_string(),
        bbox,
        confidence: confidence as f32,
        shop_link: links.link_for(name),
    })
}

fn parse_box(raw: Option<&Value>) -> Result<NormalizedBox, RecordError> {
    let items = raw
        .and_then(Value::as_array)
        .ok_or_else(|| RecordError::BadBox("missing".to_string()))?;
    if items.len() != 4 {
        return Err(RecordError::BadBox(format!("{} values", items.len())));
    }

    let mut coords = [0u16; 4];
    for (slot, item) in coords.iter_mut().zip(items) {
        let v = item
            .as_i64()
            .ok_or_else(|| RecordError::BadBox(format!("non-integer {}", item)))?;
        if !(0..=NormalizedBox::SCALE as i64).contains(&v) {
            return Err(RecordError::OutOfRange(v));
        }
        *slot = v as u16;
    }

    Ok(NormalizedBox::from(coords))
}

/// 去掉模型偶尔包裹的 markdown 代码块
fn sanitize_payload(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CommerceConfig;
    use serde_json::json;

    fn links() -> ShopLinkBuilder {
        ShopLinkBuilder::new(&CommerceConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_watch() {
        let payload = r#"[{"name":"Watch","box_2d":[100,200,400,500],"confidence":0.9}]"#;
        let objects = parse_detections(payload, &links()).expect("应该能解析");

        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].name, "Watch");
        assert_eq!(objects[0].bbox, NormalizedBox::new(100, 200, 400, 500));
        assert!((objects[0].confidence - 0.9).abs() < 1e-6);
        assert!(objects[0].shop_link.as_str().contains("Watch"));
    }

    #[test]
    fn test_partial_tolerance_drops_out_of_range() {
        let payload = json!([
            {"name": "Watch", "box_2d": [100, 200, 400, 500], "confidence": 0.9},
            {"name": "Phone", "box_2d": [100, 200, 1400, 500], "confidence": 0.8},
            {"name": "Bag", "box_2d": [0, 0, 1000, 1000], "confidence": 0.7},
            {"name": "Shoes", "box_2d": [-5, 200, 400, 500], "confidence": 0.6},
            {"name": "Glasses", "box_2d": [10, 20, 30, 40], "confidence": 0.95}
        ])
        .to_string();

        let objects = parse_detections(&payload, &links()).expect("部分错误不应导致整批失败");
        let names: Vec<_> = objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Watch", "Bag", "Glasses"]);
    }

    #[test]
    fn test_record_shape_errors() {
        let l = links();
        assert_eq!(parse_record(&json!("Watch"), &l), Err(RecordError::NotAnObject));
        assert_eq!(
            parse_record(&json!({"name": "  ", "box_2d": [1, 2, 3, 4], "confidence": 1}), &l),
            Err(RecordError::MissingName)
        );
        assert!(matches!(
            parse_record(&json!({"name": "A", "box_2d": [1, 2, 3], "confidence": 1}), &l),
            Err(RecordError::BadBox(_))
        ));
        assert!(matches!(
            parse_record(&json!({"name": "A", "box_2d": [1, 2.5, 3, 4], "confidence": 1}), &l),
            Err(RecordError::BadBox(_))
        ));
        assert_eq!(
            parse_record(&json!({"name": "A", "box_2d": [1, 2, 3, 4]}), &l),
            Err(RecordError::BadConfidence)
        );
        assert_eq!(
            parse_record(&json!({"name": "A", "box_2d": [1, 2, 3, 1001], "confidence": 0.5}), &l),
            Err(RecordError::OutOfRange(1001))
        );
    }

    #[test]
    fn test_malformed_top_level() {
        assert!(matches!(
            parse_detections("not json", &links()),
            Err(DetectionError::Malformed(_))
        ));
        assert!(matches!(
            parse_detections(r#"{"name":"Watch"}"#, &links()),
            Err(DetectionError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_payload_is_empty_result() {
        assert!(parse_detections("", &links()).unwrap().is_empty());
        assert!(parse_detections("  []  ", &links()).unwrap().is_empty());
    }

    #[test]
    fn test_code_fence_stripped() {
        let payload = "```json\n[{\"name\":\"Laptop\",\"box_2d\":[1,2,3,4],\"confidence\":0.5}]\n```";
        let objects = parse_detections(payload, &links()).unwrap();
        assert_eq!(objects[0].name, "Laptop");
    }
}
