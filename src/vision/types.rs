//! Detection contract and Custom Vision wire types

use serde::{Deserialize, Serialize};

/// One detected object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    /// Confidence in [0, 1].
    pub probability: f64,
    pub bbox: BoundingBox,
}

/// Bounding box with fractional coordinates: left/top/width/height as
/// fractions of image dimensions, each in [0, 1]. Fields missing from the
/// vendor payload default to 0.0 rather than erroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// Custom Vision prediction-response envelope.
#[derive(Debug, Deserialize)]
pub struct PredictionResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// One raw prediction as the vendor names it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub bounding_box: BoundingBox,
}

impl From<Prediction> for Detection {
    fn from(prediction: Prediction) -> Self {
        Self {
            label: prediction.tag_name,
            probability: prediction.probability,
            bbox: prediction.bounding_box,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_fields_normalize_to_canonical_names() {
        let response: PredictionResponse = serde_json::from_str(
            r#"{"predictions": [{
                "probability": 0.95,
                "tagName": "bed",
                "boundingBox": {"left": 0.1, "top": 0.2, "width": 0.3, "height": 0.4}
            }]}"#,
        )
        .unwrap();

        let detections: Vec<Detection> =
            response.predictions.into_iter().map(Detection::from).collect();
        let json = serde_json::to_value(&detections).unwrap();
        assert_eq!(json[0]["label"], "bed");
        assert_eq!(json[0]["probability"], 0.95);
        assert_eq!(json[0]["bbox"]["left"], 0.1);
        // The vendor spelling must not appear in our output.
        assert!(json[0].get("tagName").is_none());
        assert!(json[0].get("boundingBox").is_none());
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let response: PredictionResponse =
            serde_json::from_str(r#"{"predictions": [{"tagName": "cat"}]}"#).unwrap();
        let detection = Detection::from(response.predictions.into_iter().next().unwrap());
        assert_eq!(detection.probability, 0.0);
        assert_eq!(detection.bbox, BoundingBox::default());
    }

    #[test]
    fn test_partial_bounding_box_defaults_missing_fields() {
        let bbox: BoundingBox = serde_json::from_str(r#"{"left": 0.5}"#).unwrap();
        assert_eq!(bbox.left, 0.5);
        assert_eq!(bbox.top, 0.0);
        assert_eq!(bbox.width, 0.0);
        assert_eq!(bbox.height, 0.0);
    }

    #[test]
    fn test_well_formed_boxes_stay_in_unit_range() {
        let response: PredictionResponse = serde_json::from_str(
            r#"{"predictions": [
                {"tagName": "a", "probability": 1.0,
                 "boundingBox": {"left": 0.0, "top": 0.0, "width": 1.0, "height": 1.0}},
                {"tagName": "b", "probability": 0.5,
                 "boundingBox": {"left": 0.25, "top": 0.75, "width": 0.1, "height": 0.2}}
            ]}"#,
        )
        .unwrap();
        for prediction in response.predictions {
            let detection = Detection::from(prediction);
            for value in [
                detection.bbox.left,
                detection.bbox.top,
                detection.bbox.width,
                detection.bbox.height,
                detection.probability,
            ] {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
