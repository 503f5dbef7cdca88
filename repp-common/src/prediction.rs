//! Prediction service contracts
//!
//! Request and response bodies exchanged with the external prediction
//! service, plus the normalized [`Prediction`] value handed to callers.
//!
//! # Endpoints
//! - `POST /predict` with [`PredictRequest`]
//! - `POST /predict-from-link` with [`LinkPredictRequest`]
//! - `GET /` returning [`HealthResponse`]
//!
//! Success bodies of both prediction endpoints share [`PredictResponse`].
//! Failure bodies may carry [`ErrorBody`].

use crate::attributes::AttributeRecord;
use serde::{Deserialize, Serialize};

/// Path of the attribute prediction endpoint
pub const PREDICT_PATH: &str = "/predict";

/// Path of the link prediction endpoint
pub const PREDICT_FROM_LINK_PATH: &str = "/predict-from-link";

/// Path of the service health check
pub const HEALTH_PATH: &str = "/";

/// Price figures returned by the prediction service
///
/// Immutable once received.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    price_per_area: f64,
    total_price: f64,
}

impl Prediction {
    pub fn new(price_per_area: f64, total_price: f64) -> Self {
        Self {
            price_per_area,
            total_price,
        }
    }

    /// Predicted price per square meter
    pub fn price_per_area(&self) -> f64 {
        self.price_per_area
    }

    /// Estimated total price of the property
    pub fn total_price(&self) -> f64 {
        self.total_price
    }
}

/// Body of `POST /predict`
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub data: &'a AttributeRecord,
}

/// Body of `POST /predict-from-link`
#[derive(Debug, Serialize)]
pub struct LinkPredictRequest<'a> {
    pub url: &'a str,
}

/// Success body of both prediction endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_price_per_meter: f64,
    pub estimated_total_price: f64,
}

impl From<PredictResponse> for Prediction {
    fn from(response: PredictResponse) -> Self {
        Prediction::new(
            response.predicted_price_per_meter,
            response.estimated_total_price,
        )
    }
}

/// Failure body of any endpoint
///
/// `detail` is kept as a raw JSON value: the service sends a string for its
/// own errors but a list of objects for request validation failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The detail text, if the service supplied one as a string
    pub fn detail_message(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.as_str())
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeField;

    #[test]
    fn test_predict_request_wraps_record_in_data() {
        let mut record = AttributeRecord::new();
        record.set(AttributeField::TotalArea, "70");

        let body = serde_json::to_value(PredictRequest { data: &record }).unwrap();
        assert_eq!(body["data"]["TotalArea"], "70");
        assert_eq!(body["data"]["District"], "");
    }

    #[test]
    fn test_link_request_shape() {
        let body = serde_json::to_value(LinkPredictRequest {
            url: "https://samolet.ru/flat/1",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "url": "https://samolet.ru/flat/1" }));
    }

    #[test]
    fn test_response_normalizes_into_prediction() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"predicted_price_per_meter": 150000, "estimated_total_price": 10500000}"#,
        )
        .unwrap();
        let prediction = Prediction::from(response);
        assert_eq!(prediction, Prediction::new(150000.0, 10500000.0));
    }

    #[test]
    fn test_error_body_detail_variants() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "invalid url"}"#).unwrap();
        assert_eq!(body.detail_message(), Some("invalid url"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"msg": "field required"}]}"#).unwrap();
        assert_eq!(body.detail_message(), None);

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.detail_message(), None);
    }
}
