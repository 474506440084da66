//! Yarn calculator endpoint
//!
//! POST reads the labels from the query string, a JSON body, or both (body
//! wins); GET reads the query string. Never fails on unknown labels; the
//! estimator falls back to defaults. Only a missing label is rejected.

use axum::{routing::post, Json, Router};
use serde::Deserialize;
use smartra_core::estimate::{estimate, EstimateRequest, YarnEstimate, DEFAULT_GAUGE};

use crate::http::error::ApiError;
use crate::http::extractors::{OptionalJsonBody, QueryParams};
use crate::models::ValidationError;

/// Calculator inputs as they arrive, before required labels are checked
#[derive(Debug, Default, Deserialize)]
pub struct EstimateFields {
    pub pattern_type: Option<String>,
    pub size: Option<String>,
    pub yarn_weight: Option<String>,
    pub gauge: Option<u32>,
}

impl EstimateFields {
    fn merge(self, fallback: Self) -> Self {
        Self {
            pattern_type: self.pattern_type.or(fallback.pattern_type),
            size: self.size.or(fallback.size),
            yarn_weight: self.yarn_weight.or(fallback.yarn_weight),
            gauge: self.gauge.or(fallback.gauge),
        }
    }

    fn into_request(self) -> Result<EstimateRequest, ValidationError> {
        let pattern_type = self
            .pattern_type
            .ok_or(ValidationError::Missing { field: "pattern_type" })?;
        let size = self.size.ok_or(ValidationError::Missing { field: "size" })?;
        let yarn_weight = self
            .yarn_weight
            .ok_or(ValidationError::Missing { field: "yarn_weight" })?;

        Ok(EstimateRequest::new(pattern_type, size, yarn_weight)
            .with_gauge(self.gauge.unwrap_or(DEFAULT_GAUGE)))
    }
}

/// POST /calculate/yarn
async fn calculate_post(
    QueryParams(query): QueryParams<EstimateFields>,
    OptionalJsonBody(body): OptionalJsonBody<EstimateFields>,
) -> Result<Json<YarnEstimate>, ApiError> {
    let fields = match body {
        Some(body) => body.merge(query),
        None => query,
    };
    respond(fields)
}

/// GET /calculate/yarn?pattern_type=..&size=..&yarn_weight=..[&gauge=..]
async fn calculate_query(
    QueryParams(query): QueryParams<EstimateFields>,
) -> Result<Json<YarnEstimate>, ApiError> {
    respond(query)
}

fn respond(fields: EstimateFields) -> Result<Json<YarnEstimate>, ApiError> {
    let req = fields.into_request()?;
    let result = estimate(&req);
    tracing::debug!(
        pattern_type = %req.pattern_type,
        size = %req.size,
        yarn_weight = %req.yarn_weight,
        grams = result.estimated_grams,
        "yarn estimate"
    );
    Ok(Json(result))
}

/// Calculator routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/calculate/yarn", post(calculate_post).get(calculate_query))
}
