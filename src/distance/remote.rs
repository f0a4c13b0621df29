//! Distance matrix backed by a remote routing service.
//!
//! The matrix is requested once at setup; lookups are then served from
//! memory, so the optimizer never touches the network during a run.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matrix::{DistanceMatrix, DistanceProvider};
use crate::error::DistanceError;
use crate::ga::StopId;
use crate::models::Stop;

/// Request body: all-to-all matrix over the given points.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixRequestBody {
    /// `[x, y]` pairs, one per stop.
    pub points: Vec<[f64; 2]>,

    /// Which arrays to return.
    pub out_arrays: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixResponse {
    /// Row-major distances, one row per origin.
    pub distances: Vec<Vec<f64>>,
}

pub struct RemoteMatrixClientParams {
    /// Full URL of the matrix endpoint.
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

pub struct RemoteMatrixClient {
    params: RemoteMatrixClientParams,
    client: reqwest::Client,
}

impl RemoteMatrixClient {
    pub fn new(params: RemoteMatrixClientParams) -> Result<Self, DistanceError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;
        Ok(Self { params, client })
    }

    /// Fetches the full matrix for `stops`.
    ///
    /// Failures are returned as-is; retry policy belongs to the caller.
    pub async fn fetch_matrix(&self, stops: &[Stop]) -> Result<RemoteMatrix, DistanceError> {
        let body = MatrixRequestBody {
            points: stops.iter().map(|s| [s.x(), s.y()]).collect(),
            out_arrays: vec!["distances".to_string()],
        };

        let mut request = self.client.post(&self.params.url).json(&body);
        if let Some(key) = &self.params.api_key {
            request = request.query(&[("key", key)]);
        }

        debug!(points = stops.len(), url = %self.params.url, "requesting distance matrix");
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(DistanceError::Api { status, message });
        }

        let matrix_response: MatrixResponse = response.json().await?;
        RemoteMatrix::from_response(matrix_response, stops.len())
    }
}

/// A matrix fetched from a remote service.
#[derive(Debug, Clone)]
pub struct RemoteMatrix {
    matrix: DistanceMatrix,
}

impl RemoteMatrix {
    /// Validates a service response against the number of requested stops.
    pub fn from_response(
        response: MatrixResponse,
        expected: usize,
    ) -> Result<Self, DistanceError> {
        if response.distances.len() != expected {
            return Err(DistanceError::MalformedMatrix(format!(
                "requested {expected} points, service returned {} rows",
                response.distances.len()
            )));
        }
        let matrix = DistanceMatrix::from_rows(response.distances)?;
        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }
}

impl DistanceProvider for RemoteMatrix {
    fn size(&self) -> usize {
        self.matrix.size()
    }

    fn cost(&self, from: StopId, to: StopId) -> Result<f64, DistanceError> {
        self.matrix.cost(from, to)
    }
}
