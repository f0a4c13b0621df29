//! Distance providers.
//!
//! [`DistanceProvider`] is the only thing the optimizer knows about travel
//! costs. Two implementations ship with the crate:
//!
//! - [`DistanceMatrix`]: dense in-memory matrix (explicit or Euclidean)
//! - [`RemoteMatrix`]: matrix fetched once from a routing service
//!   (feature `remote`)

mod matrix;
#[cfg(feature = "remote")]
mod remote;

pub use matrix::{DistanceMatrix, DistanceProvider};
#[cfg(feature = "remote")]
pub use remote::{
    MatrixRequestBody, MatrixResponse, RemoteMatrix, RemoteMatrixClient, RemoteMatrixClientParams,
};
