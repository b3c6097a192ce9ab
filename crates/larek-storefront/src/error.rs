//! Error types for the storefront facade.

use larek_commerce::CommerceError;
use larek_data::FetchError;
use larek_events::BusError;
use thiserror::Error;

/// Errors returned by [`crate::Storefront`].
#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    #[error("Product service error: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Bus(#[from] BusError),
}

impl StorefrontError {
    /// Check if the error came from the network.
    pub fn is_network(&self) -> bool {
        matches!(self, StorefrontError::Fetch(_))
    }
}
