//! Status enums for catalog loading and order submission.

use serde::{Deserialize, Serialize};

/// Order status reported by the product source.
///
/// Only [`OrderStatus::Success`] confirms an order; anything the source sends
/// that is not recognised lands in [`OrderStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Success,
    Pending,
    Failed,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Pending => write!(f, "pending"),
            Self::Failed => write!(f, "failed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Catalog load lifecycle.
///
/// `Idle -> Loading -> Ready`, or `Loading -> Failed` when the source reports an
/// error instead of substituting a fallback catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl CatalogStatus {
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}
