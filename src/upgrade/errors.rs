//! # Upgrade Errors

use thiserror::Error;

/// Result type for upgrade operations
pub type UpgradeResult<T> = Result<T, UpgradeError>;

/// Space upgrade errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("Upgrade '{0}' could not be captured: {1}")]
    Capture(String, String),

    #[error("Upgrade '{0}' could not be activated: {1}")]
    Activation(String, String),

    #[error("Upgrade '{0}' used while inactive")]
    Inactive(String),

    #[error("Upgrade '{0}' failed to convert tuple: {1}")]
    Transform(String, String),
}

impl UpgradeError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            UpgradeError::Capture(..) => "RV_UPGRADE_CAPTURE_FAILED",
            UpgradeError::Activation(..) => "RV_UPGRADE_ACTIVATION_FAILED",
            UpgradeError::Inactive(_) => "RV_UPGRADE_INACTIVE",
            UpgradeError::Transform(..) => "RV_UPGRADE_TRANSFORM_FAILED",
        }
    }
}
