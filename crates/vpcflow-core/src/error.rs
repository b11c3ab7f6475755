//! Validation error types

use thiserror::Error;

/// Request validation errors, raised before any provider call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' is not a valid IPv4 CIDR block")]
    InvalidCidr(String),

    #[error("VPC CIDR prefix must be between /16 and /28, got /{0}")]
    PrefixOutOfRange(u8),

    #[error("at least one subnet is required")]
    NoSubnets,

    #[error("subnet CIDR '{0}' is not a valid IPv4 CIDR block")]
    InvalidSubnetCidr(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
