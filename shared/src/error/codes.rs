//! Unified error codes for the offer engine
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Offer errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they survive
/// serialization into saved files and logs unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 4xxx: Offer ====================
    /// Offer not found
    OfferNotFound = 4001,
    /// Offer has no items
    OfferEmpty = 4002,
    /// Offer title is required
    OfferTitleRequired = 4003,
    /// Line item not found in offer
    OfferItemNotFound = 4004,
    /// Product already present in offer
    OfferItemDuplicate = 4005,
    /// Reorder session has nothing to apply
    ReorderSessionEmpty = 4006,

    // ==================== 6xxx: Catalog ====================
    /// Category not found
    CategoryNotFound = 6001,
    /// Product not found
    ProductNotFound = 6002,
    /// Business card not configured
    BusinessCardMissing = 6003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Document rendering failed
    RenderFailed = 9003,
    /// Background task failed
    TaskFailed = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",

            // Offer
            ErrorCode::OfferNotFound => "Offer not found",
            ErrorCode::OfferEmpty => "Offer has no items",
            ErrorCode::OfferTitleRequired => "Offer title is required",
            ErrorCode::OfferItemNotFound => "Offer item not found",
            ErrorCode::OfferItemDuplicate => "Product is already in the offer",
            ErrorCode::ReorderSessionEmpty => "Nothing to reorder",

            // Catalog
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::BusinessCardMissing => "Business card not configured",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::RenderFailed => "Document rendering failed",
            ErrorCode::TaskFailed => "Background task failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),

            // Offer
            4001 => Ok(ErrorCode::OfferNotFound),
            4002 => Ok(ErrorCode::OfferEmpty),
            4003 => Ok(ErrorCode::OfferTitleRequired),
            4004 => Ok(ErrorCode::OfferItemNotFound),
            4005 => Ok(ErrorCode::OfferItemDuplicate),
            4006 => Ok(ErrorCode::ReorderSessionEmpty),

            // Catalog
            6001 => Ok(ErrorCode::CategoryNotFound),
            6002 => Ok(ErrorCode::ProductNotFound),
            6003 => Ok(ErrorCode::BusinessCardMissing),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::RenderFailed),
            9004 => Ok(ErrorCode::TaskFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
