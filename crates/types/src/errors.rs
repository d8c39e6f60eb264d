use thiserror::Error;

// ============================================================================
// Main Error Enum
// ============================================================================

/// Error enum shared by the math crate and the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClammError {
    // ========================================================================
    // Math Errors
    // ========================================================================

    /// Arithmetic overflow occurred
    #[error("Math overflow in '{operation}' with values: {values:?}")]
    MathOverflow { operation: String, values: Vec<String> },

    /// Arithmetic underflow occurred
    #[error("Math underflow in '{operation}' with values: {values:?}")]
    MathUnderflow { operation: String, values: Vec<String> },

    /// Division by zero
    #[error("Division by zero in context: {context}")]
    DivisionByZero { context: String },

    /// Tick outside [MIN_TICK, MAX_TICK]
    #[error("Tick {tick} out of bounds [{min_tick}, {max_tick}]")]
    TickOutOfBounds { tick: i32, min_tick: i32, max_tick: i32 },

    /// Square-root price outside the representable tick range
    #[error("Sqrt price {sqrt_price} out of bounds [{min}, {max}]")]
    SqrtPriceOutOfBounds { sqrt_price: String, min: String, max: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    /// Invalid parameter provided
    #[error("Invalid parameter '{parameter}': got '{value}', expected '{expected}'")]
    InvalidParameter { parameter: String, value: String, expected: String },

    /// Request failed a structural check
    #[error("Validation failed: {0}")]
    Validation(String),

    // ========================================================================
    // Lookup and State Errors
    // ========================================================================

    /// Referenced record does not exist
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// Operation conflicts with current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Price walk ran off the end of the tick range
    #[error("Not enough liquidity available in pool")]
    InsufficientLiquidity,

    /// Tick gross liquidity would exceed the per-tick cap
    #[error("Liquidity gross {gross} at tick {tick} exceeds max liquidity per tick {max}")]
    TickLiquidityExceeded { tick: i32, gross: String, max: String },

    /// Token holder cannot cover a transfer
    #[error("Insufficient balance: {owner} holds {available} of {token}, needs {required}")]
    InsufficientBalance { owner: String, token: String, available: String, required: String },

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    /// Caller lacks the required role
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // ========================================================================
    // Slippage Errors
    // ========================================================================

    /// Executed amounts fall outside the caller's bounds
    #[error("Slippage tolerance exceeded: {0}")]
    SlippageToleranceExceeded(String),

    // ========================================================================
    // Collaborator Errors
    // ========================================================================

    /// State store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    SlippageToleranceExceeded,
    Internal,
}

// ============================================================================
// Error Helpers
// ============================================================================

impl ClammError {
    /// Create a math overflow error with context
    pub fn math_overflow(operation: &str, values: &[&str]) -> Self {
        Self::MathOverflow {
            operation: operation.to_string(),
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a math underflow error with context
    pub fn math_underflow(operation: &str, values: &[&str]) -> Self {
        Self::MathUnderflow {
            operation: operation.to_string(),
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a division by zero error
    pub fn division_by_zero(context: &str) -> Self {
        Self::DivisionByZero {
            context: context.to_string(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, value: &str, expected: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(entity: &str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            key: key.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a slippage error carrying both the bound and the actual value
    pub fn slippage(message: impl Into<String>) -> Self {
        Self::SlippageToleranceExceeded(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Map onto the externally visible taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MathOverflow { .. }
            | Self::MathUnderflow { .. }
            | Self::DivisionByZero { .. }
            | Self::TickOutOfBounds { .. }
            | Self::SqrtPriceOutOfBounds { .. }
            | Self::InvalidParameter { .. }
            | Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict(_)
            | Self::InsufficientLiquidity
            | Self::TickLiquidityExceeded { .. }
            | Self::InsufficientBalance { .. } => ErrorKind::Conflict,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::SlippageToleranceExceeded(_) => ErrorKind::SlippageToleranceExceeded,
            Self::Storage(_) | Self::Serialization(_) => ErrorKind::Internal,
        }
    }
}

impl From<serde_json::Error> for ClammError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ClammError::InsufficientLiquidity.kind(), ErrorKind::Conflict);
        assert_eq!(ClammError::not_found("Pool", "abc").kind(), ErrorKind::NotFound);
        assert_eq!(ClammError::unauthorized("x").kind(), ErrorKind::Unauthorized);
        assert_eq!(ClammError::slippage("x").kind(), ErrorKind::SlippageToleranceExceeded);
        assert_eq!(ClammError::math_overflow("mul", &["1", "2"]).kind(), ErrorKind::Validation);
        assert_eq!(ClammError::storage("disk").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_messages_carry_context() {
        let err = ClammError::math_overflow("decimal multiplication", &["7", "9"]);
        assert_eq!(
            err.to_string(),
            "Math overflow in 'decimal multiplication' with values: [\"7\", \"9\"]"
        );
        let err = ClammError::not_found("Pool", "deadbeef");
        assert_eq!(err.to_string(), "Pool not found: deadbeef");
    }
}
