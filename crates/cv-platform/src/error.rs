//! Platform Error Types

use thiserror::Error;

/// Coarse error classification handed to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input payload
    Validation,
    /// Bad credentials or a missing/invalid/expired token
    Authentication,
    /// Authenticated but not permitted (not the resource owner)
    Authorization,
    /// Referenced entity absent
    NotFound,
    /// Uniqueness violation
    Conflict,
    /// Store unavailable, hashing failure, corrupt stored data
    Dependency,
}

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Malformed token: {message}")]
    MalformedToken { message: String },

    #[error("Token signature verification failed")]
    BadSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token subject {user_id} no longer exists")]
    UnknownSubject { user_id: i64 },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Duplicate entity: {entity_type} with {field}={value}")]
    Duplicate { entity_type: String, field: String, value: String },

    #[error("User {user_id} already attends event {event_id}")]
    AlreadyMember { event_id: i64, user_id: i64 },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Password hashing failed: {message}")]
    HashingFailure { message: String },

    #[error("Stored credential is corrupt: {message}")]
    CorruptCredential { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable { message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::MalformedToken { .. }
            | Self::BadSignature
            | Self::TokenExpired
            | Self::UnknownSubject { .. } => ErrorKind::Authentication,
            Self::Forbidden { .. } => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } | Self::AlreadyMember { .. } => ErrorKind::Conflict,
            Self::StoreUnavailable { .. }
            | Self::HashingFailure { .. }
            | Self::CorruptCredential { .. }
            | Self::Configuration { .. }
            | Self::Internal { .. } => ErrorKind::Dependency,
        }
    }

    /// Stable machine-readable code for API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MissingToken => "MISSING_TOKEN",
            Self::MalformedToken { .. } | Self::BadSignature | Self::UnknownSubject { .. } => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Duplicate { .. } => "DUPLICATE",
            Self::AlreadyMember { .. } => "ALREADY_MEMBER",
            Self::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            Self::HashingFailure { .. }
            | Self::CorruptCredential { .. }
            | Self::Configuration { .. }
            | Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for PlatformError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        Self::StoreUnavailable { message: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
