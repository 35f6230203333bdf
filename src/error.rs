use thiserror::Error;

/// Faults raised by a [`MemberResolver`](crate::resolve::MemberResolver).
///
/// A member that simply does not exist is not an error; resolvers report it
/// as `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MemberResolutionError {
    #[error("Access denied to {member} on {type_name}")]
    AccessDenied { type_name: String, member: String },
    #[error("Malformed lookup for {member} on {type_name}: {reason}")]
    Malformed {
        type_name: String,
        member: String,
        reason: String,
    },
    #[error("Resolver failure: {0}")]
    Resolver(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {variable}: {value:?} (expected one of: {expected})")]
    InvalidValue {
        variable: &'static str,
        value: String,
        expected: &'static str,
    },
}
