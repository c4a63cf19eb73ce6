use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("invalid permission: {0}")]
    InvalidPermission(String),
    #[error("permission component is empty: {0}")]
    EmptyComponent(String),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
