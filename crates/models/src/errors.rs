use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<sea_orm::DbErr> for ModelError {
    fn from(e: sea_orm::DbErr) -> Self { ModelError::Db(e.to_string()) }
}

pub(crate) fn invalid(msg: impl Into<String>) -> ModelError {
    ModelError::Validation(msg.into())
}
