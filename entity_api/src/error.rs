//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::DbErr;

/// Errors while executing operations related to entities.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex DbError::RecordNotFound
///  * Errors related to interactions with the database itself. Ex DbError::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Record not found, or not owned by the requesting user
    RecordNotFound,
    // Record not updated
    RecordNotUpdated,
    // Credentials did not match a stored user
    RecordUnauthenticated,
    // Errors related to interactions with the database itself. Ex DbError::Conn
    SystemError,
    // Input rejected before reaching the database
    ValidationError,
    // Other errors
    Other,
}

impl Error {
    pub(crate) fn not_found() -> Self {
        Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
    }

    pub(crate) fn unauthenticated() -> Self {
        Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "Entity API Error: {:?} ({})", self.error_kind, source),
            None => write!(f, "Entity API Error: {:?}", self.error_kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|err| err as &(dyn StdError + 'static))
    }
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        let error_kind = match err {
            DbErr::RecordNotFound(_) => EntityApiErrorKind::RecordNotFound,
            DbErr::RecordNotUpdated => EntityApiErrorKind::RecordNotUpdated,
            DbErr::Type(_) | DbErr::Json(_) => EntityApiErrorKind::ValidationError,
            _ => EntityApiErrorKind::SystemError,
        };

        Error {
            source: Some(err),
            error_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_map_to_kinds() {
        let err: Error = DbErr::RecordNotFound("tasks".to_string()).into();
        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotFound);

        let err: Error = DbErr::RecordNotUpdated.into();
        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotUpdated);

        let err: Error = DbErr::Custom("connection refused".to_string()).into();
        assert_eq!(err.error_kind, EntityApiErrorKind::SystemError);
        assert!(err.source.is_some());
    }

    #[test]
    fn test_display_includes_source() {
        let err: Error = DbErr::Custom("boom".to_string()).into();
        assert!(err.to_string().contains("SystemError"));
        assert!(err.to_string().contains("boom"));
        assert_eq!(
            Error::not_found().to_string(),
            "Entity API Error: RecordNotFound"
        );
    }
}
