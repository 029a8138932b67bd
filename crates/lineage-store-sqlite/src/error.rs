//! Error type for `lineage-store-sqlite`.

use lineage_core::store::StoreError;
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] lineage_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn domain(&self) -> Option<&lineage_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      _ => None,
    }
  }
}

// ─── Constraint classification ───────────────────────────────────────────────

/// The SQLite constraint a failed statement tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constraint {
  ForeignKey,
  Unique,
}

pub(crate) fn constraint_violation(err: &tokio_rusqlite::Error) -> Option<Constraint> {
  let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(failure, _)) = err
  else {
    return None;
  };
  match failure.extended_code {
    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::ForeignKey),
    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
      Some(Constraint::Unique)
    }
    _ => None,
  }
}

impl Error {
  /// Translate a constraint violation into the domain error `classify` picks
  /// for it. Other failures stay database errors.
  pub(crate) fn from_write(
    err: tokio_rusqlite::Error,
    classify: impl FnOnce(Constraint) -> lineage_core::Error,
  ) -> Self {
    match constraint_violation(&err) {
      Some(constraint) => Error::Core(classify(constraint)),
      None => Error::Database(err),
    }
  }
}
