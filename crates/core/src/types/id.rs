//! Task identifier newtype.
//!
//! Task ids are opaque UUIDs assigned by the store on creation. They are never
//! reused, and callers never construct them from anything but a store response
//! or a parsed path segment.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when a string is not a valid task id.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid task id: {0}")]
pub struct TaskIdError(String);

/// Type-safe identifier of a [`Task`](crate::Task).
///
/// Serializes transparently as the hyphenated UUID string.
///
/// # Example
///
/// ```rust
/// # use daily_planner_core::TaskId;
/// let id = TaskId::generate();
/// let parsed = TaskId::parse(&id.to_string()).unwrap();
/// assert_eq!(id, parsed);
///
/// assert!(TaskId::parse("not-a-task").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its string form.
    ///
    /// # Errors
    ///
    /// Returns `TaskIdError` if the input is not a UUID.
    pub fn parse(s: &str) -> Result<Self, TaskIdError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| TaskIdError(s.to_owned()))
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = TaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for TaskId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<TaskId> for Uuid {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for TaskId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Uuid as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Uuid as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TaskId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let id = <Uuid as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(id))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for TaskId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Uuid as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TaskId::parse("").is_err());
        assert!(TaskId::parse("665f1c2e9b1e8a0012345678").is_err());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = TaskId::generate();
        let padded = format!("  {id} ");
        assert_eq!(TaskId::parse(&padded).unwrap(), id);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = TaskId::parse("0b0c6f3e-6d3c-4a8e-9f0e-2a8b8f7c1d11").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0b0c6f3e-6d3c-4a8e-9f0e-2a8b8f7c1d11\"");
    }
}
