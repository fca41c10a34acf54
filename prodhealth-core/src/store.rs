//! Persistence traits for user preferences and scan history.
//!
//! The scoring engine never calls these directly. The scan pipeline loads
//! preferences before scoring and appends a [`ScanEntry`] afterwards.
//! Each implementation chooses its own error type.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::{Preferences, ScanEntry};

/// Opaque identifier of an authenticated user.
///
/// # Examples
/// ```
/// use prodhealth_core::UserId;
///
/// let user = UserId::new(" user-1 ")?;
/// assert_eq!(user.as_str(), "user-1");
/// assert!(UserId::new("  ").is_err());
/// # Ok::<(), prodhealth_core::UserIdError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct UserId(String);

/// Errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdError {
    /// The identifier was blank.
    #[error("user id must not be empty")]
    Empty,
}

impl UserId {
    /// Validate and wrap a user identifier. Surrounding whitespace is removed.
    ///
    /// # Errors
    /// Returns [`UserIdError::Empty`] for blank input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserIdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Return the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(user: UserId) -> Self {
        user.0
    }
}

/// Key-value storage of preferences by user.
///
/// A user without a stored row has no preferences, which callers must keep
/// distinct from an empty [`Preferences`] value.
pub trait PreferenceStore {
    /// Error raised by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch a user's preferences, `Ok(None)` when none were saved.
    fn load(&self, user: &UserId) -> Result<Option<Preferences>, Self::Error>;

    /// Insert or replace a user's preferences.
    fn save(&self, user: &UserId, preferences: &Preferences) -> Result<(), Self::Error>;
}

/// Append-only log of scan results.
pub trait HistoryStore {
    /// Error raised by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Record a scan.
    fn append(&self, entry: &ScanEntry) -> Result<(), Self::Error>;
}

/// Read access to the scan log for history pages and statistics.
pub trait HistoryReader {
    /// Error raised by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Most recent scans for a user, newest first, at most `limit` entries.
    fn recent(&self, user: &UserId, limit: usize) -> Result<Vec<ScanEntry>, Self::Error>;

    /// Every scan for a user, oldest first.
    fn for_user(&self, user: &UserId) -> Result<Vec<ScanEntry>, Self::Error>;

    /// Every scan at or after `instant`, across users, oldest first.
    fn since(&self, instant: OffsetDateTime) -> Result<Vec<ScanEntry>, Self::Error>;

    /// Total number of stored scans.
    fn count(&self) -> Result<u64, Self::Error>;
}
