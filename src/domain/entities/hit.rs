//! Hit entity representing one followed tracking link.

use chrono::{DateTime, Utc};

/// A single recorded redirect.
///
/// `link_id` is a weak reference: no foreign key ties it to a
/// [`super::TrackedLink`]. `date_time` is the eviction key used by
/// [`crate::domain::retention::RetentionPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub link_id: String,
    pub date_time: DateTime<Utc>,
}

impl Hit {
    pub fn new(link_id: impl Into<String>, date_time: DateTime<Utc>) -> Self {
        Self {
            link_id: link_id.into(),
            date_time,
        }
    }

    /// Returns the hit with its timestamp capped at `now`.
    ///
    /// A hit is never written with a timestamp newer than its write time.
    pub fn clamped_to(mut self, now: DateTime<Utc>) -> Self {
        if self.date_time > now {
            self.date_time = now;
        }
        self
    }
}
