//! Correlation id carried by every request.
//!
//! The [`crate::middleware::Trace`] middleware runs each request inside
//! [`TraceId::scope`]; [`crate::domain::Error`] constructors read it back
//! through [`TraceId::current`] so error bodies and logs share one id.
//! Tokio task-locals do not cross `spawn`, so spawned work sees `None`.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying one request.
///
/// ```
/// use lister::TraceId;
///
/// async fn handler() -> Option<String> {
///     TraceId::current().map(|id| id.to_string())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Keep an id forwarded by a proxy when it is a non-nil UUID, otherwise
    /// mint a new one.
    #[must_use]
    pub fn from_header_or_generate(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.trim().parse::<Self>().ok())
            .filter(|id| !id.0.is_nil())
            .unwrap_or_else(Self::generate)
    }

    /// The id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT.scope(self, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn current_is_only_set_inside_a_scope() {
        let id = TraceId::generate();

        assert_eq!(id.scope(async { TraceId::current() }).await, Some(id));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    fn forwarded_ids_are_kept() {
        let raw = "6f1c0d2e-8a53-4d0b-9a43-1f0e2b8c7d11";
        assert_eq!(TraceId::from_header_or_generate(Some(raw)).to_string(), raw);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("not-a-uuid"))]
    #[case(Some(""))]
    #[case(Some("00000000-0000-0000-0000-000000000000"))]
    fn unusable_headers_get_a_fresh_id(#[case] header: Option<&str>) {
        let id = TraceId::from_header_or_generate(header);
        assert_ne!(Some(id.to_string().as_str()), header);
    }
}
