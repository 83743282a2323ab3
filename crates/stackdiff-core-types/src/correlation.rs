//! Correlation identifiers
//!
//! Every HTTP request gets a `RequestId`, taken from the caller when one is
//! supplied. Its spans, log events and errors carry that id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Mint a time-ordered id (UUIDv7)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Wrap an id received from a caller
            pub fn from_string(s: String) -> Self {
                Self(s)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identifier of one served request
    RequestId
);

correlation_id!(
    /// Trace identifier propagated from an upstream caller
    TraceId
);

/// Correlation carried through one request
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Build from ids supplied by the caller. Blank values are ignored and a
    /// missing request id is minted.
    pub fn from_caller(request_id: Option<&str>, trace_id: Option<&str>) -> Self {
        let present = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            request_id: present(request_id)
                .map(RequestId::from_string)
                .unwrap_or_default(),
            trace_id: present(trace_id).map(TraceId::from_string),
        }
    }

    /// The trace id, or `""` when the caller sent none
    pub fn trace_id_str(&self) -> &str {
        self.trace_id.as_ref().map(TraceId::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_ids_are_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_request_id_serializes_as_plain_string() {
        let id = RequestId::from_string("req-42".to_string());
        assert_eq!(id.to_string(), "req-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"req-42\"");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_from_caller_keeps_supplied_ids() {
        let ctx = RequestContext::from_caller(Some("req-7"), Some(" trace-1 "));
        assert_eq!(ctx.request_id.as_str(), "req-7");
        assert_eq!(ctx.trace_id_str(), "trace-1");
    }

    #[test]
    fn test_from_caller_mints_missing_request_id() {
        let ctx = RequestContext::from_caller(Some("  "), None);
        assert!(!ctx.request_id.as_str().trim().is_empty());
        assert!(ctx.trace_id.is_none());
        assert_eq!(ctx.trace_id_str(), "");

        let traced = RequestContext::new().with_trace_id(TraceId::from_string("t".into()));
        assert_eq!(traced.trace_id_str(), "t");
    }
}
