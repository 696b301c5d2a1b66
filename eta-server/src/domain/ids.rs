//! Route and stop identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest identifier accepted from callers or the provider.
const MAX_ID_LEN: usize = 64;

/// Error returned when parsing an invalid route or stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id {value:?}: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    value: String,
    reason: &'static str,
}

fn validate(kind: &'static str, s: &str) -> Result<(), InvalidId> {
    let fail = |reason| {
        Err(InvalidId {
            kind,
            value: s.chars().take(MAX_ID_LEN).collect(),
            reason,
        })
    };

    if s.is_empty() {
        return fail("must not be empty");
    }
    if s.len() > MAX_ID_LEN {
        return fail("too long");
    }
    // Ids end up in provider URL paths.
    if s
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return fail("contains a reserved character");
    }
    Ok(())
}

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, rejecting empty, oversized or URL-unsafe input.
            pub fn parse(s: &str) -> Result<Self, InvalidId> {
                validate($kind, s)?;
                Ok(Self(s.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidId;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                validate($kind, &s)?;
                Ok(Self(s))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a route (a bus line) as issued by the transit feed.
    ///
    /// ```
    /// use eta_server::domain::RouteId;
    ///
    /// let id = RouteId::parse("44480").unwrap();
    /// assert_eq!(id.as_str(), "44480");
    /// assert!(RouteId::parse("").is_err());
    /// assert!(RouteId::parse("a/b").is_err());
    /// ```
    RouteId,
    "route"
);

id_type!(
    /// Identifier of a stop as issued by the transit feed.
    StopId,
    "stop"
);
