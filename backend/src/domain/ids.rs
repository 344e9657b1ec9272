//! Storage-assigned entity identifiers.
//!
//! Identifiers are opaque UUIDs minted by storage on creation. Callers never
//! supply one on create; they only echo identifiers back for update and
//! delete.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} id must be a valid UUID")]
pub struct IdParseError {
    entity: &'static str,
}

impl IdParseError {
    /// Name of the entity whose identifier failed to parse.
    pub fn entity(&self) -> &'static str {
        self.entity
    }
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Parse an identifier from its hyphenated string form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdParseError> {
                let raw = id.as_ref();
                if raw.trim() != raw {
                    return Err(IdParseError { entity: $entity });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdParseError { entity: $entity })
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Mint a fresh identifier. Used by in-memory storage.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a customer row.
    CustomerId,
    "customer"
);
define_entity_id!(
    /// Identifier of an invoice row.
    InvoiceId,
    "invoice"
);
define_entity_id!(
    /// Identifier of a user row.
    UserId,
    "user"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn rejects_malformed_ids(#[case] raw: &str) {
        let err = CustomerId::new(raw).expect_err("malformed id");
        assert_eq!(err.entity(), "customer");
        assert_eq!(err.to_string(), "customer id must be a valid UUID");
    }

    #[rstest]
    fn display_round_trips_through_parse() {
        let id = InvoiceId::random();
        let parsed: InvoiceId = id.to_string().parse().expect("parse own display");
        assert_eq!(parsed, id);
    }

    #[rstest]
    fn serialises_as_bare_string() {
        let id = UserId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
