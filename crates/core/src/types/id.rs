//! Newtype IDs for type-safe document references.
//!
//! Every stored document is keyed by a UUID assigned at insert time. The
//! `define_id!` macro wraps that UUID per entity so a `LayoutId` can never be
//! passed where a `UserId` is expected.

/// Macro to define a type-safe document ID wrapper.
///
/// Creates a newtype wrapper around [`uuid::Uuid`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]` (hyphenated string on the wire)
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `generate()`, `as_uuid()`
/// - `From<Uuid>` and `Into<Uuid>` implementations
///
/// # Example
///
/// ```rust
/// # use garden_planner_core::define_id;
/// define_id!(UserId);
/// define_id!(LayoutId);
///
/// let user_id = UserId::generate();
/// let layout_id = LayoutId::new(user_id.as_uuid());
///
/// // Same underlying value, different types:
/// // let _: UserId = layout_id;
/// assert_eq!(user_id.as_uuid(), layout_id.as_uuid());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random (v4) ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> ::uuid::Uuid {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(LayoutId);
define_id!(CommentId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_plain_string() {
        let raw = uuid::Uuid::parse_str("6f1c1f5e-4b1c-4d7e-9f5a-2f7a3c8d9e01").unwrap();
        let id = UserId::new(raw);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6f1c1f5e-4b1c-4d7e-9f5a-2f7a3c8d9e01\"");

        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(LayoutId::generate(), LayoutId::generate());
    }

    #[test]
    fn test_display_matches_uuid() {
        let id = CommentId::generate();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }
}
