//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs come from the
//! spreadsheet feed as free-form text, so the wrapped value is a `String`.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use poppin_deli_core::define_id;
/// define_id!(DishId);
/// define_id!(TableId);
///
/// let dish = DishId::new("club-sandwich");
/// let table = TableId::new("club-sandwich");
///
/// // These are different types, so this won't compile:
/// // let _: DishId = table;
/// assert_eq!(dish.as_str(), table.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_serializes_transparently() {
        let id = ProductId::new("cold-coffee");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"cold-coffee\"");
    }

    #[test]
    fn test_product_id_display() {
        assert_eq!(ProductId::from("A").to_string(), "A");
    }
}
