//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create ID wrappers that prevent accidentally
//! mixing an entry id with an arbitrary integer (e.g. a list position).

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_i64()`, `next()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use showreel_core::define_id;
/// define_id!(ClipId);
///
/// let id = ClipId::new(3);
/// assert_eq!(id.next(), Some(ClipId::new(4)));
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
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// The id handed to the first item of an empty collection.
            pub const FIRST: Self = Self(1);

            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }

            /// The id that follows this one, or `None` at `i64::MAX`.
            #[must_use]
            pub const fn next(self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(id) => Some(Self(id)),
                    None => None,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(EntryId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&EntryId::new(7)).expect("serialize");
        assert_eq!(json, "7");

        let id: EntryId = serde_json::from_str("12").expect("deserialize");
        assert_eq!(id.as_i64(), 12);
    }

    #[test]
    fn test_entry_id_parse() {
        assert_eq!(" 5 ".parse::<EntryId>().ok(), Some(EntryId::new(5)));
        assert!("five".parse::<EntryId>().is_err());
    }

    #[test]
    fn test_entry_id_next_and_ordering() {
        assert_eq!(EntryId::FIRST.next(), Some(EntryId::new(2)));
        assert!(EntryId::new(2) > EntryId::new(1));
        assert_eq!(EntryId::new(i64::MAX).next(), None);
    }
}
