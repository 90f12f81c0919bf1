//! Macros shared by the domain types
//!
//! - [`impl_name_conversions!`] gives identifier enums a stable textual name
//!   (Display + FromStr) and an `ALL` listing.
//! - [`impl_from_record!`] wires plain serde-shaped types into the schema
//!   mapper.
//!
//! # Example
//!
//! ```rust
//! use openwowi_domain::impl_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Catalog {
//!     Priority,
//!     Status,
//! }
//!
//! impl_name_conversions!(Catalog {
//!     Priority => "priority",
//!     Status => "status",
//! });
//!
//! assert_eq!(Catalog::ALL.len(), 2);
//! assert_eq!("STATUS".parse::<Catalog>().ok(), Some(Catalog::Status));
//! ```

/// Implements Display, FromStr and an `ALL` constant for identifier enums
///
/// Parsing is case-insensitive. Unknown names fail with
/// [`WowiError::Config`](crate::WowiError::Config).
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their names
#[macro_export]
macro_rules! impl_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$(Self::$variant),+];

            /// Stable textual name of the variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::WowiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::WowiError::Config(format!(
                        "Invalid {}: {}",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}

/// Implements [`FromRecord`](crate::mapping::FromRecord) through the plain
/// normalize-then-deserialize path.
#[macro_export]
macro_rules! impl_from_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::mapping::FromRecord for $ty {
                fn from_record(record: &serde_json::Value) -> $crate::Result<Self> {
                    $crate::mapping::deserialize_normalized(record)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::WowiError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestCatalog {
        Priority,
        Source,
        Status,
    }

    impl_name_conversions!(TestCatalog {
        Priority => "priority",
        Source => "source",
        Status => "status",
    });

    #[test]
    fn test_display_conversion() {
        assert_eq!(TestCatalog::Priority.to_string(), "priority");
        assert_eq!(TestCatalog::Status.to_string(), "status");
    }

    #[test]
    fn test_fromstr_mixed_case() {
        assert_eq!(TestCatalog::from_str("Source").unwrap(), TestCatalog::Source);
        assert_eq!(TestCatalog::from_str("PRIORITY").unwrap(), TestCatalog::Priority);
    }

    #[test]
    fn test_fromstr_invalid_is_config_error() {
        let err = TestCatalog::from_str("department").unwrap_err();
        assert!(matches!(err, WowiError::Config(ref msg) if msg.contains("Invalid TestCatalog: department")));
    }

    #[test]
    fn test_all_lists_every_variant_in_order() {
        assert_eq!(
            TestCatalog::ALL,
            &[TestCatalog::Priority, TestCatalog::Source, TestCatalog::Status]
        );
    }
}
