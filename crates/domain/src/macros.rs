//! Macro for mapping fieldless enums to their wire names
//!
//! Sort orders, HTTP methods and CRUD operation names all travel as short
//! strings (query values, config keys, log fields). This macro generates the
//! `as_str`/`Display`/`FromStr` trio for such an enum from one table.
//!
//! # Example
//!
//! ```rust
//! use hmis_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Triage {
//!     Routine,
//!     Urgent,
//! }
//!
//! impl_wire_name_conversions!(Triage {
//!     Routine => "routine",
//!     Urgent => "urgent",
//! });
//!
//! assert_eq!(Triage::Urgent.as_str(), "urgent");
//! assert_eq!("ROUTINE".parse::<Triage>().unwrap(), Triage::Routine);
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum
///
/// - `as_str` / `Display` emit the wire name exactly as written in the table
/// - `FromStr` matches ignoring ASCII case and reports the accepted values on
///   failure
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$(Self::$variant),+];

            /// Wire name of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                let accepted: Vec<&str> = vec![$($str),+];
                Err(format!(
                    "Invalid {}: '{}' (expected one of {})",
                    stringify!($enum_name),
                    s,
                    accepted.join(", ")
                ))
            }
        }
    };
}
