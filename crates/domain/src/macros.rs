//! Macro for implementing Display and FromStr for fieldless domain enums
//!
//! Used for enums whose textual form appears in logs, config files and
//! persisted caches (transport kinds, error categories). Parsing is
//! case-insensitive; output is always the lowercase label.
//!
//! # Example
//!
//! ```rust
//! use vpnrest_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum BridgeState {
//!     Automatic,
//!     On,
//!     Off,
//! }
//!
//! impl_domain_status_conversions!(BridgeState {
//!     Automatic => "automatic",
//!     On => "on",
//!     Off => "off",
//! });
//!
//! assert_eq!("ON".parse::<BridgeState>().unwrap(), BridgeState::On);
//! ```

/// Implements Display and FromStr for a fieldless enum
///
/// `$str` labels must be lowercase; parse errors name the enum type.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::types::TransportKind;

    #[test]
    fn test_display_uses_lowercase_label() {
        assert_eq!(TransportKind::Direct.to_string(), "direct");
        assert_eq!(TransportKind::Obfuscated.to_string(), "obfuscated");
    }

    #[test]
    fn test_parse_ignores_case_and_whitespace() {
        assert_eq!(TransportKind::from_str(" Obfuscated ").unwrap(), TransportKind::Obfuscated);
        assert_eq!(TransportKind::from_str("DIRECT").unwrap(), TransportKind::Direct);
    }

    #[test]
    fn test_parse_error_names_the_type() {
        let err = TransportKind::from_str("quic").unwrap_err();
        assert!(err.contains("Invalid TransportKind: quic"));
    }
}
