//! Closed enums and their integer wire codes.
//!
//! Every enum maps to and from a fixed code through a total table with
//! an explicit default: unmapped codes decode to the default, and an
//! absent value encodes as the default's code.

use thiserror::Error;

/// A closed enum with a fixed wire code per member.
pub trait WireEnum: Copy + Default + 'static {
    /// Returns the wire code of this member.
    fn code(self) -> u8;

    /// Maps a wire code back to a member, if the code is mapped.
    fn try_from_code(code: u64) -> Option<Self>;

    /// Maps a wire code back to a member, falling back to the default.
    fn from_code(code: u64) -> Self {
        Self::try_from_code(code).unwrap_or_default()
    }

    /// Encodes an optional value, substituting the default when absent.
    fn encode_opt(value: Option<Self>) -> u8 {
        value.unwrap_or_default().code()
    }
}

/// A label that does not name any member of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {enum_name} label {label:?}")]
pub struct UnknownEnumLabel {
    pub enum_name: &'static str,
    pub label: String,
}

/// Declares a closed enum with wire codes, CSS-style labels and a default.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal => $label:literal
            ),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl $name {
            /// All members in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the member's label.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl $crate::codec::enums::WireEnum for $name {
            fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            fn try_from_code(code: u64) -> Option<Self> {
                match code {
                    $($code => Option::Some($name::$variant),)+
                    _ => Option::None,
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::codec::enums::UnknownEnumLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err($crate::codec::enums::UnknownEnumLabel {
                        enum_name: stringify!($name),
                        label: s.to_owned(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use wire_enum;

/// Encodes an optional enum where code 0 means "not set".
pub fn optional_code<E: WireEnum>(value: Option<E>) -> u8 {
    value.map_or(0, E::code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Axis, BlendMode, BooleanOperation, BoxFit, CrossAxisAlignment, LayoutWrap,
        MainAxisAlignment, StrokeCap, StrokeJoin, TextAlign, TextAlignVertical,
        TextDecorationLine,
    };

    fn assert_total<E: WireEnum + PartialEq + std::fmt::Debug>(all: &[E]) {
        for member in all {
            assert_eq!(E::from_code(member.code() as u64), *member);
        }
        assert_eq!(E::encode_opt(None), E::default().code());
        assert_eq!(E::from_code(250), E::default());
    }

    #[test]
    fn test_every_enum_is_total() {
        assert_total(TextAlign::ALL);
        assert_total(TextAlignVertical::ALL);
        assert_total(TextDecorationLine::ALL);
        assert_total(StrokeCap::ALL);
        assert_total(StrokeJoin::ALL);
        assert_total(BlendMode::ALL);
        assert_total(Axis::ALL);
        assert_total(MainAxisAlignment::ALL);
        assert_total(CrossAxisAlignment::ALL);
        assert_total(LayoutWrap::ALL);
        assert_total(BoxFit::ALL);
        assert_total(BooleanOperation::ALL);
    }

    #[test]
    fn test_documented_defaults() {
        assert_eq!(StrokeCap::default(), StrokeCap::Butt);
        assert_eq!(StrokeJoin::default(), StrokeJoin::Miter);
        assert_eq!(TextAlign::default(), TextAlign::Left);
        assert_eq!(TextAlignVertical::default(), TextAlignVertical::Top);
        assert_eq!(BlendMode::default(), BlendMode::Normal);
        assert_eq!(BoxFit::default(), BoxFit::Cover);
        assert_eq!(BooleanOperation::default(), BooleanOperation::Union);
    }

    #[test]
    fn test_labels_roundtrip() {
        for mode in BlendMode::ALL {
            assert_eq!(mode.as_str().parse::<BlendMode>().unwrap(), *mode);
        }
        assert_eq!("color-dodge".parse::<BlendMode>().unwrap(), BlendMode::ColorDodge);
        assert!("sparkle".parse::<BlendMode>().is_err());
    }

    #[test]
    fn test_optional_codes_reserve_zero() {
        assert_eq!(optional_code::<MainAxisAlignment>(None), 0);
        assert_eq!(MainAxisAlignment::try_from_code(0), None);
        assert_eq!(
            MainAxisAlignment::try_from_code(optional_code(Some(MainAxisAlignment::SpaceEvenly)) as u64),
            Some(MainAxisAlignment::SpaceEvenly)
        );
        assert_eq!(LayoutWrap::try_from_code(0), None);
    }
}
