//! Text-backed closed sets.
//!
//! Every enumerated column (`type`, `rarity`, `status`, ...) is stored as text and
//! parsed back through [`std::str::FromStr`], so an unexpected value coming out of the
//! store surfaces as a `ValidationError` instead of leaking through as a free string.

macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, ts_rs::TS,
        )]
        $(#[$meta])*
        $vis enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::shared::errors::DomainError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::domain::shared::errors::DomainError::ValidationError(
                        format!("Unknown {} '{}'", stringify!($name), other),
                    )),
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

pub(crate) use closed_set;

/// Parse an optional text column into its closed set.
pub fn parse_optional<T>(value: Option<String>) -> Result<Option<T>, T::Err>
where
    T: std::str::FromStr,
{
    value.map(|v| v.parse()).transpose()
}
