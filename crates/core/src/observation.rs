//! Symptom observation enumerations.
//!
//! Each enumeration carries an explicit `Unset` variant for fields the
//! collection sequence never filled in. `Unset` is a value in its own right:
//! it is distinct from every observed value and never satisfies a rule's
//! equality test.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FactError;
use crate::fact::Field;

/// Token used on the wire for a field that was never observed.
pub const UNSET: &str = "unset";

macro_rules! observation_enum {
    (
        $(#[$meta:meta])*
        $name:ident for $field:ident {
            $($(#[$vmeta:meta])* $variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $token)]
                $variant,
            )+
            /// Not observed.
            #[default]
            #[serde(rename = "unset")]
            Unset,
        }

        impl $name {
            /// Every value of the domain, `Unset` last.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+ $name::Unset];

            /// The field this enumeration populates.
            pub const FIELD: Field = Field::$field;

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                    $name::Unset => UNSET,
                }
            }

            pub fn is_unset(&self) -> bool {
                matches!(self, $name::Unset)
            }

            /// Wire tokens accepted by `FromStr`.
            pub fn tokens() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FactError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| FactError::InvalidValue {
                        field: Self::FIELD,
                        value: s.to_string(),
                        allowed: Self::tokens(),
                    })
            }
        }
    };
}

observation_enum! {
    /// Texture of the affected leaves.
    LeafTexture for LeafTexture {
        DryBrittle => "dry_brittle",
        NormalFirm => "normal_firm",
        /// Soft and puckered, the classic mosaic presentation.
        NormalSoftPuckered => "normal_soft_puckered",
        SoftMushy => "soft_mushy",
    }
}

observation_enum! {
    /// Whether the stem shows lesions.
    StemLesion for StemLesion {
        Wet => "wet",
        No => "no",
    }
}

observation_enum! {
    /// Whether the stem exudes a sticky ooze.
    StemSticky for StemSticky {
        Yes => "yes",
        No => "no",
    }
}

observation_enum! {
    /// Surface texture of the tuber.
    TuberTexture for TuberTexture {
        Smooth => "smooth",
        Other => "other",
    }
}

observation_enum! {
    /// Firmness of the tuber flesh.
    TuberFirmness for TuberFirmness {
        SoftMushy => "soft_mushy",
        NormalFirm => "normal_firm",
    }
}

observation_enum! {
    /// Smell of the cut tuber.
    TuberSmell for TuberSmell {
        Foul => "foul",
        Mild => "mild",
    }
}
