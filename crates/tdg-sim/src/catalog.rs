//! ---
//! tdg_section: "11-simulation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Closed enumerations describing simulated sites."
//! tdg_version: "v0.1.0"
//! tdg_owner: "tbd"
//! ---
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in sampling order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {}: {}", $label, other)),
                }
            }
        }
    };
}

closed_enum! {
    /// Geographic region a site reports under.
    Region, "region" {
        North => "North",
        South => "South",
        East => "East",
        West => "West",
        Central => "Central",
    }
}

closed_enum! {
    /// Radio technology generation, used as the key into baseline performance.
    Technology, "technology" {
        G4 => "4G",
        G5 => "5G",
        G6 => "6G",
        G7 => "7G",
        G8 => "8G",
    }
}

closed_enum! {
    /// Equipment vendor, used as the key into the performance modifier table.
    Vendor, "vendor" {
        Ericsson => "Ericsson",
        Nokia => "Nokia",
        Huawei => "Huawei",
        Samsung => "Samsung",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technology_labels_round_trip_through_from_str() {
        for tech in Technology::ALL {
            assert_eq!(tech.as_str().parse::<Technology>(), Ok(*tech));
        }
        assert_eq!(Technology::G5.to_string(), "5G");
    }

    #[test]
    fn unknown_labels_are_rejected() {
        let err = "9G".parse::<Technology>().unwrap_err();
        assert_eq!(err, "unknown technology: 9G");
        assert!("north".parse::<Region>().is_err());
        assert!("Acme".parse::<Vendor>().is_err());
    }

    #[test]
    fn set_sizes_match_catalogue() {
        assert_eq!(Region::ALL.len(), 5);
        assert_eq!(Technology::ALL.len(), 5);
        assert_eq!(Vendor::ALL.len(), 4);
    }

    #[test]
    fn serializes_with_display_labels() {
        let json = serde_json::to_string(&Technology::G8).unwrap();
        assert_eq!(json, "\"8G\"");
        let vendor: Vendor = serde_json::from_str("\"Huawei\"").unwrap();
        assert_eq!(vendor, Vendor::Huawei);
    }
}
