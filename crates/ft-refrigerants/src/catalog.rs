//! Refrigerant identities and alias-tolerant lookup.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Refrigerant identity.
///
/// `Other` is the explicit sentinel for refrigerants outside the built-in
/// set; it is the only identity for which a manually supplied PT override
/// is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Refrigerant {
    R410A,
    R22,
    R134a,
    R32,
    R407C,
    R454B,
    Other,
}

impl Refrigerant {
    /// Parse a field-entered identity string. Unrecognized identities map
    /// to `Other` rather than failing; the evaluation still runs, with the
    /// fallback saturation policy and an informational recommendation.
    pub fn parse(input: &str) -> Refrigerant {
        let normalized: String = input
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        for entry in refrigerant_catalog() {
            if entry
                .aliases
                .iter()
                .any(|alias| *alias == normalized.as_str())
            {
                return entry.refrigerant;
            }
        }
        Refrigerant::Other
    }

    pub fn is_known(self) -> bool {
        self != Refrigerant::Other
    }

    pub fn canonical_id(self) -> &'static str {
        match self {
            Refrigerant::R410A => "R-410A",
            Refrigerant::R22 => "R-22",
            Refrigerant::R134a => "R-134a",
            Refrigerant::R32 => "R-32",
            Refrigerant::R407C => "R-407C",
            Refrigerant::R454B => "R-454B",
            Refrigerant::Other => "other",
        }
    }
}

impl fmt::Display for Refrigerant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefrigerantCatalogEntry {
    pub refrigerant: Refrigerant,
    pub display_name: &'static str,
    /// Normalized (lowercase alphanumeric) spellings seen in field data.
    pub aliases: &'static [&'static str],
}

const REFRIGERANT_CATALOG: [RefrigerantCatalogEntry; 6] = [
    RefrigerantCatalogEntry {
        refrigerant: Refrigerant::R410A,
        display_name: "R-410A",
        aliases: &["r410a", "410a", "puron"],
    },
    RefrigerantCatalogEntry {
        refrigerant: Refrigerant::R22,
        display_name: "R-22",
        aliases: &["r22", "22", "freon22"],
    },
    RefrigerantCatalogEntry {
        refrigerant: Refrigerant::R134a,
        display_name: "R-134a",
        aliases: &["r134a", "134a"],
    },
    RefrigerantCatalogEntry {
        refrigerant: Refrigerant::R32,
        display_name: "R-32",
        aliases: &["r32", "32"],
    },
    RefrigerantCatalogEntry {
        refrigerant: Refrigerant::R407C,
        display_name: "R-407C",
        aliases: &["r407c", "407c"],
    },
    RefrigerantCatalogEntry {
        refrigerant: Refrigerant::R454B,
        display_name: "R-454B",
        aliases: &["r454b", "454b", "opteonxl41", "xl41"],
    },
];

pub fn refrigerant_catalog() -> &'static [RefrigerantCatalogEntry] {
    &REFRIGERANT_CATALOG
}
