use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of macOS releases this tool understands.
///
/// Every extractor branches on this value to select the on-disk schema
/// valid for the detected release. `Unknown` is the explicit sentinel for
/// raw version strings no rule matches; extractors treat it as "write a
/// notice, extract nothing".
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacosVersion {
    SnowLeopard,
    Lion,
    MountainLion,
    Mavericks,
    Yosemite,
    ElCapitan,
    Sierra,
    HighSierra,
    Mojave,
    Catalina,
    BigSur,
    Unknown,
}

impl MacosVersion {
    /// Map a raw `ProductVersion` string to a release.
    ///
    /// The raw string is split into dotted numeric components and matched
    /// component-wise, so `10.15.7` can never be shadowed by the `10.1`
    /// family the way naive substring checks allow.
    pub fn from_product_version(raw: &str) -> MacosVersion {
        let mut parts = raw.trim().split('.');
        let major: u32 = match parts.next().and_then(|p| p.parse().ok()) {
            Some(value) => value,
            None => return MacosVersion::Unknown,
        };
        let minor: u32 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

        match (major, minor) {
            (10, 6) => MacosVersion::SnowLeopard,
            (10, 7) => MacosVersion::Lion,
            (10, 8) => MacosVersion::MountainLion,
            (10, 9) => MacosVersion::Mavericks,
            (10, 10) => MacosVersion::Yosemite,
            (10, 11) => MacosVersion::ElCapitan,
            (10, 12) => MacosVersion::Sierra,
            (10, 13) => MacosVersion::HighSierra,
            (10, 14) => MacosVersion::Mojave,
            (10, 15) => MacosVersion::Catalina,
            // Big Sur reports 11.x, or 10.16 under older SDK shims
            (10, 16) | (11, _) => MacosVersion::BigSur,
            _ => MacosVersion::Unknown,
        }
    }

    /// True once release detection produced a usable branch key
    pub fn is_known(&self) -> bool {
        *self != MacosVersion::Unknown
    }

    /// Ordinal used for "this release or later" schema checks
    fn ordinal(&self) -> u8 {
        match self {
            MacosVersion::SnowLeopard => 0,
            MacosVersion::Lion => 1,
            MacosVersion::MountainLion => 2,
            MacosVersion::Mavericks => 3,
            MacosVersion::Yosemite => 4,
            MacosVersion::ElCapitan => 5,
            MacosVersion::Sierra => 6,
            MacosVersion::HighSierra => 7,
            MacosVersion::Mojave => 8,
            MacosVersion::Catalina => 9,
            MacosVersion::BigSur => 10,
            MacosVersion::Unknown => u8::MAX,
        }
    }

    /// True when this release is `other` or later. Always false for `Unknown`.
    pub fn at_least(&self, other: MacosVersion) -> bool {
        self.is_known() && self.ordinal() >= other.ordinal()
    }

    /// True when this release predates `other`. Always false for `Unknown`.
    pub fn before(&self, other: MacosVersion) -> bool {
        self.is_known() && self.ordinal() < other.ordinal()
    }
}

impl fmt::Display for MacosVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacosVersion::SnowLeopard => write!(f, "Snow Leopard (10.6)"),
            MacosVersion::Lion => write!(f, "Lion (10.7)"),
            MacosVersion::MountainLion => write!(f, "Mountain Lion (10.8)"),
            MacosVersion::Mavericks => write!(f, "Mavericks (10.9)"),
            MacosVersion::Yosemite => write!(f, "Yosemite (10.10)"),
            MacosVersion::ElCapitan => write!(f, "El Capitan (10.11)"),
            MacosVersion::Sierra => write!(f, "Sierra (10.12)"),
            MacosVersion::HighSierra => write!(f, "High Sierra (10.13)"),
            MacosVersion::Mojave => write!(f, "Mojave (10.14)"),
            MacosVersion::Catalina => write!(f, "Catalina (10.15)"),
            MacosVersion::BigSur => write!(f, "Big Sur (11)"),
            MacosVersion::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Default for MacosVersion {
    fn default() -> Self {
        MacosVersion::Unknown
    }
}
