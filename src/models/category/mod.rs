//! Category color keys for time blocks.
//!
//! The backend stores a free-form category label and an optional color.
//! The timeline only knows five visual styles, so both fields are folded
//! into a [`ColorKey`] when records arrive.

use serde::{Deserialize, Serialize};

/// Category used when a record carries none.
pub const DEFAULT_CATEGORY: &str = "Default";

/// One of the fixed visual styles an event card can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorKey {
    #[default]
    Indigo,
    Amber,
    Emerald,
    Rose,
    Purple,
}

impl ColorKey {
    pub const ALL: [ColorKey; 5] = [
        ColorKey::Indigo,
        ColorKey::Amber,
        ColorKey::Emerald,
        ColorKey::Rose,
        ColorKey::Purple,
    ];

    /// Map a category label (Chinese or English) to its color.
    ///
    /// Unknown categories fall back to indigo.
    pub fn from_category(category: &str) -> Self {
        match category.trim() {
            "工作" | "Work" => ColorKey::Indigo,
            "学习" | "Study" => ColorKey::Amber,
            "运动" | "Exercise" => ColorKey::Emerald,
            "社交" | "Social" => ColorKey::Rose,
            "休息" | "Rest" => ColorKey::Purple,
            _ => ColorKey::Indigo,
        }
    }

    /// Parse a key name (`"amber"`) or one of the canonical hex values.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|key| {
            key.name().eq_ignore_ascii_case(value) || key.hex().eq_ignore_ascii_case(value)
        })
    }

    /// Resolve the color of a backend record: an explicit color wins when it
    /// is recognisable, otherwise the category decides.
    pub fn resolve(color: Option<&str>, category: &str) -> Self {
        color
            .and_then(Self::parse)
            .unwrap_or_else(|| Self::from_category(category))
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorKey::Indigo => "indigo",
            ColorKey::Amber => "amber",
            ColorKey::Emerald => "emerald",
            ColorKey::Rose => "rose",
            ColorKey::Purple => "purple",
        }
    }

    /// Hex value sent to the backend on sync.
    pub fn hex(self) -> &'static str {
        match self {
            ColorKey::Indigo => "#6366f1",
            ColorKey::Amber => "#f59e0b",
            ColorKey::Emerald => "#10b981",
            ColorKey::Rose => "#f43f5e",
            ColorKey::Purple => "#a855f7",
        }
    }

    /// RGB triple of [`ColorKey::hex`].
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ColorKey::Indigo => (0x63, 0x66, 0xf1),
            ColorKey::Amber => (0xf5, 0x9e, 0x0b),
            ColorKey::Emerald => (0x10, 0xb9, 0x81),
            ColorKey::Rose => (0xf4, 0x3f, 0x5e),
            ColorKey::Purple => (0xa8, 0x55, 0xf7),
        }
    }
}

impl std::fmt::Display for ColorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
