use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Bitmask of the actions a role allows.
///
/// A role holds the union of its flags; a check passes only when every
/// requested bit is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(u8);

impl Permission {
    pub const COMMENT: Permission = Permission(0x02);
    pub const WRITE_ARTICLES: Permission = Permission(0x04);
    pub const MODERATE_COMMENTS: Permission = Permission(0x08);
    pub const ADMINISTER: Permission = Permission(0x80);

    /// No permissions at all.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every bit set (`0xff`), the administrator mask.
    pub const fn all() -> Self {
        Self(0xff)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Permission) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Human-readable flag names, used by the admin role column.
    pub fn names(self) -> Vec<&'static str> {
        if self == Self::all() {
            return vec!["all"];
        }

        [
            (Self::COMMENT, "comment"),
            (Self::WRITE_ARTICLES, "write"),
            (Self::MODERATE_COMMENTS, "moderate"),
            (Self::ADMINISTER, "administer"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect()
    }
}

impl BitOr for Permission {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permission {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Permission {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
