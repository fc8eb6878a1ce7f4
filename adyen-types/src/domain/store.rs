//! Store scope identifier.

use serde::{Deserialize, Serialize};

/// Identifies the host store whose configuration applies to a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(u32);

impl StoreId {
    /// The admin/default scope.
    pub const DEFAULT: StoreId = StoreId(0);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric store id.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for StoreId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for StoreId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
