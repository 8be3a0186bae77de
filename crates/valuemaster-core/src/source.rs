use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Upstream identifiers reported by acquirers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Fred,
    Damodaran,
    Offline,
}

impl SourceId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fred => "fred",
            Self::Damodaran => "damodaran",
            Self::Offline => "offline",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
