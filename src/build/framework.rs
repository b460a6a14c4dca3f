//! Target frameworks the client library is built for

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetFramework {
    #[serde(rename = "net35")]
    Net35,
    #[serde(rename = "net452")]
    Net452,
    #[serde(rename = "netstandard1.6")]
    NetStandard16,
}

impl TargetFramework {
    /// All frameworks in build order
    pub const ALL: [TargetFramework; 3] = [
        TargetFramework::Net35,
        TargetFramework::Net452,
        TargetFramework::NetStandard16,
    ];

    /// Short target framework moniker, used for directory and archive names
    pub fn moniker(self) -> &'static str {
        match self {
            TargetFramework::Net35 => "net35",
            TargetFramework::Net452 => "net452",
            TargetFramework::NetStandard16 => "netstandard1.6",
        }
    }

}

impl fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.moniker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monikers_in_build_order() {
        let monikers: Vec<_> = TargetFramework::ALL.iter().map(|fw| fw.moniker()).collect();
        assert_eq!(monikers, vec!["net35", "net452", "netstandard1.6"]);
        assert_eq!(TargetFramework::NetStandard16.to_string(), "netstandard1.6");
    }
}
