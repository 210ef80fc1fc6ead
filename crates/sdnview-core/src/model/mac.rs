use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// MAC address as reported by the controller.
///
/// Not validated: hosts are displayed with whatever the controller learned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Only surrounding whitespace is stripped.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_controller_text_verbatim() {
        let dashed = MacAddress::new(" AA-BB-CC-00-00-01\n");
        assert_eq!(dashed.as_str(), "AA-BB-CC-00-00-01");
        let lower = MacAddress::new("0a:00:00:00:00:02");
        assert_eq!(lower.to_string(), "0a:00:00:00:00:02");
    }
}
