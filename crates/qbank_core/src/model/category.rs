//! Question category tags.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Fixed question class of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Write-From-Dictation.
    #[serde(rename = "WFD")]
    Wfd,
    /// Repeat-Sentence.
    #[serde(rename = "RS")]
    Rs,
    /// Repeat-Answer.
    #[serde(rename = "RA")]
    Ra,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Category::Wfd, Category::Rs, Category::Ra];

    /// Returns the uppercase tag used in identifiers, storage and export.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Wfd => "WFD",
            Self::Rs => "RS",
            Self::Ra => "RA",
        }
    }

    /// Parses an exact uppercase tag.
    pub fn from_tag(value: &str) -> Option<Self> {
        match value {
            "WFD" => Some(Self::Wfd),
            "RS" => Some(Self::Rs),
            "RA" => Some(Self::Ra),
            _ => None,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when a category tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl Display for UnknownCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown category `{}`; expected WFD|RS|RA", self.0)
    }
}

impl Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive tag parsing for operator input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.trim().to_ascii_uppercase().as_str())
            .ok_or_else(|| UnknownCategory(s.trim().to_string()))
    }
}
