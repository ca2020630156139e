//! Project languages and what they imply for a deployment.

use std::fmt;

use serde::Serialize;

use crate::error::DeployError;

/// Languages a project can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    Python,
    #[serde(rename = "VB")]
    VisualBasic,
    #[serde(rename = "C#")]
    CSharp,
}

impl Language {
    /// Parse a configured language value.
    ///
    /// Matching is exact: `"Python"`, `"VB"` and `"C#"` only.
    pub fn parse(value: &str) -> Result<Self, DeployError> {
        match value {
            "Python" => Ok(Self::Python),
            "VB" => Ok(Self::VisualBasic),
            "C#" => Ok(Self::CSharp),
            _ => Err(DeployError::UnsupportedLanguage {
                language: value.to_string(),
            }),
        }
    }

    /// Whether deployments compile and publish before going live.
    pub fn is_buildable(self) -> bool {
        match self {
            Self::Python => false,
            Self::VisualBasic | Self::CSharp => true,
        }
    }

    /// Visual Studio project file extension.
    pub fn project_extension(self) -> &'static str {
        match self {
            Self::Python => "pyproj",
            Self::VisualBasic => "vbproj",
            Self::CSharp => "csproj",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::VisualBasic => "VB",
            Self::CSharp => "C#",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
