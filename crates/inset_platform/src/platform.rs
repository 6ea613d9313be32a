//! Runtime platform identification

use std::fmt;
use std::str::FromStr;

/// The platform a coordinator runs on
///
/// Only the two mobile platforms have a known keyboard behaviour. Anything
/// else is carried by name so a policy table can still be consulted for it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Android (NDK / native activity)
    Android,
    /// iOS (UIKit)
    Ios,
    /// Any other platform, identified by its lowercase name
    Other(String),
}

impl Platform {
    /// Get the platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Other(std::env::consts::OS.to_string())
        }
    }

    /// Get the canonical platform name
    ///
    /// Returns a string like "android", "ios", or the name of an
    /// unrecognized platform.
    pub fn name(&self) -> &str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Other(name) => name,
        }
    }

    /// Identify a platform by name
    ///
    /// Matching is case-insensitive; unrecognized names become
    /// [`Platform::Other`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "android" => Platform::Android,
            "ios" | "iphoneos" => Platform::Ios,
            _ => Platform::Other(name),
        }
    }

    /// Check if this is one of the known mobile platforms
    pub fn is_known(&self) -> bool {
        !matches!(self, Platform::Other(_))
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
