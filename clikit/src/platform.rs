//! Operating system platform detection.
//!
//! Groups operating systems into platform families and their primary CLI
//! toolchain families, so scripts can pick command variants without
//! matching on raw OS names.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Operating system platform family.
///
/// # Examples
///
/// ```
/// use clikit::platform::PlatformFamily;
///
/// let family = PlatformFamily::detect().unwrap();
/// println!("running on {family}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    /// Linux distributions.
    Linux,
    /// Apple macOS.
    MacOs,
    /// FreeBSD, NetBSD and DragonFly.
    Bsd,
    /// OpenBSD.
    OpenBsd,
}

impl PlatformFamily {
    /// Detects the platform family of the running system.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] when the OS cannot be
    /// classified.
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" | "android" => Ok(Self::Linux),
            "macos" | "ios" => Ok(Self::MacOs),
            "freebsd" | "netbsd" | "dragonfly" => Ok(Self::Bsd),
            "openbsd" => Ok(Self::OpenBsd),
            other => Err(Error::UnsupportedPlatform {
                platform: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "darwin"),
            Self::Bsd => write!(f, "bsd"),
            Self::OpenBsd => write!(f, "openbsd"),
        }
    }
}

impl FromStr for PlatformFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "darwin" | "macos" => Ok(Self::MacOs),
            "bsd" => Ok(Self::Bsd),
            "openbsd" => Ok(Self::OpenBsd),
            other => Err(Error::UnsupportedPlatform {
                platform: other.to_string(),
            }),
        }
    }
}

/// Primary CLI toolchain family of the platform.
///
/// Decides which flavor of the base userland commands (GNU or BSD
/// variants) the system ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainFamily {
    /// GNU userland.
    Gnu,
    /// BSD userland (including macOS).
    Bsd,
    /// OpenBSD userland.
    OpenBsd,
}

impl ToolchainFamily {
    /// Detects the toolchain family of the running system.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] when the OS cannot be
    /// classified.
    pub fn detect() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" | "android" => Ok(Self::Gnu),
            "macos" | "ios" | "freebsd" | "netbsd" | "dragonfly" => Ok(Self::Bsd),
            "openbsd" => Ok(Self::OpenBsd),
            other => Err(Error::UnsupportedPlatform {
                platform: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ToolchainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gnu => write!(f, "gnu"),
            Self::Bsd => write!(f, "bsd"),
            Self::OpenBsd => write!(f, "openbsd"),
        }
    }
}

impl FromStr for ToolchainFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gnu" => Ok(Self::Gnu),
            "bsd" => Ok(Self::Bsd),
            "openbsd" => Ok(Self::OpenBsd),
            other => Err(Error::UnsupportedPlatform {
                platform: other.to_string(),
            }),
        }
    }
}
