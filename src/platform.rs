//! Host platform detection.
//!
//! Uses runtime detection via `std::env::consts::OS` instead of compile-time
//! cfg attributes so a run context can describe any platform, which keeps
//! platform gates testable on every host.

use std::fmt;

/// Operating system family a pipeline runs on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Platform {
    /// Any Linux distribution
    Linux,
    /// macOS
    MacOs,
    /// Windows
    Windows,
    /// Anything else (BSDs, illumos, ...)
    Other,
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an `std::env::consts::OS`-style name to a platform.
    pub fn from_os(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "linux" => Platform::Linux,
            "macos" | "osx" | "darwin" => Platform::MacOs,
            "windows" | "win" => Platform::Windows,
            _ => Platform::Other,
        }
    }

    /// Lowercase identifier used in configuration and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
            Platform::Other => "other",
        }
    }

    /// Whether a platform name from configuration designates this platform.
    pub fn matches(&self, name: &str) -> bool {
        Platform::from_os(name.trim()) == *self
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_aliases() {
        assert_eq!(Platform::from_os("darwin"), Platform::MacOs);
        assert_eq!(Platform::from_os("Linux"), Platform::Linux);
        assert_eq!(Platform::from_os("freebsd"), Platform::Other);
        assert!(Platform::Windows.matches("windows"));
        assert!(!Platform::Linux.matches("osx"));
    }

    #[test]
    fn test_current_platform() {
        let current = Platform::current();

        #[cfg(target_os = "linux")]
        assert_eq!(current, Platform::Linux);

        #[cfg(target_os = "macos")]
        assert_eq!(current, Platform::MacOs);

        #[cfg(target_os = "windows")]
        assert_eq!(current, Platform::Windows);

        let _ = current;
    }
}
