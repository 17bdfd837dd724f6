//! Platform-specific builds of test binaries
//!
//! Each supported platform provides a [`Builder`] that knows which build
//! flavours it can produce. The platform is passed in explicitly, so a test
//! run can target a platform other than the host.

mod darwin;
mod linux;
pub mod system;

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;

use crate::common::{Error, Result};

pub use darwin::DarwinBuilder;
pub use linux::LinuxBuilder;

/// Supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
}

impl Platform {
    /// Get the current platform
    pub fn current() -> Self {
        #[cfg(target_os = "linux")]
        return Platform::Linux;

        #[cfg(target_os = "macos")]
        return Platform::MacOS;

        #[cfg(target_os = "windows")]
        return Platform::Windows;

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        return Platform::Linux; // Default fallback
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "linux"),
            Platform::MacOS => write!(f, "darwin"),
            Platform::Windows => write!(f, "windows"),
        }
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linux" | "linux2" => Ok(Platform::Linux),
            "darwin" | "macos" => Ok(Platform::MacOS),
            "windows" | "win32" => Ok(Platform::Windows),
            other => Err(Error::Config(format!("Unknown platform '{}'", other))),
        }
    }
}

/// Flavour of debug information to build with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    /// The platform's default
    Default,
    /// Separate dSYM bundle
    Dsym,
    /// DWARF in the object files
    Dwarf,
}

impl fmt::Display for BuildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildKind::Default => write!(f, "default binary"),
            BuildKind::Dsym => write!(f, "binary with dsym"),
            BuildKind::Dwarf => write!(f, "binary with dwarf"),
        }
    }
}

/// Where and how to build
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// Directory holding the test's Makefile
    pub dir: PathBuf,
    /// Compiler override, passed to make as `CC`
    pub compiler: Option<String>,
    /// Extra environment for the build
    pub environment: HashMap<String, String>,
    /// Echo the build commands and output
    pub trace: bool,
}

impl BuildRequest {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Arguments for the main `make` invocation
    fn make_args(&self, extra: Option<&str>) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(compiler) = &self.compiler {
            args.push(format!("CC={}", compiler));
        }
        if let Some(extra) = extra {
            args.push(extra.to_string());
        }
        args
    }
}

/// Builds test binaries for one platform
#[async_trait]
pub trait Builder: Send + Sync {
    fn platform(&self) -> Platform;

    /// Build `kind` as described by `request`
    ///
    /// Returns `Ok(false)` if this platform does not know how to build `kind`.
    async fn build(&self, kind: BuildKind, request: &BuildRequest) -> Result<bool>;
}

/// Builder for `platform`, if one exists
pub fn builder_for(platform: Platform) -> Option<Box<dyn Builder>> {
    match platform {
        Platform::MacOS => Some(Box::new(DarwinBuilder)),
        Platform::Linux => Some(Box::new(LinuxBuilder)),
        Platform::Windows => None,
    }
}

/// Build `kind` on `platform`, failing if the platform cannot
pub async fn build_binary(platform: Platform, kind: BuildKind, request: &BuildRequest) -> Result<()> {
    let builder = builder_for(platform).ok_or_else(|| Error::unsupported_build(kind, platform))?;

    tracing::info!(%platform, %kind, dir = %request.dir.display(), "building test binary");

    if builder.build(kind, request).await? {
        Ok(())
    } else {
        Err(Error::unsupported_build(kind, platform))
    }
}

/// `make clean` followed by `make` with `args`
async fn clean_and_make(request: &BuildRequest, args: Vec<String>) -> Result<()> {
    system::system(
        "make",
        &["clean".to_string()],
        Some(request.dir.as_path()),
        &request.environment,
        request.trace,
    )
    .await?;
    system::system("make", &args, Some(request.dir.as_path()), &request.environment, request.trace).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parsing() {
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::MacOS);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::MacOS);
        assert_eq!("Linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("win32".parse::<Platform>().unwrap(), Platform::Windows);
        assert!("plan9".parse::<Platform>().is_err());
    }

    #[test]
    fn test_builder_selection() {
        assert_eq!(builder_for(Platform::MacOS).unwrap().platform(), Platform::MacOS);
        assert_eq!(builder_for(Platform::Linux).unwrap().platform(), Platform::Linux);
        assert!(builder_for(Platform::Windows).is_none());
    }

    #[test]
    fn test_make_args() {
        let mut request = BuildRequest::new("/tmp/t");
        assert!(request.make_args(None).is_empty());

        request.compiler = Some("clang".to_string());
        assert_eq!(
            request.make_args(Some("MAKE_DSYM=NO")),
            vec!["CC=clang".to_string(), "MAKE_DSYM=NO".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unsupported_builds_are_errors() {
        let request = BuildRequest::new(std::env::temp_dir());

        let err = build_binary(Platform::Windows, BuildKind::Default, &request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedBuild { .. }));

        let err = build_binary(Platform::Linux, BuildKind::Dsym, &request)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Don't know how to build binary with dsym on linux");
    }
}
