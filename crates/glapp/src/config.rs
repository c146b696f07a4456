//! GL pixel-format and context configuration.
//!
//! A [`Config`] is an immutable descriptor of the desired framebuffer
//! and GL context attributes. It is pure data: adapters consume it once
//! at window creation and translate it into their native context-creation
//! mechanism (GLFW window hints, SDL GL attributes). Values are requests,
//! not guarantees; the toolkit may negotiate a different format.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Requested OpenGL profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Core profile (no deprecated functionality).
    Core,
    /// Compatibility profile.
    #[default]
    Compatibility,
    /// OpenGL ES.
    Es,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Core => "core",
            Self::Compatibility => "compatibility",
            Self::Es => "es",
        })
    }
}

/// Errors loading a [`Config`] from a file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file contents were not valid TOML for a [`Config`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// GL configuration settings, fixed at window creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum bits for the red channel of the color buffer.
    pub red_size: u8,
    /// Minimum bits for the green channel of the color buffer.
    pub green_size: u8,
    /// Minimum bits for the blue channel of the color buffer.
    pub blue_size: u8,
    /// Minimum bits for the alpha channel of the color buffer.
    pub alpha_size: u8,
    /// Whether to use double buffered rendering.
    pub double_buffer: bool,
    /// Minimum bits in the depth buffer.
    pub depth_size: u8,
    /// Minimum bits in the stencil buffer.
    pub stencil_size: u8,
    /// Multisample anti-aliasing samples per pixel (0 disables MSAA).
    pub samples: u8,
    /// Whether the output is stereo.
    pub stereo: bool,
    /// Whether to request an sRGB capable framebuffer.
    pub srgb: bool,
    /// OpenGL context major version.
    pub major_version: u8,
    /// OpenGL context minor version.
    pub minor_version: u8,
    /// OpenGL profile.
    pub profile: Profile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            red_size: 8,
            green_size: 8,
            blue_size: 8,
            alpha_size: 8,
            double_buffer: true,
            depth_size: 16,
            stencil_size: 0,
            samples: 0,
            stereo: false,
            srgb: false,
            major_version: 2,
            minor_version: 1,
            profile: Profile::Compatibility,
        }
    }
}

impl Config {
    /// Parses a configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Total color buffer depth in bits.
    #[must_use]
    pub fn color_size(&self) -> u32 {
        u32::from(self.red_size)
            + u32::from(self.green_size)
            + u32::from(self.blue_size)
            + u32::from(self.alpha_size)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Color buffer size:     {} bit(s) (R:{}, G:{}, B:{}, A:{})",
            self.color_size(),
            self.red_size,
            self.green_size,
            self.blue_size,
            self.alpha_size
        )?;
        writeln!(f, "Depth buffer size:     {} bit(s)", self.depth_size)?;
        writeln!(f, "Stencil buffer size:   {} bit(s)", self.stencil_size)?;
        writeln!(f, "Double buffered:       {}", self.double_buffer)?;
        writeln!(f, "Stereo mode:           {}", self.stereo)?;
        writeln!(f, "sRGB mode:             {}", self.srgb)?;
        writeln!(f, "Anti-aliasing samples: {}", self.samples)?;
        writeln!(
            f,
            "GL Version:            {}.{}",
            self.major_version, self.minor_version
        )?;
        write!(f, "GL Profile:            {}", self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = Config::default();
        assert_eq!(config.red_size, 8);
        assert_eq!(config.depth_size, 16);
        assert_eq!(config.stencil_size, 0);
        assert_eq!(config.samples, 0);
        assert!(config.double_buffer);
        assert!(!config.stereo);
        assert!(!config.srgb);
        assert_eq!((config.major_version, config.minor_version), (2, 1));
        assert_eq!(config.profile, Profile::Compatibility);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = Config::from_toml_str("samples = 4\nprofile = \"core\"\n").unwrap();
        assert_eq!(config.samples, 4);
        assert_eq!(config.profile, Profile::Core);
        assert_eq!(config.depth_size, 16);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml_str("profile = \"metal\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
