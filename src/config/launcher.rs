//! Launcher configuration structure
//!
//! Branding, installer commands and the changelog location are baked into
//! the binary from `resources/launcher.toml`.

use crate::resources;
use crate::utils::command::LaunchRequest;
use crate::utils::error::{LauncherError, Result};
use serde::Deserialize;

/// Main launcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LauncherConfig {
    pub branding: BrandingConfig,
    pub installers: InstallersConfig,
    pub changelog: ChangelogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrandingConfig {
    /// Main window title
    pub window_title: String,
    /// Text shown under the animated image
    pub welcome_text: String,
    /// Fixed main window size
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    /// Window background, `#rrggbb`
    #[serde(default = "default_background")]
    pub background: String,
    /// Text and button label colour, `#rrggbb`
    #[serde(default = "default_foreground")]
    pub foreground: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallersConfig {
    /// Helper used to run the elevated installer (e.g. pkexec)
    pub privilege_helper: String,
    pub elevated_label: String,
    pub elevated_program: String,
    pub direct_label: String,
    pub direct_program: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangelogConfig {
    pub label: String,
    /// Versioned release asset holding the plain-text changelog
    pub url: String,
    pub window_title: String,
    #[serde(default = "default_changelog_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

/// The two installers the launcher can start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallerKind {
    /// Graphical installer started through the privilege helper
    Elevated,
    /// Second installer started as the current user
    Direct,
}

fn default_width() -> f32 {
    800.0
}

fn default_height() -> f32 {
    600.0
}

fn default_changelog_width() -> f32 {
    1000.0
}

fn default_background() -> String {
    "#00568f".to_string()
}

fn default_foreground() -> String {
    "#ffd700".to_string()
}

/// Parse `#rrggbb` into its components.
pub fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

impl LauncherConfig {
    /// Load the configuration compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml(resources::LAUNCHER_TOML)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: LauncherConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.branding.window_title.trim().is_empty() {
            return Err(LauncherError::ConfigError(
                "Window title cannot be empty".to_string(),
            ));
        }

        for (name, value) in [
            ("privilege_helper", &self.installers.privilege_helper),
            ("elevated_program", &self.installers.elevated_program),
            ("direct_program", &self.installers.direct_program),
        ] {
            if value.trim().is_empty() {
                return Err(LauncherError::ConfigError(format!(
                    "installers.{} cannot be empty",
                    name
                )));
            }
        }

        let url = &self.changelog.url;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(LauncherError::ConfigError(format!(
                "Changelog URL must be http(s): {}",
                url
            )));
        }

        for (name, value) in [
            ("background", &self.branding.background),
            ("foreground", &self.branding.foreground),
        ] {
            if parse_hex_color(value).is_none() {
                return Err(LauncherError::ConfigError(format!(
                    "branding.{} is not a #rrggbb colour: {}",
                    name, value
                )));
            }
        }

        if self.branding.width <= 0.0 || self.branding.height <= 0.0 {
            return Err(LauncherError::ConfigError(
                "Window size must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the launch request for one of the installers
    pub fn installer_request(&self, kind: InstallerKind) -> LaunchRequest {
        match kind {
            InstallerKind::Elevated => LaunchRequest::elevated(
                &self.installers.privilege_helper,
                &self.installers.elevated_program,
            ),
            InstallerKind::Direct => LaunchRequest::direct(&self.installers.direct_program),
        }
    }

    /// Button label for one of the installers
    pub fn installer_label(&self, kind: InstallerKind) -> &str {
        match kind {
            InstallerKind::Elevated => &self.installers.elevated_label,
            InstallerKind::Direct => &self.installers.direct_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_is_valid() {
        let config = LauncherConfig::embedded().unwrap();
        assert_eq!(config.branding.window_title, "Apex KLGE Minimal v1.0");
        assert_eq!(config.branding.width, 800.0);
        assert_eq!(config.branding.height, 600.0);
        assert!(config
            .changelog
            .url
            .ends_with("/releases/download/v1.0/Minimal-ChangeLog"));
    }

    #[test]
    fn installer_requests() {
        let config = LauncherConfig::embedded().unwrap();

        let elevated = config.installer_request(InstallerKind::Elevated);
        assert_eq!(elevated.command, "pkexec");
        assert_eq!(elevated.args, vec!["calamares".to_string()]);

        let direct = config.installer_request(InstallerKind::Direct);
        assert_eq!(direct.command, "ApexInstaller");
        assert!(direct.args.is_empty());

        assert_eq!(
            config.installer_label(InstallerKind::Elevated),
            "Install With Calamares"
        );
    }

    #[test]
    fn rejects_non_http_changelog_url() {
        let mut config = LauncherConfig::embedded().unwrap();
        config.changelog.url = "ftp://example.org/log".to_string();
        assert!(matches!(
            config.validate(),
            Err(LauncherError::ConfigError(_))
        ));
    }

    #[test]
    fn rejects_empty_helper() {
        let mut config = LauncherConfig::embedded().unwrap();
        config.installers.privilege_helper = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        assert!(matches!(
            LauncherConfig::from_toml("[branding"),
            Err(LauncherError::TomlParse(_))
        ));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#00568f"), Some([0x00, 0x56, 0x8f]));
        assert_eq!(parse_hex_color("#FFD700"), Some([0xff, 0xd7, 0x00]));
        assert_eq!(parse_hex_color("00568f"), None);
        assert_eq!(parse_hex_color("#0056"), None);
        assert_eq!(parse_hex_color("#zz568f"), None);
    }
}
