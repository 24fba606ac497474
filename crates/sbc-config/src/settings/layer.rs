//! Settings layer identities

use crate::source::DocumentKey;
use std::fmt;

/// Device identifier used when detection finds nothing specific.
pub const DEFAULT_DEVICE: &str = "desktop";

/// OS identifier used when detection finds nothing specific.
pub const DEFAULT_OS: &str = "standard_linux";

/// One position in the settings precedence chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingsLayer {
    Default,
    Device,
    Os,
    User,
}

impl SettingsLayer {
    /// Merge order, lowest precedence first.
    pub const ORDER: [SettingsLayer; 4] = [Self::Default, Self::Device, Self::Os, Self::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Device => "device",
            Self::Os => "os",
            Self::User => "user",
        }
    }

    /// Where this layer's document lives for the given selection.
    pub fn key(&self, selection: &LayerSelection) -> DocumentKey {
        match self {
            Self::Default => DocumentKey::settings_default(),
            Self::Device => DocumentKey::settings_device(&selection.device),
            Self::Os => DocumentKey::settings_os(&selection.os),
            Self::User => DocumentKey::user_settings(),
        }
    }
}

impl fmt::Display for SettingsLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which device and OS documents participate in resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSelection {
    pub device: String,
    pub os: String,
}

impl LayerSelection {
    pub fn new(device: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            os: os.into(),
        }
    }
}

impl Default for LayerSelection {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE, DEFAULT_OS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_selection() {
        let selection = LayerSelection::new("rg351", "arkos");
        assert_eq!(
            SettingsLayer::Device.key(&selection).relative_path(),
            "devices/rg351.json"
        );
        assert_eq!(
            SettingsLayer::Os.key(&selection).relative_path(),
            "os_types/arkos.json"
        );
    }

    #[test]
    fn default_selection_is_desktop_linux() {
        let selection = LayerSelection::default();
        assert_eq!(selection.device, "desktop");
        assert_eq!(selection.os, "standard_linux");
    }
}
