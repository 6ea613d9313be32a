//! Platform policy
//!
//! Selects, once at startup, how the coordinator compensates for the
//! on-screen keyboard on the running platform.
//!
//! Built-in defaults cover Android and iOS. A [`PolicyTable`] loaded from an
//! `inset.toml` file can override those defaults or register additional
//! platforms:
//!
//! ```toml
//! [platforms.android]
//! mode = "native-resize"
//! default_extra_height = 24.0
//!
//! [platforms.ios]
//! mode = "manual-compensation"
//! default_extra_height = 75.0
//! dismiss = "restore-offset"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use inset_platform::Platform;
use serde::{Deserialize, Serialize};

use crate::error::{InsetError, Result};
use crate::keyboard::KeyboardState;
use crate::sanitize;

/// Default margin kept between the focused view and the keyboard
pub const DEFAULT_EXTRA_HEIGHT: f32 = 75.0;

/// Default additional scroll applied on top of every correction
pub const DEFAULT_EXTRA_SCROLL_OFFSET: f32 = 0.0;

// ============================================================================
// Compensation Mode
// ============================================================================

/// How the host platform reacts to the keyboard appearing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompensationMode {
    /// The OS shrinks or pans the viewport itself. Viewport heights reported
    /// to the coordinator already exclude the keyboard.
    NativeResize,
    /// The OS does nothing. The coordinator must account for the full
    /// keyboard height.
    #[default]
    ManualCompensation,
}

impl CompensationMode {
    /// Height of the viewport still covered by the keyboard after the host
    /// has done its part
    pub fn occlusion(&self, keyboard: &KeyboardState) -> f32 {
        match self {
            CompensationMode::NativeResize => 0.0,
            CompensationMode::ManualCompensation => keyboard.height,
        }
    }
}

/// What happens to the scroll position once the keyboard is dismissed or
/// focus leaves the target while the keyboard stays up
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DismissPolicy {
    /// Leave the container where the last correction put it
    #[default]
    Stay,
    /// Scroll back to the offset recorded before the first correction
    RestoreOffset,
}

// ============================================================================
// Platform Config
// ============================================================================

/// Resolved policy for one platform
///
/// Immutable once handed to a coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Native resize vs manual compensation
    pub mode: CompensationMode,
    /// Margin kept between the focused view and the keyboard's top edge
    pub default_extra_height: f32,
    /// Extra scroll added to every correction
    pub default_extra_scroll_offset: f32,
    /// Scroll restoration on dismiss
    #[serde(default)]
    pub dismiss: DismissPolicy,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::manual_compensation()
    }
}

impl PlatformConfig {
    /// Policy for hosts that resize the viewport natively
    pub fn native_resize() -> Self {
        Self {
            mode: CompensationMode::NativeResize,
            default_extra_height: DEFAULT_EXTRA_HEIGHT,
            default_extra_scroll_offset: DEFAULT_EXTRA_SCROLL_OFFSET,
            dismiss: DismissPolicy::Stay,
        }
    }

    /// Policy for hosts that need the app to compensate
    pub fn manual_compensation() -> Self {
        Self {
            mode: CompensationMode::ManualCompensation,
            default_extra_height: DEFAULT_EXTRA_HEIGHT,
            default_extra_scroll_offset: DEFAULT_EXTRA_SCROLL_OFFSET,
            dismiss: DismissPolicy::Stay,
        }
    }

    /// Safe policy used when the platform cannot be resolved
    ///
    /// Manual compensation with zero offsets: the keyboard is accounted for,
    /// nothing else is assumed.
    pub fn fallback() -> Self {
        Self {
            mode: CompensationMode::ManualCompensation,
            default_extra_height: 0.0,
            default_extra_scroll_offset: 0.0,
            dismiss: DismissPolicy::Stay,
        }
    }

    /// Set the default margin above the keyboard
    pub fn extra_height(mut self, extra_height: f32) -> Self {
        self.default_extra_height = extra_height;
        self
    }

    /// Set the extra scroll added to every correction
    pub fn extra_scroll_offset(mut self, offset: f32) -> Self {
        self.default_extra_scroll_offset = offset;
        self
    }

    /// Set the dismiss policy
    pub fn dismiss(mut self, dismiss: DismissPolicy) -> Self {
        self.dismiss = dismiss;
        self
    }

    /// Check if the host compensates for the keyboard itself
    pub fn compensates_natively(&self) -> bool {
        self.mode == CompensationMode::NativeResize
    }

    /// Bottom padding the container should add below its content
    ///
    /// Only manual compensation pads; with native resize the host already
    /// shrank the viewport and padding would double-apply.
    pub fn bottom_padding(&self, keyboard: &KeyboardState) -> f32 {
        if self.compensates_natively() || !keyboard.visible {
            return 0.0;
        }
        keyboard.height + self.default_extra_height
    }

    /// Clamp negative or non-finite offsets to zero
    pub(crate) fn sanitized(self) -> Self {
        Self {
            default_extra_height: sanitize::non_negative(
                self.default_extra_height,
                "default_extra_height",
            ),
            default_extra_scroll_offset: sanitize::non_negative(
                self.default_extra_scroll_offset,
                "default_extra_scroll_offset",
            ),
            ..self
        }
    }

    fn validate(self) -> Result<Self> {
        for (name, value) in [
            ("default_extra_height", self.default_extra_height),
            ("default_extra_scroll_offset", self.default_extra_scroll_offset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InsetError::Configuration(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(self)
    }
}

/// Resolve the built-in policy for a platform
///
/// Android resizes its window for the keyboard (`adjustResize`); iOS leaves
/// compensation to the app. Any other platform is a configuration error.
pub fn resolve(platform: &Platform) -> Result<PlatformConfig> {
    match platform {
        Platform::Android => Ok(PlatformConfig::native_resize()),
        Platform::Ios => Ok(PlatformConfig::manual_compensation()),
        Platform::Other(name) => Err(InsetError::Configuration(format!(
            "no keyboard policy for platform '{name}'"
        ))),
    }
}

/// Resolve the built-in policy, falling back to [`PlatformConfig::fallback`]
pub fn resolve_or_fallback(platform: &Platform) -> PlatformConfig {
    resolve(platform).unwrap_or_else(|err| {
        tracing::warn!("{err}, using manual compensation fallback");
        PlatformConfig::fallback()
    })
}

// ============================================================================
// Policy Table (inset.toml)
// ============================================================================

/// Per-platform overrides; unset fields keep the built-in default
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformOverrides {
    /// Compensation mode
    #[serde(default)]
    pub mode: Option<CompensationMode>,
    /// Margin kept above the keyboard
    #[serde(default)]
    pub default_extra_height: Option<f32>,
    /// Extra scroll added to every correction
    #[serde(default)]
    pub default_extra_scroll_offset: Option<f32>,
    /// Scroll restoration on dismiss
    #[serde(default)]
    pub dismiss: Option<DismissPolicy>,
}

impl PlatformOverrides {
    fn apply(&self, base: PlatformConfig) -> PlatformConfig {
        PlatformConfig {
            mode: self.mode.unwrap_or(base.mode),
            default_extra_height: self
                .default_extra_height
                .unwrap_or(base.default_extra_height),
            default_extra_scroll_offset: self
                .default_extra_scroll_offset
                .unwrap_or(base.default_extra_scroll_offset),
            dismiss: self.dismiss.unwrap_or(base.dismiss),
        }
    }
}

/// Policy table loaded from `inset.toml`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyTable {
    /// Overrides keyed by lowercase platform name
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformOverrides>,
}

impl PolicyTable {
    /// Parse a policy table from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut table: PolicyTable = toml::from_str(content)
            .map_err(|e| InsetError::Configuration(format!("invalid policy table: {e}")))?;
        // Keys are matched against Platform::name(), which is lowercase
        table.platforms = table
            .platforms
            .into_iter()
            .map(|(name, overrides)| (name.to_ascii_lowercase(), overrides))
            .collect();
        Ok(table)
    }

    /// Load a policy table from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            InsetError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| InsetError::Configuration(format!("failed to serialize: {e}")))
    }

    /// Resolve the policy for a platform
    ///
    /// Overrides apply on top of the built-in defaults. A platform with no
    /// built-in policy resolves only if the table names it, starting from
    /// [`PlatformConfig::fallback`].
    pub fn resolve(&self, platform: &Platform) -> Result<PlatformConfig> {
        let overrides = self.platforms.get(platform.name());
        let base = match (resolve(platform), overrides) {
            (Ok(base), _) => base,
            (Err(_), Some(_)) => PlatformConfig::fallback(),
            (Err(err), None) => return Err(err),
        };
        let config = match overrides {
            Some(overrides) => overrides.apply(base),
            None => base,
        };
        config.validate()
    }

    /// Resolve the policy, falling back to [`PlatformConfig::fallback`]
    pub fn resolve_or_fallback(&self, platform: &Platform) -> PlatformConfig {
        self.resolve(platform).unwrap_or_else(|err| {
            tracing::warn!("{err}, using manual compensation fallback");
            PlatformConfig::fallback()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown(height: f32) -> KeyboardState {
        KeyboardState {
            visible: true,
            height,
            animation_duration_ms: 250.0,
        }
    }

    #[test]
    fn test_resolve_builtin() {
        let android = resolve(&Platform::Android).unwrap();
        assert_eq!(android.mode, CompensationMode::NativeResize);
        assert!(android.compensates_natively());

        let ios = resolve(&Platform::Ios).unwrap();
        assert_eq!(ios.mode, CompensationMode::ManualCompensation);
        assert_eq!(ios.default_extra_height, DEFAULT_EXTRA_HEIGHT);
    }

    #[test]
    fn test_resolve_unknown_platform() {
        let err = resolve(&Platform::Other("tvos".into())).unwrap_err();
        assert!(matches!(err, InsetError::Configuration(_)));

        let config = resolve_or_fallback(&Platform::Other("tvos".into()));
        assert_eq!(config, PlatformConfig::fallback());
        assert_eq!(config.mode, CompensationMode::ManualCompensation);
        assert_eq!(config.default_extra_height, 0.0);
        assert_eq!(config.default_extra_scroll_offset, 0.0);
    }

    #[test]
    fn test_occlusion_by_mode() {
        let kb = shown(300.0);
        assert_eq!(CompensationMode::NativeResize.occlusion(&kb), 0.0);
        assert_eq!(CompensationMode::ManualCompensation.occlusion(&kb), 300.0);
    }

    #[test]
    fn test_bottom_padding() {
        let manual = PlatformConfig::manual_compensation().extra_height(20.0);
        assert_eq!(manual.bottom_padding(&shown(300.0)), 320.0);
        assert_eq!(manual.bottom_padding(&KeyboardState::default()), 0.0);

        // Native resize never pads
        let native = PlatformConfig::native_resize();
        assert_eq!(native.bottom_padding(&shown(300.0)), 0.0);
    }

    #[test]
    fn test_policy_table_overrides() {
        let table = PolicyTable::from_toml_str(
            r#"
            [platforms.Android]
            default_extra_height = 24.0

            [platforms.ios]
            mode = "native-resize"
            dismiss = "restore-offset"
            "#,
        )
        .unwrap();

        let android = table.resolve(&Platform::Android).unwrap();
        assert_eq!(android.mode, CompensationMode::NativeResize);
        assert_eq!(android.default_extra_height, 24.0);

        let ios = table.resolve(&Platform::Ios).unwrap();
        assert_eq!(ios.mode, CompensationMode::NativeResize);
        assert_eq!(ios.dismiss, DismissPolicy::RestoreOffset);
        assert_eq!(ios.default_extra_height, DEFAULT_EXTRA_HEIGHT);
    }

    #[test]
    fn test_policy_table_registers_platform() {
        let table = PolicyTable::from_toml_str(
            r#"
            [platforms.harmony]
            mode = "native-resize"
            default_extra_scroll_offset = 8.0
            "#,
        )
        .unwrap();

        let harmony = table.resolve(&"harmony".parse().unwrap()).unwrap();
        assert_eq!(harmony.mode, CompensationMode::NativeResize);
        assert_eq!(harmony.default_extra_height, 0.0);
        assert_eq!(harmony.default_extra_scroll_offset, 8.0);

        assert!(table.resolve(&"tizen".parse().unwrap()).is_err());
    }

    #[test]
    fn test_policy_table_rejects_negative_offsets() {
        let table = PolicyTable::from_toml_str(
            r#"
            [platforms.ios]
            default_extra_scroll_offset = -20.0

            [platforms.android]
            default_extra_height = -5.0
            "#,
        )
        .unwrap();

        let err = table.resolve(&Platform::Ios).unwrap_err();
        assert!(matches!(err, InsetError::Configuration(_)));
        assert!(table.resolve(&Platform::Android).is_err());

        // Falling back never yields a negative offset
        let ios = table.resolve_or_fallback(&Platform::Ios);
        assert_eq!(ios, PlatformConfig::fallback());
    }

    #[test]
    fn test_sanitized_clamps_offsets() {
        let config = PlatformConfig::manual_compensation()
            .extra_height(f32::NAN)
            .extra_scroll_offset(-20.0)
            .sanitized();
        assert_eq!(config.default_extra_height, 0.0);
        assert_eq!(config.default_extra_scroll_offset, 0.0);
        assert_eq!(config.mode, CompensationMode::ManualCompensation);
    }

    #[test]
    fn test_policy_table_rejects_bad_toml() {
        let err = PolicyTable::from_toml_str("[platforms.ios]\nmode = \"sideways\"").unwrap_err();
        assert!(matches!(err, InsetError::Configuration(_)));
    }

    #[test]
    fn test_policy_table_roundtrip() {
        let mut table = PolicyTable::default();
        table.platforms.insert(
            "ios".into(),
            PlatformOverrides {
                default_extra_height: Some(40.0),
                ..Default::default()
            },
        );
        let text = table.to_toml().unwrap();
        assert_eq!(PolicyTable::from_toml_str(&text).unwrap(), table);
    }
}
