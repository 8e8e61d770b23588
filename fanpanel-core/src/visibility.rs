//! Which settings fields are shown
//!
//! Visibility is a pure function of the persisted `mode` and `curve_preset`.
//! The context is rebuilt from the settings on every evaluation and never
//! edited on its own.

use crate::config::FanSettings;
use crate::curves::Preset;
use crate::types::Mode;

/// Governing fields, read from the persisted settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityContext {
    pub mode: Mode,
    /// Effective preset name (`balanced` when unset)
    pub preset: String,
}

impl VisibilityContext {
    pub fn from_settings(settings: &FanSettings) -> Self {
        Self {
            mode: settings.mode,
            preset: settings.preset_name().to_string(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        let auto = self.mode == Mode::Auto;
        Visibility {
            manual_pwm: self.mode == Mode::Manual,
            preset_selector: auto,
            curve_preview: auto,
            custom_editor: auto && self.preset == Preset::Custom.as_str(),
        }
    }
}

/// Shown/hidden state of each dependent field or section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
    pub manual_pwm: bool,
    pub preset_selector: bool,
    pub curve_preview: bool,
    pub custom_editor: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(mode: Mode, preset: Option<&str>) -> VisibilityContext {
        VisibilityContext::from_settings(&FanSettings {
            mode,
            curve_preset: preset.map(str::to_string),
            ..Default::default()
        })
    }

    #[test]
    fn test_manual_mode_shows_only_pwm() {
        for preset in [None, Some("quiet"), Some("custom")] {
            let v = context(Mode::Manual, preset).visibility();
            assert_eq!(
                v,
                Visibility {
                    manual_pwm: true,
                    preset_selector: false,
                    curve_preview: false,
                    custom_editor: false,
                }
            );
        }
    }

    #[test]
    fn test_auto_mode_with_known_presets() {
        for preset in ["quiet", "balanced", "performance"] {
            let v = context(Mode::Auto, Some(preset)).visibility();
            assert!(!v.manual_pwm);
            assert!(v.preset_selector);
            assert!(v.curve_preview);
            assert!(!v.custom_editor);
        }
    }

    #[test]
    fn test_custom_editor_requires_auto_and_custom() {
        assert!(context(Mode::Auto, Some("custom")).visibility().custom_editor);
        assert!(!context(Mode::Manual, Some("custom")).visibility().custom_editor);
    }

    #[test]
    fn test_unset_preset_is_balanced() {
        let ctx = context(Mode::Auto, None);
        assert_eq!(ctx.preset, "balanced");
        assert!(!ctx.visibility().custom_editor);
    }
}
