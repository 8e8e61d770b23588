//! Settings form state
//!
//! [`SettingsForm`] holds the editable fan configuration together with the
//! curves reported by the device. Changing a governing field (`mode` or
//! `curve_preset`) re-evaluates field visibility, notifies subscribers and
//! redraws the curve preview while it is shown.

use crate::config::{parse_pwm_field, FanConfig};
use crate::curves::{CurveSet, Preset};
use crate::error::Result;
use crate::render::{self, DisplayList, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::types::Mode;
use crate::visibility::{Visibility, VisibilityContext};

/// Called with the recomputed context whenever a governing field changes
pub type VisibilityListener = Box<dyn Fn(&VisibilityContext, Visibility) + Send>;

pub struct SettingsForm {
    config: FanConfig,
    curves: CurveSet,
    preview_size: (f64, f64),
    preview: Option<DisplayList>,
    listeners: Vec<VisibilityListener>,
}

impl std::fmt::Debug for SettingsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsForm")
            .field("config", &self.config)
            .field("curves", &self.curves)
            .field("preview", &self.preview.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SettingsForm {
    /// Build the form and perform the first render.
    pub fn new(config: FanConfig, curves: CurveSet) -> Self {
        Self::with_preview_size(config, curves, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn with_preview_size(config: FanConfig, curves: CurveSet, width: f64, height: f64) -> Self {
        let mut form = Self {
            config,
            curves,
            preview_size: (width, height),
            preview: None,
            listeners: Vec::new(),
        };
        form.render();
        form
    }

    pub fn config(&self) -> &FanConfig {
        &self.config
    }

    pub fn into_config(self) -> FanConfig {
        self.config
    }

    pub fn curves(&self) -> &CurveSet {
        &self.curves
    }

    pub fn context(&self) -> VisibilityContext {
        VisibilityContext::from_settings(&self.config.settings)
    }

    pub fn visibility(&self) -> Visibility {
        self.context().visibility()
    }

    /// The drawn curve preview, present only while it is visible.
    pub fn preview(&self) -> Option<&DisplayList> {
        self.preview.as_ref()
    }

    pub fn subscribe(&mut self, listener: VisibilityListener) {
        self.listeners.push(listener);
    }

    /// Re-evaluate visibility and redraw the preview.
    pub fn render(&mut self) -> Visibility {
        let context = self.context();
        let visibility = context.visibility();
        self.redraw_preview(&context, visibility);
        visibility
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.config.settings.mode == mode {
            return;
        }
        self.config.settings.mode = mode;
        self.governing_field_changed();
    }

    /// Select a curve preset by name. Unknown names are rejected.
    pub fn set_curve_preset(&mut self, name: &str) -> Result<()> {
        let preset: Preset = name.parse()?;
        if self.config.settings.preset_name() == preset.as_str() {
            return Ok(());
        }
        self.config.settings.curve_preset = Some(preset.as_str().to_string());
        self.governing_field_changed();
        Ok(())
    }

    /// Set the manual duty from form text (`range(0,255)`, required).
    pub fn set_manual_pwm(&mut self, raw: &str) -> Result<()> {
        self.config.settings.manual_pwm = parse_pwm_field("manual_pwm", raw)?;
        Ok(())
    }

    /// Edit one custom point (1-based slot) from form text.
    ///
    /// The preview picks up the edit immediately while the custom editor is
    /// shown.
    pub fn set_custom_point(&mut self, slot: usize, temp: &str, pwm: &str) -> Result<()> {
        self.config.custom.set_point_from_text(slot, temp, pwm)?;
        let context = self.context();
        let visibility = context.visibility();
        if visibility.custom_editor {
            self.redraw_preview(&context, visibility);
        }
        Ok(())
    }

    /// Validate before save.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()
    }

    fn governing_field_changed(&mut self) {
        let context = self.context();
        let visibility = context.visibility();
        self.redraw_preview(&context, visibility);
        for listener in &self.listeners {
            listener(&context, visibility);
        }
    }

    fn redraw_preview(&mut self, context: &VisibilityContext, visibility: Visibility) {
        if !visibility.curve_preview {
            self.preview = None;
            return;
        }

        let curves = if visibility.custom_editor {
            self.curves.with_custom(self.config.custom.to_points())
        } else {
            self.curves.clone()
        };

        let (width, height) = self.preview_size;
        let surface = self
            .preview
            .get_or_insert_with(|| DisplayList::new(width, height));
        render::render(Some(surface), &curves, &context.preset);
    }
}
