//! Effect configuration.
//!
//! Every section defaults to the values the portfolio markup expects, so
//! `EffectsConfig::default()` is the normal configuration. A page can
//! override individual fields with a JSON document; omitted fields keep
//! their defaults.
//!
//! ```ignore
//! let config = EffectsConfig::from_json(r#"{ "navbar": { "threshold_px": 60 } }"#)?;
//! assert_eq!(config.navbar.selector, ".navbar");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{EffectsError, EffectsResult};

/// Configuration for all page effects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub navbar: NavbarConfig,
    pub skills: SkillBarConfig,
    pub hover: HoverConfig,
    pub reveal: RevealConfig,
    pub modal: ModalConfig,
    pub contact: ContactFormConfig,
    pub ripple: RippleConfig,
    pub tooltip: TooltipConfig,
}

impl EffectsConfig {
    /// Parse a (possibly partial) JSON override document and validate it.
    pub fn from_json(json: &str) -> EffectsResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the effects cannot work with.
    pub fn validate(&self) -> EffectsResult<()> {
        check_ratio("skills.threshold", self.skills.threshold)?;
        check_ratio("reveal.threshold", self.reveal.threshold)?;

        let divisor = self.hover.tilt_divisor;
        if divisor.is_nan() || divisor <= 0.0 {
            return Err(EffectsError::InvalidConfig(format!(
                "hover.tilt_divisor must be positive, got {}",
                self.hover.tilt_divisor
            )));
        }
        if self.navbar.threshold_px.is_nan() {
            return Err(EffectsError::InvalidConfig(
                "navbar.threshold_px must be a number".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_ratio(name: &str, value: f64) -> EffectsResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EffectsError::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )))
    }
}

/// Navbar scroll reactor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    pub selector: String,
    pub scrolled_class: String,
    /// Vertical offset (px) above which the navbar counts as scrolled
    pub threshold_px: f64,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            selector: ".navbar".to_string(),
            scrolled_class: "scrolled".to_string(),
            threshold_px: 100.0,
        }
    }
}

/// Skill-bar reveal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillBarConfig {
    pub selector: String,
    /// Attribute holding the target width (percent)
    pub width_attribute: String,
    pub threshold: f64,
}

impl Default for SkillBarConfig {
    fn default() -> Self {
        Self {
            selector: ".skill-progress".to_string(),
            width_attribute: "data-width".to_string(),
            threshold: 0.5,
        }
    }
}

/// Hover tilt and lift settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub tilt_selector: String,
    pub lift_selector: String,
    /// Pixels of pointer offset per degree of rotation
    pub tilt_divisor: f64,
    pub perspective_px: u32,
    pub tilt_scale: f64,
    /// Upward shift (px) while lifted
    pub lift_offset_px: u32,
    pub lift_shadow: String,
    pub rest_shadow: String,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            tilt_selector: ".hover-grow".to_string(),
            lift_selector: ".hover-lift".to_string(),
            tilt_divisor: 25.0,
            perspective_px: 1000,
            tilt_scale: 1.05,
            lift_offset_px: 5,
            lift_shadow: "var(--shadow-lg)".to_string(),
            rest_shadow: "var(--shadow-md)".to_string(),
        }
    }
}

/// Scroll reveal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub animate_class: String,
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: "[data-aos]".to_string(),
            animate_class: "aos-animate".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

/// Certificate modal entrance settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    pub selector: String,
    pub content_selector: String,
    /// Event the modal fires when it starts opening
    pub show_event: String,
    pub entrance_delay_ms: u64,
    pub transition: String,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            selector: ".certificate-modal".to_string(),
            content_selector: ".certificate-display".to_string(),
            show_event: "show.bs.modal".to_string(),
            entrance_delay_ms: 100,
            transition: "all 0.5s ease".to_string(),
        }
    }
}

/// Contact form feedback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactFormConfig {
    pub form_id: String,
    pub field_selector: String,
    pub valid_class: String,
    pub invalid_class: String,
    pub filled_class: String,
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            form_id: "contact-form".to_string(),
            field_selector: "input, textarea".to_string(),
            valid_class: "valid".to_string(),
            invalid_class: "invalid".to_string(),
            filled_class: "filled".to_string(),
        }
    }
}

/// Ripple click effect settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    pub selector: String,
    pub duration_ms: u64,
    /// Id of the injected keyframes style block
    pub style_id: String,
    pub color: String,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            selector: ".btn-hover-effect".to_string(),
            duration_ms: 600,
            style_id: "ripple-styles".to_string(),
            color: "rgba(255, 255, 255, 0.7)".to_string(),
        }
    }
}

/// Tooltip helper settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub selector: String,
    /// Attribute holding the label text
    pub attribute: String,
    pub class_name: String,
    /// Distance (px) between the label top and the element top
    pub offset_px: f64,
    pub z_index: i32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            selector: "[data-tooltip]".to_string(),
            attribute: "data-tooltip".to_string(),
            class_name: "custom-tooltip".to_string(),
            offset_px: 40.0,
            z_index: 9999,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_portfolio_markup() {
        let config = EffectsConfig::default();
        assert_eq!(config.navbar.threshold_px, 100.0);
        assert_eq!(config.skills.threshold, 0.5);
        assert_eq!(config.reveal.root_margin, "0px 0px -50px 0px");
        assert_eq!(config.modal.show_event, "show.bs.modal");
        assert_eq!(config.ripple.duration_ms, 600);
        assert_eq!(config.tooltip.z_index, 9999);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let config =
            EffectsConfig::from_json(r#"{ "navbar": { "threshold_px": 60 } }"#).unwrap();
        assert_eq!(config.navbar.threshold_px, 60.0);
        assert_eq!(config.navbar.selector, ".navbar");
        assert_eq!(config.ripple, RippleConfig::default());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = EffectsConfig::from_json(r#"{ "reveal": { "threshold": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, EffectsError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_divisor() {
        let err = EffectsConfig::from_json(r#"{ "hover": { "tilt_divisor": 0 } }"#).unwrap_err();
        assert!(err.to_string().contains("tilt_divisor"));
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = EffectsConfig::from_json("{ navbar").unwrap_err();
        assert!(matches!(err, EffectsError::Config(_)));
    }
}
