//! Controller configuration.
//!
//! Hosts pass a partial configuration ([`OptionsOverrides`]) that is merged
//! over the built-in defaults. Style dictionaries merge key by key;
//! the `modules` list replaces the default list outright.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::style::StyleMap;
use crate::toolbar::TOOLBAR_MODULE;

/// Delay before the refocus workaround re-clicks the image.
pub const DEFAULT_REFOCUS_DELAY_MS: u64 = 1000;

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Module identifiers, instantiated in this order on activation
    pub modules: Vec<String>,
    /// Base styles for the overlay element
    pub overlay_styles: StyleMap,
    /// Base styles for the toolbar container
    pub toolbar_styles: StyleMap,
    /// Styles for each toolbar button
    pub toolbar_button_styles: StyleMap,
    /// Styles for the icon inside each toolbar button
    pub toolbar_button_svg_styles: StyleMap,
    /// Synthesize a surface click and a delayed image re-click the first
    /// time an image is activated.
    pub refocus_workaround: bool,
    /// Delay before the image re-click
    pub refocus_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            modules: vec![TOOLBAR_MODULE.to_string()],
            overlay_styles: [("position", "absolute"), ("boxSizing", "border-box")]
                .into_iter()
                .collect(),
            toolbar_styles: [
                ("position", "absolute"),
                ("bottom", "10px"),
                ("right", "0"),
                ("left", "0"),
                ("height", "0"),
                ("minWidth", "100px"),
                ("font", "12px/1.0 Arial, Helvetica, sans-serif"),
                ("textAlign", "center"),
                ("color", "#333"),
                ("boxSizing", "border-box"),
                ("cursor", "default"),
            ]
            .into_iter()
            .collect(),
            toolbar_button_styles: [
                ("display", "inline-block"),
                ("width", "24px"),
                ("height", "24px"),
                ("background", "white"),
                ("border", "1px solid #999"),
                ("verticalAlign", "middle"),
            ]
            .into_iter()
            .collect(),
            toolbar_button_svg_styles: [
                ("fill", "#444"),
                ("stroke", "#444"),
                ("strokeWidth", "2"),
            ]
            .into_iter()
            .collect(),
            refocus_workaround: true,
            refocus_delay: Duration::from_millis(DEFAULT_REFOCUS_DELAY_MS),
        }
    }
}

impl Options {
    /// Merge host overrides over the defaults.
    pub fn merged(overrides: OptionsOverrides) -> Self {
        let mut options = Self::default();

        if let Some(modules) = overrides.modules {
            options.modules = modules;
        }
        merge_styles(&mut options.overlay_styles, overrides.overlay_styles);
        merge_styles(&mut options.toolbar_styles, overrides.toolbar_styles);
        merge_styles(
            &mut options.toolbar_button_styles,
            overrides.toolbar_button_styles,
        );
        merge_styles(
            &mut options.toolbar_button_svg_styles,
            overrides.toolbar_button_svg_styles,
        );
        if let Some(enabled) = overrides.refocus_workaround {
            options.refocus_workaround = enabled;
        }
        if let Some(ms) = overrides.refocus_delay_ms {
            options.refocus_delay = Duration::from_millis(ms);
        }

        options
    }
}

fn merge_styles(base: &mut StyleMap, overrides: Option<StyleMap>) {
    if let Some(overrides) = overrides {
        base.merge(&overrides);
    }
}

/// Partial configuration as supplied by the host.
///
/// Every field is optional; missing fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_styles: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbar_styles: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbar_button_styles: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbar_button_svg_styles: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refocus_workaround: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refocus_delay_ms: Option<u64>,
}
