//! Editor configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! changes. Out-of-range values are clamped when the config is loaded.

use crate::color::Rgba;
use crate::commands::{FillMode, POLYGON_SIDES, TextAlign};
use crate::error::{EditorError, EditorResult};
use crate::grid::GridSettings;
use crate::selection::DEFAULT_HANDLE_SIZE;
use crate::surface::FontSpec;
use serde::{Deserialize, Serialize};

/// Spray can timing and density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AerosolSettings {
    pub emissions_per_second: u32,
    /// Diameter of the disc the dots land in.
    pub spray_diameter: f64,
    pub dot_diameter: f64,
    pub dots_per_spray: u32,
}

impl Default for AerosolSettings {
    fn default() -> Self {
        Self {
            emissions_per_second: 25,
            spray_diameter: 30.0,
            dot_diameter: 2.0,
            dots_per_spray: 15,
        }
    }
}

impl AerosolSettings {
    /// Milliseconds between two sprays.
    pub fn period_ms(&self) -> u64 {
        1000 / u64::from(self.emissions_per_second.max(1))
    }
}

/// Style state the drawing tools read when a gesture starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub line_width: f64,
    pub fill: FillMode,
    polygon_sides: u32,
    pub eraser_width: f64,
    pub aerosol: AerosolSettings,
    pub font: FontSpec,
    pub text_align: TextAlign,
    pub stamp_scale: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            line_width: 5.0,
            fill: FillMode::default(),
            polygon_sides: 3,
            eraser_width: 10.0,
            aerosol: AerosolSettings::default(),
            font: FontSpec::default(),
            text_align: TextAlign::default(),
            stamp_scale: 1.0,
        }
    }
}

impl ToolSettings {
    pub fn polygon_sides(&self) -> u32 {
        self.polygon_sides
    }

    /// Set the number of polygon sides. Unlike the other settings this
    /// rejects values outside 3..=12 instead of clamping them.
    pub fn set_polygon_sides(&mut self, sides: u32) -> EditorResult<()> {
        if !POLYGON_SIDES.contains(&sides) {
            return Err(EditorError::InvalidSetting(format!(
                "polygon sides must be between {} and {}, got {sides}",
                POLYGON_SIDES.start(),
                POLYGON_SIDES.end()
            )));
        }
        self.polygon_sides = sides;
        Ok(())
    }

    /// Clamp every field into its supported range.
    pub fn normalized(mut self) -> Self {
        self.line_width = self.line_width.max(1.0);
        self.eraser_width = self.eraser_width.max(1.0);
        self.polygon_sides = self.polygon_sides.clamp(*POLYGON_SIDES.start(), *POLYGON_SIDES.end());
        self.aerosol.emissions_per_second = self.aerosol.emissions_per_second.max(1);
        self.aerosol.spray_diameter = self.aerosol.spray_diameter.max(1.0);
        self.aerosol.dot_diameter = self.aerosol.dot_diameter.max(1.0);
        self.font.size = self.font.size.max(1.0);
        self.stamp_scale = self.stamp_scale.max(0.01);
        self
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub background: Rgba,
    pub grid: GridSettings,
    pub handle_size: f64,
    pub tools: ToolSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1000,
            canvas_height: 800,
            background: Rgba::white(),
            grid: GridSettings::default(),
            handle_size: DEFAULT_HANDLE_SIZE,
            tools: ToolSettings::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config, filling gaps with defaults and clamping the rest.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn normalized(mut self) -> Self {
        self.canvas_width = self.canvas_width.max(1);
        self.canvas_height = self.canvas_height.max(1);
        self.handle_size = self.handle_size.max(1.0);
        self.grid = self.grid.normalized();
        self.tools = self.tools.normalized();
        self
    }
}
