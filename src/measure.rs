//! Label measurement.
//!
//! Node sizes come from a [`MeasureSurface`], which stands in for whatever
//! rendering backend knows the real font metrics. A surface is attached for
//! the duration of a single measurement and always detached afterwards.

use crate::config::AppConfig;
use crate::text::wrap_text;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
    pub font_weight: u16,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            font_weight: 500,
        }
    }
}

/// A backend able to report the rendered pixel width of a line of text.
pub trait MeasureSurface {
    /// Prepare the surface to measure text in `style`.
    fn attach(&mut self, style: &TextStyle);

    /// Pixel width of `line` in the attached style.
    fn line_width(&mut self, line: &str) -> f64;

    /// Release whatever `attach` acquired.
    fn detach(&mut self);
}

/// Keeps a surface attached while alive and detaches it on drop.
pub struct AttachedSurface<'a, S: MeasureSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: MeasureSurface + ?Sized> AttachedSurface<'a, S> {
    pub fn attach(surface: &'a mut S, style: &TextStyle) -> Self {
        surface.attach(style);
        Self { surface }
    }

    pub fn line_width(&mut self, line: &str) -> f64 {
        self.surface.line_width(line)
    }
}

impl<S: MeasureSurface + ?Sized> Drop for AttachedSurface<'_, S> {
    fn drop(&mut self) {
        self.surface.detach();
    }
}

/// Deterministic surface: display columns times an average glyph advance.
#[derive(Debug, Clone, Default)]
pub struct CellMetricsSurface {
    pub char_width_factor: f64,
    style: Option<TextStyle>,
}

impl CellMetricsSurface {
    pub fn new(char_width_factor: f64) -> Self {
        Self {
            char_width_factor,
            style: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.char_width_factor)
    }

    pub fn is_attached(&self) -> bool {
        self.style.is_some()
    }
}

impl MeasureSurface for CellMetricsSurface {
    fn attach(&mut self, style: &TextStyle) {
        self.style = Some(style.clone());
    }

    fn line_width(&mut self, line: &str) -> f64 {
        let factor = if self.char_width_factor > 0.0 {
            self.char_width_factor
        } else {
            0.6
        };
        let font_size = self
            .style
            .as_ref()
            .map_or(TextStyle::default().font_size, |s| s.font_size);
        line.width() as f64 * font_size * factor
    }

    fn detach(&mut self) {
        self.style = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDimensions {
    pub width: f64,
    pub height: f64,
    pub lines: Vec<String>,
}

/// Wrap `text` and measure the wrapped block, padding included.
pub fn calculate_node_dimensions<S: MeasureSurface + ?Sized>(
    text: &str,
    surface: &mut S,
    config: &AppConfig,
) -> NodeDimensions {
    let lines = wrap_text(text, config.wrap_width);

    let max_line_width = {
        let mut attached = AttachedSurface::attach(surface, &config.text_style());
        lines
            .iter()
            .map(|line| attached.line_width(line))
            .fold(0.0, f64::max)
    };

    NodeDimensions {
        width: max_line_width + 2.0 * config.padding_x,
        height: lines.len() as f64 * config.line_height + 2.0 * config.padding_y,
        lines,
    }
}
