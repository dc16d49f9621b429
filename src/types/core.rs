//! Value types shared by scene nodes and responses.

use palette::Srgba;
use serde::{Deserialize, Serialize};

/// An RGBA color with channels nominally in `0.0..=1.0`.
///
/// Out-of-range channels are kept as received; conversions to 8-bit forms
/// clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl From<Color> for Srgba<f64> {
    fn from(c: Color) -> Self {
        Srgba::new(c.r, c.g, c.b, c.a)
    }
}

impl From<Srgba<f64>> for Color {
    fn from(c: Srgba<f64>) -> Self {
        Color::new(c.red, c.green, c.blue, c.alpha)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

/// A 2x3 affine matrix `[[a, b, tx], [c, d, ty]]` relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub [[f64; 3]; 2]);

impl Transform {
    pub const IDENTITY: Transform = Transform([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);

    pub fn translate(x: f64, y: f64) -> Self {
        Transform([[1.0, 0.0, x], [0.0, 1.0, y]])
    }

    /// The `(tx, ty)` offset of this transform.
    pub fn translation(&self) -> (f64, f64) {
        (self.0[0][2], self.0[1][2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Emoji,
    Video,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMode {
    PassThrough,
    Normal,
    Darken,
    Multiply,
    LinearBurn,
    ColorBurn,
    Lighten,
    Screen,
    LinearDodge,
    ColorDodge,
    Overlay,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

/// A fill or stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: PaintType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<BlendMode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gradient_handle_positions: Vec<Vector>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gradient_stops: Vec<ColorStop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    InnerShadow,
    DropShadow,
    LayerBlur,
    BackgroundBlur,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: EffectType,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
}

fn visible_by_default() -> bool {
    true
}

/// Typography of a TEXT node or style override.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_post_script_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_defaults_alpha_when_missing() {
        let c: Color = serde_json::from_str(r#"{"r":1,"g":0.5,"b":0}"#).unwrap();
        assert_eq!(c, Color::new(1.0, 0.5, 0.0, 1.0));
    }

    #[test]
    fn color_converts_through_palette() {
        let c = Color::new(0.2, 0.4, 0.6, 0.8);
        let srgba: Srgba<f64> = c.into();
        assert_eq!(srgba.red, 0.2);
        assert_eq!(srgba.alpha, 0.8);
        assert_eq!(Color::from(srgba), c);
    }

    #[test]
    fn unknown_paint_type_is_tolerated() {
        let p: Paint = serde_json::from_str(r#"{"type":"PATTERN","opacity":0.5}"#).unwrap();
        assert_eq!(p.paint_type, PaintType::Unknown);
        assert_eq!(p.opacity, Some(0.5));
    }

    #[test]
    fn transform_exposes_translation() {
        let t: Transform = serde_json::from_str("[[1,0,12.5],[0,1,-4]]").unwrap();
        assert_eq!(t.translation(), (12.5, -4.0));
        assert_eq!(Transform::IDENTITY.translation(), (0.0, 0.0));
    }
}
