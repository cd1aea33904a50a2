//! Uniform bundles consumed by the hillshade shaders.
//!
//! Field names are part of the contract with the shader sources. The shader
//! binding layer looks values up by name, but [`HillshadeUniforms::entries`]
//! and [`HillshadePrepareUniforms::entries`] still list them in a fixed order
//! so bundles can be diffed and logged deterministically.

use glam::{Mat4, Vec2, Vec4};

/// A single uniform value.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Color(Vec4),
    Mat4(Mat4),
    /// A `vec4` array, uploaded as packed floats.
    Array4(Vec<Vec4>),
}

/// Uniforms for the prepare pass that renders a tile's elevation texture
/// into a slope/aspect texture.
#[derive(Debug, Clone, PartialEq)]
pub struct HillshadePrepareUniforms {
    pub matrix: Mat4,
    /// Texture unit of the raw elevation texture.
    pub image: i32,
    pub dimension: Vec2,
    pub zoom: f32,
}

impl HillshadePrepareUniforms {
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, UniformValue)> {
        vec![
            ("u_matrix", UniformValue::Mat4(self.matrix)),
            ("u_image", UniformValue::Int(self.image)),
            ("u_dimension", UniformValue::Vec2(self.dimension)),
            ("u_zoom", UniformValue::Float(self.zoom)),
        ]
    }
}

/// Uniforms for the final shaded render of one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct HillshadeUniforms {
    pub matrix: Mat4,
    /// Texture unit of the prepared slope texture.
    pub image: i32,
    pub lat_range: Vec2,
    /// `(exaggeration, azimuth in radians)`.
    pub light: Vec2,
    pub shadow: Vec4,
    pub highlight: Vec4,
    pub accent: Vec4,
    /// Texture unit of the raw elevation texture.
    pub image_elev: i32,
    pub ramp: Vec<Vec4>,
    pub exag: f32,
    pub zenith: f32,
    pub azimuth: f32,
    pub mix_slope: f32,
    pub mix_shade: f32,
    pub mix_color: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub exposure: f32,
    pub saturation: f32,
    pub vibrance: f32,
    pub hue: f32,
    pub debug_class: i32,
    pub autoscale: i32,
    pub elev_min: f32,
    pub elev_max: f32,
}

impl HillshadeUniforms {
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, UniformValue)> {
        use UniformValue::{Array4, Color, Float, Int};

        vec![
            ("u_matrix", UniformValue::Mat4(self.matrix)),
            ("u_image", Int(self.image)),
            ("u_latrange", UniformValue::Vec2(self.lat_range)),
            ("u_light", UniformValue::Vec2(self.light)),
            ("u_shadow", Color(self.shadow)),
            ("u_highlight", Color(self.highlight)),
            ("u_accent", Color(self.accent)),
            ("u_image_elev", Int(self.image_elev)),
            ("u_ramp", Array4(self.ramp.clone())),
            ("u_exag", Float(self.exag)),
            ("u_zenith", Float(self.zenith)),
            ("u_azimuth", Float(self.azimuth)),
            ("u_mixslope", Float(self.mix_slope)),
            ("u_mixshade", Float(self.mix_shade)),
            ("u_mixcolor", Float(self.mix_color)),
            ("u_brightness", Float(self.brightness)),
            ("u_contrast", Float(self.contrast)),
            ("u_exposure", Float(self.exposure)),
            ("u_saturation", Float(self.saturation)),
            ("u_vibrance", Float(self.vibrance)),
            ("u_hue", Float(self.hue)),
            ("u_debugclass", Int(self.debug_class)),
            ("u_autoscale", Int(self.autoscale)),
            ("u_elevmin", Float(self.elev_min)),
            ("u_elevmax", Float(self.elev_max)),
        ]
    }
}
