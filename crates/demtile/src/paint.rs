//! Resolved hillshade paint properties.
//!
//! Property storage, zoom interpolation and validation belong to the style
//! layer; this is the already-evaluated snapshot handed to the shading
//! parameter builder each frame.

use glam::Vec4;

/// What the illumination direction is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IlluminationAnchor {
    /// North-relative: the light rotates with the map.
    Map,
    /// Screen-relative: the light stays put while the map rotates.
    #[default]
    Viewport,
}

/// Default color ramp: `(r, g, b, upper elevation in meters)` stops from deep
/// sea floor to high peaks.
const DEFAULT_RAMP: [[f32; 4]; 7] = [
    [0.1, 0.1, 0.5, -5000.0],
    [0.607, 0.937, 0.949, 0.0],
    [0.4, 0.55, 0.3, 1.0],
    [0.9, 0.9, 0.6, 300.0],
    [0.6, 0.4, 0.3, 2000.0],
    [1.0, 1.0, 1.0, 4000.0],
    [1.0, 1.0, 1.0, 20000.0],
];

/// Paint values for one hillshade layer, resolved for the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HillshadePaint {
    /// `hillshade-shadow-color`.
    pub shadow_color: Vec4,
    /// `hillshade-highlight-color`.
    pub highlight_color: Vec4,
    /// `hillshade-accent-color`.
    pub accent_color: Vec4,
    /// `hillshade-exaggeration`.
    pub exaggeration: f32,
    /// `hillshade-illumination-direction`, in degrees.
    pub illumination_direction: f32,
    /// `hillshade-illumination-anchor`.
    pub illumination_anchor: IlluminationAnchor,
    /// Color ramp stops, `(r, g, b, elevation)` each.
    pub ramp: Vec<Vec4>,
    /// Relief exaggeration applied before slope computation.
    pub relief_exaggeration: f32,
    /// Light zenith, in degrees.
    pub zenith: f32,
    /// Light azimuth for the relief pass, in degrees.
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
    /// Debug classification mode; 0 disables it.
    pub debug_class: i32,
    /// Scale the ramp by the view's elevation range instead of fixed stops.
    pub autoscale: bool,
}

impl Default for HillshadePaint {
    fn default() -> Self {
        Self {
            shadow_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            highlight_color: Vec4::ONE,
            accent_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            exaggeration: 0.5,
            illumination_direction: 335.0,
            illumination_anchor: IlluminationAnchor::Viewport,
            ramp: DEFAULT_RAMP.iter().map(|stop| Vec4::from_array(*stop)).collect(),
            relief_exaggeration: 1.0,
            zenith: 45.0,
            azimuth: 315.0,
            mix_slope: 0.0,
            mix_shade: 1.0,
            mix_color: 0.0,
            brightness: 0.0,
            contrast: 0.0,
            exposure: 0.0,
            saturation: 0.0,
            vibrance: 0.0,
            hue: 0.0,
            debug_class: 0,
            autoscale: false,
        }
    }
}
