//! Hillshade shading parameters.
//!
//! Two bundles are produced: [`prepare_uniforms`] once per tile whenever its
//! elevation texture is (re)built, and [`shade_uniforms`] every frame for
//! every visible tile.

use std::sync::LazyLock;

use glam::{Mat4, Vec2, Vec3};

use demtile_decode::ElevationGrid;

use crate::mercator::tile_lat_range;
use crate::paint::{HillshadePaint, IlluminationAnchor};
use crate::tile_id::OverscaledTileId;
use crate::transform::ViewTransform;
use crate::uniforms::{HillshadePrepareUniforms, HillshadeUniforms};

/// Tile coordinate extent.
pub const EXTENT: f32 = 8192.0;

/// Texture unit the prepared slope texture is bound to.
const SLOPE_TEXTURE_UNIT: i32 = 0;

/// Texture unit the raw elevation texture is bound to.
const ELEVATION_TEXTURE_UNIT: i32 = 1;

/// Orthographic projection over one tile with y flipped so the origin is the
/// tile's top-left corner. Identical for every tile.
static PREPARE_MATRIX: LazyLock<Mat4> = LazyLock::new(|| {
    Mat4::orthographic_rh_gl(0.0, EXTENT, -EXTENT, 0.0, 0.0, 1.0)
        * Mat4::from_translation(Vec3::new(0.0, -EXTENT, 0.0))
});

/// Uniforms for rendering `grid` into its prepared texture.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn prepare_uniforms(
    tile_id: &OverscaledTileId,
    grid: &ElevationGrid,
) -> HillshadePrepareUniforms {
    let stride = grid.stride() as f32;
    HillshadePrepareUniforms {
        matrix: *PREPARE_MATRIX,
        image: ELEVATION_TEXTURE_UNIT,
        dimension: Vec2::new(stride, stride),
        zoom: f32::from(tile_id.overscaled_z),
    }
}

/// Illumination direction in radians.
///
/// A viewport-anchored light counter-rotates with the view so it stays fixed
/// on screen.
#[must_use]
pub fn illumination_azimuth(paint: &HillshadePaint, view_angle: f32) -> f32 {
    let azimuth = paint.illumination_direction.to_radians();
    match paint.illumination_anchor {
        IlluminationAnchor::Viewport => azimuth - view_angle,
        IlluminationAnchor::Map => azimuth,
    }
}

/// Uniforms for the shaded render of one tile.
///
/// `pos_matrix` overrides the tile's position matrix; without it the matrix
/// is taken from `transform`, pixel-aligned unless the camera is moving.
/// Elevation bounds come from the transform's aggregate over all visible
/// tiles rather than from this tile's own stats.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn shade_uniforms(
    transform: &impl ViewTransform,
    tile_id: &OverscaledTileId,
    pos_matrix: Option<Mat4>,
    paint: &HillshadePaint,
) -> HillshadeUniforms {
    let matrix = pos_matrix.unwrap_or_else(|| {
        let aligned = !transform.is_moving();
        transform.calculate_pos_matrix(tile_id.to_unwrapped(), aligned)
    });
    let [lat_top, lat_bottom] = tile_lat_range(&tile_id.canonical);
    let azimuth = illumination_azimuth(paint, transform.angle());
    let elevation = transform.elevation_range();

    HillshadeUniforms {
        matrix,
        image: SLOPE_TEXTURE_UNIT,
        lat_range: Vec2::new(lat_top as f32, lat_bottom as f32),
        light: Vec2::new(paint.exaggeration, azimuth),
        shadow: paint.shadow_color,
        highlight: paint.highlight_color,
        accent: paint.accent_color,
        image_elev: ELEVATION_TEXTURE_UNIT,
        ramp: paint.ramp.clone(),
        exag: paint.relief_exaggeration,
        zenith: paint.zenith,
        azimuth: paint.azimuth,
        mix_slope: paint.mix_slope,
        mix_shade: paint.mix_shade,
        mix_color: paint.mix_color,
        brightness: paint.brightness,
        contrast: paint.contrast,
        exposure: paint.exposure,
        saturation: paint.saturation,
        vibrance: paint.vibrance,
        hue: paint.hue,
        debug_class: paint.debug_class,
        autoscale: i32::from(paint.autoscale),
        elev_min: elevation.min,
        elev_max: elevation.max,
    }
}
