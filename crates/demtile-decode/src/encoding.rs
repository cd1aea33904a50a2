//! Fixed-point encodings used by DEM tiles.
//!
//! Two distinct schemes are in play:
//!
//! - **Terrarium** pixels: `r * 256 + g + b / 256 - 32768`, one sample per
//!   RGBA texel with a resolution of 1/256 m.
//! - **Stats** slots: a 24-bit big-endian integer `n` giving
//!   `(n - 1_100_000) / 100`, covering roughly -11 km to +156 km at 1 cm.
//!
//! Both formulas are shared with the shading stage and must not change
//! independently of it.

/// Coefficients of the terrarium decode formula, in the order the shader
/// consumes them: `[r scale, g scale, b scale, offset]`.
pub const UNPACK_VECTOR: [f32; 4] = [256.0, 1.0, 1.0 / 256.0, 32768.0];

/// Offset subtracted from a decoded terrarium value.
const ELEVATION_OFFSET: f32 = 32768.0;

/// Offset subtracted from the raw 24-bit stats integer.
const STAT_OFFSET: f64 = 1_100_000.0;

/// Divisor applied to the stats integer after the offset.
const STAT_SCALE: f64 = 100.0;

/// Largest 24-bit value.
const MAX_U24: f64 = 16_777_215.0;

/// Decode a terrarium-encoded sample into an elevation in meters.
#[must_use]
pub fn decode_elevation(r: u8, g: u8, b: u8) -> f32 {
    let [r, g, b] = [r, g, b].map(f32::from);
    r * UNPACK_VECTOR[0] + g * UNPACK_VECTOR[1] + b * UNPACK_VECTOR[2] - ELEVATION_OFFSET
}

/// Encode an elevation into a terrarium RGB triple.
///
/// The value is rounded to the nearest 1/256 m and saturates at the
/// encodable range `[-32768, 32768)`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn encode_elevation(elevation: f32) -> [u8; 3] {
    let scaled = ((f64::from(elevation) + f64::from(ELEVATION_OFFSET)) * 256.0)
        .round()
        .clamp(0.0, MAX_U24) as u32;
    [(scaled >> 16) as u8, (scaled >> 8) as u8, scaled as u8]
}

/// Decode one stats slot from its first three bytes.
#[must_use]
pub fn decode_stat(b0: u8, b1: u8, b2: u8) -> f64 {
    let raw = f64::from(b0) * 65536.0 + f64::from(b1) * 256.0 + f64::from(b2);
    (raw - STAT_OFFSET) / STAT_SCALE
}

/// Encode a value into a stats slot (RGB plus an opaque alpha byte).
///
/// The value is rounded to the nearest centimeter and saturates at the
/// encodable 24-bit range.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn encode_stat(value: f64) -> [u8; 4] {
    let raw = (value * STAT_SCALE + STAT_OFFSET)
        .round()
        .clamp(0.0, MAX_U24) as u32;
    [(raw >> 16) as u8, (raw >> 8) as u8, raw as u8, 255]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_sea_level() {
        // 32768 = 128 * 256, so (128, 0, 0) is exactly zero.
        assert!(decode_elevation(128, 0, 0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_decode_extremes() {
        assert!((decode_elevation(0, 0, 0) - -32768.0).abs() < f32::EPSILON);
        let top = decode_elevation(255, 255, 255);
        assert!((top - (32767.0 + 255.0 / 256.0)).abs() < 1e-3);
    }

    #[test]
    fn test_elevation_round_trip_1000m() {
        let [r, g, b] = encode_elevation(1000.0);
        let decoded = decode_elevation(r, g, b);
        assert!((decoded - 1000.0).abs() <= 1.0 / 256.0);
    }

    #[test]
    fn test_encode_elevation_saturates() {
        assert_eq!(encode_elevation(-40000.0), [0, 0, 0]);
        assert_eq!(encode_elevation(40000.0), [255, 255, 255]);
    }

    #[test]
    fn test_unpack_vector_matches_decode() {
        let (r, g, b) = (130u8, 17u8, 64u8);
        let manual = f32::from(r) * UNPACK_VECTOR[0]
            + f32::from(g) * UNPACK_VECTOR[1]
            + f32::from(b) * UNPACK_VECTOR[2]
            - UNPACK_VECTOR[3];
        assert!((manual - decode_elevation(r, g, b)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_decode_stat_offset() {
        // A raw value of zero sits at the bottom of the range.
        assert!((decode_stat(0, 0, 0) - -11000.0).abs() < 1e-9);

        // 1_100_000 = 0x10C8E0 decodes to zero.
        assert!(decode_stat(0x10, 0xC8, 0xE0).abs() < 1e-9);
    }

    #[test]
    fn test_stat_round_trip() {
        let [b0, b1, b2, a] = encode_stat(4807.25);
        assert_eq!(a, 255);
        assert!((decode_stat(b0, b1, b2) - 4807.25).abs() < 0.005);
    }

    proptest! {
        #[test]
        fn prop_elevation_round_trip(elevation in -32768.0f32..32767.0) {
            let [r, g, b] = encode_elevation(elevation);
            let decoded = decode_elevation(r, g, b);
            prop_assert!((decoded - elevation).abs() <= 1.0 / 256.0);
        }

        #[test]
        fn prop_stat_is_linear_in_raw_value(raw in 0u32..16_777_214) {
            let bytes = |n: u32| [(n >> 16) as u8, (n >> 8) as u8, n as u8];
            let [a0, a1, a2] = bytes(raw);
            let [b0, b1, b2] = bytes(raw + 1);
            let lower = decode_stat(a0, a1, a2);
            let upper = decode_stat(b0, b1, b2);
            prop_assert!(upper > lower);
            prop_assert!(((upper - lower) - 0.01).abs() < 1e-6);

            let expected = f64::from(raw) / 100.0 - 11000.0;
            prop_assert!((lower - expected).abs() < 1e-6);
        }
    }
}
