//! Decode a DEM tile from disk and report what the hillshade pipeline sees.
//!
//! The tile is loaded through the same cache the renderer uses, then its
//! stats, a few decoded samples and both uniform bundles are logged.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use demtile::{
    CanonicalTileId, EdgeFill, ElevationRange, ElevationTileCache, HillshadePaint,
    IlluminationAnchor, MapTransform, OverscaledTileId, PixelSource, RawTile, TileDecoder,
    prepare_uniforms, shade_uniforms,
};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "demtile-inspect", version, about)]
struct Args {
    /// Terrarium-encoded tile image (PNG or WebP), 512 or 514 px tall, with
    /// the stats band appended as the last column.
    path: PathBuf,

    /// Tile zoom level.
    #[arg(long, default_value_t = 0)]
    z: u8,

    /// Tile column.
    #[arg(long, default_value_t = 0)]
    x: u32,

    /// Tile row.
    #[arg(long, default_value_t = 0)]
    y: u32,

    /// Grid coordinate to decode, as `x,y` in `[-1, 512]`. Repeatable.
    #[arg(long = "sample", value_parser = parse_coordinate, allow_hyphen_values = true)]
    samples: Vec<(i32, i32)>,

    /// Illumination direction in degrees.
    #[arg(long, default_value_t = 335.0)]
    direction: f32,

    /// What the illumination direction is relative to.
    #[arg(long, value_enum, default_value_t = Anchor::Viewport)]
    anchor: Anchor,

    /// Map bearing in degrees.
    #[arg(long, default_value_t = 0.0)]
    bearing: f32,

    /// Fill the synthesized ring of unpadded tiles with zeros instead of
    /// repeating edge pixels.
    #[arg(long)]
    zero_fill: bool,

    /// Lower elevation bound in meters, overriding the cached tiles' stats.
    #[arg(long, requires = "elev_max", allow_hyphen_values = true)]
    elev_min: Option<f32>,

    /// Upper elevation bound in meters, overriding the cached tiles' stats.
    #[arg(long, requires = "elev_min", allow_hyphen_values = true)]
    elev_max: Option<f32>,
}

impl Args {
    /// Elevation range given on the command line, if any.
    fn elevation_override(&self) -> Option<ElevationRange> {
        self.elev_min
            .zip(self.elev_max)
            .map(|(min, max)| ElevationRange::new(min, max))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Anchor {
    Map,
    Viewport,
}

impl From<Anchor> for IlluminationAnchor {
    fn from(anchor: Anchor) -> Self {
        match anchor {
            Anchor::Map => IlluminationAnchor::Map,
            Anchor::Viewport => IlluminationAnchor::Viewport,
        }
    }
}

/// Parse an `x,y` coordinate pair.
fn parse_coordinate(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{s}'"))?;
    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid x: {e}"))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid y: {e}"))?;
    Ok((x, y))
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&args.path)?;
    tracing::info!(path = %args.path.display(), bytes = bytes.len(), "read tile");

    let edge_fill = if args.zero_fill {
        EdgeFill::Zero
    } else {
        EdgeFill::Replicate
    };
    let cache = ElevationTileCache::with_decoder(TileDecoder::new().with_edge_fill(edge_fill));

    let canonical = CanonicalTileId::new(args.z, args.x, args.y);
    let tile_id = OverscaledTileId::new(args.z, 0, canonical);
    let grid = cache
        .load(canonical.to_string(), RawTile::new(PixelSource::RawBitmap(bytes)))
        .await?;

    tracing::info!(
        tile = %tile_id,
        stride = grid.stride(),
        dim = grid.dim(),
        min = grid.min_elevation(),
        max = grid.max_elevation(),
        "decoded"
    );
    tracing::info!(unpack = ?grid.unpack_vector(), "unpack vector");

    for &(x, y) in &args.samples {
        match grid.get(x, y) {
            Ok(elevation) => tracing::info!(x, y, elevation, "sample"),
            Err(e) => tracing::warn!(x, y, "{e}"),
        }
    }

    let mut transform =
        MapTransform::new(f64::from(args.z)).with_angle(args.bearing.to_radians());
    let range = args
        .elevation_override()
        .or_else(|| cache.elevation_range())
        .unwrap_or_else(|| ElevationRange::of_grid(&grid));
    tracing::info!(zoom = transform.zoom(), min = range.min, max = range.max, "view");
    transform.set_elevation_range(range);
    let paint = HillshadePaint {
        illumination_direction: args.direction,
        illumination_anchor: args.anchor.into(),
        ..HillshadePaint::default()
    };

    for (name, value) in prepare_uniforms(&tile_id, &grid).entries() {
        tracing::info!(pass = "prepare", name, ?value);
    }
    for (name, value) in shade_uniforms(&transform, &tile_id, None, &paint).entries() {
        tracing::info!(pass = "shade", name, ?value);
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
