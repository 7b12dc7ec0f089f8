/// Pre/post heightfield converter main entry point
mod converter;
mod dds_writer;
mod manifest;

use clap::Parser;
use constants::terrain::{DEMO_QUERY_END, DEMO_QUERY_START};
use converter::{HeightfieldConverter, QueryRequest};
use glam::Vec2;
use heightfield_engine::TerrainConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "heightfield-pre-processing",
    version,
    about = "Build terrain meshes, surface distance paths and a change map from pre/post elevation grids"
)]
struct Opts {
    /// Raw pre-event elevation grid (width * height bytes)
    pre: PathBuf,

    /// Raw post-event elevation grid (width * height bytes)
    post: PathBuf,

    /// JSON terrain config; command-line values override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory (default: directory of the pre-event file)
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Query start in grid coordinates, "x,y"
    #[arg(long, value_parser = parse_point)]
    start: Option<Vec2>,

    /// Query end in grid coordinates, "x,y"
    #[arg(long, value_parser = parse_point)]
    end: Option<Vec2>,

    /// Integration step in grid units
    #[arg(long)]
    dh: Option<f32>,
}

fn parse_point(text: &str) -> Result<Vec2, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {:?}", text))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x {:?}: {}", x, e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y {:?}: {}", y, e))?;
    Ok(Vec2::new(x, y))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opts = Opts::parse();

    let mut config = match &opts.config {
        Some(path) => TerrainConfig::load(path)?,
        None => TerrainConfig::default(),
    };
    if let Some(width) = opts.width {
        config.width = width;
    }
    if let Some(height) = opts.height {
        config.height = height;
    }
    config.validate()?;

    let query = QueryRequest {
        start: opts
            .start
            .unwrap_or(Vec2::new(DEMO_QUERY_START.0 as f32, DEMO_QUERY_START.1 as f32)),
        end: opts
            .end
            .unwrap_or(Vec2::new(DEMO_QUERY_END.0 as f32, DEMO_QUERY_END.1 as f32)),
        dh: opts.dh.unwrap_or(config.dh),
    };

    let converter = HeightfieldConverter::new(&opts.pre, &opts.post, opts.out.as_deref(), config)?;
    converter.convert(&query)?;

    Ok(())
}
