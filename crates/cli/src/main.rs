use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use mapfocus::api::{
    active_layer_ids, enumerate_buildings_in_radius, select_nearest_building, BuildingClassifier,
    Coord, FocusCfg, MemorySource, Viewport,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod geojson;

#[derive(Parser)]
#[command(name = "mapfocus")]
#[command(version = mapfocus::VERSION)]
#[command(about = "Pick the building a map tap refers to")]
struct Cmd {
    /// Log every selection stage at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Select the building nearest a coordinate among all features in a file
    Select(SelectArgs),
    /// List every building within a radius, nearest first
    Scan(ScanArgs),
    /// Print the building layer ids detected in a style
    Layers {
        #[arg(long)]
        style: PathBuf,
    },
}

#[derive(Args)]
struct SelectArgs {
    /// GeoJSON FeatureCollection of candidates
    #[arg(long)]
    features: PathBuf,
    /// Reference point as LNG,LAT
    #[arg(long, value_parser = parse_lng_lat, allow_hyphen_values = true)]
    at: Coord,
    /// Grow the selected footprint for highlighting
    #[arg(long)]
    buffer: bool,
    #[arg(long)]
    distance_tie: Option<f64>,
    #[arg(long)]
    area_tie: Option<f64>,
    /// Buffer margin in meters
    #[arg(long)]
    margin: Option<f64>,
}

#[derive(Args)]
struct ScanArgs {
    #[arg(long)]
    features: PathBuf,
    /// Scan center as LNG,LAT
    #[arg(long, value_parser = parse_lng_lat, allow_hyphen_values = true)]
    center: Coord,
    /// Radius in meters
    #[arg(long)]
    radius: f64,
    #[arg(long, default_value_t = 17.0)]
    zoom: f64,
    /// Sub-queries per axis
    #[arg(long)]
    grid: Option<usize>,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    let out = match cmd.action {
        Action::Select(args) => select(&args)?,
        Action::Scan(args) => scan(&args)?,
        Action::Layers { style } => layers(&style)?,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn parse_lng_lat(s: &str) -> Result<Coord> {
    let (lng, lat) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected LNG,LAT, got {s:?}"))?;
    let lng: f64 = lng.trim().parse().with_context(|| format!("longitude {lng:?}"))?;
    let lat: f64 = lat.trim().parse().with_context(|| format!("latitude {lat:?}"))?;
    if !lng.is_finite() || !lat.is_finite() {
        return Err(anyhow!("coordinates must be finite"));
    }
    Ok(Coord::new(lng, lat))
}

fn select(args: &SelectArgs) -> Result<Value> {
    let candidates = geojson::read_features(&args.features)?;
    let mut cfg = FocusCfg::default();
    if let Some(v) = args.distance_tie {
        cfg.distance_tie_m = v;
    }
    if let Some(v) = args.area_tie {
        cfg.area_tie_m2 = v;
    }
    if let Some(v) = args.margin {
        cfg.buffer_margin_m = v;
    }
    tracing::info!(candidates = candidates.len(), at = ?args.at, "select");
    let Some(sel) =
        select_nearest_building(args.at, &candidates, &BuildingClassifier::default(), &cfg)
    else {
        return Ok(Value::Null);
    };
    let feature = if args.buffer {
        sel.feature.buffered(cfg.buffer_margin_m)
    } else {
        sel.feature
    };
    let center = feature.center().unwrap_or(args.at);
    Ok(json!({
        "feature": geojson::to_geojson(&feature)?,
        "distance_m": sel.distance_m,
        "area_m2": sel.area_m2,
        "center": [center.lng, center.lat],
    }))
}

fn scan(args: &ScanArgs) -> Result<Value> {
    let features = geojson::read_features(&args.features)?;
    let mut cfg = FocusCfg::default();
    if let Some(n) = args.grid {
        cfg.scan_grid = n;
    }
    tracing::info!(features = features.len(), radius_m = args.radius, "scan");
    let viewport = Viewport::new(args.center, args.zoom, 1024.0, 1024.0);
    let source = MemorySource::new(features, viewport);
    let found = enumerate_buildings_in_radius(
        args.center,
        args.radius,
        &source,
        &[],
        &BuildingClassifier::default(),
        &cfg,
    )
    .context("radius scan")?;
    let rows = found
        .iter()
        .map(|s| {
            Ok(json!({
                "feature": geojson::to_geojson(&s.feature)?,
                "distance_m": s.distance_m,
                "area_m2": s.area_m2,
                "key": s.key,
            }))
        })
        .collect::<Result<Vec<Value>>>()?;
    Ok(Value::Array(rows))
}

fn layers(style: &std::path::Path) -> Result<Value> {
    let layers = geojson::read_style_layers(style)?;
    Ok(json!(active_layer_ids(&layers)))
}
