use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use glam::Vec2;
use tracing::Level;

use gridcast::convert::{convert_file, format_pixel};
use gridcast::fov::{FieldOfView, SceneConfig, cast_fan, demo_scene, fan_label};
use gridcast::raycast::{cast_ray, raycast_dda};
use gridcast::{OccupancyGrid, Ray2, load_map};

#[derive(Parser, Debug)]
#[command(name = "gridcast", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an image as one 12-bit hex pixel per line.
    Convert(ConvertArgs),
    /// March a single ray and print where it stopped.
    Cast(CastArgs),
    /// Cast a field-of-view fan and print distances and wall heights.
    Fan(FanArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input image (any format the `image` crate decodes).
    input: PathBuf,
    /// Output text file.
    output: PathBuf,
}

#[derive(Args, Debug)]
struct MapArgs {
    /// YAML map file. Defaults to the built-in demo map.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Origin x in world units. Defaults to the map's player cell.
    #[arg(long, requires = "y", allow_negative_numbers = true)]
    x: Option<f32>,

    /// Origin y in world units.
    #[arg(long, requires = "x", allow_negative_numbers = true)]
    y: Option<f32>,
}

#[derive(Args, Debug)]
struct CastArgs {
    #[command(flatten)]
    map: MapArgs,

    /// Ray angle in degrees, counter-clockwise from +x.
    #[arg(long, allow_negative_numbers = true)]
    angle: f32,

    #[arg(long)]
    max_dist: Option<f32>,

    #[arg(long)]
    step_size: Option<f32>,

    /// Normalize the direction before stepping.
    #[arg(long)]
    normalize: bool,
}

#[derive(Args, Debug)]
struct FanArgs {
    #[command(flatten)]
    map: MapArgs,

    /// View direction in degrees.
    #[arg(long, default_value_t = 135.0, allow_negative_numbers = true)]
    base_angle: f32,

    /// Field of view in degrees.
    #[arg(long, default_value_t = 75.0)]
    fov: f32,

    /// Number of rays in the fan.
    #[arg(long, default_value_t = 5)]
    rays: usize,
}

struct Scene {
    grid: OccupancyGrid,
    origin: Vec2,
    config: SceneConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Cast(args) => cmd_cast(args),
        Command::Fan(args) => cmd_fan(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let summary = convert_file(&args.input, &args.output).with_context(|| {
        format!(
            "convert '{}' to '{}'",
            args.input.display(),
            args.output.display()
        )
    })?;
    tracing::info!(
        width = summary.width,
        height = summary.height,
        "wrote {} pixels",
        summary.pixel_count()
    );
    println!("{}", format_pixel(summary.first_pixel));
    Ok(())
}

fn load_scene(args: &MapArgs) -> anyhow::Result<Scene> {
    let (grid, player, config) = match &args.map {
        Some(path) => {
            let map = read_map(path)?;
            (map.grid, map.player, map.scene)
        }
        None => {
            let demo = demo_scene()?;
            (demo.grid, Some(demo.origin), SceneConfig::default())
        }
    };

    let origin = match (args.x, args.y, player) {
        (Some(x), Some(y), _) => Vec2::new(x, y),
        (_, _, Some(player)) => player,
        _ => anyhow::bail!("map has no player cell, pass --x and --y"),
    };

    Ok(Scene {
        grid,
        origin,
        config,
    })
}

fn read_map(path: &Path) -> anyhow::Result<gridcast::loaders::LoadedMap> {
    load_map(path).with_context(|| format!("load map '{}'", path.display()))
}

fn cmd_cast(args: CastArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.map)?;
    let mut march = scene.config.march;
    if let Some(max_dist) = args.max_dist {
        march.max_dist = max_dist;
    }
    if let Some(step_size) = args.step_size {
        march.step_size = step_size;
    }
    march.normalize_direction |= args.normalize;

    let ray = Ray2::from_angle(scene.origin, args.angle.to_radians());
    let outcome = cast_ray(&scene.grid, ray, &march)?;
    let distance = outcome.point.truncate().distance(scene.origin);

    println!(
        "end = ({:.4}, {:.4}) distance = {:.4} steps = {} {}",
        outcome.point.x,
        outcome.point.y,
        distance,
        outcome.steps,
        if outcome.is_hit() { "hit" } else { "exhausted" }
    );

    if let Some(hit) = raycast_dda(&scene.grid, ray.origin, ray.direction, march.max_dist) {
        println!(
            "exact = {:.4} cell = (row {}, column {})",
            hit.hit_distance, hit.cell.y, hit.cell.x
        );
    }
    Ok(())
}

fn cmd_fan(args: FanArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.map)?;
    let fov = FieldOfView::from_degrees(args.base_angle, args.fov, args.rays);
    let samples = cast_fan(&scene.grid, scene.origin, &fov, &scene.config)?;

    for (i, sample) in samples.iter().enumerate() {
        println!("{}", fan_label(i, sample, &scene.config));
    }
    Ok(())
}
