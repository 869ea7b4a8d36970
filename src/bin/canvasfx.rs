use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use canvasfx::{
    AnimationRegistry, CanvasEngine, Category, Clock, DeviceProfile, Difficulty, FilterCriteria,
    FrameRGBA, GalleryConfig, ManualClock, ManualScheduler, ParamValue, Parameters, PixmapPool,
    SortBy, SortOptions, SortOrder, Surface, SurfaceDesc, catalog, seed_from_str,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "canvasfx", version)]
struct Cli {
    /// Gallery config JSON (engine, hover and pool options).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List bundled animations with optional filtering and sorting.
    List(ListArgs),
    /// Render frames of one animation as PNGs on a simulated clock.
    Render(RenderArgs),
    /// Render a thumbnail of every animation, reusing pixel buffers.
    Thumbnails(ThumbnailArgs),
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SortKey {
    Name,
    Category,
    Difficulty,
    CreatedAt,
    UpdatedAt,
}

impl From<SortKey> for SortBy {
    fn from(k: SortKey) -> Self {
        match k {
            SortKey::Name => Self::Name,
            SortKey::Category => Self::Category,
            SortKey::Difficulty => Self::Difficulty,
            SortKey::CreatedAt => Self::CreatedAt,
            SortKey::UpdatedAt => Self::UpdatedAt,
        }
    }
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Only this category.
    #[arg(long)]
    category: Option<String>,

    /// Only this difficulty.
    #[arg(long)]
    difficulty: Option<String>,

    /// Accept entries with any of these tags (repeatable).
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Case-insensitive free-text search.
    #[arg(long)]
    search: Option<String>,

    /// Sort key.
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// Sort descending.
    #[arg(long, default_value_t = false)]
    desc: bool,

    /// Print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Animation id.
    #[arg(long)]
    id: String,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out: PathBuf,

    /// Number of host frame callbacks to drive.
    #[arg(long, default_value_t = 30)]
    frames: u32,

    /// Host frame rate of the simulated clock.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Logical width.
    #[arg(long, default_value_t = 320.0)]
    width: f64,

    /// Logical height.
    #[arg(long, default_value_t = 180.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Speed multiplier (clamped by the engine).
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Seed text, hashed into the `seed` parameter.
    #[arg(long)]
    seed: Option<String>,

    /// Parameter override `key=value` (repeatable).
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, ParamValue)>,

    /// Write only every Nth rendered frame.
    #[arg(long, default_value_t = 1)]
    every: u32,

    /// Classify the simulated device as low-end (30 FPS throttle).
    #[arg(long, default_value_t = false)]
    low_end: bool,
}

#[derive(Parser, Debug)]
struct ThumbnailArgs {
    /// Output directory for `<id>.png` files.
    #[arg(long)]
    out: PathBuf,

    /// Logical thumbnail width.
    #[arg(long, default_value_t = 160.0)]
    width: f64,

    /// Logical thumbnail height.
    #[arg(long, default_value_t = 100.0)]
    height: f64,

    /// Frames to run before capturing.
    #[arg(long, default_value_t = 20)]
    warmup: u32,
}

fn parse_param(raw: &str) -> Result<(String, ParamValue), String> {
    let (k, v) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let k = k.trim();
    if k.is_empty() {
        return Err(format!("empty parameter name in '{raw}'"));
    }
    Ok((k.to_owned(), ParamValue::parse_loose(v)))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("canvasfx=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GalleryConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => GalleryConfig::default(),
    };

    let registry = AnimationRegistry::new();
    catalog::register_builtins(&registry);

    match cli.cmd {
        Command::List(args) => cmd_list(&registry, args),
        Command::Render(args) => cmd_render(&registry, &config, args).await,
        Command::Thumbnails(args) => cmd_thumbnails(&registry, &config, args).await,
    }
}

fn cmd_list(registry: &AnimationRegistry, args: ListArgs) -> anyhow::Result<()> {
    let criteria = FilterCriteria {
        category: args
            .category
            .as_deref()
            .map(str::parse::<Category>)
            .transpose()?,
        difficulty: args
            .difficulty
            .as_deref()
            .map(str::parse::<Difficulty>)
            .transpose()?,
        tags: args.tags,
        search: args.search,
    };
    let mut list = registry.filter(&criteria);
    if let Some(key) = args.sort {
        let order = if args.desc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        list = registry.sort(list, SortOptions::new(key.into(), order));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }
    for m in &list {
        println!(
            "{:<18} {:<10} {:<7} {}",
            m.id, m.category, m.difficulty, m.name
        );
    }
    eprintln!("{} of {} animations", list.len(), registry.count());
    Ok(())
}

fn device(config: &GalleryConfig, low_end: bool) -> DeviceProfile {
    if low_end {
        return DeviceProfile {
            cpu_cores: Some(2),
            ..DeviceProfile::default()
        };
    }
    // A fixed profile keeps renders independent of the machine running the CLI.
    config.engine.device.clone().unwrap_or_else(|| DeviceProfile {
        cpu_cores: Some(8),
        ..DeviceProfile::default()
    })
}

async fn cmd_render(
    registry: &AnimationRegistry,
    config: &GalleryConfig,
    args: RenderArgs,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be finite and > 0"
    );
    let factory = registry
        .get_by_id(&args.id)
        .await
        .with_context(|| format!("animation '{}' is not available", args.id))?;

    let mut opts = config.engine.clone();
    opts.device = Some(device(config, args.low_end));
    let scheduler = ManualScheduler::new();
    let clock = Arc::new(ManualClock::new(0.0));
    let desc = SurfaceDesc::new(args.width, args.height).with_device_pixel_ratio(args.dpr);
    let mut engine = CanvasEngine::new(desc, scheduler.clone(), clock.clone(), opts)?;

    let mut overrides: Parameters = args.params.into_iter().collect();
    if let Some(seed) = &args.seed {
        overrides.insert("seed", (seed_from_str(seed) % 1_000_000) as f64);
    }
    engine.set_parameters(&overrides);
    engine.load_animation(factory.create());
    engine.set_speed(args.speed);
    engine.play();

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;
    let every = args.every.max(1);
    let frame_ms = 1000.0 / args.fps;
    let mut written = 0u32;
    for _ in 0..args.frames {
        if !scheduler.take_pending() {
            break;
        }
        let before = engine.stats().frames_rendered;
        engine.on_frame(clock.now_ms());
        clock.advance(frame_ms);

        let rendered = engine.stats().frames_rendered;
        if rendered > before && (rendered - 1) % u64::from(every) == 0 {
            let frame = engine.snapshot().context("engine has no surface")?;
            let path = args.out.join(format!("frame_{:04}.png", rendered - 1));
            write_png(&path, frame)?;
            written += 1;
        }
    }
    if let Some(err) = engine.last_error() {
        anyhow::bail!("animation '{}' failed: {err}", args.id);
    }

    let stats = engine.stats();
    tracing::info!(
        rendered = stats.frames_rendered,
        dropped = stats.frames_dropped,
        fps = engine.get_fps(),
        "render finished"
    );
    eprintln!("wrote {written} frames to {}", args.out.display());
    Ok(())
}

async fn cmd_thumbnails(
    registry: &AnimationRegistry,
    config: &GalleryConfig,
    args: ThumbnailArgs,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let desc = SurfaceDesc::new(args.width, args.height);
    let px = desc.pixel_size()?;
    let mut pool = PixmapPool::new(config.pool);
    let mut opts = config.engine.clone();
    opts.device = Some(device(config, false));

    for meta in registry.get_all() {
        let Some(factory) = registry.get_by_id(&meta.id).await else {
            tracing::warn!(id = %meta.id, "skipping animation that failed to load");
            continue;
        };
        let surface = Surface::from_pixmap(desc, pool.acquire(px.width as u16, px.height as u16))?;
        let scheduler = ManualScheduler::new();
        let clock = Arc::new(ManualClock::new(0.0));
        let mut engine =
            CanvasEngine::with_surface(surface, scheduler.clone(), clock.clone(), opts.clone());
        engine.load_animation(factory.create());
        engine.play();
        for _ in 0..=args.warmup {
            if !scheduler.take_pending() {
                break;
            }
            engine.on_frame(clock.now_ms());
            clock.advance(1000.0 / 60.0);
        }

        let frame = engine.snapshot().context("engine has no surface")?;
        let path = args.out.join(format!("{}.png", meta.id));
        write_png(&path, frame)?;
        if let Some(surface) = engine.destroy() {
            pool.release(surface.into_pixmap());
        }
        eprintln!("wrote {}", path.display());
    }

    let stats = pool.stats();
    tracing::info!(
        allocated = stats.allocated,
        reused = stats.reused,
        retained = stats.retained,
        "thumbnail pool"
    );
    Ok(())
}

fn write_png(path: &Path, mut frame: FrameRGBA) -> anyhow::Result<()> {
    frame.unpremultiply();
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
