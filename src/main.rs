use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use synthcam::mock::{FixedMotionSensor, ScriptedInterceptor};
use synthcam::{
    shared_plane, CameraCall, CameraRead, HookSet, MonotonicClock, PixelFormat, ResolutionClass,
    SharedPlane, StdFileStore, SynthcamConfig, SyntheticCamera,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "synthcam")]
#[command(about = "Synthetic camera fallback driven against an absent camera driver")]
#[command(version)]
#[command(long_about = "Runs an open/start/read/stop/close session through the synthetic \
camera with every original driver call failing, so each result is fabricated: lifecycle, \
frame ids, timestamps and the still image composited into the frame buffer.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "synthcam.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit")]
    validate_config: bool,

    /// Print the effective configuration and exit
    #[arg(long, help = "Print the effective configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,

    /// Camera to open (0 front, 1 back)
    #[arg(long, default_value_t = 0)]
    device: i32,

    /// Resolution class code (1-6)
    #[arg(long, default_value_t = 4)]
    resolution: u16,

    /// Capture pixel format
    #[arg(long, value_enum, default_value_t = FormatArg::Abgr)]
    format: FormatArg,

    /// Requested frame rate; 0 uses the configured fallback
    #[arg(long, default_value_t = 30)]
    frame_rate: u16,

    /// Number of reads to issue
    #[arg(long, default_value_t = 5)]
    frames: u32,

    /// Delay between reads in milliseconds
    #[arg(long, default_value_t = 33)]
    interval_ms: u64,

    /// Accelerometer sample reported on every read, as X,Y,Z in g
    #[arg(long, value_parser = parse_tilt, value_name = "X,Y,Z")]
    tilt: Option<[f32; 3]>,

    /// Host directory holding the candidate bitmaps
    #[arg(long, value_name = "DIR", default_value = ".")]
    images: PathBuf,

    /// Write the last composited frame as PNG
    #[arg(long, value_name = "PNG")]
    snapshot: Option<PathBuf>,

    /// Print one JSON object per frame
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Abgr,
    Argb,
}

impl From<FormatArg> for PixelFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Abgr => PixelFormat::Abgr,
            FormatArg::Argb => PixelFormat::Argb,
        }
    }
}

fn parse_tilt(value: &str) -> std::result::Result<[f32; 3], String> {
    let parts: Vec<f32> = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| format!("invalid tilt component: {}", e))?;

    <[f32; 3]>::try_from(parts.as_slice())
        .map_err(|_| format!("expected three comma separated values, got {}", parts.len()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args)?;

    info!("Starting synthcam v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    let config = match SynthcamConfig::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if args.print_config {
        print_config(&config)?;
        return Ok(());
    }

    if args.validate_config {
        match config.validate() {
            Ok(()) => {
                info!("Configuration validation successful");
                println!("✓ Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("Configuration validation failed: {}", e);
                eprintln!("✗ Configuration validation failed: {}", e);
                std::process::exit(1);
            }
        }
    }
    config.validate()?;

    run_session(&args, config)
}

/// Drive one full session through the installed hooks
fn run_session(args: &Args, config: SynthcamConfig) -> Result<()> {
    let format = PixelFormat::from(args.format);
    let resolution = ResolutionClass::from_code(args.resolution)
        .with_context(|| format!("unknown resolution class {}", args.resolution))?;
    let (width, height) = resolution.dimensions();

    let files = StdFileStore::new(config.image.directory.clone(), &args.images);
    let builder = SyntheticCamera::builder()
        .config(config)
        .clock(MonotonicClock::new())
        .file_store(files);
    let mut camera = match args.tilt {
        Some(accel) => builder.motion_sensor(FixedMotionSensor::new(accel)),
        None => builder,
    }
    .build()?;

    let mut driver = ScriptedInterceptor::absent_driver();
    let mut hooks = HookSet::install(&mut driver);

    let devnum = args.device;
    let mut info = synthcam::CameraInfo::new(format.code(), resolution.code(), args.frame_rate);
    let result = hooks.dispatch(
        &mut driver,
        &mut camera,
        &mut CameraCall::Open {
            devnum,
            info: Some(&mut info),
        },
    )?;
    info!(
        "Open camera {} -> {} ({}x{} {})",
        devnum, result, info.width, info.height, format
    );
    hooks.dispatch(&mut driver, &mut camera, &mut CameraCall::Start { devnum })?;

    let frame_buffer = shared_plane(width as usize * height as usize * 4);
    for _ in 0..args.frames {
        std::thread::sleep(Duration::from_millis(args.interval_ms));

        let mut read = CameraRead::basic(Some(frame_buffer.clone()));
        let result = hooks.dispatch(
            &mut driver,
            &mut camera,
            &mut CameraCall::Read {
                devnum,
                read: Some(&mut read),
            },
        )?;

        if args.json {
            let line = serde_json::json!({
                "devnum": devnum,
                "result": result,
                "status": read.status,
                "frame": read.frame,
                "timestamp": read.timestamp,
            });
            println!("{}", line);
        } else {
            println!(
                "camera {} frame {:>6} timestamp {:>12} result {:#x}",
                devnum, read.frame, read.timestamp, result
            );
        }
    }

    if let Some(device) = camera.device(devnum) {
        info!("Still image status: {:?}", device.image.status());
    }

    hooks.dispatch(&mut driver, &mut camera, &mut CameraCall::Stop { devnum })?;
    hooks.dispatch(&mut driver, &mut camera, &mut CameraCall::Close { devnum })?;
    hooks.release(&mut driver);

    if let Some(path) = &args.snapshot {
        write_snapshot(path, &frame_buffer, width, height, format)?;
    }

    Ok(())
}

#[cfg(feature = "snapshot")]
fn write_snapshot(
    path: &std::path::Path,
    buffer: &SharedPlane,
    width: u32,
    height: u32,
    format: PixelFormat,
) -> Result<()> {
    let mut rgba = buffer.lock().clone();
    if format == PixelFormat::Argb {
        for texel in rgba.chunks_exact_mut(4) {
            texel.swap(0, 2);
        }
    }

    let image = ::image::RgbaImage::from_raw(width, height, rgba)
        .context("frame buffer does not match the frame size")?;
    image
        .save(path)
        .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    info!("Snapshot written to {}", path.display());
    Ok(())
}

#[cfg(not(feature = "snapshot"))]
fn write_snapshot(
    path: &std::path::Path,
    _buffer: &SharedPlane,
    _width: u32,
    _height: u32,
    _format: PixelFormat,
) -> Result<()> {
    tracing::warn!(
        "Built without the snapshot feature, not writing {}",
        path.display()
    );
    Ok(())
}

fn init_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Determine log level based on flags
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("synthcam={}", log_level)));

    // Logs go to stderr so frame lines on stdout stay machine readable
    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    Ok(())
}

/// Print the effective configuration in TOML format
fn print_config(config: &SynthcamConfig) -> Result<()> {
    println!("# Synthcam Configuration File");
    println!("# Effective configuration after defaults, file and SYNTHCAM_* overrides");
    println!();
    println!("{}", config.to_toml()?);
    Ok(())
}
