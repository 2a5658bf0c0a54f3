mod settings;

use std::path::PathBuf;
use std::process;

use clap::Parser;

use facetrack_core::pipeline::overlay_timeline_use_case::{
    OverlayTimelineUseCase, TimeRange, TimelineEntry,
};
use facetrack_core::pipeline::timeline_logger::LogTimelineLogger;
use facetrack_core::tracking::domain::box_interpolator::TailPolicy;
use facetrack_core::tracking::domain::face_track_source::FaceTrackSource;
use facetrack_core::tracking::domain::track_validator::ValidationMode;
use facetrack_core::tracking::infrastructure::http_api_source::HttpApiSource;
use facetrack_core::tracking::infrastructure::json_file_source::JsonFileSource;

use settings::Settings;

/// Asset label used when tracks come from a local file.
const LOCAL_ASSET: &str = "local";

/// Show which tracked faces are on screen at given playback times.
#[derive(Parser)]
#[command(name = "facetrack")]
struct Cli {
    /// Face tracks JSON file (a saved face-tracks API response).
    input: Option<PathBuf>,

    /// Asset to fetch face tracks for from the archive API.
    #[arg(long)]
    asset: Option<String>,

    /// Archive API base URL (overrides saved settings).
    #[arg(long)]
    api_url: Option<String>,

    /// Playback positions in seconds (comma-separated).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    at: Option<Vec<f64>>,

    /// Start of a sampled range, in seconds.
    #[arg(long, allow_hyphen_values = true)]
    from: Option<f64>,

    /// End of a sampled range, in seconds (inclusive).
    #[arg(long, allow_hyphen_values = true)]
    to: Option<f64>,

    /// Sampling step for --from/--to, in seconds.
    #[arg(long, default_value = "1.0")]
    step: f64,

    /// Output format: text or json.
    #[arg(long, default_value = "text")]
    format: String,

    /// Past the last sample of a track: clamp (hold last box) or wrap (legacy).
    #[arg(long)]
    tail: Option<String>,

    /// Stop scanning tracks that start this many ms after the query time.
    #[arg(long)]
    lookahead_ms: Option<i64>,

    /// Reject track data with ordering or bounds problems.
    #[arg(long)]
    strict: bool,

    /// Persist --api-url, --tail, --lookahead-ms and --strict as defaults.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let settings = merge_settings(Settings::load(), &cli)?;
    if cli.save_settings {
        let path = settings.save()?;
        log::info!("Saved settings to {}", path.display());
    }

    let (source, asset_id) = build_source(&cli, &settings)?;
    let mut use_case = OverlayTimelineUseCase::new(
        source,
        settings.tracker_config(),
        settings.validation,
        Box::new(LogTimelineLogger::default()),
    );

    let timeline = match (&cli.at, cli.from, cli.to) {
        (Some(times), _, _) => use_case.execute_at(&asset_id, times)?,
        (None, Some(from), Some(to)) => {
            use_case.execute(&asset_id, TimeRange::new(from, to, cli.step)?)?
        }
        _ => return Err("Give playback times with --at, or a range with --from and --to".into()),
    };

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&timeline)?),
        _ => print!("{}", format_text(&timeline)),
    }
    Ok(())
}

fn merge_settings(mut settings: Settings, cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    if let Some(url) = &cli.api_url {
        settings.api_url = url.clone();
    }
    if let Some(tail) = &cli.tail {
        settings.tail = tail.parse::<TailPolicy>()?;
    }
    if let Some(lookahead) = cli.lookahead_ms {
        settings.lookahead_ms = lookahead;
    }
    if cli.strict {
        settings.validation = ValidationMode::Strict;
    }
    settings.validate()?;
    Ok(settings)
}

fn build_source(
    cli: &Cli,
    settings: &Settings,
) -> Result<(Box<dyn FaceTrackSource>, String), Box<dyn std::error::Error>> {
    if let Some(path) = &cli.input {
        let asset = cli.asset.clone().unwrap_or_else(|| LOCAL_ASSET.to_string());
        return Ok((Box::new(JsonFileSource::new(path)), asset));
    }
    let asset = cli
        .asset
        .clone()
        .ok_or("either an input file or --asset is required")?;
    log::info!("Fetching face tracks from {}", settings.api_url);
    Ok((Box::new(HttpApiSource::new(&settings.api_url)?), asset))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(input) = &cli.input {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
    } else if cli.asset.is_none() {
        return Err("Either an input file or --asset is required".into());
    }
    if cli.at.is_some() && (cli.from.is_some() || cli.to.is_some()) {
        return Err("--at and --from/--to are mutually exclusive".into());
    }
    if cli.at.is_none() && (cli.from.is_none() || cli.to.is_none()) {
        return Err("Give playback times with --at, or a range with --from and --to".into());
    }
    if let Some(times) = &cli.at {
        if let Some(t) = times.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(format!("Playback times must be non-negative, got {t}").into());
        }
    }
    if let Some(t) = [cli.from, cli.to]
        .into_iter()
        .flatten()
        .find(|t| !t.is_finite() || *t < 0.0)
    {
        return Err(format!("Range bounds must be non-negative, got {t}").into());
    }
    if cli.step <= 0.0 {
        return Err(format!("Step must be positive, got {}", cli.step).into());
    }
    if let Some(lookahead) = cli.lookahead_ms {
        if lookahead < 0 {
            return Err(format!("Lookahead must be non-negative, got {lookahead}").into());
        }
    }
    if cli.format != "text" && cli.format != "json" {
        return Err(format!("Format must be 'text' or 'json', got '{}'", cli.format).into());
    }
    Ok(())
}

fn format_text(timeline: &[TimelineEntry]) -> String {
    let mut out = String::new();
    for entry in timeline {
        out.push_str(&format!(
            "{:>9.3}s  {} face(s)\n",
            entry.time,
            entry.faces.len()
        ));
        for face in &entry.faces {
            let b = face.bounding_box;
            out.push_str(&format!(
                "    {}  x={:.1} y={:.1} w={:.1} h={:.1}\n",
                face.id, b.x, b.y, b.width, b.height
            ));
        }
    }
    out
}
