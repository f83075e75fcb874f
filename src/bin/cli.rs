use std::fmt::Write;
use std::fs::File;
use std::path::{PathBuf, absolute};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use clap::builder::styling::Styles;
use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum, crate_version};
use clap_cargo::style::{ERROR, HEADER, INVALID, LITERAL, PLACEHOLDER, USAGE, VALID};
use strum::Display;
use sys_locale::get_locale;
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug, info, instrument, warn};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry, fmt};
use tripmiles::measure::{Degrees, Kilometers, Miles};
use tripmiles::snapshot::TripSnapshot;
use tripmiles::{GeoPoint, HomeLocation, TravelStats, TripMilesError};

pub const CLAP_STYLING: Styles = Styles::styled()
    .header(HEADER)
    .usage(USAGE)
    .literal(LITERAL)
    .placeholder(PLACEHOLDER)
    .error(ERROR)
    .valid(VALID)
    .invalid(INVALID);

static LONG_VERSION: LazyLock<String> =
    LazyLock::new(|| format!("{} (rustc {})", crate_version!(), env!("RUSTC_VERSION")));

/// Estimate travel routes and mileage from a trip snapshot
///
/// Given a JSON snapshot of trips and an optional home location, orders the
/// trips chronologically, works out when the traveler went home in between,
/// and totals the great-circle distance covered so far and planned overall.
#[derive(Parser)]
#[command(
    name = "tripmiles",
    version,
    long_version = LONG_VERSION.as_str(),
    about,
    color = ColorChoice::Auto,
    styles = CLAP_STYLING,
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,

    /// Configure diagnostic logging level
    ///
    /// Set to DEBUG to see a performance summary following execution.
    #[clap(long, short = 'L', default_value_t = Level::ERROR)]
    log_level: Level,

    /// Log to a file
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// The unit of distance used in output on the command line.
    ///
    /// If unspecified, this will default to either km or mi based on your
    /// system locale.
    #[clap(long, short = 'u', default_value_t = DistUnit::Autodetect)]
    distance_unit: DistUnit,
}

#[derive(Copy, Clone, Display, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
#[clap(rename_all = "kebab-case")]
enum DistUnit {
    Autodetect,
    Km,
    Mi,
}

impl DistUnit {
    fn get(self) -> DistUnit {
        match self {
            Self::Autodetect => Self::auto_detect(),
            _ => self,
        }
    }

    fn auto_detect() -> DistUnit {
        let locale = get_locale().unwrap_or_else(|| String::from("en-US"));
        match locale.as_str() {
            "en-US" | "en-GB" => Self::Mi,
            _ => Self::Km,
        }
    }
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    /// JSON trip snapshot path
    input: PathBuf,

    /// Home latitude, overriding any home location in the snapshot
    #[clap(long, requires = "home_lon", allow_hyphen_values = true)]
    home_lat: Option<f64>,

    /// Home longitude, overriding any home location in the snapshot
    #[clap(long, requires = "home_lat", allow_hyphen_values = true)]
    home_lon: Option<f64>,

    /// Label for the home location given with --home-lat and --home-lon
    #[clap(long)]
    home_label: Option<String>,

    /// Ignore any home location and chain destinations directly
    #[clap(long, action, conflicts_with_all = ["home_lat", "home_lon"])]
    no_home: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print traveled and planned distances
    ///
    /// Traveled distance covers completed and in-progress trips; planned
    /// distance covers every trip with a known destination.
    Summary(SnapshotArgs),

    /// Print map lines and markers as JSON
    ///
    /// Emits one line per route leg with its style, one marker per geocoded
    /// trip, and a marker for the home location when there is one.
    Map(SnapshotArgs),
}

fn load_snapshot(args: &SnapshotArgs) -> Result<(TripSnapshot, Option<HomeLocation>)> {
    info!("Reading snapshot input file: {:?}", absolute(&args.input)?);

    let res = TripSnapshot::from_path(&args.input);
    let snapshot = match &res {
        Err(TripMilesError::Io(_)) => res.context(
            "Opening the snapshot <INPUT> file. Check that it exists and can be accessed.",
        ),
        Err(TripMilesError::Json(_)) => {
            res.context("The <INPUT> is not a valid trip snapshot. Check that it is correct.")
        }
        _ => res.map_err(anyhow::Error::from),
    }?;

    let home = match (args.no_home, args.home_lat, args.home_lon) {
        (true, _, _) => None,
        (false, Some(lat), Some(lon)) => Some(HomeLocation::new(
            GeoPoint::new(Degrees(lat), Degrees(lon))
                .context("The home coordinates are out of range")?,
            args.home_label.clone(),
        )),
        _ => snapshot.home.clone(),
    };
    if home.is_none() {
        warn!("No home location set; destinations will be chained directly");
    }
    Ok((snapshot, home))
}

#[instrument(level = "trace", skip_all)]
fn summary_cmd(args: &Cli, sub_args: &SnapshotArgs) -> Result<String> {
    debug!("summary args: {:?}", sub_args);
    let (snapshot, home) = load_snapshot(sub_args)?;
    let stats = tripmiles::summarize(&snapshot.trips, home.as_ref());

    match args.distance_unit.get() {
        DistUnit::Km => generate_report::<Kilometers<f64>>(&stats, home.as_ref()),
        _ => generate_report::<Miles<f64>>(&stats, home.as_ref()),
    }
}

fn generate_report<T>(stats: &TravelStats, home: Option<&HomeLocation>) -> Result<String>
where
    T: From<Kilometers<f64>> + std::fmt::Display,
{
    let mut r = tripmiles::report::travel_report::<T>(stats)?;
    if let Some(label) = home.and_then(|h| h.label.as_deref()) {
        writeln!(&mut r, "\nHome: {label}")?;
    }
    Ok(r)
}

#[instrument(level = "trace", skip_all)]
fn map_cmd(sub_args: &SnapshotArgs) -> Result<String> {
    debug!("map args: {:?}", sub_args);
    let (snapshot, home) = load_snapshot(sub_args)?;
    let layers = tripmiles::map_layers(&snapshot.trips, home.as_ref());
    let mut r = serde_json::to_string_pretty(&layers).context("Serializing map layers")?;
    r.push('\n');
    Ok(r)
}

fn main() -> Result<()> {
    // Intentionally avoid wrapping argument parsing errors in anyhow::Result so
    // we preserve Clap's pretty formatting of usage info.
    let args = Cli::parse();

    let log_w: Box<dyn std::io::Write + Send> = match &args.log_file {
        Some(path) => Box::new(File::create(path).context("Creating the log file")?),
        None => Box::new(std::io::stderr()),
    };
    let (appender, _guard) = tracing_appender::non_blocking(log_w);

    // Enable the TRACE-level span tree layer for fmt logging level DEBUG.
    let fmt_layer = fmt::Layer::new()
        .with_writer(appender)
        .with_ansi(args.log_file.is_none())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
        .with_filter(LevelFilter::from_level(args.log_level));
    if args.log_level >= Level::DEBUG {
        let span_tree_layer = tracing_span_tree::SpanTree::default().aggregate(true);
        tracing::subscriber::set_global_default(
            Registry::default().with(fmt_layer).with(span_tree_layer),
        )?;
    } else {
        tracing::subscriber::set_global_default(Registry::default().with(fmt_layer))?;
    }

    debug!("tripmiles {}", clap::crate_version!());

    let output = match &args.cmd {
        Commands::Summary(sub_args) => summary_cmd(&args, sub_args),
        Commands::Map(sub_args) => map_cmd(sub_args),
    }?;

    print!("{output}");
    Ok(())
}
