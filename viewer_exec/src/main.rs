//! Main viewer executable entry point.
//!
//! # Architecture
//!
//! The execution consists of:
//!
//!     - Session and logging initialisation
//!     - Parameter loading
//!     - Control registration (scene, pose, scanner, cameras)
//!     - Replay of the recorded log, in order, through the controls
//!     - A final render of the scene into a display list and a 2D plot
//!
//! Usage: `viewer_exec [--params <file>] [--log-level <level>] <log>`

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use sensor_if::replay::LogReader;
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
    time::format_timestamp,
};
use viewer_lib::{params::ViewerExecParams, render::RecordingView, viewer::Viewer};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Parameter file used when none is given, relative to `$VIEWER_SW_ROOT/params`.
const DEFAULT_PARAMS_FILE: &str = "viewer_exec.toml";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Replay a recorded sensor log through the viewer.
#[derive(Debug, StructOpt)]
#[structopt(name = "viewer_exec")]
struct Cli {
    /// Recorded log to replay, one JSON message per line
    #[structopt(parse(from_os_str))]
    log_path: PathBuf,

    /// Parameter file to use instead of $VIEWER_SW_ROOT/params/viewer_exec.toml
    #[structopt(short, long, parse(from_os_str))]
    params: Option<PathBuf>,

    /// Minimum level of logged messages (info, debug or trace)
    #[structopt(short, long, default_value = "info")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let cli = Cli::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("viewer_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(cli.log_level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Sensor Log Viewer\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: ViewerExecParams = match cli.params {
        Some(ref path) => util::params::load_path(path)
            .wrap_err_with(|| format!("Could not load the parameters from {:?}", path))?,
        None => match util::params::load(DEFAULT_PARAMS_FILE) {
            Ok(p) => p,
            Err(e) => {
                warn!("Could not load {} ({}), using defaults", DEFAULT_PARAMS_FILE, e);
                ViewerExecParams::default()
            }
        },
    };

    info!("Exec parameters loaded");

    // ---- MODULE INITIALISATION ----

    info!("Initialising modules...");

    let sw_root = host::get_sw_root().ok();
    let mut viewer = Viewer::new(&params, sw_root.as_deref());

    info!("Module initialisation complete\n");

    // ---- REPLAY ----

    // An unreadable log leaves the viewer empty
    let mut reader = match LogReader::open(&cli.log_path) {
        Ok(r) => r,
        Err(e) => {
            warn!("Could not open the log {:?}: {}", cli.log_path, e);
            LogReader::from_messages(Vec::new())
        }
    };

    match (reader.begin_time(), reader.end_time()) {
        (Some(begin), Some(end)) => info!(
            "Replaying {} messages from {} to {} ({:.3} s)",
            reader.len(),
            format_timestamp(&begin),
            format_timestamp(&end),
            reader.duration_s()
        ),
        _ => info!("Nothing to replay"),
    }

    let summary = viewer.replay(&mut reader);

    info!(
        "Replay complete: {} messages, {} view updates",
        summary.num_messages, summary.num_view_updates
    );

    // ---- RENDER ----

    let mut display_list = RecordingView::new();
    viewer.render(&mut display_list);

    let mut tiles = RecordingView::new();
    viewer.cam_control().render_tiles(&mut tiles);

    let plot = viewer.export_plot();

    info!("Scene rendered:");
    info!("    {} render requests", display_list.len());
    info!("    {} camera tiles", tiles.texts().len());
    info!(
        "    {} plot data blocks, {} plot labels",
        plot.num_data_blocks(),
        plot.num_labels()
    );

    let pose = viewer.pose_control().tracker();
    info!("    {} path points", pose.path().len());
    if let Some(current) = pose.current() {
        info!(
            "    last pose at {}: [{:.3}, {:.3}, {:.3}] m",
            format_timestamp(&current.timestamp),
            current.t_w_i.translation().x,
            current.t_w_i.translation().y,
            current.t_w_i.translation().z
        );
    }

    let scan = viewer.scan_control();
    info!(
        "    {} scanner revolutions, {} points displayed, {} malformed packets",
        scan.aggregator().num_revolutions(),
        scan.aggregator().num_displayed_points(),
        scan.num_malformed_packets()
    );

    info!("End of execution");

    Ok(())
}
