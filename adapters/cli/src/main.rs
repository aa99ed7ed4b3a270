#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a tractor across a generated field.

mod ascii;
mod logging;
mod route_transfer;

use std::io;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};
use tractor_plough_core::TractorColor;
use tractor_plough_field::{FieldConfig, FieldGrid};
use tractor_plough_rendering::{Presentation, RenderConfig, RenderingBackend, Scene};
use tractor_plough_session::{Outcome, PloughSession, SessionReport, Tractor};
use tractor_plough_system_pilot::{Pilot, ScriptedPilot, SerpentinePilot};

use crate::{ascii::AsciiBackend, route_transfer::RouteSnapshot};

const WINDOW_TITLE: &str = "Tractor Plough";

#[derive(Debug, Parser)]
#[command(
    name = "tractor-plough",
    version,
    about = "Plough a bordered field by replaying a pilot's path"
)]
struct Cli {
    /// Number of ploughable columns.
    #[arg(long, default_value_t = 20)]
    width: u32,
    /// Number of ploughable rows.
    #[arg(long, default_value_t = 20)]
    height: u32,
    /// Seed for the soil textures; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Rings of grass drawn outside the border.
    #[arg(long, default_value_t = 0)]
    grass_margin: u32,
    /// Paintwork of the tractor.
    #[arg(long, value_enum, default_value_t = ColorArg::Red)]
    color: ColorArg,
    /// Pilot computing the path. Defaults to `route` when a route is given, `serpentine` otherwise.
    #[arg(long, value_enum)]
    pilot: Option<PilotArg>,
    /// Hand-written route such as `0,0 E E S 1,0`.
    #[arg(long, conflicts_with = "route_code")]
    route: Option<String>,
    /// Route transfer string produced by `--export-route`.
    #[arg(long)]
    route_code: Option<String>,
    /// Print the pilot's route as a transfer string before ploughing.
    #[arg(long)]
    export_route: bool,
    /// Abort when the pilot emits more moves than this.
    #[arg(long)]
    max_moves: Option<usize>,
    /// Draw the field after every step instead of only at the end.
    #[arg(long, conflicts_with = "json")]
    frames: bool,
    /// Print the session report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    Red,
    Blue,
    Green,
    Yellow,
}

impl From<ColorArg> for TractorColor {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Red => Self::Red,
            ColorArg::Blue => Self::Blue,
            ColorArg::Green => Self::Green,
            ColorArg::Yellow => Self::Yellow,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PilotArg {
    /// Sweep the field row by row with absolute destinations.
    Serpentine,
    /// Sweep the field row by row with relative steps.
    Steps,
    /// Replay `--route` or `--route-code`.
    Route,
}

/// Entry point for the Tractor Plough command-line interface.
fn main() {
    logging::init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = FieldConfig::new(cli.width, cli.height).with_grass_margin(cli.grass_margin);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    let field = FieldGrid::generate_with(config).context("failed to generate field")?;
    info!(
        width = field.width(),
        height = field.height(),
        seed = field.seed(),
        "field ready"
    );

    let mut pilot = select_pilot(&cli, &field)?;
    let moves = pilot.compute_moves(&field.interior_view());
    if cli.export_route {
        let snapshot = RouteSnapshot {
            columns: field.width(),
            rows: field.height(),
            moves: moves.clone(),
        };
        println!("{}", snapshot.encode().context("failed to encode route")?);
    }

    let seed = field.seed();
    let mut session = PloughSession::new(field, Tractor::at_origin(cli.color.into()), moves);
    if let Some(limit) = cli.max_moves {
        session = session.with_move_limit(limit);
    }

    let render_config = RenderConfig::default();
    let stdout = io::stdout();
    let mut backend = AsciiBackend::new(stdout.lock());
    let mut events = Vec::new();

    let report = if cli.frames {
        loop {
            present(&mut backend, &session, &render_config)?;
            if let Some(report) = session.report() {
                break report;
            }
            let _ = session.step(&mut events);
        }
    } else {
        let report = session.run(&mut events);
        if !cli.json {
            present(&mut backend, &session, &render_config)?;
        }
        report
    };

    for event in &events {
        debug!(?event, "session event");
    }

    print_report(&report, seed, cli.json)
}

fn select_pilot(cli: &Cli, field: &FieldGrid) -> Result<Box<dyn Pilot>> {
    let has_route = cli.route.is_some() || cli.route_code.is_some();
    let kind = match cli.pilot {
        Some(kind) => kind,
        None if has_route => PilotArg::Route,
        None => PilotArg::Serpentine,
    };

    match kind {
        PilotArg::Serpentine | PilotArg::Steps if has_route => {
            bail!("--route and --route-code can only be used with --pilot route")
        }
        PilotArg::Serpentine => Ok(Box::new(SerpentinePilot::new())),
        PilotArg::Steps => Ok(Box::new(SerpentinePilot::steps())),
        PilotArg::Route => {
            if let Some(route) = &cli.route {
                let pilot = ScriptedPilot::from_route(route).context("failed to parse --route")?;
                return Ok(Box::new(pilot));
            }
            let Some(code) = &cli.route_code else {
                bail!("--pilot route requires --route or --route-code");
            };
            let snapshot = RouteSnapshot::decode(code).context("failed to decode --route-code")?;
            if (snapshot.columns, snapshot.rows) != (field.width(), field.height()) {
                warn!(
                    route_columns = snapshot.columns,
                    route_rows = snapshot.rows,
                    field_columns = field.width(),
                    field_rows = field.height(),
                    "route was computed for a field of different size"
                );
            }
            Ok(Box::new(ScriptedPilot::new(snapshot.moves)))
        }
    }
}

fn present<B: RenderingBackend>(
    backend: &mut B,
    session: &PloughSession,
    config: &RenderConfig,
) -> Result<()> {
    let scene = Scene::capture(session, config);
    backend
        .present(&Presentation::new(WINDOW_TITLE, scene))
        .context("failed to render field")
}

fn print_report(report: &SessionReport, seed: u64, json: bool) -> Result<()> {
    if json {
        let payload = serde_json::to_string_pretty(report).context("serialize report")?;
        println!("{payload}");
        return Ok(());
    }

    let outcome = match report.final_state {
        Outcome::Completed => "completed",
        Outcome::Aborted => "aborted",
    };
    println!(
        "score: {} ({} of {} cells ploughed, {outcome})",
        report.score, report.ploughed_cell_count, report.total_interior_cells
    );
    if let Some(reason) = &report.reason {
        println!("reason: {reason}");
    }
    println!("seed: {seed}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tractor-plough").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    fn field() -> FieldGrid {
        FieldGrid::generate_with(FieldConfig::new(3, 3).with_seed(1)).expect("valid")
    }

    #[test]
    fn defaults_match_the_classic_field() {
        let cli = parse(&[]);
        assert_eq!((cli.width, cli.height), (20, 20));
        assert_eq!(cli.grass_margin, 0);
        assert_eq!(cli.color, ColorArg::Red);
        assert!(cli.pilot.is_none());
    }

    #[test]
    fn route_implies_scripted_pilot() {
        let cli = parse(&["--route", "0,0 E"]);
        let field = field();
        let mut pilot = select_pilot(&cli, &field).expect("route parses");
        assert_eq!(pilot.compute_moves(&field.interior_view()).len(), 2);
    }

    #[test]
    fn route_conflicts_with_sweeping_pilots() {
        let cli = parse(&["--pilot", "steps", "--route", "0,0"]);
        assert!(select_pilot(&cli, &field()).is_err());
    }

    #[test]
    fn route_pilot_requires_a_route() {
        let cli = parse(&["--pilot", "route"]);
        assert!(select_pilot(&cli, &field()).is_err());
    }

    #[test]
    fn frames_cannot_be_mixed_with_json_output() {
        let result = Cli::try_parse_from(["tractor-plough", "--frames", "--json"]);
        assert!(result.is_err(), "frames would precede the JSON report on stdout");
        assert!(parse(&["--frames"]).frames);
        assert!(parse(&["--json"]).json);
    }

    #[test]
    fn route_and_route_code_are_exclusive() {
        let result = Cli::try_parse_from(["tractor-plough", "--route", "0,0", "--route-code", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn exported_route_replays_the_same_path() {
        let field = field();
        let moves = SerpentinePilot::steps().compute_moves(&field.interior_view());
        let code = RouteSnapshot {
            columns: 3,
            rows: 3,
            moves: moves.clone(),
        }
        .encode()
        .expect("route encodes");

        let cli = parse(&["--route-code", code.as_str()]);
        let mut pilot = select_pilot(&cli, &field).expect("code decodes");
        assert_eq!(pilot.compute_moves(&field.interior_view()), moves);
    }

    #[test]
    fn colors_map_onto_tractor_paintwork() {
        assert_eq!(TractorColor::from(ColorArg::Yellow), TractorColor::Yellow);
        assert_eq!(TractorColor::from(ColorArg::Blue).name(), "blue");
    }
}
