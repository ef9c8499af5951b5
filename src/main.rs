//! Floor Physics entry point
//!
//! Runs one scene at its fixed tick rate, or the walker producer that stands
//! in for the lidar tracker. Frames are composed headlessly; a window
//! backend plugs in behind the `Renderer` trait.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use floor_physics::renderer::{DrawStyle, FrameRecorder, draw_scene};
use floor_physics::settings::Settings;
use floor_physics::sim::{SceneKind, SimEvent, SimState, TickInput, tick};
use floor_physics::source::{FeedSource, PointerSource, PositionSource, WalkerCrowd, parse_pair};

#[derive(Parser)]
#[command(name = "floor-physics")]
#[command(about = "Position-driven floor projection simulations", long_about = None)]
struct Cli {
    /// Settings JSON file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    /// Override the RNG seed
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Stop after this many ticks (runs until interrupted otherwise)
    #[arg(long, global = true)]
    ticks: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SourceKind {
    /// A fixed pointer position
    Pointer,
    /// The lidar feed file
    Feed,
    /// Simulated walkers in-process
    Walkers,
}

#[derive(Subcommand)]
enum Commands {
    /// Distortion grid pushed around by the sources
    Grid {
        /// Connect neighbouring points with lines
        #[arg(long)]
        lines: bool,
        #[arg(long, value_enum, default_value = "pointer")]
        source: SourceKind,
        /// Pointer position as 'x,y' in pixels
        #[arg(long, value_parser = parse_point, default_value = "960,540")]
        pointer: DVec2,
    },
    /// Soccer ball kicked by tracked players
    Soccer {
        #[arg(long, value_enum, default_value = "feed")]
        source: SourceKind,
        #[arg(long, value_parser = parse_point, default_value = "960,540")]
        pointer: DVec2,
    },
    /// Wandering colored particles
    Particles,
    /// Simulate people and write the lidar feed file
    Walkers {
        /// Resolution of the playing field in pixels, 'width:height'
        #[arg(long, short = 'r', value_parser = parse_pair)]
        field_resolution: Option<(f64, f64)>,
        /// Real-world size of the projected field in metres, 'width:height'
        #[arg(long, short = 's', value_parser = parse_pair)]
        field_size: Option<(f64, f64)>,
        /// Number of people to simulate
        #[arg(long, short = 'n')]
        num_people: Option<usize>,
        /// Feed file to write
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_point(s: &str) -> Result<DVec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected 'x,y', got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{v}': {e}"))
    };
    Ok(DVec2::new(parse(x)?, parse(y)?))
}

/// Sleeps so that successive `wait` calls are one period apart
struct FrameClock {
    period: Duration,
    next: Instant,
}

impl FrameClock {
    fn new(hz: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / hz.max(1) as f64);
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    fn from_period(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            // Running behind: don't try to catch up
            self.next = now + self.period;
        }
    }
}

fn make_source(kind: SourceKind, settings: &Settings, pointer: DVec2) -> Box<dyn PositionSource> {
    match kind {
        SourceKind::Pointer => Box::new(PointerSource::at(pointer)),
        SourceKind::Feed => {
            log::info!("Reading positions from {}", settings.feed.path.display());
            Box::new(FeedSource::new(settings.feed.path.clone(), settings.feed_scale()))
        }
        SourceKind::Walkers => {
            let (w, h) = settings.feed.field_size;
            Box::new(WalkerCrowd::new(
                settings.screen.size(),
                DVec2::new(w, h),
                settings.walkers.num_people,
                Pcg32::seed_from_u64(settings.seed.wrapping_add(1)),
            ))
        }
    }
}

fn run_scene(
    kind: SceneKind,
    settings: &Settings,
    mut source: Box<dyn PositionSource>,
    style: DrawStyle,
    max_ticks: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = SimState::new(kind, settings)?;
    let hz = kind.tick_hz();
    let mut clock = FrameClock::new(hz);
    let mut frame = FrameRecorder::new();

    log::info!("Running {} at {} Hz", kind.as_str(), hz);
    while max_ticks.is_none_or(|n| state.time_ticks < n) {
        let input = TickInput::new(source.positions());
        for event in tick(&mut state, &input) {
            if event == SimEvent::Rejected {
                log::warn!("Tick {} discarded a non-finite ball update", state.time_ticks);
            }
        }

        frame.begin_frame();
        draw_scene(&state, &input.sources, style, &mut frame);

        if state.time_ticks % hz as u64 == 0 {
            log::debug!(
                "tick {}: {} sources, {} circles, {} lines, {} sprites",
                state.time_ticks,
                input.sources.len(),
                frame.circles(),
                frame.lines(),
                frame.sprites()
            );
        }
        clock.wait();
    }

    if let Some(soccer) = state.soccer_state() {
        log::info!("Final score {}:{}", soccer.scores[0], soccer.scores[1]);
    }
    log::info!("Stopped after {} ticks", state.time_ticks);
    Ok(())
}

fn run_walkers(
    settings: &Settings,
    field_resolution: Option<(f64, f64)>,
    field_size: Option<(f64, f64)>,
    num_people: Option<usize>,
    output: Option<PathBuf>,
    max_ticks: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (rw, rh) = field_resolution.unwrap_or((settings.screen.width, settings.screen.height));
    let (sw, sh) = field_size.unwrap_or(settings.feed.field_size);
    let num_people = num_people.unwrap_or(settings.walkers.num_people);
    let output = output.unwrap_or_else(|| settings.feed.path.clone());

    let mut crowd = WalkerCrowd::new(
        DVec2::new(rw, rh),
        DVec2::new(sw, sh),
        num_people,
        Pcg32::seed_from_u64(settings.seed),
    );
    let mut clock = FrameClock::from_period(Duration::from_millis(settings.walkers.period_ms));

    log::info!("Writing walker feed to {}", output.display());
    let mut steps = 0u64;
    while max_ticks.is_none_or(|n| steps < n) {
        crowd.step();
        if let Err(e) = crowd.write_feed(&output) {
            log::warn!("{}", e);
        }
        steps += 1;
        clock.wait();
    }
    log::info!("Exiting after {} steps", steps);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }

    match cli.command {
        Commands::Grid {
            lines,
            source,
            pointer,
        } => {
            let style = DrawStyle {
                draw_lines: lines || settings.grid.draw_lines,
            };
            let source = make_source(source, &settings, pointer);
            run_scene(SceneKind::Grid, &settings, source, style, cli.ticks)
        }
        Commands::Soccer { source, pointer } => {
            let source = make_source(source, &settings, pointer);
            run_scene(SceneKind::Soccer, &settings, source, DrawStyle::default(), cli.ticks)
        }
        Commands::Particles => run_scene(
            SceneKind::Particles,
            &settings,
            Box::new(PointerSource::default()),
            DrawStyle::default(),
            cli.ticks,
        ),
        Commands::Walkers {
            field_resolution,
            field_size,
            num_people,
            output,
        } => run_walkers(
            &settings,
            field_resolution,
            field_size,
            num_people,
            output,
            cli.ticks,
        ),
    }
}

fn main() {
    env_logger::init();
    log::info!("Floor Physics starting...");

    if let Err(e) = run(Cli::parse()) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("10,20.5"), Ok(DVec2::new(10.0, 20.5)));
        assert!(parse_point("10;20").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "floor-physics",
            "--ticks",
            "5",
            "grid",
            "--lines",
            "--pointer",
            "1,2",
        ])
        .unwrap();
        assert_eq!(cli.ticks, Some(5));
        match cli.command {
            Commands::Grid { lines, pointer, .. } => {
                assert!(lines);
                assert_eq!(pointer, DVec2::new(1.0, 2.0));
            }
            _ => panic!("expected grid"),
        }
    }

    #[test]
    fn test_headless_grid_run() {
        let mut settings = Settings::default();
        settings.grid.rows = 3;
        settings.grid.columns = 4;
        let source = make_source(SourceKind::Pointer, &settings, DVec2::new(1.0, 1.0));
        assert!(run_scene(SceneKind::Grid, &settings, source, DrawStyle::default(), Some(2)).is_ok());
    }
}
