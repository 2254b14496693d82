//! Pachinball Adventure entry point
//!
//! Natively this runs a level headless and prints the session stats. On the
//! web the page drives `platform::web::WebAdventure` directly.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if pachinball_adventure::platform::init_logging().is_ok() {
        log::info!("Pachinball Adventure (web) ready");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let _ = pachinball_adventure::platform::init_logging();
    if let Err(err) = native::run(native::Cli::parse()) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use clap::Parser;
    use pachinball_adventure::LevelError;
    use pachinball_adventure::Tuning;
    use pachinball_adventure::adventure::{
        AdventureSession, LevelSpec, builtin, builtin_names, display_name,
    };
    use pachinball_adventure::engine::{Engine, HeadlessScene, PhysicsWorld, RapierWorld};
    use thiserror::Error;

    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Debug, Error)]
    pub enum RunError {
        #[error(transparent)]
        Level(#[from] LevelError),
        #[error("level '{0}' did not start")]
        NotStarted(String),
        #[error("failed to encode stats: {0}")]
        Stats(#[from] serde_json::Error),
    }

    /// Run a Pachinball Adventure track headless and print its stats
    #[derive(Debug, Parser)]
    #[command(name = "pachinball-adventure", version)]
    pub struct Cli {
        /// Built-in track name or path to a level .json
        #[arg(default_value = "neon_helix")]
        level: String,

        /// Simulated seconds per track
        #[arg(long, default_value_t = 10.0, value_parser = parse_seconds)]
        seconds: f32,

        /// Tuning overrides (.json)
        #[arg(long)]
        tuning: Option<String>,

        /// List the built-in tracks and exit
        #[arg(long)]
        list: bool,

        /// Play every built-in track in rotation, starting after LEVEL
        #[arg(long)]
        tour: bool,
    }

    fn parse_seconds(value: &str) -> Result<f32, String> {
        value
            .parse::<f32>()
            .ok()
            .filter(|s| s.is_finite() && *s > 0.0)
            .ok_or_else(|| format!("expected a positive number of seconds, got '{value}'"))
    }

    pub fn run(cli: Cli) -> Result<(), RunError> {
        if cli.list {
            for name in builtin_names() {
                println!("{name:<18} {}", display_name(name));
            }
            return Ok(());
        }

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let level = if cli.level.ends_with(".json") {
            LevelSpec::load(&cli.level)?
        } else {
            builtin(&cli.level)?
        };

        let mut world = RapierWorld::new(tuning.gravity_vector());
        let mut scene = HeadlessScene::new();
        let mut engine = Engine::new(&mut world, &mut scene);
        let mut session = AdventureSession::new(tuning);

        if !session.start(&mut engine, &level) {
            return Err(RunError::NotStarted(level.name));
        }
        play(&mut session, &mut engine, cli.seconds)?;

        if cli.tour {
            for _ in 1..builtin_names().len() {
                let Some(name) = session.next_level(&mut engine) else {
                    break;
                };
                log::info!("Next track: {}", display_name(name));
                play(&mut session, &mut engine, cli.seconds)?;
            }
        }

        session.end(&mut engine);
        Ok(())
    }

    fn play(session: &mut AdventureSession, engine: &mut Engine<'_>, seconds: f32) -> Result<(), RunError> {
        let frames = (seconds / FRAME_DT).ceil() as u32;
        let mut next_report = 1.0;
        for _ in 0..frames {
            session.frame(engine, FRAME_DT);
            if session.time() >= next_report {
                next_report += 1.0;
                let heights: Vec<String> = session
                    .balls()
                    .iter()
                    .filter_map(|b| engine.world.pose(b.body))
                    .map(|p| format!("{:.1}", p.position.y))
                    .collect();
                log::info!(
                    "t={:.1}s ball heights [{}] recycled={}",
                    session.time(),
                    heights.join(", "),
                    session.stats().recycled
                );
            }
        }
        println!(
            "{}: {}",
            session.level_name().map(display_name).unwrap_or_default(),
            serde_json::to_string_pretty(session.stats())?
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_defaults_and_flags() {
            let cli = Cli::try_parse_from(["pachinball-adventure"]).unwrap();
            assert_eq!(cli.level, "neon_helix");
            assert_eq!(cli.seconds, 10.0);
            assert!(!cli.list && !cli.tour);

            let cli = Cli::try_parse_from([
                "pachinball-adventure",
                "quantum_grid",
                "--seconds",
                "2.5",
                "--tuning",
                "t.json",
            ])
            .unwrap();
            assert_eq!(cli.level, "quantum_grid");
            assert_eq!(cli.seconds, 2.5);
            assert_eq!(cli.tuning.as_deref(), Some("t.json"));
        }

        #[test]
        fn test_parse_errors() {
            assert!(Cli::try_parse_from(["pachinball-adventure", "--seconds"]).is_err());
            assert!(Cli::try_parse_from(["pachinball-adventure", "--seconds", "-1"]).is_err());
            assert!(Cli::try_parse_from(["pachinball-adventure", "--seconds", "inf"]).is_err());
            assert!(Cli::try_parse_from(["pachinball-adventure", "--bogus"]).is_err());
        }

        #[test]
        fn test_run_builtin_briefly() {
            let cli = Cli::try_parse_from(["pachinball-adventure", "cyber_core", "--seconds", "0.5"]).unwrap();
            run(cli).unwrap();

            let cli = Cli::try_parse_from(["pachinball-adventure", "no_such_level"]).unwrap();
            assert!(matches!(
                run(cli),
                Err(RunError::Level(LevelError::UnknownLevel(_)))
            ));
        }

        #[test]
        fn test_tour_visits_every_track() {
            let cli = Cli::try_parse_from(["pachinball-adventure", "--tour", "--seconds", "0.1"]).unwrap();
            run(cli).unwrap();
        }
    }
}
