//! Coast Runner entry point
//!
//! The native build runs one headless autopilot run and prints the final HUD.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    let args = native::Args::parse();
    log::info!("Coast Runner (native, headless) starting...");

    if let Err(e) = native::run(&args) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;

    use coast_runner::consts::SIM_DT;
    use coast_runner::scene::{HeadlessScene, SceneAssets, SceneSync};
    use coast_runner::sim::{GamePhase, GameState, tick};
    use coast_runner::{Config, GameError, HudSnapshot, KeyState, Result};

    /// Headless autopilot run of Coast Runner
    #[derive(Parser, Debug)]
    #[command(name = "coast-runner")]
    #[command(version)]
    pub struct Args {
        /// JSON config file (defaults are used when omitted)
        pub config: Option<PathBuf>,

        /// Seed for the run's RNG
        #[arg(long, default_value_t = 2024)]
        pub seed: u64,

        /// Stop after this many frames if the run hasn't ended
        #[arg(long, default_value_t = 36_000)]
        pub max_frames: u64,
    }

    pub fn run(args: &Args) -> Result<()> {
        let config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let mut scene = HeadlessScene::new();
        let assets = SceneAssets::load(&mut scene)?;
        let mut state = GameState::new(config.clone(), args.seed)?;
        state.models = assets.availability();
        let mut sync = SceneSync::new(&mut scene, assets, &config);

        let mut keys = KeyState::new();
        keys.idle_mode = true;

        let mut frames = 0u64;
        while frames < args.max_frames {
            tick(&mut state, &keys.frame_input(), SIM_DT);
            sync.sync(&mut scene, &state);
            frames += 1;

            for event in state.drain_events() {
                match serde_json::to_string(&event) {
                    Ok(json) => log::info!("{}", json),
                    Err(e) => log::warn!("Could not encode event: {}", e),
                }
            }
            if frames % 600 == 0 {
                log::debug!("{}", HudSnapshot::from_state(&state).status_line());
            }
            if state.session.phase == GamePhase::Ended {
                break;
            }
        }

        let hud = HudSnapshot::from_state(&state);
        log::info!(
            "Finished after {} frames, {} scene nodes: {}",
            frames,
            scene.node_count(),
            hud.status_line()
        );
        let json = serde_json::to_string_pretty(&hud).map_err(GameError::Encode)?;
        println!("{}", json);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_args_defaults() {
            let args = Args::try_parse_from(["coast-runner"]).unwrap();
            assert!(args.config.is_none());
            assert_eq!(args.seed, 2024);
        }

        #[test]
        fn test_args_flags_are_not_paths() {
            let args =
                Args::try_parse_from(["coast-runner", "--seed", "5", "tuning.json"]).unwrap();
            assert_eq!(args.seed, 5);
            assert_eq!(args.config, Some(PathBuf::from("tuning.json")));
        }

        #[test]
        fn test_args_reject_bad_seed() {
            assert!(Args::try_parse_from(["coast-runner", "--seed", "abc"]).is_err());
        }

        #[test]
        fn test_run_completes_with_defaults() {
            let args = Args::try_parse_from(["coast-runner", "--max-frames", "120"]).unwrap();
            assert!(run(&args).is_ok());
        }
    }
}
