//! Drive the laser odometry along a scripted trajectory in a synthetic room.
//!
//! Acts as the orchestrator: feeds scans with noisy motion priors, composes
//! trusted increments into a trajectory and reports the final drift.
//!
//! # Usage
//!
//! ```bash
//! gati-simulate
//! gati-simulate --config configs/odometry.toml --steps 100 --seed 7
//! RUST_LOG=debug gati-simulate
//! ```

use std::env;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gati_odometry::harness::SyntheticRoom;
use gati_odometry::math::angle_diff;
use gati_odometry::{LaserOdometry, LaserScan, OdometryConfig, OdometryError, Pose2D};

/// Commanded motion per cycle (robot frame): gentle left-hand circle.
const STEP_FORWARD: f64 = 0.04;
const STEP_TURN: f64 = 0.04;

/// Uniform noise bounds on the motion prior.
const PRIOR_NOISE_XY: f64 = 0.02;
const PRIOR_NOISE_YAW: f64 = 0.01;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct Options {
    config_path: Option<PathBuf>,
    steps: usize,
    seed: u64,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut config_path = None;
    let mut steps = 60;
    let mut seed = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                i += 1;
                let path = args.get(i).ok_or("--config requires a path")?;
                config_path = Some(PathBuf::from(path));
            }
            "--steps" | "-s" => {
                i += 1;
                let value = args.get(i).ok_or("--steps requires a value")?;
                steps = value
                    .parse()
                    .map_err(|_| format!("Invalid step count: {}", value))?;
            }
            "--seed" => {
                i += 1;
                let value = args.get(i).ok_or("--seed requires a value")?;
                seed = value
                    .parse()
                    .map_err(|_| format!("Invalid seed: {}", value))?;
            }
            "--help" | "-h" => {
                return Err("Help requested".to_string());
            }
            _ => {
                return Err(format!("Unknown argument: {}", args[i]));
            }
        }
        i += 1;
    }

    Ok(Options {
        config_path,
        steps,
        seed,
    })
}

fn print_usage(program: &str) {
    eprintln!(
        r#"
Usage: {} [OPTIONS]

Run laser odometry on simulated scans and report drift.

OPTIONS:
    -c, --config <PATH>   Odometry config (default: configs/odometry.toml if present)
    -s, --steps <N>       Number of cycles (default: 60)
        --seed <N>        Seed for motion prior noise (default: 42)
    -h, --help            Show this help message
"#,
        program
    );
}

#[derive(Default)]
struct Tally {
    trusted: usize,
    untrusted: usize,
    failed: usize,
}

fn run(options: Options) -> Result<(), OdometryError> {
    let config = match &options.config_path {
        Some(path) => OdometryConfig::load(path)?,
        None => OdometryConfig::load_default()?,
    };

    let room = SyntheticRoom::furnished();
    let template = LaserScan {
        ranges: vec![0.0; 360],
        ..LaserScan::default()
    };
    let mut rng = StdRng::seed_from_u64(options.seed);

    let mut odometry = LaserOdometry::new(config);
    let mut truth = Pose2D::identity();
    let mut estimate = Pose2D::identity();
    odometry.initialize(&room.scan_from(&truth, &template))?;

    let motion = Pose2D::new(STEP_FORWARD, 0.0, STEP_TURN);
    let mut tally = Tally::default();

    for step in 1..=options.steps {
        truth = truth.compose(&motion);
        let scan = room.scan_from(&truth, &template);

        let predicted = Pose2D::new(
            motion.x + rng.random_range(-PRIOR_NOISE_XY..=PRIOR_NOISE_XY),
            motion.y + rng.random_range(-PRIOR_NOISE_XY..=PRIOR_NOISE_XY),
            motion.theta + rng.random_range(-PRIOR_NOISE_YAW..=PRIOR_NOISE_YAW),
        );

        let applied = match odometry.process(&scan, &predicted) {
            Ok(increment) => {
                let verdict = odometry.evaluate_keyframe(&increment.transform);
                if verdict.is_trusted() {
                    tally.trusted += 1;
                    increment.transform
                } else {
                    tally.untrusted += 1;
                    predicted
                }
            }
            Err(OdometryError::Match(e)) => {
                log::warn!("Step {}: falling back to motion prior ({})", step, e);
                tally.failed += 1;
                predicted
            }
            Err(e) => return Err(e),
        };
        estimate = estimate.compose(&applied);

        log::debug!(
            "Step {}: truth ({:.3}, {:.3}, {:.3}) estimate ({:.3}, {:.3}, {:.3})",
            step,
            truth.x,
            truth.y,
            truth.theta,
            estimate.x,
            estimate.y,
            estimate.theta
        );
    }

    let error = truth.inverse().compose(&estimate);
    println!("Simulation Summary");
    println!("==================");
    println!("Steps: {}", options.steps);
    println!(
        "Cycles: {} trusted, {} untrusted, {} failed",
        tally.trusted, tally.untrusted, tally.failed
    );
    println!(
        "Final truth:    ({:.4}, {:.4}, {:.4})",
        truth.x, truth.y, truth.theta
    );
    println!(
        "Final estimate: ({:.4}, {:.4}, {:.4})",
        estimate.x, estimate.y, estimate.theta
    );
    println!(
        "Drift: {:.4} m, {:.4} rad",
        error.translation_norm(),
        angle_diff(truth.theta, estimate.theta).abs()
    );
    Ok(())
}
