mod driver;
mod sink;

use anyhow::{bail, Result};
use knock_engine::{
    NullSink, ProbabilisticPolicy, RlAgent, SessionConfig, SessionController, TrialSink,
};
use knock_timing::WallClockTimer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sink::HttpSink;
use tracing::info;

struct Options {
    server: Option<String>,
    user: String,
    seed: u64,
    full: bool,
    fast: bool,
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        server: None,
        user: "sim".into(),
        seed: rand::random(),
        full: false,
        fast: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--server" => {
                options.server = Some(args.next().ok_or_else(|| {
                    anyhow::anyhow!("--server requires a base URL, e.g. http://localhost:3001")
                })?);
            }
            "--user" => {
                options.user = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--user requires an identifier"))?;
            }
            "--seed" => {
                options.seed = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?
                    .parse()?;
            }
            "--full" => options.full = true,
            "--fast" => options.fast = true,
            "--help" | "-h" => {
                println!(
                    "knock-app [--server URL] [--user ID] [--seed N] [--full] [--fast]\n\
                     \n\
                     Runs a simulated Go/No-Go session with an RL agent as the\n\
                     participant. --full runs the 400-trial session instead of the\n\
                     4-trial demo block; --fast divides all phase durations by 10;\n\
                     --server posts each trial record to a running knock-server."
                );
                std::process::exit(0);
            }
            other => bail!("unknown argument {other:?} (try --help)"),
        }
    }
    Ok(options)
}

fn session_config(options: &Options) -> SessionConfig {
    let mut config = if options.full {
        SessionConfig::default()
    } else {
        SessionConfig::single_block_demo()
    };
    if options.fast {
        config.fixation_ms /= 10;
        config.stimulus_window_ms /= 10;
        config.feedback_ms /= 10;
    }
    config
}

fn run_with_sink<S: TrialSink>(options: &Options, sink: S) -> Result<i64> {
    let config = session_config(options);
    let timer = WallClockTimer::new();
    let mut rng = StdRng::seed_from_u64(options.seed);
    let policy = ProbabilisticPolicy::new(StdRng::seed_from_u64(options.seed.wrapping_add(1)));

    let mut controller = SessionController::new(
        config,
        options.user.clone(),
        timer.clone(),
        policy,
        sink,
        &mut rng,
    )?;
    let mut agent = RlAgent::default();

    info!(
        user = %options.user,
        seed = options.seed,
        trials = controller.total_trials(),
        "starting simulated session"
    );
    Ok(driver::run_session(
        &mut controller,
        &mut agent,
        &timer,
        &mut rng,
    ))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let options = parse_args()?;

    let final_score = match &options.server {
        Some(base) => run_with_sink(&options, HttpSink::new(base)?)?,
        None => run_with_sink(&options, NullSink)?,
    };

    info!(final_score, "session complete");
    println!("Final score: {final_score}");
    Ok(())
}
