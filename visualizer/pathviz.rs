//! Terminal shortest-path demonstrator using crossterm.
//!
//! Run: cargo run --bin pathviz -- [--config board.json] [--seed N]
//!
//! Logging is off by default since the terminal is the UI. Set
//! `PATHVIZ_LOG=<file>` to write logs there, filtered by `RUST_LOG`.

use std::env;
use std::error::Error;
use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use pathviz::Visualizer;
use pathviz_board::Config;
use pathviz_core::{App, AppConfig};
use pathviz_crossterm::CrosstermDriver;

const TICK: Duration = Duration::from_millis(5);

struct Args {
    config: Option<String>,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args {
        config: None,
        seed: None,
    };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = Some(it.next().ok_or("--config needs a file")?),
            "--seed" => {
                let s = it.next().ok_or("--seed needs a number")?;
                args.seed = Some(s.parse().map_err(|e| format!("bad seed {s:?}: {e}"))?);
            }
            other => return Err(format!("unknown argument {other:?}").into()),
        }
    }
    Ok(args)
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    let Some(path) = env::var_os("PATHVIZ_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathviz=info,pathviz_board=debug,pathviz_paths=debug".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<Config, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let config: Config = serde_json::from_reader(File::open(path)?)?;
    config.validate()?;
    log::info!("loaded configuration from {path}");
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;
    let args = parse_args()?;
    let config = load_config(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64)
    });
    log::info!("starting with seed {seed}");

    let model = Visualizer::new(config, seed)?;
    let (width, height) = model.size();
    let mut app = App::new(AppConfig {
        model,
        driver: CrosstermDriver::new().with_poll_timeout(TICK),
        width,
        height,
        tick: Some(TICK),
    });
    app.run()
}
