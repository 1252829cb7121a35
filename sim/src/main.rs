use std::process;

use clap::Parser;
use engine::engine::Engine;
use tracing_subscriber::EnvFilter;
use turborand::{SeededCore, rng::Rng};

use sim::{
  Cli, Error,
  config::{Config, ConfigError},
  runner::Runner,
};

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let cli = Cli::parse();
  if let Err(e) = run(&cli) {
    tracing::error!("{e}");
    process::exit(1);
  }
}

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
  if let Some(path) = &cli.config_path {
    return Config::from_path(path);
  }

  match Config::default_path().filter(|path| path.exists()) {
    Some(path) => {
      tracing::info!("Loading config from '{}'", path.display());
      Config::from_path(path)
    }
    None => Ok(Config::default()),
  }
}

fn run(cli: &Cli) -> Result<(), Error> {
  let mut config = load_config(cli)?;
  cli.apply(&mut config);

  let mut rng = match config.simulation.seed {
    Some(seed) => Rng::with_seed(seed),
    None => Rng::new(),
  };

  let airspace = config.airspace.build(&mut rng)?;
  tracing::info!(
    "Controlling {} with {} waypoints at {} aircraft per minute",
    airspace.id,
    airspace.waypoint_count(),
    airspace.aircraft_per_minute
  );

  let mut engine = Engine::new(airspace, rng);
  engine.populate();

  let mut runner = Runner::new(engine, &config.simulation);
  let summary = runner.run();
  tracing::info!("{summary}");

  if let Some(path) = &cli.snapshot {
    let json = serde_json::to_string_pretty(&runner.engine.snapshot())?;
    std::fs::write(path, json).map_err(|source| Error::Write {
      path: path.clone(),
      source,
    })?;
    tracing::info!("Wrote snapshot to '{}'", path.display());
  }

  Ok(())
}
