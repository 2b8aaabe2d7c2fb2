//! Replay entry point.

use imagemark_replay::{ReplayError, ReplayResult, Scene, replay_scene};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

fn run() -> ReplayResult<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from).ok_or(ReplayError::Usage)?;
    log::info!("Replaying {}", path.display());

    let scene = Scene::load(&path)?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    replay_scene(&scene, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
