//! Headless level runner (default binary).
//!
//! Loads a level, replays the taps given on the command line and prints the
//! grid after every resolution. Set `RUST_LOG=debug` to follow each cascade.
//!
//! ```text
//! cube-blast <level.json | level-number> [x,y ...]
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use cube_blast::core::LevelData;
use cube_blast::engine::{
    CascadeEngine, EngineConfig, InstantAnimator, LevelOutcome, MemoryProgressStore, Progress, ProgressStore,
    Resolution, Session,
};
use cube_blast::types::Coord;

const LEVELS_DIR_ENV: &str = "CUBE_BLAST_LEVELS_DIR";
const PROGRESS_ENV: &str = "CUBE_BLAST_PROGRESS";
const DEFAULT_LEVELS_DIR: &str = "levels";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(level_arg) = args.next() else {
        bail!("usage: cube-blast <level.json | level-number> [x,y ...]");
    };
    let taps = args.map(|arg| parse_coord(&arg)).collect::<Result<Vec<_>>>()?;
    let level = load_level(&level_arg)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to create tokio runtime")?;

    match env::var(PROGRESS_ENV) {
        Ok(path) => rt.block_on(play(&level, &taps, JsonProgressStore { path: path.into() })),
        Err(_) => rt.block_on(play(&level, &taps, MemoryProgressStore::new())),
    }
}

async fn play<S: ProgressStore>(level: &LevelData, taps: &[Coord], mut store: S) -> Result<()> {
    let config = EngineConfig::from_env();
    let mut engine = CascadeEngine::from_level(level, &config, InstantAnimator)
        .with_context(|| format!("failed to build level {}", level.level_number))?;
    let mut session = Session::start(level);

    println!(
        "level {}: {}x{}, {} moves, goals {:?}",
        level.level_number,
        level.grid_width,
        level.grid_height,
        session.remaining_moves(),
        session.goals()
    );
    print!("{}", engine.grid().snapshot());

    for &coord in taps {
        if !session.accepts_input() {
            println!("level over, skipping remaining taps");
            break;
        }

        let report = match engine.tap(coord).await {
            Ok(Resolution::Resolved(report)) => report,
            Ok(Resolution::Ignored(reason)) => {
                println!("tap {coord}: ignored ({reason:?})");
                continue;
            }
            Err(err) => {
                log::warn!("tap {coord} failed: {err}");
                continue;
            }
        };

        let outcome = session.apply(&report);
        println!(
            "tap {coord}: {} cleared, {} rocket(s), {} move(s) left",
            report.cleared().count(),
            report.rockets_fired,
            session.remaining_moves()
        );
        print!("{}", engine.grid().snapshot());

        match outcome {
            Some(LevelOutcome::Won) => {
                if let Resolution::Resolved(finale) = engine.detonate_remaining_specials().await? {
                    println!("finale: {} rocket(s) detonated", finale.rockets_fired);
                    print!("{}", engine.grid().snapshot());
                }
                let mut progress: Progress = store.load()?;
                if progress.complete(level.level_number) {
                    store.save(&progress)?;
                }
                println!("level {} won, next level {}", level.level_number, progress.next_level());
            }
            Some(LevelOutcome::Lost) => println!("level {} lost", level.level_number),
            None => {}
        }
    }

    if session.outcome().is_none() {
        println!(
            "stopped with {} move(s) left, goals {:?}",
            session.remaining_moves(),
            session.goals()
        );
    }
    Ok(())
}

/// A level number is looked up in `CUBE_BLAST_LEVELS_DIR`; anything else is a path.
fn load_level(arg: &str) -> Result<LevelData> {
    if let Ok(number) = arg.parse::<u32>() {
        let dir = env::var(LEVELS_DIR_ENV).unwrap_or_else(|_| DEFAULT_LEVELS_DIR.to_string());
        return LevelData::load(Path::new(&dir), number)
            .with_context(|| format!("failed to load level {number} from {dir}"));
    }

    let text = fs::read_to_string(arg).with_context(|| format!("failed to read {arg}"))?;
    LevelData::from_json(&text).with_context(|| format!("failed to parse {arg}"))
}

fn parse_coord(arg: &str) -> Result<Coord> {
    let Some((x, y)) = arg.split_once(',') else {
        bail!("expected x,y but got {arg:?}");
    };
    let x = x.trim().parse().with_context(|| format!("bad x in {arg:?}"))?;
    let y = y.trim().parse().with_context(|| format!("bad y in {arg:?}"))?;
    Ok(Coord::new(x, y))
}

/// Progress kept in a JSON file between runs.
struct JsonProgressStore {
    path: PathBuf,
}

impl ProgressStore for JsonProgressStore {
    type Error = io::Error;

    fn load(&self) -> io::Result<Progress> {
        match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).map_err(io::Error::from),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Progress::default()),
            Err(err) => Err(err),
        }
    }

    fn save(&mut self, progress: &Progress) -> io::Result<()> {
        let text = serde_json::to_string_pretty(progress).map_err(io::Error::from)?;
        fs::write(&self.path, text)
    }
}
