use std::error::Error;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use clap::{Parser, Subcommand};
use crossbeam_channel::{bounded, unbounded};
use osu_reader::file::beatmap::hit_objects::{parse_hit_object, HitObject};
use osu_reader::file::beatmap::{Beatmap, BeatmapParser};
use osu_reader::file::replay::ReplayParser;
use osu_reader::Timestamped;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

const PATH_HELP: &str = "Path to beatmap file.";
const SLIDER_PATHS_HELP: &str = "Whether to approximate slider paths while parsing.";

#[derive(Subcommand)]
enum Commands {
    /// Parse a beatmap and print a summary of it.
    Parse {
        #[arg(long, help = SLIDER_PATHS_HELP)]
        slider_paths: bool,

        #[arg(help = PATH_HELP)]
        path: PathBuf,
    },

    /// Parse every .osu file of a folder in parallel and report the ones that fail.
    ParseAll {
        #[arg(
            short,
            long,
            help = "Whether to recurse in the folder."
        )]
        recursive: bool,

        #[arg(
            short,
            long,
            help = "Amount of worker threads (defaults to the available parallelism)."
        )]
        jobs: Option<NonZeroUsize>,

        #[arg(long, help = SLIDER_PATHS_HELP)]
        slider_paths: bool,

        #[arg(help = "Folder containing beatmap files.")]
        path: PathBuf,
    },

    /// Approximate the path of a single slider and print its points.
    Slider {
        #[arg(help = "Hit object line of the slider, e.g. \"1,1,50000,2,0,L|5:1,7,19\".")]
        line: String,
    },

    /// Parse a replay and print a summary of it.
    Replay {
        #[arg(long, help = "Whether to decode the replay frames.")]
        frames: bool,

        #[arg(help = "Path to replay file.")]
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let Cli { command } = Cli::parse();

    match command {
        Commands::Parse { slider_paths, path } => cli_parse(slider_paths, &path)?,

        Commands::ParseAll {
            recursive,
            jobs,
            slider_paths,
            path,
        } => {
            let jobs = jobs
                .or_else(|| thread::available_parallelism().ok())
                .map_or(1, NonZeroUsize::get);
            cli_parse_all(recursive, jobs, slider_paths, &path);
        }

        Commands::Slider { line } => cli_slider(&line)?,

        Commands::Replay { frames, path } => cli_replay(frames, &path)?,
    }

    Ok(())
}

fn print_summary(beatmap: &Beatmap) {
    let metadata = &beatmap.metadata;
    println!(
        "{} - {} [{}] by {}",
        metadata.artist, metadata.title, metadata.version, metadata.creator
    );
    println!(
        "osu file format v{} ({:?}), {:?} mode",
        beatmap.version, beatmap.encoding, beatmap.general.mode
    );

    let difficulty = &beatmap.difficulty;
    println!(
        "HP {} CS {} OD {} AR {}, slider multiplier {}",
        difficulty.hp_drain_rate,
        difficulty.circle_size,
        difficulty.overall_difficulty,
        difficulty.approach_rate,
        difficulty.slider_multiplier
    );

    println!(
        "{} timing points, {} circles, {} sliders, {} spinners, {} breaks",
        beatmap.timing_points.len(),
        beatmap.circles.len(),
        beatmap.sliders.len(),
        beatmap.spinners.len(),
        beatmap.events.breaks.len()
    );

    if let (Some(first), Some(last)) = (beatmap.hit_objects().next(), beatmap.hit_objects().last()) {
        println!("Hit objects from {}ms to {}ms", first.timestamp(), last.timestamp());
    }
}

fn cli_parse(slider_paths: bool, path: &Path) -> Result<(), Box<dyn Error>> {
    tracing::info!("Parsing {}...", path.display());
    let beatmap = BeatmapParser::new().slider_paths(slider_paths).parse_file(path)?;
    print_summary(&beatmap);
    Ok(())
}

fn cli_parse_all(recursive: bool, jobs: usize, slider_paths: bool, path: &Path) {
    let parser = BeatmapParser::new().slider_paths(slider_paths);
    let (job_tx, job_rx) = bounded::<PathBuf>(jobs * 2);
    let (result_tx, result_rx) = unbounded();

    let start = Instant::now();
    let (mut parsed, mut failed) = (0usize, 0usize);

    thread::scope(|s| {
        for _ in 0..jobs {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let parser = &parser;

            s.spawn(move || {
                for path in job_rx {
                    let result = parser.parse_file(&path);
                    if result_tx.send((path, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let entries = WalkDir::new(path)
            .max_depth(if recursive { usize::MAX } else { 1 })
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "osu"));

        for entry in entries {
            if job_tx.send(entry.into_path()).is_err() {
                break;
            }
        }
        drop(job_tx);

        for (path, result) in result_rx {
            match result {
                Ok(_) => parsed += 1,
                Err(err) => {
                    failed += 1;
                    tracing::error!("{}: {:?}", path.display(), err);
                }
            }
        }
    });

    println!(
        "Parsed {parsed} beatmaps in {:.2?} with {jobs} workers, {failed} failed",
        start.elapsed()
    );
}

fn cli_slider(line: &str) -> Result<(), Box<dyn Error>> {
    let HitObject::Slider(mut slider) = parse_hit_object(line)? else {
        return Err("not a slider".into());
    };

    for segment in &slider.segments {
        let points: Vec<_> = segment.points.iter().map(|p| format!("{}:{}", p.x, p.y)).collect();
        println!("{}|{}", segment.curve_type.letter(), points.join("|"));
    }

    slider.compute_path();
    for (point, distance) in slider.approximated_path.iter().zip(&slider.cumulative_distances) {
        println!("{} {} {}", point.x, point.y, distance);
    }

    Ok(())
}

fn cli_replay(frames: bool, path: &Path) -> Result<(), Box<dyn Error>> {
    tracing::info!("Parsing {}...", path.display());
    let replay = ReplayParser::new().frames(frames).parse_file(path)?;

    println!(
        "{} played {} ({:?}, version {})",
        replay.player_name, replay.map_hash, replay.mode, replay.game_version
    );
    println!(
        "{} points, {}x max combo{}, mods {}",
        replay.score,
        replay.max_combo,
        if replay.full_combo { " (FC)" } else { "" },
        replay.mods
    );
    println!(
        "300: {} | 100: {} | 50: {} | geki: {} | katu: {} | miss: {}",
        replay.count_300,
        replay.count_100,
        replay.count_50,
        replay.count_geki,
        replay.count_katu,
        replay.count_miss
    );

    if let Some(frames) = &replay.frames {
        println!("{} frames", frames.len());
        if let Some(last) = frames.last() {
            println!("Last frame at {}ms", last.time);
        }
    }

    Ok(())
}
