use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use page_sim::{
    config::{parse_policies, Config, RunConfig},
    render,
    sim::{compare, frame_count, sweep},
    trace::{self, DEFAULT_DELIMITER},
    SimStats, StepRecord,
};

const USAGE: &str = "\
Usage: page_sim (-r <refs> | -t <path> | --random <n> | --config <json> | -p <path>) [options]

  -r <refs>        reference string, e.g. 7,0,1,2,0,3
  -t <path>        read references from a file (.xz is decompressed)
  --random <n>     generate n random references
    --pages <k>    distinct pages for --random (default 10)
    --seed <u64>   seed for --random
  --config <json>  JSON run config
  -p <path>        JSON run config file
  -f <frames>      number of frames (default 3)
  -a <policy>      FIFO, LRU or Optimal; repeatable (default all)
  -d <delim>       token delimiter (default ,)
  --sweep <max>    fault counts for 1..=max frames per policy
  --json <path>    write stats and traces as JSON
  -q               do not print the frame map
  -v               more logging (-vv for per-eviction traces)
";

#[derive(Serialize)]
struct RunOutput<'a> {
    stats: SimStats,
    steps: &'a [StepRecord],
}

fn main() -> anyhow::Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{USAGE}");
        return Ok(());
    }

    let mut verbosity = 0;
    while args.contains("-v") {
        verbosity += 1;
    }
    init_logging(verbosity);

    let quiet = args.contains("-q");
    let stats_path: Option<PathBuf> = args.opt_value_from_str("--json")?;
    let sweep_max: Option<i64> = args
        .opt_value_from_str("--sweep")
        .context("--sweep should be an integer")?;

    let run = read_run(&mut args)?;

    reject_unused(args)?;

    let sims = compare(&run.references, run.frames, &run.policies)?;
    for sim in &sims {
        println!("{}", render::report(sim, !quiet));
    }

    if let Some(max) = sweep_max {
        let max = frame_count(max)?;
        for &policy in &run.policies {
            println!("{}", render::sweep_table(&sweep(&run.references, policy, max)?));
        }
    }

    if let Some(stats_path) = stats_path {
        let output = sims
            .iter()
            .map(|sim| RunOutput {
                stats: sim.stats(),
                steps: &sim.steps,
            })
            .collect::<Vec<_>>();
        let stats_file = fs::File::create(&stats_path)
            .with_context(|| format!("Cannot open output file {}", stats_path.display()))?;
        serde_json::to_writer_pretty(stats_file, &output)?;
        tracing::info!(path = %stats_path.display(), "wrote results");
    }

    Ok(())
}

fn init_logging(verbosity: usize) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbosity > 0 {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn reject_unused(args: pico_args::Arguments) -> anyhow::Result<()> {
    let remaining = args.finish();
    if !remaining.is_empty() {
        bail!("Unrecognized arguments: {remaining:?}\n\n{USAGE}");
    }
    Ok(())
}

/// Builds a validated run from either a JSON config or the individual flags.
fn read_run(args: &mut pico_args::Arguments) -> anyhow::Result<RunConfig> {
    let config_str: Option<String> = if let Some(config_str) = args.opt_value_from_str("--config")? {
        Some(config_str)
    } else if let Some(config_path) = args.opt_value_from_str::<_, PathBuf>("-p")? {
        Some(
            fs::read_to_string(&config_path)
                .with_context(|| format!("Could not read config file {}", config_path.display()))?,
        )
    } else {
        None
    };
    if let Some(config_str) = config_str {
        return Ok(Config::from_json(&config_str)?.to_run()?);
    }

    let frames: i64 = args
        .opt_value_from_str("-f")
        .context("-f should be an integer")?
        .unwrap_or(3);
    let frames = frame_count(frames)?;
    let names: Vec<String> = args.values_from_str("-a")?;
    let policies = parse_policies(&names)?;
    let delim: String = args
        .opt_value_from_str("-d")?
        .unwrap_or_else(|| DEFAULT_DELIMITER.to_string());
    trace::check_delimiter(&delim)?;

    let inline: Option<String> = args.opt_value_from_str("-r")?;
    let path: Option<PathBuf> = args.opt_value_from_str("-t")?;
    let random: Option<usize> = args
        .opt_value_from_str("--random")
        .context("--random should be an integer")?;

    let references = match (inline, path, random) {
        (Some(refs), None, None) => trace::parse_nonempty(&refs, &delim)?,
        (None, Some(path), None) => trace::read(&path, &delim)?,
        (None, None, Some(len)) => {
            let pages: i64 = args
                .opt_value_from_str("--pages")
                .context("--pages should be an integer")?
                .unwrap_or(10);
            let seed: Option<u64> = args.opt_value_from_str("--seed")?;
            let refs = trace::random(len, pages, seed)?;
            println!(
                "Reference string: {}",
                refs.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(&delim)
            );
            refs
        }
        (None, None, None) => bail!("Must provide references with -r, -t, --random or a config\n\n{USAGE}"),
        _ => bail!("-r, -t and --random are mutually exclusive"),
    };

    Ok(RunConfig {
        frames,
        references,
        policies,
    })
}
