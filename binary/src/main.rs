use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use alpha_miner::{
    alpha::{footprint::abbreviate_activity, place_synthesis::valid_places},
    alpha_discover,
    event_log::export_traces::export_traces,
    export_traces_to_file_path, generate_traces, import_traces_file,
    parse_process_description, AlphaConfig, GenerationConfig, TraceImportOptions, TraceLog,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use env_logger::Builder;

#[derive(Debug, Parser)]
#[command(version, about = "Discover Petri nets from trace logs with the Alpha algorithm")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Discover a Petri net from a trace log
    Discover {
        /// Trace log (one trace per line, `.gz` supported)
        log: PathBuf,
        /// Separator between the activities of a trace
        #[arg(long, default_value_t = ',')]
        separator: char,
        /// JSON file with the algorithm configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the net as JSON (printed to stdout if no output is given)
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the net as PNML
        #[arg(long)]
        pnml: Option<PathBuf>,
        /// Render the net as PNG (requires Graphviz)
        #[arg(long)]
        png: Option<PathBuf>,
        /// Render the net as SVG (requires Graphviz)
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Print the variants, footprint matrix, relations and places of a trace log
    Footprint {
        /// Trace log (one trace per line, `.gz` supported)
        log: PathBuf,
        /// Separator between the activities of a trace
        #[arg(long, default_value_t = ',')]
        separator: char,
        /// Use full activity names instead of abbreviations in the matrix
        #[arg(long)]
        full_names: bool,
    },
    /// Generate a noisy trace log from a process description
    Generate {
        /// Process description, e.g. `Start With(A), Parallel(B, C), XOR(D, E)`
        #[arg(long)]
        description: String,
        /// JSON file with the generation configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of traces (overrides the configuration)
        #[arg(long)]
        num_traces: Option<usize>,
        /// Random seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,
        /// Output file (printed to stdout if not given)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn read_log(path: &Path, separator: char) -> Result<TraceLog> {
    let options = TraceImportOptions {
        separator,
        ..Default::default()
    };
    import_traces_file(path, &options)
        .with_context(|| format!("Importing trace log {}", path.display()))
}

fn read_json_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))
}

fn discover(
    log_path: &Path,
    separator: char,
    config: Option<&Path>,
    json: Option<&Path>,
    pnml: Option<&Path>,
    png: Option<&Path>,
    svg: Option<&Path>,
) -> Result<()> {
    let config = match config {
        Some(path) => AlphaConfig::from_json(&read_json_file(path)?)
            .context("Parsing algorithm configuration")?,
        None => AlphaConfig::default(),
    };
    let log = read_log(log_path, separator)?;
    let res = alpha_discover(&log, config).context("Discovering Petri net")?;
    for (i, place) in res.places.iter().enumerate() {
        log::info!("p_{}: {}", i, place);
    }

    let net_json = res.net.to_json().context("Serializing Petri net")?;
    match json {
        Some(path) => std::fs::write(path, net_json)
            .with_context(|| format!("Writing {}", path.display()))?,
        None if pnml.is_none() && png.is_none() && svg.is_none() => println!("{}", net_json),
        None => {}
    }
    if let Some(path) = pnml {
        res.net
            .export_pnml(path)
            .with_context(|| format!("Writing {}", path.display()))?;
    }
    if let Some(path) = png {
        res.net
            .export_png(path)
            .with_context(|| format!("Rendering {}", path.display()))?;
    }
    if let Some(path) = svg {
        res.net
            .export_svg(path)
            .with_context(|| format!("Rendering {}", path.display()))?;
    }
    Ok(())
}

fn footprint(log_path: &Path, separator: char, full_names: bool) -> Result<()> {
    let log = read_log(log_path, separator)?;
    let res = alpha_discover(&log, AlphaConfig::default()).context("Discovering Petri net")?;

    println!("Variants:");
    for (trace, count) in log.variants() {
        println!("  {:>6}  {}", count, trace);
    }
    if !full_names {
        println!("\nAbbreviations:");
        for act in res.footprint.activities() {
            println!("  {:<6} {}", abbreviate_activity(act.as_str()), act);
        }
    }
    println!("\nFootprint matrix:\n{}", res.footprint.to_table(!full_names));

    let rel = &res.relations;
    let names = |acts: &BTreeSet<usize>| {
        rel.acts_to_names(acts)
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!("Start activities: {{{}}}", names(rel.start_candidates()));
    println!("End activities: {{{}}}", names(rel.end_candidates()));
    if !rel.self_loops().is_empty() {
        println!("Self-loops (excluded from places): {{{}}}", names(rel.self_loops()));
    }

    println!("\nAll valid places:");
    for place in valid_places(rel) {
        println!("  {}", place);
    }
    println!("\nMaximal places:");
    for (i, place) in res.places.iter().enumerate() {
        println!("  p_{}: {}", i, place);
    }
    Ok(())
}

fn generate(
    description: &str,
    config: Option<&Path>,
    num_traces: Option<usize>,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    let mut config = match config {
        Some(path) => GenerationConfig::from_json(&read_json_file(path)?)
            .context("Parsing generation configuration")?,
        None => GenerationConfig::default(),
    };
    if let Some(n) = num_traces {
        config.num_traces = n;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    let constructs =
        parse_process_description(description).context("Parsing process description")?;
    let log = generate_traces(&constructs, &config).context("Generating traces")?;
    match output {
        Some(path) => export_traces_to_file_path(&log, path, ',')
            .with_context(|| format!("Writing {}", path.display()))?,
        None => export_traces(&log, std::io::stdout().lock(), ',')
            .context("Writing traces to stdout")?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match &cli.command {
        Command::Discover {
            log,
            separator,
            config,
            json,
            pnml,
            png,
            svg,
        } => discover(
            log,
            *separator,
            config.as_deref(),
            json.as_deref(),
            pnml.as_deref(),
            png.as_deref(),
            svg.as_deref(),
        ),
        Command::Footprint {
            log,
            separator,
            full_names,
        } => footprint(log, *separator, *full_names),
        Command::Generate {
            description,
            config,
            num_traces,
            seed,
            output,
        } => generate(
            description,
            config.as_deref(),
            *num_traces,
            *seed,
            output.as_deref(),
        ),
    }
}
