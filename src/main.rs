use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use log::{debug, error, info, LevelFilter};

use bdd_witness::aiger::read_aag_file;
use bdd_witness::build::{build_shared, BuildOptions};
use bdd_witness::report::{emit, Report};
use bdd_witness::search::SearchOptions;
use bdd_witness::witness::find_witnesses;

#[derive(Debug, Parser)]
#[command(author, version, about = "Witness paths through the shared BDD of a combinational AIGER network")]
struct Cli {
    /// Input network in ASCII AIGER format.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Also write the report to this file.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Identifier reported as `input_file_name` (default: input file stem).
    #[arg(long, value_name = "ID")]
    name: Option<String>,

    /// Order inputs as L, S, X, then the rest before building.
    #[arg(long)]
    order_lsx: bool,

    /// Give up building once the diagram holds more nodes than this.
    #[arg(long, value_name = "INT", default_value = "10000000")]
    size_limit: usize,

    /// Disable per-node memoization of failed subtrees.
    #[arg(long)]
    no_memo: bool,

    /// More logging (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn input_file_name(cli: &Cli) -> String {
    cli.name.clone().unwrap_or_else(|| {
        cli.input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| cli.input.display().to_string())
    })
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // stdout carries the report, so every log line goes to stderr.
    simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    debug!("cli = {:?}", cli);

    let time_total = Instant::now();

    let mut network = read_aag_file(&cli.input).wrap_err_with(|| format!("Cannot read {}", cli.input.display()))?;
    info!(
        "Network: {} inputs, {} outputs, {} gates",
        network.num_inputs(),
        network.num_outputs(),
        network.num_gates()
    );

    if cli.order_lsx {
        network.order_inputs_lsx();
    }

    let options = BuildOptions {
        size_limit: cli.size_limit,
    };
    let shared = match build_shared(&network, &options) {
        Ok(shared) => shared,
        Err(e) => {
            error!("Construction of global BDDs has failed.");
            debug!("Reason: {}", e);
            return Ok(());
        }
    };

    let vars = shared.var_table()?;
    let search = SearchOptions { memoize: !cli.no_memo };
    let results = find_witnesses(&shared.bdd, &shared.roots, &vars, search)?;

    let document = Report::new(input_file_name(&cli), &results).render()?;
    emit(&document, &mut io::stdout().lock(), cli.output.as_deref())?;

    let time_total = time_total.elapsed();
    info!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
