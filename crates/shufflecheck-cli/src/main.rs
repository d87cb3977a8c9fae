//! CLI for shufflecheck: is your shuffle actually uniform?

mod commands;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shufflecheck")]
#[command(about = "shufflecheck: chi-squared and autocorrelation audit of a shuffle")]
#[command(version = shufflecheck_core::VERSION)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Analysis parameters shared by every analyzing command.
#[derive(Args)]
struct AnalysisArgs {
    /// Number of symbols N in the shuffled list (symbols are 1..=N)
    #[arg(long)]
    symbols: Option<usize>,

    /// Largest autocorrelation lag
    #[arg(long)]
    max_lag: Option<usize>,

    /// Expected count per outcome: floor (integer division, default) or exact
    #[arg(long, value_parser = ["floor", "exact"])]
    expectation: Option<String>,

    /// Autocorrelation method: auto (default), direct, fft
    #[arg(long, value_parser = ["auto", "direct", "fft"])]
    acf_method: Option<String>,

    /// Output view: summary (default, verdict-driven) or detailed (charts and full metrics)
    #[arg(long, default_value = "summary", value_parser = ["summary", "detailed"])]
    view: String,

    /// Write full results as JSON
    #[arg(long)]
    output: Option<String>,

    /// Write a Markdown report
    #[arg(long)]
    report: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the subject for every configured source and audit its shuffle
    Run {
        /// JSON harness config (defaults reproduce `./qtest -v 3` with urandom and xorshift)
        #[arg(long)]
        config: Option<String>,

        /// Subject program, overriding the config
        #[arg(long)]
        program: Option<String>,

        /// Shuffle commands per source, overriding the config
        #[arg(long)]
        iterations: Option<usize>,

        /// Per-source timeout in seconds, overriding the config
        #[arg(long)]
        timeout_sec: Option<f64>,

        /// Comma-separated source labels to run (default: all configured)
        #[arg(long)]
        sources: Option<String>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Audit a saved subject transcript or a file with one permutation per line
    Analyze {
        /// Input file
        input: String,

        /// Source label for the report (default: file name)
        #[arg(long)]
        label: Option<String>,

        /// Output preceding the first sample (default: the sorted list, e.g. "l = [1 2 3 4]")
        #[arg(long)]
        start_marker: Option<String>,

        /// Output following the last sample
        #[arg(long, default_value = "l = NULL")]
        end_marker: String,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Audit the built-in reference shuffles to calibrate the harness
    Simulate {
        /// Number of shuffles
        #[arg(long, default_value = "100000")]
        samples: usize,

        /// RNG seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Shuffle algorithm: fisher-yates (uniform) or naive-swap (biased)
        #[arg(long, default_value = "fisher-yates", value_parser = ["fisher-yates", "naive-swap"])]
        shuffle: String,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Print the command script fed to the subject for one source
    Script {
        /// JSON harness config
        #[arg(long)]
        config: Option<String>,

        /// Source label (default: first configured source)
        #[arg(long)]
        source: Option<String>,

        /// Shuffle commands, overriding the config
        #[arg(long)]
        iterations: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            program,
            iterations,
            timeout_sec,
            sources,
            analysis,
        } => commands::run::run(commands::run::RunCommandConfig {
            config_path: config.as_deref(),
            program: program.as_deref(),
            iterations,
            timeout_sec,
            source_filter: sources.as_deref(),
            analysis: analysis.overrides(),
            output: analysis.outputs(),
        }),
        Commands::Analyze {
            input,
            label,
            start_marker,
            end_marker,
            analysis,
        } => commands::analyze::run(commands::analyze::AnalyzeCommandConfig {
            input: &input,
            label: label.as_deref(),
            start_marker: start_marker.as_deref(),
            end_marker: &end_marker,
            analysis: analysis.overrides(),
            output: analysis.outputs(),
        }),
        Commands::Simulate {
            samples,
            seed,
            shuffle,
            analysis,
        } => commands::simulate::run(
            samples,
            seed,
            &shuffle,
            analysis.overrides(),
            analysis.outputs(),
        ),
        Commands::Script {
            config,
            source,
            iterations,
        } => commands::script::run(config.as_deref(), source.as_deref(), iterations),
    }
}

impl AnalysisArgs {
    fn overrides(&self) -> commands::AnalysisOverrides<'_> {
        commands::AnalysisOverrides {
            symbols: self.symbols,
            max_lag: self.max_lag,
            expectation: self.expectation.as_deref(),
            acf_method: self.acf_method.as_deref(),
        }
    }

    fn outputs(&self) -> commands::OutputOptions<'_> {
        commands::OutputOptions {
            view: &self.view,
            json_path: self.output.as_deref(),
            report_path: self.report.as_deref(),
        }
    }
}
