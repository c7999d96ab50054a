//! htmin - Command Line Interface
//!
//! Minimizes a rule file or a label file and prints every requested minimal
//! solution, optionally with the cover table, stage timings and the strong
//! equivalence and subsumption checks.

use clap::{Args, Parser, Subcommand, ValueEnum};
use htmin::verify::{strongly_equivalent, subsumption, SubsumptionOutcome};
use htmin::{
    CoverStrategy, Greedy, MinMode, MinimizationError, Minimizer, MinimizerConfig, Program, Report,
    SolverBudget,
};
use log::info;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Fewest rules, then fewest literals
    Atoms,
    /// Fewest rules
    Terms,
}

impl From<Mode> for MinMode {
    fn from(val: Mode) -> Self {
        match val {
            Mode::Atoms => MinMode::Atoms,
            Mode::Terms => MinMode::Terms,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "htmin")]
#[command(about = "Minimizer for Here-and-There rule sets", long_about = None)]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Rule or label file to minimize
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    options: Options,

    /// Print the cover table
    #[arg(short = 'c', long = "cover-table")]
    cover_table: bool,

    /// Print stage timings
    #[arg(short = 't', long = "timing")]
    timing: bool,

    /// Check strong equivalence of every solution with the input
    #[arg(long = "test-eq")]
    test_eq: bool,

    /// Check that every minimized rule subsumes an input rule
    #[arg(long = "test-sub")]
    test_sub: bool,

    /// Print the report as JSON
    #[arg(long = "json")]
    json: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Minimize every .lp and .txt file of a directory and check each result
    Batch {
        /// Directory to scan
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Write the per-file results here instead of stdout
        #[arg(short = 'o', long = "log")]
        log: Option<PathBuf>,

        #[command(flatten)]
        options: Options,
    },
}

#[derive(Args, Debug, Clone)]
struct Options {
    /// Print every optimal solution
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Criterion between covers with the fewest rules
    #[arg(short = 'm', long = "mode", value_enum, default_value = "atoms")]
    mode: Mode,

    /// Send every prime to the cover solver, skipping essential extraction
    #[arg(long = "full")]
    full: bool,

    /// Use the greedy cover heuristic instead of the exact search
    #[arg(long = "greedy")]
    greedy: bool,

    /// Maximum number of cover search nodes
    #[arg(long = "max-nodes", value_name = "N")]
    max_nodes: Option<u64>,

    /// Cover search time limit in seconds
    #[arg(long = "time-limit", value_name = "S")]
    time_limit: Option<f64>,

    /// Worker threads, 0 for one per core
    #[arg(short = 'j', long = "jobs", default_value_t = 1)]
    jobs: usize,
}

impl Options {
    fn minimizer(&self) -> Minimizer {
        let mut budget = SolverBudget::default();
        if self.max_nodes.is_some() {
            budget.max_nodes = self.max_nodes;
        }
        budget.time_limit = self
            .time_limit
            .and_then(|s| Duration::try_from_secs_f64(s).ok());

        let config = MinimizerConfig {
            strategy: if self.full {
                CoverStrategy::Full
            } else {
                CoverStrategy::Hybrid
            },
            min_mode: self.mode.into(),
            all_solutions: self.all,
            workers: self.jobs,
            budget,
        };
        let minimizer = Minimizer::with_config(config);
        if self.greedy {
            minimizer.solver(Greedy)
        } else {
            minimizer
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_program(path: &Path) -> Program {
    match Program::from_file(path) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Error reading '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn verdict(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "ERROR"
    }
}

fn print_report(cli: &Cli, program: &Program, report: &Report) -> io::Result<()> {
    let mut out = io::stdout().lock();

    if cli.json {
        let solutions: Vec<serde_json::Value> = report
            .solutions
            .iter()
            .map(|s| {
                let mut value = serde_json::json!(s);
                if cli.test_eq {
                    value["strong_eq"] = strongly_equivalent(program.keys(), &s.keys).into();
                }
                if cli.test_sub {
                    value["subsumption"] = serde_json::json!(subsumption(program.keys(), &s.keys));
                }
                value
            })
            .collect();
        let mut value = serde_json::json!(report);
        value["solutions"] = solutions.into();
        value["atoms"] = program
            .signature()
            .atoms()
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .into();
        serde_json::to_writer_pretty(&mut out, &value)?;
        writeln!(out)?;
        return Ok(());
    }

    if cli.cover_table {
        write!(out, "{}", report.cover_table())?;
        writeln!(out)?;
    }

    writeln!(out, "Optimal Minimal Solutions: {}", report.optimal_count)?;
    for (i, solution) in report.solutions.iter().enumerate() {
        writeln!(out, "MINIMAL SOLUTION #{}", i + 1)?;
        if !solution.optimal {
            writeln!(out, "% not proven minimal")?;
        }
        writeln!(out, "{}", solution.to_rules())?;
        if cli.test_eq {
            let ok = strongly_equivalent(program.keys(), &solution.keys);
            writeln!(out, "[STRONG EQ TEST] {}", verdict(ok))?;
        }
        if cli.test_sub {
            let sub = subsumption(program.keys(), &solution.keys);
            match sub.outcome() {
                SubsumptionOutcome::Warning => writeln!(
                    out,
                    "[SUBSUM TEST] WARNING: Program is equal in size, but syntactically simpler"
                )?,
                outcome => writeln!(out, "[SUBSUM TEST] {}", outcome)?,
            }
            for key in &sub.unsupported {
                writeln!(out, "  unsupported: {}", key)?;
            }
        }
    }

    if cli.timing {
        let t = &report.timings;
        writeln!(out, "Pairing time:   {:.6} s", t.pairing.as_secs_f64())?;
        writeln!(out, "Essential time: {:.6} s", t.essential.as_secs_f64())?;
        writeln!(out, "Cover time:     {:.6} s", t.cover.as_secs_f64())?;
        writeln!(out, "Selection time: {:.6} s", t.selection.as_secs_f64())?;
        writeln!(out, "Total time:     {:.6} s", t.total.as_secs_f64())?;
    }
    Ok(())
}

#[derive(Debug, Default)]
struct Tally {
    files: usize,
    minimized: usize,
    strong_eq: usize,
    subsumption: usize,
    subsumption_warned: usize,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

fn batch_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e == "lp" || e == "txt")
        })
        .collect();
    files.sort();
    Ok(files)
}

fn run_batch(dir: &Path, log: Option<&Path>, options: &Options) -> io::Result<Tally> {
    let minimizer = options.minimizer();
    let mut out: Box<dyn Write> = match log {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    let mut tally = Tally::default();
    for path in batch_files(dir)? {
        tally.files += 1;
        let program = match Program::from_file(&path) {
            Ok(program) => program,
            Err(e) => {
                writeln!(out, "{}: read error: {}", path.display(), e)?;
                continue;
            }
        };
        let report = match minimizer.run(&program) {
            Ok(report) => report,
            Err(MinimizationError::EmptyProgram) => {
                writeln!(out, "{}: no fundamental rules", path.display())?;
                continue;
            }
            Err(e) => {
                writeln!(out, "{}: {}", path.display(), e)?;
                continue;
            }
        };
        let Some(best) = report.best() else {
            continue;
        };
        tally.minimized += 1;

        let eq = strongly_equivalent(program.keys(), &best.keys);
        let sub = subsumption(program.keys(), &best.keys).outcome();
        tally.strong_eq += usize::from(eq);
        match sub {
            SubsumptionOutcome::Ok => tally.subsumption += 1,
            SubsumptionOutcome::Warning => tally.subsumption_warned += 1,
            SubsumptionOutcome::Error => {}
        }
        writeln!(
            out,
            "{}: {} -> {} rules, {} literals [STRONG EQ TEST] {} [SUBSUM TEST] {}",
            path.display(),
            program.len(),
            best.len(),
            best.literal_count,
            verdict(eq),
            sub
        )?;
        info!("{}: {:.6} s", path.display(), report.timings.total.as_secs_f64());
    }
    out.flush()?;
    Ok(tally)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Command::Batch { dir, log, options }) = &cli.command {
        match run_batch(dir, log.as_deref(), options) {
            Ok(tally) => {
                println!(
                    "[TEST RESULT] {} files, {} minimized, STRONG EQ {}/{} ({:.1}%), SUBSUM {}/{} ({:.1}%), {} simpler but not smaller",
                    tally.files,
                    tally.minimized,
                    tally.strong_eq,
                    tally.minimized,
                    percent(tally.strong_eq, tally.minimized),
                    tally.subsumption,
                    tally.minimized,
                    percent(tally.subsumption, tally.minimized),
                    tally.subsumption_warned
                );
            }
            Err(e) => {
                eprintln!("Error running batch on '{}': {}", dir.display(), e);
                process::exit(1);
            }
        }
        return;
    }

    let Some(input) = cli.input.as_deref() else {
        eprintln!("Error: no input file given");
        process::exit(2);
    };

    let program = read_program(input);
    let report = match cli.options.minimizer().run(&program) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error minimizing '{}': {}", input.display(), e);
            process::exit(1);
        }
    };

    if let Err(e) = print_report(&cli, &program, &report) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}
