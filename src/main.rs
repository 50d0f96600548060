//! qpcr_ddct command-line interface

use clap::Parser;
use log::{info, warn, LevelFilter};

use qpcr_ddct::cli::{Cli, Commands};
use qpcr_ddct::prelude::*;
use qpcr_ddct::run_ddct;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Find the first non-flag argument (potential subcommand)
    let first_positional = args.iter().skip(1).find(|a| !a.starts_with('-'));
    let subcommands = ["parse", "analyze", "report", "help"];
    let has_subcommand = first_positional.map_or(false, |a| subcommands.contains(&a.as_str()));

    if !has_subcommand {
        if args.iter().any(|a| a == "-h" || a == "--help") {
            print_help();
            return;
        }
        if args.iter().any(|a| a == "-V" || a == "--version") {
            println!("qpcr_ddct {}", VERSION);
            return;
        }
        print_no_args();
        return;
    }

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Some(Commands::Parse {
            input,
            output,
            metadata_output,
            skip_rows,
            metadata_rows,
        }) => run_parse(
            &input,
            &output,
            metadata_output.as_deref(),
            RawExportLayout {
                skip_rows,
                metadata_rows,
            },
        ),
        Some(Commands::Analyze {
            input,
            housekeeping,
            control,
            config,
            output,
            report_dir,
            threads,
        }) => run_analyze(
            &input,
            housekeeping,
            control,
            config.as_deref(),
            &output,
            report_dir.as_deref(),
            threads,
        ),
        Some(Commands::Report { input, output }) => run_report(&input, &output),
        None => {
            print_no_args();
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Custom help output
// ---------------------------------------------------------------------------

fn print_no_args() {
    println!("qpcr_ddct v{}", VERSION);
    println!("Run `qpcr_ddct -h` for usage.");
}

fn print_help() {
    println!("qpcr_ddct v{}", VERSION);
    println!("Relative qPCR expression (ΔΔCt) analysis");
    println!();
    println!("Usage: qpcr_ddct <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  parse      Extract the results table from an instrument export");
    println!("  analyze    Run the ΔΔCt analysis");
    println!("  report     Write per-gene report sheets from calculated results");
    println!();
    println!("Global Options:");
    println!("  -v, --verbose    Enable verbose output");
    println!("  -h, --help       Print help");
    println!("  -V, --version    Print version");
    println!();
    println!("Examples:");
    println!("  qpcr_ddct parse -i export.csv -o plate.csv");
    println!("  qpcr_ddct analyze -i plate.csv --housekeeping Gapdh --control PBS \\");
    println!("    -o plate_ddct.csv --report-dir report/");
    println!("  qpcr_ddct report -i plate_ddct.csv -o report/");
    println!();
    println!("Run `qpcr_ddct <COMMAND> --help` for command-specific options.");
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

fn run_parse(
    input_path: &str,
    output_path: &str,
    metadata_path: Option<&str>,
    layout: RawExportLayout,
) -> Result<()> {
    info!("Reading instrument export from: {}", input_path);
    let (metadata, table) = read_raw_export(input_path, layout)?;
    info!(
        "  {} measurements, {} metadata entries",
        table.len(),
        metadata.entries.len()
    );

    write_measurements(output_path, &table)?;
    info!("Measurements written to: {}", output_path);

    if let Some(path) = metadata_path {
        write_run_metadata(path, &metadata)?;
        info!("Run metadata written to: {}", path);
    }

    Ok(())
}

fn run_analyze(
    input_path: &str,
    housekeeping: Option<String>,
    control: Option<String>,
    config_path: Option<&str>,
    output_path: &str,
    report_dir: Option<&str>,
    threads: usize,
) -> Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    // Config file first, command-line flags override it
    let file_config = match config_path {
        Some(path) => {
            info!("Loading config from: {}", path);
            ConfigOverrides::from_json_file(path)?
        }
        None => ConfigOverrides::default(),
    };
    let config = file_config
        .merge(ConfigOverrides {
            housekeeping_gene: housekeeping,
            control_condition: control,
        })
        .resolve()?;
    info!(
        "Housekeeping gene: {}, control condition: {}",
        config.housekeeping_gene, config.control_condition
    );

    info!("Loading measurements from: {}", input_path);
    let table = read_measurements(input_path)?;

    let analysis = run_ddct(&table, &config)?;
    if !analysis.warnings.is_empty() {
        warn!("{} warning(s) during analysis", analysis.warnings.len());
    }

    write_results(output_path, &analysis.results)?;
    info!("Results written to: {}", output_path);

    if let Some(dir) = report_dir {
        let manifest = write_report(dir, &analysis.report())?;
        info!("Report with {} sheets written to: {}", manifest.sheets.len(), dir);
    }

    Ok(())
}

fn run_report(input_paths: &[String], output_dir: &str) -> Result<()> {
    let input = match input_paths {
        [] => {
            return Err(QpcrError::InvalidInput {
                reason: "at least one results table is required".to_string(),
            })
        }
        [single] => {
            info!("Loading results from: {}", single);
            ReportInput::ByGene(read_results(single)?)
        }
        many => {
            let tables = many
                .iter()
                .map(|path| {
                    info!("Loading results from: {}", path);
                    read_results(path)
                })
                .collect::<Result<Vec<_>>>()?;
            ReportInput::Indexed(tables)
        }
    };

    let report = build_report(input);
    let manifest = write_report(output_dir, &report)?;
    info!("Report with {} sheets written to: {}", manifest.sheets.len(), output_dir);

    Ok(())
}
