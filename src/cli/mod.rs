//! Command-line interface for qpcr_ddct

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qpcr_ddct")]
#[command(version)]
#[command(about = "Relative qPCR expression (ΔΔCt) analysis in Rust")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the results table and run metadata from an instrument export
    #[command(
        about = "Extract the results table from an instrument export",
        long_about = "Extract the results table from an instrument export\n\n\
            Instrument exports start with a block of Variable,Value lines describing\n\
            the run, followed by the per-well results table. This writes the results\n\
            as a clean measurement table and, optionally, the run metadata.",
        after_long_help = "\
Examples:
  # QuantStudio-style export: 17 metadata lines, results header on line 20
  qpcr_ddct parse -i export.csv -o plate.csv --metadata-output run_info.csv

  # Custom layout
  qpcr_ddct parse -i export.csv -o plate.csv --skip-rows 42 --metadata-rows 40"
    )]
    Parse {
        /// Path to the instrument export (CSV or TSV)
        #[arg(short, long)]
        input: String,

        /// Output path for the measurement table
        #[arg(short, long, default_value = "measurements.csv")]
        output: String,

        /// Output path for the run metadata
        #[arg(long, value_name = "PATH")]
        metadata_output: Option<String>,

        /// Lines before the results table header [default: 19]
        #[arg(long, default_value_t = 19)]
        skip_rows: usize,

        /// Leading Variable,Value metadata lines [default: 17]
        #[arg(long, default_value_t = 17)]
        metadata_rows: usize,
    },

    /// Run the ΔΔCt analysis
    #[command(
        about = "Run the ΔΔCt analysis",
        long_about = "Run the ΔΔCt analysis\n\n\
            Normalises every Ct against the housekeeping gene of the same condition\n\
            and time point, references it against the control condition, and\n\
            reports fold induction 2^(-ΔΔCt). Missing Ct values stay missing.",
        after_long_help = "\
Examples:
  qpcr_ddct analyze -i plate.csv --housekeeping Gapdh --control PBS -o plate_ddct.csv

  # With a config file and a per-gene report directory
  qpcr_ddct analyze -i plate.csv --config ddct.json --report-dir report/"
    )]
    Analyze {
        /// Path to the measurement table (CSV or TSV)
        #[arg(short, long,
            long_help = "Path to the measurement table.\n\
                Required columns: well, gene, condition, time point, Ct value.\n\
                Header spelling is flexible (\"Target Name\", \"Sample Name\", \"CT\", ...).\n\
                Supports both CSV (comma) and TSV (tab) delimiters (auto-detected).")]
        input: String,

        /// Housekeeping (reference) gene
        #[arg(long, value_name = "GENE")]
        housekeeping: Option<String>,

        /// Control condition
        #[arg(long, value_name = "CONDITION")]
        control: Option<String>,

        /// JSON config file with housekeeping_gene and control_condition
        #[arg(long, value_name = "PATH",
            long_help = "JSON config file, e.g.\n\
                {\"housekeeping_gene\": \"Gapdh\", \"control_condition\": \"PBS\"}\n\
                --housekeeping and --control override the file.")]
        config: Option<String>,

        /// Output path for the augmented table [default: ddct_results.csv]
        #[arg(short, long, default_value = "ddct_results.csv")]
        output: String,

        /// Also write a per-gene report into this directory
        #[arg(long, value_name = "DIR")]
        report_dir: Option<String>,

        /// Number of threads (0 = all cores)
        #[arg(short, long, default_value_t = 0)]
        threads: usize,
    },

    /// Write per-gene report sheets from calculated results
    #[command(
        about = "Write report sheets from calculated results",
        long_about = "Write report sheets from calculated results\n\n\
            With one input the table is split into one sheet per gene, sorted by\n\
            well column and row. With several inputs each table is written as-is\n\
            under its position (0, 1, ...).",
        after_long_help = "\
Examples:
  qpcr_ddct report -i plate_ddct.csv -o report/
  qpcr_ddct report -i il6.csv -i tnf.csv -o report/"
    )]
    Report {
        /// Calculated results table(s), as written by `analyze`
        #[arg(short, long, required = true)]
        input: Vec<String>,

        /// Output directory
        #[arg(short, long, default_value = "report")]
        output: String,
    },
}
