use crate::cli::filters::FilterArgs;
use crate::export::ExportFormat;
use crate::models::upload::FileKind;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rTimeCompliance
/// Weekly timekeeping ETL and compliance KPIs on SQLite
#[derive(Parser)]
#[command(
    name = "rtimecompliance",
    version = env!("CARGO_PKG_VERSION"),
    about = "Import weekly timekeeping exports and report clock-in compliance KPIs using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// KPI section printed by `kpi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KpiSection {
    Summary,
    Compliance,
    Volume,
    Efficiency,
    Offices,
    Weeks,
    Employees,
    Departments,
    Shifts,
    Trends,
    Clock,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information and data freshness")]
        info: bool,

        #[arg(
            long = "backfill-weeks",
            help = "Fill missing ISO week numbers on legacy rows"
        )]
        backfill_weeks: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Import one source file, replacing the facts of its year
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Reporting year the file belongs to")]
        year: Option<i32>,

        #[arg(
            long,
            value_enum,
            help = "Source format (default: guessed from the extension)"
        )]
        kind: Option<FileKind>,

        #[arg(long = "clear-all", help = "Also delete the facts of every other year")]
        clear_all: bool,
    },

    /// Import every source file found in the data directory
    Sync {
        #[arg(long, help = "Only sync this year")]
        year: Option<i32>,

        #[arg(
            long = "clear-all",
            help = "Delete the facts of every other year before the first import"
        )]
        clear_all: bool,

        #[arg(long, value_name = "DIR", help = "Data directory (default: from config)")]
        dir: Option<String>,
    },

    /// List ETL runs or uploads, newest first
    History {
        #[arg(long, help = "List uploads instead of ETL runs")]
        uploads: bool,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Print compliance KPIs over the filtered facts
    Kpi {
        #[arg(value_enum)]
        section: KpiSection,

        #[arg(long, help = "Print JSON instead of a table")]
        json: bool,

        #[arg(long, help = "Keep only the top N rows (employees)")]
        limit: Option<usize>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Build the XLSX compliance report
    Report {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Summary + weekly trends instead of the full workbook")]
        weekly: bool,

        #[arg(long, short = 'f')]
        force: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Export the filtered facts
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Totals and per-entry-type breakdown of the filtered facts
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Distinct values available for filtering
    Options,
}
