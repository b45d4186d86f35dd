use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use golf_tourney::import::{self, ImportContext, ImportOptions};
use golf_tourney::sheet::{self, Workbook};
use golf_tourney::store::{seed, Store};
use golf_tourney::ImportConfig;

#[derive(Parser)]
#[command(name = "golf-tourney")]
#[command(about = "Import golf tournament spreadsheets into a SQLite store", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "GOLF_TOURNEY_DB", default_value = "tourney.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema
    Init,

    /// Create the schema and insert registers, season, teams and day defaults
    Seed {
        /// TOML file overriding sheet names, columns and defaults
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Season year (overrides the mapping file)
        #[arg(long)]
        season: Option<i64>,
    },

    /// Import a workbook (xlsx/ods file or directory of CSV exports)
    Import {
        /// Roll everything back at the end
        #[arg(long)]
        dry: bool,

        /// Only look at the first N Games rows (0 = all)
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Workbook file or CSV directory
        #[arg(long, default_value = "./data/appsheet.xlsx")]
        workbook: PathBuf,

        /// Where to write the JSON run report
        #[arg(long, default_value = "import-report.json")]
        report: PathBuf,

        /// TOML file overriding sheet names, columns and defaults
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Season year (overrides the mapping file)
        #[arg(long)]
        season: Option<i64>,

        /// Match participant names on a unique surname when the full name is unknown
        #[arg(long)]
        surname_fallback: bool,
    },

    /// Write an empty workbook with the expected sheets and headers
    Template {
        /// Output .xlsx file
        output: PathBuf,

        /// TOML file overriding sheet names and columns
        #[arg(long)]
        mapping: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init(&cli.db)?;
        }
        Commands::Seed { mapping, season } => {
            let config = load_config(mapping.as_deref(), season)?;
            seed_store(&cli.db, &config)?;
        }
        Commands::Import {
            dry,
            limit,
            workbook,
            report,
            mapping,
            season,
            surname_fallback,
        } => {
            let config = load_config(mapping.as_deref(), season)?;
            let options = ImportOptions {
                dry_run: dry,
                limit,
                surname_fallback,
            };
            run_import(&cli.db, &workbook, &report, &config, &options)?;
        }
        Commands::Template { output, mapping } => {
            let config = load_config(mapping.as_deref(), None)?;
            println!("Writing template: {}", output.display());
            sheet::write_template(&output, &config).context("Failed to write template")?;
            println!("Done!");
        }
    }

    Ok(())
}

fn load_config(mapping: Option<&Path>, season: Option<i64>) -> Result<ImportConfig> {
    let mut config = match mapping {
        Some(path) => ImportConfig::from_toml_file(path)
            .with_context(|| format!("Failed to read mapping file {}", path.display()))?,
        None => ImportConfig::default(),
    };
    if let Some(year) = season {
        config.season.year = year;
    }
    Ok(config)
}

fn open_store(db: &Path) -> Result<Store> {
    let store = Store::open(db).with_context(|| format!("Failed to open database {}", db.display()))?;
    store.migrate().context("Failed to create schema")?;
    Ok(store)
}

fn init(db: &Path) -> Result<()> {
    open_store(db)?;
    println!("Schema ready in {}", db.display());
    Ok(())
}

fn seed_store(db: &Path, config: &ImportConfig) -> Result<()> {
    let store = open_store(db)?;
    let season = seed::seed_all(&store, config).context("Failed to seed reference data")?;
    println!(
        "Seeded season {} '{}' (id {})",
        config.season.year, config.season.name, season
    );
    Ok(())
}

fn run_import(
    db: &Path,
    workbook_path: &Path,
    report_path: &Path,
    config: &ImportConfig,
    options: &ImportOptions,
) -> Result<()> {
    println!("Reading workbook: {}", workbook_path.display());
    let workbook = Workbook::open(workbook_path).context("Failed to read workbook")?;
    println!("Found sheets: {}", workbook.sheet_names().join(", "));

    let store = open_store(db)?;
    let mut ctx = ImportContext::new(config, &store);
    let outcome = import::run(&mut ctx, &workbook, options);

    ctx.report
        .write(report_path)
        .with_context(|| format!("Failed to write report {}", report_path.display()))?;
    println!("Report written to {}", report_path.display());

    if let Err(e) = outcome {
        if let Some(failure) = ctx.report.errors.last() {
            println!("Failed statement: {}", failure.sql);
        }
        return Err(e).context("Import aborted");
    }

    println!("{}", ctx.report.summary());
    if ctx.report.dry_run {
        println!("Dry run: nothing was committed");
    }
    for (table, n) in store.table_counts()? {
        println!("  {:<20} {}", table, n);
    }
    if ctx.report.has_warnings() {
        println!("Some rows could not be matched, see the report for details");
    }
    if !ctx.report.errors.is_empty() {
        bail!("{} statements failed", ctx.report.errors.len());
    }

    Ok(())
}
