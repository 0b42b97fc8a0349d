//! ddlkit: render DDL from schema files
//!
//! # Usage
//!
//! ```bash
//! # Print DDL for the file's own dialect (or the configured one)
//! ddlkit build schema.toml
//!
//! # Force a dialect and write to a file
//! ddlkit build schema.toml --dialect postgres --output schema.sql
//!
//! # Show resolved tables and column order
//! ddlkit explain schema.toml --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use ddlkit::config::Config;
use ddlkit::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ddlkit")]
#[command(version)]
#[command(about = "Schema definitions to MS-SQL / PostgreSQL DDL", long_about = None)]
#[command(after_help = "EXAMPLES:
    ddlkit build schema.toml
    ddlkit build schema.toml --dialect postgres --output schema.sql
    ddlkit explain schema.toml --format json
    ddlkit types --dialect mssql")]
struct Cli {
    /// Configuration file (defaults to ./ddlkit.toml, then the user config dir)
    #[arg(short, long, global = true, env = "DDLKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Mssql,
    Postgres,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Mssql => Dialect::MsSql,
            DialectArg::Postgres => Dialect::Postgres,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a schema file as DDL
    Build {
        /// Schema file (TOML)
        schema: PathBuf,

        /// Target dialect, overriding the file and the configuration
        #[arg(short, long, value_enum)]
        dialect: Option<DialectArg>,

        /// Write the script to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show resolved tables and their ordered columns
    Explain {
        /// Schema file (TOML)
        schema: PathBuf,

        #[arg(short, long, value_enum)]
        dialect: Option<DialectArg>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print a dialect's type-mapping table
    Types {
        #[arg(short, long, value_enum)]
        dialect: Option<DialectArg>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    match &cli.command {
        Commands::Build {
            schema,
            dialect,
            output,
        } => build(&config, schema, dialect.map(Dialect::from), output.as_deref()),
        Commands::Explain {
            schema,
            dialect,
            format,
        } => explain(&config, schema, dialect.map(Dialect::from), *format),
        Commands::Types { dialect } => {
            show_types(config.resolve_dialect(dialect.map(Dialect::from), None));
            Ok(())
        }
    }
}

fn load_builder(config: &Config, path: &Path, dialect: Option<Dialect>) -> Result<SqlBuilder> {
    let file = SchemaFile::load(path).with_context(|| format!("reading {}", path.display()))?;
    let dialect = config.resolve_dialect(dialect, file.dialect);
    let builder = file.apply(SqlBuilder::new().use_dialect(dialect))?;
    Ok(builder)
}

fn build(config: &Config, path: &Path, dialect: Option<Dialect>, output: Option<&Path>) -> Result<()> {
    let builder = load_builder(config, path, dialect)?;
    let mut sql = builder.build()?;
    if let Some(header) = &config.header {
        sql = format!("{}\n{}", header, sql);
    }

    match output {
        Some(output) => {
            std::fs::write(output, &sql)
                .with_context(|| format!("writing {}", output.display()))?;
            eprintln!(
                "{} Wrote {} statement block(s) to {}",
                "✓".green(),
                builder.objects().len(),
                output.display().to_string().cyan()
            );
        }
        None => print!("{}", sql),
    }
    Ok(())
}

fn explain(config: &Config, path: &Path, dialect: Option<Dialect>, format: OutputFormat) -> Result<()> {
    let builder = load_builder(config, path, dialect)?;
    let tables = builder.describe_tables();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tables)?);
        }
        OutputFormat::Text => {
            println!(
                "{} {}",
                "Dialect:".dimmed(),
                builder.dialect().name().cyan()
            );
            for table in &tables {
                println!();
                println!("{}", table.qualified().white().bold());
                for (position, column) in table.columns.iter().enumerate() {
                    let order = column
                        .order
                        .map(|o| o.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    let mut flags = Vec::new();
                    if column.primary_key {
                        flags.push("key");
                    }
                    if column.auto_increment {
                        flags.push("auto");
                    }
                    if column.required {
                        flags.push("required");
                    }
                    if column.unique {
                        flags.push("unique");
                    }
                    if column.index {
                        flags.push("index");
                    }
                    if column.foreign_key.is_some() {
                        flags.push("fk");
                    }
                    println!(
                        "  {:>2}  {:<24} {:<20} order={:<3} {}",
                        position,
                        column.name.yellow(),
                        column.field_type.to_string(),
                        order,
                        flags.join(" ").dimmed()
                    );
                }
            }
        }
    }
    Ok(())
}

fn show_types(dialect: Dialect) {
    let generator = dialect.generator();
    println!(
        "{} {} (default schema {})",
        "Type mapping for".white().bold(),
        generator.name().cyan(),
        generator.default_schema().cyan()
    );
    println!();
    for (field_type, sql_type) in generator.type_table() {
        let rendered = sql_type.sized(None, generator.max_length_spelling());
        println!("  {:<16} {}", field_type.to_string().yellow(), rendered);
    }
}
