//! qexpr: inspect model reflection and build sample statements.
//!
//! # Usage
//!
//! ```bash
//! # Classify every member of the models in a schema file
//! qexpr inspect --schema models.toml
//!
//! # Same, as JSON
//! qexpr inspect --schema models.toml --format json
//!
//! # Build the sample User statement
//! qexpr demo
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use qexpr::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qexpr")]
#[command(version)]
#[command(about = "Statically-checked query expressions over reflected models", long_about = None)]
#[command(after_help = "EXAMPLES:
    qexpr inspect --schema models.toml
    QEXPR_SCHEMA=models.json qexpr inspect --format json
    qexpr demo --format json")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, ValueEnum)]
enum DemoFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how each model member is classified
    Inspect {
        /// Schema file (TOML, or JSON by extension)
        #[arg(short, long, env = "QEXPR_SCHEMA")]
        schema: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Build the sample User statement
    Demo {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: DemoFormat,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Inspect { schema, format } => inspect(schema.as_deref(), format),
        Commands::Demo { format } => demo(format),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "qexpr=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `--schema` / `QEXPR_SCHEMA`, then `./qexpr.toml`, then the user config dir.
fn resolve_schema_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let local = PathBuf::from("qexpr.toml");
    if local.exists() {
        return Ok(local);
    }

    if let Some(dir) = dirs::config_dir() {
        let path = dir.join("qexpr").join("models.toml");
        if path.exists() {
            return Ok(path);
        }
    }

    anyhow::bail!("No schema found. Use --schema, set QEXPR_SCHEMA, or create qexpr.toml")
}

fn inspect(schema: Option<&Path>, format: &OutputFormat) -> anyhow::Result<()> {
    let path = resolve_schema_path(schema)?;
    tracing::debug!(path = %path.display(), "loading schema");

    let file = SchemaFile::load(&path).with_context(|| format!("Failed to load {}", path.display()))?;
    let entities = file
        .models
        .iter()
        .map(define)
        .collect::<QueryResult<Vec<Entity>>>()?;

    match format {
        OutputFormat::Json => {
            let reflections: Vec<&Reflection> = entities.iter().map(|e| e.reflection()).collect();
            println!("{}", serde_json::to_string_pretty(&reflections)?);
        }
        OutputFormat::Table => {
            for entity in &entities {
                print_entity(entity);
                println!();
            }
            println!("{} model(s)", entities.len().to_string().cyan());
        }
    }
    Ok(())
}

fn print_entity(entity: &Entity) {
    println!("{}", entity.name().cyan().bold());
    println!("{}", "─".repeat(56).dimmed());

    for attr in entity.attributes() {
        let (category, detail) = match attr {
            Attribute::Column(c) => {
                let nullable = if c.nullable { "?" } else { "" };
                ("column".green(), format!("{}{}", c.ty, nullable))
            }
            Attribute::NonPrimitive(n) => ("non-primitive".yellow(), n.declared.to_string()),
            Attribute::Derived(d) => ("derived".blue(), d.ty.to_string()),
            Attribute::Function(_) => ("function".red(), "()".to_string()),
        };
        println!("  {:20} {:15} {}", attr.key().white(), category, detail.dimmed());
    }
}

struct UserModel;

impl Model for UserModel {
    fn shape() -> ModelShape {
        ModelShape::new("User")
            .field("id", PrimitiveType::Number)
            .field("firstName", PrimitiveType::String)
            .field("lastName", PrimitiveType::String)
            .field("age", PrimitiveType::Number)
            .field("foo", "Foo")
            .getter("isMajor", PrimitiveType::Boolean)
            .getter("infos", "Infos")
            .method("doSomething")
    }
}

fn demo(format: &DemoFormat) -> anyhow::Result<()> {
    let user = define_model::<UserModel>()?;

    let id = user.number("id")?;
    let first_name = user.text("firstName")?;
    let age = user.number("age")?;

    let stmt = user
        .objects()
        .load([first_name.alias("foo"), literal(1).plus(&age).alias("value")])?
        .filter([id.gt(1), id.plus(12).gte(12)])?
        .filter([
            first_name.contains("foo").or(age.ls(10)),
            age.ls(10),
            id.ls(10),
        ])?
        .group_by([Expression::from(&id), first_name.ls("12").into()])?
        .having([first_name.contains("12")])?;

    match format {
        DemoFormat::Json => println!("{}", serde_json::to_string_pretty(&stmt)?),
        DemoFormat::Text => {
            println!("{}", "Statement:".green().bold());
            println!("{}", stmt.to_string().white());
            println!();
            if let Err(e) = user.column("isMajor") {
                println!("{} {}", "isMajor:".dimmed(), e.to_string().yellow());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_format_defaults_to_text() {
        let cli = Cli::try_parse_from(["qexpr", "demo"]).unwrap();
        assert!(matches!(cli.command, Commands::Demo { format: DemoFormat::Text }));
    }

    #[test]
    fn test_demo_format_values() {
        let cli = Cli::try_parse_from(["qexpr", "demo", "--format", "text"]).unwrap();
        assert!(matches!(cli.command, Commands::Demo { format: DemoFormat::Text }));

        let cli = Cli::try_parse_from(["qexpr", "demo", "--format", "json"]).unwrap();
        assert!(matches!(cli.command, Commands::Demo { format: DemoFormat::Json }));

        assert!(Cli::try_parse_from(["qexpr", "demo", "--format", "table"]).is_err());
    }

    #[test]
    fn test_inspect_args() {
        let cli = Cli::try_parse_from(["qexpr", "-v", "inspect", "--schema", "m.toml", "--format", "json"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Inspect { schema, format } => {
                assert_eq!(schema, Some(PathBuf::from("m.toml")));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn test_demo_builds_statement() {
        assert!(demo(&DemoFormat::Json).is_ok());
    }
}
