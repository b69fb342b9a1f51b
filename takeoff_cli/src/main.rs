//! # takeoff CLI
//!
//! Terminal front end for the takeoff engine. Reads a configuration or a
//! `.tko` project file, runs the calculation and prints the materials list,
//! the loading plan and the advisory checks.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;

mod files;
mod render;

#[derive(Parser)]
#[command(name = "takeoff")]
#[command(about = "Scaffold quantity takeoff and truck loading", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate materials, weight and loading plan
    Calc {
        /// Configuration JSON or .tko project
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show only the advisory consistency checks
    Check {
        /// Configuration JSON or .tko project
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print a default configuration to start from
    Template {
        /// Wrap the configuration in an empty project
        #[arg(long)]
        project: bool,
    },

    /// Create a new project file
    New {
        /// Where to write the project
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Site or building name
        #[arg(long, default_value = "")]
        site: String,

        /// Person responsible for the plan
        #[arg(long, default_value = "")]
        planner: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger with default level (overridden by RUST_LOG)
    let env = Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Calc { file, format } => calc(&file, format),
        Commands::Check { file } => check(&file),
        Commands::Template { project } => template(project),
        Commands::New {
            file,
            site,
            planner,
        } => files::create_project(&file, site, planner),
    }
}

fn calc(file: &std::path::Path, format: OutputFormat) -> anyhow::Result<()> {
    let input = files::load_input(file)?;
    let assessment = takeoff_core::assess(&input.configuration);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        OutputFormat::Text => {
            if let Some(header) = input.header() {
                println!("{}\n", header);
            }
            let (text, err) = render::assessment_text(&assessment);
            print!("{}", text);
            if let Some(err) = err {
                return Err(calculation_error(err));
            }
        }
    }
    Ok(())
}

/// Tell configuration mistakes apart from engine failures
fn calculation_error(err: takeoff_core::CalcError) -> anyhow::Error {
    let context = if err.is_structural() {
        "The configuration cannot be calculated"
    } else {
        "Calculation failed"
    };
    anyhow::Error::new(err).context(context)
}

fn check(file: &std::path::Path) -> anyhow::Result<()> {
    let input = files::load_input(file)?;
    let validation = takeoff_core::validate(&input.configuration);
    print!("{}", render::validation_text(&validation));
    if let Err(err) = input.configuration.validate() {
        println!("configuration: {}", err);
    }
    Ok(())
}

fn template(project: bool) -> anyhow::Result<()> {
    let json = if project {
        takeoff_core::Project::default().to_json()?
    } else {
        serde_json::to_string_pretty(&takeoff_core::Configuration::default())?
    };
    println!("{}", json);
    Ok(())
}
