use std::{fs, io::Read, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use form_core::{render, submit, validate, SubmitOutcome};
use serde_json::json;
use shared::domain::{FormState, FormValues};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(about = "Check and compute monthly figure tables offline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct Shape {
    #[arg(long, default_value_t = 1)]
    tables: u32,
    #[arg(long, default_value_t = 1)]
    rows: u32,
    /// Year of the first row; defaults to the current year.
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report gaps and table mismatches.
    Validate {
        #[command(flatten)]
        shape: Shape,
        /// JSON file of `table -> row -> cell -> value`, or `-` for stdin.
        input: PathBuf,
    },
    /// Validate, then print the values with derived cells filled in.
    Submit {
        #[command(flatten)]
        shape: Shape,
        input: PathBuf,
    },
    /// Print the render model of a form.
    Render {
        #[command(flatten)]
        shape: Shape,
        #[arg(long, default_value_t = form_core::DEFAULT_PRECISION)]
        precision: u32,
        input: Option<PathBuf>,
    },
}

impl Shape {
    fn state(&self) -> FormState {
        FormState {
            table_count: self.tables.max(1),
            row_count: self.rows.max(1),
        }
    }

    fn year(&self) -> i32 {
        self.year.unwrap_or_else(form_core::current_year)
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let (output, ok) = run(cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn run(command: Command) -> Result<(serde_json::Value, bool)> {
    match command {
        Command::Validate { shape, input } => {
            let values = read_values(&input)?;
            let errors = validate(shape.state(), &values);
            debug!(errors = errors.len(), "validated");
            Ok((json!({ "errors": errors.messages() }), errors.is_empty()))
        }
        Command::Submit { shape, input } => {
            let values = read_values(&input)?;
            match submit(shape.state(), values, shape.year()) {
                SubmitOutcome::Accepted { transition, values } => Ok((
                    json!({ "status": transition.status, "values": values }),
                    true,
                )),
                SubmitOutcome::Rejected(errors) => {
                    Ok((json!({ "errors": errors.messages() }), false))
                }
            }
        }
        Command::Render {
            shape,
            precision,
            input,
        } => {
            let values = match input {
                Some(path) => read_values(&path)?,
                None => FormValues::new(),
            };
            let view = render(shape.state(), &values, shape.year(), precision);
            Ok((serde_json::to_value(view)?, true))
        }
    }
}

fn read_values(path: &PathBuf) -> Result<FormValues> {
    let raw = if path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read values from stdin")?;
        raw
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read values file '{}'", path.display()))?
    };
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid form values in '{}'", path.display()))
}
