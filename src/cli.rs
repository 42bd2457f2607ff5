//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_edit_adapter::CsvEditAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::error::CalcError;
use crate::domain::field::FieldId;
use crate::domain::form::CalculatorForm;
use crate::domain::format::FormatOptions;
use crate::domain::rule::inconsistent_targets;
use crate::domain::settings::Settings;
use crate::domain::snapshot::FieldSnapshot;
use crate::domain::validation::parse_field;
use crate::ports::config_port::ConfigPort;
use crate::ports::edit_source::{EditSource, ScriptedEdit};

/// Tolerance used when reporting formulas the result does not satisfy.
const CONSISTENCY_TOLERANCE: f64 = 1e-6;

#[derive(Parser, Debug)]
#[command(
    name = "tradecalc",
    about = "Position calculator: fill in trade fields from any known subset"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive every field after editing one
    Derive {
        /// Known value, e.g. entryPrice=100 (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// The field that was just edited
        #[arg(short, long)]
        edited: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Replay a CSV edit script through the form
    Replay {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List field identifiers and labels
    Fields,
    /// Validate a configuration file
    CheckConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Derive {
            set,
            edited,
            config,
        } => run_derive(&set, &edited, config.as_ref()),
        Command::Replay { input, config } => run_replay(&input, config.as_ref()),
        Command::Fields => run_fields(),
        Command::CheckConfig { config } => run_check_config(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = CalcError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Validate `adapter` and read settings from it, defaulting absent keys.
pub fn build_settings(adapter: &dyn ConfigPort) -> Result<Settings, CalcError> {
    validate_config(adapter)?;
    let defaults = Settings::default();
    Ok(Settings {
        max_rounds: adapter.get_int("engine", "max_rounds", defaults.max_rounds as i64) as usize,
        tolerance: adapter.get_double("engine", "tolerance", defaults.tolerance),
        format: FormatOptions {
            precision: adapter.get_int("display", "precision", defaults.format.precision as i64)
                as usize,
            integer_tolerance: adapter.get_double(
                "display",
                "integer_tolerance",
                defaults.format.integer_tolerance,
            ),
        },
        missing_threshold: adapter.get_int(
            "form",
            "missing_threshold",
            defaults.missing_threshold as i64,
        ) as usize,
    })
}

fn load_settings(config_path: Option<&PathBuf>) -> Result<Settings, ExitCode> {
    let Some(path) = config_path else {
        return Ok(Settings::default());
    };
    tracing::info!(path = %path.display(), "loading config");
    let adapter = load_config(path)?;
    build_settings(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Parse `FIELD=VALUE`. An empty value means the field is unknown.
pub fn parse_assignment(assignment: &str) -> Result<(FieldId, Option<f64>), CalcError> {
    let (name, raw) = assignment
        .split_once('=')
        .ok_or_else(|| CalcError::UnknownField {
            name: assignment.trim().to_string(),
        })?;
    let field = name.parse::<FieldId>()?;
    let value = parse_field(field, raw)?;
    Ok((field, value))
}

/// Snapshot holding every `FIELD=VALUE` assignment; later ones win.
pub fn build_snapshot(assignments: &[String]) -> Result<FieldSnapshot, CalcError> {
    assignments
        .iter()
        .try_fold(FieldSnapshot::empty(), |snapshot, a| {
            let (field, value) = parse_assignment(a)?;
            Ok(snapshot.with(field, value))
        })
}

/// One `label  value` line per field, unknown values shown as `-`.
pub fn render_table(snapshot: &FieldSnapshot, format: &FormatOptions) -> String {
    render_lines(|field| format.format(snapshot.get(field)))
}

/// Same layout as [`render_table`], using the form's display text.
pub fn render_form(form: &CalculatorForm) -> String {
    render_lines(|field| form.display(field).to_string())
}

fn render_lines(text: impl Fn(FieldId) -> String) -> String {
    let mut out = String::new();
    for field in FieldId::ALL {
        let value = text(field);
        let value = if value.is_empty() { "-".to_string() } else { value };
        out.push_str(&format!("{:<17}{}\n", field.label(), value));
    }
    out
}

pub fn run_derive(assignments: &[String], edited: &str, config_path: Option<&PathBuf>) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let edited = match edited.parse::<FieldId>() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let snapshot = match build_snapshot(assignments) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if !snapshot.is_known(edited) {
        tracing::info!(%edited, "edited field has no value, treating the edit as a clear");
    }

    let propagation = settings.engine().propagate(&snapshot, edited);
    if propagation.hit_round_cap() {
        eprintln!(
            "warning: no fixed point after {} rounds, showing last approximation",
            propagation.rounds
        );
    }
    for field in inconsistent_targets(&propagation.snapshot, CONSISTENCY_TOLERANCE) {
        eprintln!("warning: {} disagrees with the other fields", field.label());
    }

    print!("{}", render_table(&propagation.snapshot, &settings.format));
    ExitCode::SUCCESS
}

pub fn run_replay(input: &PathBuf, config_path: Option<&PathBuf>) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    tracing::info!(path = %input.display(), "loading edit script");
    let edits = match CsvEditAdapter::new(input.clone()).load_edits() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut form = settings.form();
    let rejected = replay_edits(&mut form, &edits);
    tracing::info!(applied = edits.len() - rejected, rejected, "edit script replayed");

    print!("{}", render_form(&form));
    println!("{:<17}{} / {}", "Provided", form.provided_count(), FieldId::COUNT);

    let missing = form.missing_fields();
    if !missing.is_empty() {
        let labels: Vec<_> = missing.iter().map(|f| f.label()).collect();
        println!("{:<17}{}", "Missing", labels.join(", "));
    }
    ExitCode::SUCCESS
}

/// Apply `edits` in order, reporting and skipping rejected ones. Returns
/// the number of rejected edits.
pub fn replay_edits(form: &mut CalculatorForm, edits: &[ScriptedEdit]) -> usize {
    let mut rejected = 0;
    for (i, edit) in edits.iter().enumerate() {
        match form.set_input(edit.field, &edit.raw) {
            Ok(()) => {
                if let Some(p) = form.last_propagation() {
                    tracing::info!(
                        step = i + 1,
                        field = %edit.field,
                        rounds = p.rounds,
                        converged = p.converged,
                        "edit applied"
                    );
                }
            }
            Err(e) => {
                eprintln!("warning: edit {} skipped: {e}", i + 1);
                rejected += 1;
            }
        }
    }
    rejected
}

fn run_fields() -> ExitCode {
    for field in FieldId::ALL {
        println!("{:<16}{}", field.id(), field.label());
    }
    ExitCode::SUCCESS
}

fn run_check_config(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match build_settings(&adapter) {
        Ok(settings) => {
            eprintln!("  max_rounds:        {}", settings.max_rounds);
            eprintln!("  tolerance:         {:e}", settings.tolerance);
            eprintln!("  precision:         {}", settings.format.precision);
            eprintln!("  integer_tolerance: {:e}", settings.format.integer_tolerance);
            eprintln!("  missing_threshold: {}", settings.missing_threshold);
            eprintln!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
