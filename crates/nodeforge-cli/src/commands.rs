//! Subcommand implementations

use crate::args::{Cli, Command};
use crate::files::{read_file_set, write_file_set};
use anyhow::{bail, Context, Result};
use nodeforge_core::Scaffolder;
use nodeforge_generator::GeneratorConfig;
use nodeforge_model::{DenyList, DependencyTable, IndicatorTable, KnowledgeBase, WorkflowSpec};
use nodeforge_validator::{Severity, ValidationResult};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

/// How a command ended when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// Files were checked and validation reported errors
    ValidationFailed,
}

impl Status {
    fn from_result(result: &ValidationResult) -> Self {
        if result.is_usable() {
            Self::Success
        } else {
            Self::ValidationFailed
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::ValidationFailed => ExitCode::from(1),
        }
    }
}

/// Run one parsed command line
///
/// # Errors
/// Unreadable inputs, rejected specifications or tables, and write failures
pub fn run(cli: Cli) -> Result<Status> {
    let knowledge = load_tables(cli.tables.as_deref())?;
    let config = load_config(cli.config.as_deref())?;
    let scaffolder = Scaffolder::new(Arc::new(knowledge), config)?;

    match cli.command {
        Command::Generate { spec, out, force } => generate(&scaffolder, &spec, &out, force),
        Command::Classify {
            spec,
            description,
            json,
        } => classify(&scaffolder, spec.as_deref(), description, json),
        Command::Validate { dir, json } => validate(&scaffolder, &dir, json),
    }
}

fn generate(scaffolder: &Scaffolder, spec: &Path, out: &Path, force: bool) -> Result<Status> {
    let spec = load_spec(spec)?;
    let outcome = scaffolder.scaffold(&spec)?;
    let written = write_file_set(&outcome.files, out, force)?;

    println!(
        "wrote {written} files to {} ({} pattern, fingerprint {})",
        out.display(),
        outcome.pattern,
        outcome.files.fingerprint().short()
    );
    print_report(&outcome.validation);
    Ok(Status::from_result(&outcome.validation))
}

fn classify(scaffolder: &Scaffolder, spec: Option<&Path>, description: Option<String>, json: bool) -> Result<Status> {
    let (description, declared) = match (spec, description) {
        (Some(path), _) => {
            let spec = load_spec(path)?;
            (spec.description, spec.pattern)
        }
        (None, Some(description)) => (description, None),
        (None, None) => bail!("either a specification or --description is required"),
    };

    let recommendations = scaffolder.classify(&description, declared);
    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        for recommendation in &recommendations {
            println!(
                "{:<16} {:.2}  {}",
                recommendation.pattern.to_string(),
                recommendation.confidence,
                recommendation.rationale
            );
        }
    }
    Ok(Status::Success)
}

fn validate(scaffolder: &Scaffolder, dir: &Path, json: bool) -> Result<Status> {
    let files = read_file_set(dir)?;
    if files.is_empty() {
        bail!("no files to validate under {}", dir.display());
    }

    let result = scaffolder.validate(&files);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }
    Ok(Status::from_result(&result))
}

fn print_report(result: &ValidationResult) {
    for severity in [Severity::Error, Severity::Warning] {
        for finding in result.findings(severity) {
            println!("{severity}: {finding}");
        }
    }
    println!(
        "{} errors, {} warnings, {} info",
        result.errors.len(),
        result.warnings.len(),
        result.info.len()
    );
}

/// Parse a specification document, JSON by extension, YAML otherwise
fn load_spec(path: &Path) -> Result<WorkflowSpec> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let spec = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        WorkflowSpec::from_json_str(&text)
    } else {
        WorkflowSpec::from_yaml_str(&text)
    };
    spec.with_context(|| format!("parsing {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_tables(dir: Option<&Path>) -> Result<KnowledgeBase> {
    let Some(dir) = dir else {
        return Ok(KnowledgeBase::builtin()?);
    };

    let indicators = match read_table(dir, "indicators.yaml")? {
        Some(text) => IndicatorTable::from_yaml_str(&text).context("loading indicators.yaml")?,
        None => IndicatorTable::builtin()?,
    };
    let dependencies = match read_table(dir, "dependencies.yaml")? {
        Some(text) => DependencyTable::from_yaml_str(&text).context("loading dependencies.yaml")?,
        None => DependencyTable::builtin()?,
    };
    let deny_list = match read_table(dir, "deny_list.yaml")? {
        Some(text) => DenyList::from_yaml_str(&text).context("loading deny_list.yaml")?,
        None => DenyList::builtin()?,
    };
    Ok(KnowledgeBase::new(indicators, dependencies, deny_list))
}

fn read_table(dir: &Path, name: &str) -> Result<Option<String>> {
    let path = dir.join(name);
    if !path.exists() {
        tracing::debug!(table = name, "using built-in table");
        return Ok(None);
    }
    fs::read_to_string(&path)
        .map(Some)
        .with_context(|| format!("reading {}", path.display()))
}
