use std::path::Path;

use anyhow::{Context, Result};
use configurator_catalog::{CatalogSource, DoctorReport, LoadedCatalog, load_with_fallback};
use configurator_cli::replay::{ReplayOutcome, load_script, run_script};
use configurator_engine::{CascadeController, EngineOptions, SelectionRecord, SubmissionRecord};
use configurator_model::DriverField;
use tracing::{info, info_span};

use crate::cli::{CatalogArgs, DoctorArgs, ReplayArgs, ResolveArgs};

#[derive(Debug)]
pub struct ReplayResult {
    pub submission: SubmissionRecord,
    pub outcome: ReplayOutcome,
}

pub fn load_options(path: Option<&Path>) -> Result<EngineOptions> {
    match path {
        Some(path) => EngineOptions::load(path)
            .with_context(|| format!("load engine options {}", path.display())),
        None => Ok(EngineOptions::default()),
    }
}

fn load_catalog(args: &CatalogArgs) -> Result<LoadedCatalog> {
    let sources: Vec<CatalogSource> = std::iter::once(&args.catalog_dir)
        .chain(&args.fallback)
        .cloned()
        .map(CatalogSource::Directory)
        .collect();
    let (loaded, _) = load_with_fallback(&sources)
        .with_context(|| format!("load catalog {}", args.catalog_dir.display()))?;
    Ok(loaded)
}

fn controller_for(args: &CatalogArgs, options: EngineOptions) -> Result<CascadeController> {
    let loaded = load_catalog(args)?;
    CascadeController::with_catalog(loaded.catalog, options).context("install catalog")
}

pub fn run_doctor(args: &DoctorArgs) -> Result<DoctorReport> {
    let loaded = load_catalog(&args.catalog)?;
    Ok(DoctorReport::from_loaded(&loaded))
}

pub fn run_resolve(args: &ResolveArgs, options: EngineOptions) -> Result<CascadeController> {
    let mut controller = controller_for(&args.catalog, options)?;
    // Wall depth first: it decides which dimension values are admissible.
    let drivers = [
        (DriverField::ProjectType, &args.project_type),
        (DriverField::WallDepth, &args.wall_depth),
        (DriverField::RoofType, &args.roof_type),
        (DriverField::Height, &args.height),
        (DriverField::Width, &args.width),
        (DriverField::Length, &args.length),
    ];
    for (field, value) in drivers {
        if let Some(value) = value {
            controller
                .set_driver_str(field, Some(value.as_str()))
                .with_context(|| format!("set {field}"))?;
        }
    }
    Ok(controller)
}

pub fn run_replay(args: &ReplayArgs, options: EngineOptions) -> Result<ReplayResult> {
    let span = info_span!("replay_command", script = %args.script.display());
    let _guard = span.enter();

    let steps = load_script(&args.script)?;
    let mut controller = controller_for(&args.catalog, options)?;
    if let Some(path) = &args.restore {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read selection {}", path.display()))?;
        let record = SelectionRecord::from_json(&contents)
            .with_context(|| format!("parse selection {}", path.display()))?;
        controller
            .restore_selection(record)
            .context("restore selection")?;
    }

    let outcome = run_script(&mut controller, &steps, args.keep_going)?;
    info!(
        applied = outcome.applied,
        rejected = outcome.rejected.len(),
        "script finished"
    );

    if let Some(path) = &args.save {
        let json = controller
            .serialize_selection()
            .to_json()
            .context("encode selection")?;
        std::fs::write(path, json)
            .with_context(|| format!("write selection {}", path.display()))?;
        info!(path = %path.display(), "saved selection");
    }

    Ok(ReplayResult {
        submission: controller.submission(),
        outcome,
    })
}
