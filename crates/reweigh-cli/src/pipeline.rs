//! End-to-end evaluation of one dataset file.
//!
//! Stages: resolve the reference source, load configuration, read the
//! dataset, evaluate, and write the requested artifacts.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, trace};

use reweigh_core::{AttributeRegistry, ConfigFile, EngineConfig, evaluate, weighted_shares_for};
use reweigh_ingest::{read_dataset, with_weights_column, write_dataset_csv};
use reweigh_model::EvaluationResult;
use reweigh_reference::{
    ReferenceCatalog, ReferenceProvider, builtin_source, find_builtin, load_reference_csv,
};
use reweigh_report::{
    ReportPayload, WeightedShares, render_markdown, write_markdown, write_report_json,
    write_weights_json,
};

use crate::logging::redact_value;

/// Inputs for one evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluateOptions {
    pub dataset: PathBuf,
    /// Reference source label or alias.
    pub reference: String,
    /// External reference CSV; overlays the built-in source of the same label.
    pub reference_file: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    /// Overrides the floor proportion from the config file.
    pub floor: Option<f64>,
    pub output: PathBuf,
    pub report_json: Option<PathBuf>,
    pub weights_json: Option<PathBuf>,
    /// Write the dataset with an added `Weights` column here.
    pub weighted_output: Option<PathBuf>,
}

impl EvaluateOptions {
    pub fn new(dataset: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            reference: reweigh_reference::DEFAULT_SOURCE.to_string(),
            reference_file: None,
            config_file: None,
            floor: None,
            output: PathBuf::from("bias_report.md"),
            report_json: None,
            weights_json: None,
            weighted_output: None,
        }
    }
}

/// Everything the summary needs after a successful run.
#[derive(Debug)]
pub struct EvaluationRun {
    pub dataset: PathBuf,
    pub result: EvaluationResult,
    pub shares: WeightedShares,
    pub report: PathBuf,
    pub report_json: Option<PathBuf>,
    pub weights_json: Option<PathBuf>,
    pub weighted_output: Option<PathBuf>,
}

/// Resolve a reference label, optionally overlaid with an external CSV.
///
/// An unknown label is accepted only together with a reference file, which
/// then becomes the whole source.
pub fn load_provider(label: &str, reference_file: Option<&Path>) -> Result<ReferenceCatalog> {
    let mut catalog = if find_builtin(label).is_some() || reference_file.is_none() {
        builtin_source(label).context("resolve reference source")?
    } else {
        ReferenceCatalog::new(label.trim())
    };
    if let Some(path) = reference_file {
        let external = load_reference_csv(path, catalog.label())
            .with_context(|| format!("load reference file {}", path.display()))?;
        catalog.merge(external);
    }
    if catalog.is_empty() {
        bail!("reference source '{label}' has no tables");
    }
    Ok(catalog)
}

/// Engine config and registry from defaults, the config file, and CLI overrides.
pub fn load_settings(
    config_file: Option<&Path>,
    floor: Option<f64>,
) -> Result<(EngineConfig, AttributeRegistry)> {
    let mut config = EngineConfig::default();
    let mut registry = AttributeRegistry::default();
    if let Some(path) = config_file {
        let file = ConfigFile::load(path)?;
        config = file.apply(config);
        if let Some(custom) = file.registry() {
            registry = custom;
        }
    }
    if let Some(floor) = floor {
        config = config.with_floor_proportion(floor);
    }
    config.validate()?;
    Ok((config, registry))
}

pub fn run_evaluation(options: &EvaluateOptions) -> Result<EvaluationRun> {
    let dataset_name = options.dataset.display().to_string();
    let run_span = info_span!("run", dataset = %dataset_name);
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let provider = load_provider(&options.reference, options.reference_file.as_deref())?;
    let (config, registry) =
        load_settings(options.config_file.as_deref(), options.floor).context("load settings")?;
    debug!(
        source = %provider.label(),
        attributes = registry.len(),
        floor = config.floor_proportion,
        "settings resolved"
    );

    let df = info_span!("ingest")
        .in_scope(|| read_dataset(&options.dataset))
        .with_context(|| format!("read {dataset_name}"))?;
    info!(rows = df.height(), columns = df.width(), "dataset loaded");

    let result = evaluate(&df, &registry, &provider, &config)
        .with_context(|| format!("evaluate {dataset_name}"))?;
    for comparison in result.corrected() {
        for category in &comparison.categories {
            trace!(
                attribute = %comparison.attribute(),
                category = redact_value(&category.category),
                observed = category.observed,
                reference = category.reference,
                "category compared"
            );
        }
    }

    let corrected: Vec<_> = result.corrected().collect();
    let shares = weighted_shares_for(&df, &corrected, &result.weights)
        .context("compute weighted shares")?;

    let output_span = info_span!("output");
    let _output_guard = output_span.enter();
    let markdown = render_markdown(&result, &shares).context("render report")?;
    write_markdown(&options.output, &markdown)?;

    if let Some(path) = &options.report_json {
        let payload = ReportPayload::new(&result, &shares, markdown.clone());
        write_report_json(path, &payload)?;
    }
    if let Some(path) = &options.weights_json {
        write_weights_json(path, &result)?;
    }
    if let Some(path) = &options.weighted_output {
        let weighted = with_weights_column(&df, &result.weights)?;
        write_dataset_csv(&weighted, path)
            .with_context(|| format!("write weighted dataset {}", path.display()))?;
    }
    info!(
        report = %options.output.display(),
        rebalanced = result.rebalanced(),
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );

    Ok(EvaluationRun {
        dataset: options.dataset.clone(),
        result,
        shares,
        report: options.output.clone(),
        report_json: options.report_json.clone(),
        weights_json: options.weights_json.clone(),
        weighted_output: options.weighted_output.clone(),
    })
}
