use anyhow::{Context, Result};
use comfy_table::Table;

use reweigh_cli::pipeline::{EvaluateOptions, EvaluationRun, load_settings, run_evaluation};
use reweigh_core::{NameMatch, ValueShape};
use reweigh_reference::{BUILTIN_SOURCES, ReferenceProvider};

use crate::cli::{AttributesArgs, EvaluateArgs};
use crate::summary::apply_table_style;

pub fn run_evaluate(args: &EvaluateArgs) -> Result<EvaluationRun> {
    let options = EvaluateOptions {
        dataset: args.dataset.clone(),
        reference: args.reference.clone(),
        reference_file: args.reference_file.clone(),
        config_file: args.config.clone(),
        floor: args.floor,
        output: args.output.clone(),
        report_json: args.report_json.clone(),
        weights_json: args.weights_json.clone(),
        weighted_output: args.weighted_output.clone(),
    };
    run_evaluation(&options)
}

pub fn run_sources() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Source", "Aliases", "Attribute", "Label", "Categories"]);
    apply_table_style(&mut table);
    for source in BUILTIN_SOURCES {
        let catalog = source
            .load()
            .with_context(|| format!("load built-in source {}", source.label))?;
        for attribute in catalog.attributes() {
            let Some(reference) = catalog.reference(attribute) else {
                continue;
            };
            table.add_row(vec![
                source.label.to_string(),
                source.aliases.join(", "),
                attribute.to_string(),
                reference.label.clone(),
                reference.len().to_string(),
            ]);
        }
    }
    println!("{table}");
    Ok(())
}

pub fn run_attributes(args: &AttributesArgs) -> Result<()> {
    let (_, registry) = load_settings(args.config.as_deref(), None).context("load settings")?;
    let mut table = Table::new();
    table.set_header(vec![
        "Attribute",
        "Label",
        "Keywords",
        "Match",
        "Value shape",
        "Threshold (pp)",
    ]);
    apply_table_style(&mut table);
    for spec in registry.iter() {
        let name_match = match spec.name_match {
            NameMatch::Contains => "contains",
            NameMatch::Exact => "exact",
        };
        table.add_row(vec![
            spec.name.clone(),
            spec.display_label().to_string(),
            spec.keywords.join(", "),
            name_match.to_string(),
            spec.value_shape
                .map_or_else(|| "-".to_string(), ValueShape::describe),
            format!("{}", spec.imbalance_threshold_pct),
        ]);
    }
    println!("{table}");
    Ok(())
}
