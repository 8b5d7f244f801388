use clap::{Parser, Subcommand};
use os_idf::{PrintOptions, Workspace};
use os_model::{
    AirLoopHvacZoneSplitter, DaylightingControl, Model, ModelObject, ObjectKind, Splitter,
    ThermalZone,
};
use os_translator::{
    ForwardTranslator, ReverseTranslator, TranslationMessage, TranslatorConfig, TranslatorResult,
    load_config,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "os-cli")]
#[command(about = "OpenStudio core CLI - HVAC topology and EnergyPlus IDF translation", long_about = None)]
struct Cli {
    /// Translator options (YAML, or JSON by extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate an IDF file, then report translation diagnostics
    Check {
        /// Path to the IDF file
        idf_path: PathBuf,
    },
    /// Show the zones, terminals and daylighting controls an IDF file describes
    Summary {
        /// Path to the IDF file
        idf_path: PathBuf,
    },
    /// Translate an IDF file into a model and back out to IDF
    Roundtrip {
        /// Input IDF file
        input: PathBuf,
        /// Output IDF file
        output: PathBuf,
    },
    /// Write an IDF file as YAML or JSON (by output extension)
    Export {
        /// Input IDF file
        input: PathBuf,
        /// Output .yaml/.yml or .json file
        output: PathBuf,
    },
}

fn main() -> TranslatorResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => TranslatorConfig::default(),
    };

    match cli.command {
        Commands::Check { idf_path } => cmd_check(&idf_path, &config),
        Commands::Summary { idf_path } => cmd_summary(&idf_path, &config),
        Commands::Roundtrip { input, output } => cmd_roundtrip(&input, &output, &config),
        Commands::Export { input, output } => cmd_export(&input, &output),
    }
}

fn reverse_translate(workspace: &Workspace, config: &TranslatorConfig) -> (Model, ReverseTranslator) {
    let mut translator = ReverseTranslator::with_options(config.reverse);
    let model = translator.translate_workspace(workspace);
    (model, translator)
}

fn print_messages(errors: &[TranslationMessage], warnings: &[TranslationMessage]) {
    for message in errors.iter().chain(warnings) {
        println!("  {message}");
    }
}

fn cmd_check(idf_path: &Path, config: &TranslatorConfig) -> TranslatorResult<()> {
    println!("Checking IDF: {}", idf_path.display());
    let workspace = os_idf::load_idf(idf_path)?;
    println!("✓ {} objects parsed and validated", workspace.len());

    let (model, translator) = reverse_translate(&workspace, config);
    let errors = translator.errors();
    let warnings = translator.warnings();
    if let Err(err) = model.validate_connections() {
        println!("✗ Model connections are inconsistent: {err}");
    }
    if errors.is_empty() && warnings.is_empty() {
        println!("✓ Translated cleanly ({} model objects)", model.len());
    } else {
        println!(
            "Translated with {} errors and {} warnings:",
            errors.len(),
            warnings.len()
        );
        print_messages(&errors, &warnings);
    }
    Ok(())
}

fn cmd_summary(idf_path: &Path, config: &TranslatorConfig) -> TranslatorResult<()> {
    let workspace = os_idf::load_idf(idf_path)?;
    let (model, _translator) = reverse_translate(&workspace, config);
    let name = |handle| model.name(handle).unwrap_or_default();

    let zones = model.thermal_zones();
    if zones.is_empty() {
        println!("No zones found");
    } else {
        println!("Zones:");
        for zone in &zones {
            print_zone(&model, *zone);
        }
    }

    let splitters = model.objects_of_kind(ObjectKind::AirLoopHvacZoneSplitter);
    if !splitters.is_empty() {
        println!("Zone splitters:");
        for handle in splitters {
            let splitter = AirLoopHvacZoneSplitter::wrap(handle);
            println!(
                "  {} ({} outlets)",
                name(handle),
                splitter.outlet_model_objects(&model).len()
            );
        }
    }

    let topology = model.topology();
    println!(
        "Topology: {} objects, {} connections{}",
        topology.node_count(),
        topology.edge_count(),
        if topology.is_cyclic() { ", cyclic" } else { "" }
    );
    Ok(())
}

fn print_zone(model: &Model, zone: ThermalZone) {
    let name = |handle| model.name(handle).unwrap_or_default();
    println!(
        "  {} (multiplier {}, {} inlets)",
        name(zone.handle()),
        zone.multiplier(model),
        zone.inlet_model_objects(model).len()
    );
    for equipment in zone.equipment(model) {
        let kind = model.kind(equipment).map_or("?", |k| k.iddname());
        println!("    equipment: {} [{}]", name(equipment), kind);
    }
    let controls = [
        (
            "primary",
            zone.primary_daylighting_control(model),
            zone.fraction_of_zone_controlled_by_primary_daylighting_control(model),
        ),
        (
            "secondary",
            zone.secondary_daylighting_control(model),
            zone.fraction_of_zone_controlled_by_secondary_daylighting_control(model),
        ),
    ];
    for (rank, control, fraction) in controls {
        if let Some(control) = control.map(DaylightingControl::wrap) {
            println!(
                "    {rank} daylighting: {} ({:.0}% of zone, {} lux)",
                name(control.handle()),
                fraction * 100.0,
                control.illuminance_setpoint(model)
            );
        }
    }
}

fn cmd_roundtrip(input: &Path, output: &Path, config: &TranslatorConfig) -> TranslatorResult<()> {
    println!("Reading IDF: {}", input.display());
    let workspace = os_idf::load_idf(input)?;

    let (model, reverse) = reverse_translate(&workspace, config);
    print_messages(&reverse.errors(), &reverse.warnings());

    let mut forward = ForwardTranslator::with_options(config.forward);
    let translated = forward.translate_model(&model);
    print_messages(&forward.errors(), &forward.warnings());

    os_idf::save_idf(
        output,
        &translated,
        PrintOptions {
            field_comments: config.forward.field_comments,
        },
    )?;
    println!(
        "✓ Wrote {} objects ({} in) to {}",
        translated.len(),
        workspace.len(),
        output.display()
    );
    Ok(())
}

fn cmd_export(input: &Path, output: &Path) -> TranslatorResult<()> {
    let workspace = os_idf::load_idf(input)?;
    match output.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => os_idf::save_json(output, &workspace)?,
        _ => os_idf::save_yaml(output, &workspace)?,
    }
    println!("✓ Exported {} objects to {}", workspace.len(), output.display());
    Ok(())
}
