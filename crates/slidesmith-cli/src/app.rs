//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;

use slidesmith_pptx::analysis::{
    layout_usage, overflow_warnings, profile_slides, repetition_warnings, RepetitionWarning,
    SlideProfile, TextOverflow,
};
use slidesmith_pptx::{
    load_slide_specs, DeckBuilder, LayoutCatalog, Presentation, TemplateConfig, TemplateSurvey,
};

/// Output format for deck inspection
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "slidesmith")]
#[command(author, version, about = "Template-driven PowerPoint decks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize a template's layouts and recommend a configuration
    Analyze {
        /// Template file (.pptx or .potx)
        template: PathBuf,

        /// Output base path (without extension); writes .json, _analysis.json and .txt
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a presentation from a template and slide specifications
    Create {
        /// Template file
        #[arg(short, long)]
        template: PathBuf,

        /// Slide specifications (JSON array)
        #[arg(short, long)]
        slides: PathBuf,

        /// Output presentation
        #[arg(short, long)]
        output: PathBuf,

        /// Template configuration (JSON or TOML); built-in defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List a template's layouts and their placeholders
    Layouts {
        /// Template file
        template: PathBuf,
    },

    /// Write a configuration skeleton to fill in
    InitConfig {
        /// Template file
        template: PathBuf,

        /// Output path; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report layout usage, repetition and text overflow of a deck
    Inspect {
        /// Presentation file
        deck: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { template, output } => {
            analyze_command(&template, output.as_deref())?;
        }
        Commands::Create {
            template,
            slides,
            output,
            config,
        } => {
            create_command(&template, &slides, &output, config.as_deref())?;
            println!("\nSuccess!");
        }
        Commands::Layouts { template } => {
            layouts_command(&template)?;
        }
        Commands::InitConfig { template, output } => {
            init_config_command(&template, output.as_deref())?;
        }
        Commands::Inspect { deck, format } => {
            inspect_command(&deck, format)?;
        }
    }

    Ok(())
}

fn open_presentation(path: &Path, what: &str) -> Result<Presentation> {
    if !path.exists() {
        anyhow::bail!("{} not found: {}", what, path.display());
    }
    Presentation::open(path)
        .with_context(|| format!("Failed to open {}: {}", what.to_lowercase(), path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Survey a template's layouts
pub fn survey_template(template: &Path) -> Result<TemplateSurvey> {
    let presentation = open_presentation(template, "Template")?;
    let catalog = LayoutCatalog::from_presentation(&presentation);
    Ok(TemplateSurvey::new(file_name(template), &catalog))
}

/// Execute the analyze command
pub fn analyze_command(template: &Path, output: Option<&Path>) -> Result<()> {
    println!("Analyzing template: {}\n", template.display());
    let survey = survey_template(template)?;

    let Some(base) = output else {
        print!("{}", survey.render_report().context("Failed to render report")?);
        return Ok(());
    };

    let config_path = base.with_extension("json");
    let config_json = survey
        .recommended_config
        .to_json()
        .context("Failed to serialize config")?;
    fs::write(&config_path, config_json)
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
    println!("Saved config: {}", config_path.display());

    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let analysis_path = base.with_file_name(format!("{stem}_analysis.json"));
    let analysis_json = survey.to_json().context("Failed to serialize analysis")?;
    fs::write(&analysis_path, analysis_json)
        .with_context(|| format!("Failed to write analysis: {}", analysis_path.display()))?;
    println!("Saved analysis: {}", analysis_path.display());

    let report_path = base.with_extension("txt");
    let report = survey.render_report().context("Failed to render report")?;
    fs::write(&report_path, report)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
    println!("Saved report: {}\n", report_path.display());

    Ok(())
}

/// Execute the create command, returning the number of slides written
pub fn create_command(
    template: &Path,
    slides: &Path,
    output: &Path,
    config: Option<&Path>,
) -> Result<usize> {
    if !template.exists() {
        anyhow::bail!("Template not found: {}", template.display());
    }
    if !slides.exists() {
        anyhow::bail!("Slides spec not found: {}", slides.display());
    }

    let config = match config {
        Some(path) => TemplateConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => TemplateConfig::builtin(),
    };

    println!("Loading slides: {}", slides.display());
    let specs = load_slide_specs(slides)
        .with_context(|| format!("Failed to load slide specifications: {}", slides.display()))?;
    println!("Loaded {} slide(s)\n", specs.len());

    println!("Creating presentation from: {}", template.display());
    let deck = DeckBuilder::new(config)
        .build_file(template, &specs, output)
        .with_context(|| format!("Failed to create presentation: {}", output.display()))?;

    println!("Created {} slide(s)", deck.slide_count());
    println!("Saved to: {}", output.display());

    Ok(deck.slide_count())
}

/// Execute the layouts command
pub fn layouts_command(template: &Path) -> Result<()> {
    let presentation = open_presentation(template, "Template")?;
    print!("{}", render_layouts(&LayoutCatalog::from_presentation(&presentation)));
    Ok(())
}

/// Layout listing: one line per layout, one indented line per placeholder
pub fn render_layouts(catalog: &LayoutCatalog) -> String {
    let mut output = String::from("=== Available layouts ===\n");
    for layout in catalog.iter() {
        output.push_str(&format!("[{}] {}\n", layout.index, layout.name));
        for ph in &layout.placeholders {
            output.push_str(&format!("    - {} (idx={}, type={})\n", ph.name, ph.idx, ph.kind));
        }
    }
    output.push('\n');
    output
}

/// Execute the init-config command
pub fn init_config_command(template: &Path, output: Option<&Path>) -> Result<()> {
    let presentation = open_presentation(template, "Template")?;
    debug!(
        "{} has {} layouts",
        template.display(),
        presentation.layouts().len()
    );

    let skeleton = TemplateConfig::skeleton();
    match output {
        Some(path) => {
            skeleton
                .save(path)
                .with_context(|| format!("Failed to write config: {}", path.display()))?;
            println!("Saved config template: {}", path.display());
        }
        None => {
            println!("{}", skeleton.to_json().context("Failed to serialize config")?);
        }
    }
    Ok(())
}

/// Everything `inspect` reports about a deck
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub deck: String,
    pub slide_count: usize,
    pub layout_usage: BTreeMap<String, usize>,
    pub slides: Vec<SlideProfile>,
    pub repetition_warnings: Vec<RepetitionWarning>,
    pub overflow_warnings: Vec<OverflowWarning>,
}

/// A text overflow candidate with its slide number
#[derive(Debug, Serialize)]
pub struct OverflowWarning {
    /// 1-based slide number
    pub slide: usize,
    #[serde(flatten)]
    pub overflow: TextOverflow,
}

impl InspectReport {
    /// Analyze a loaded deck
    pub fn new(name: impl Into<String>, presentation: &Presentation) -> Self {
        Self {
            deck: name.into(),
            slide_count: presentation.slide_count(),
            layout_usage: layout_usage(presentation),
            slides: profile_slides(presentation),
            repetition_warnings: repetition_warnings(presentation),
            overflow_warnings: overflow_warnings(presentation)
                .into_iter()
                .map(|(i, overflow)| OverflowWarning {
                    slide: i + 1,
                    overflow,
                })
                .collect(),
        }
    }

    /// Human-readable report
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", "=".repeat(70)));
        out.push_str(&format!("DECK INSPECTION: {}\n", self.deck));
        out.push_str(&format!("{}\n", "=".repeat(70)));
        out.push_str(&format!("\nTotal Slides: {}\n", self.slide_count));

        out.push_str("\nLAYOUT USAGE:\n");
        for (name, count) in &self.layout_usage {
            out.push_str(&format!("  {name}: {count}\n"));
        }

        out.push_str("\nSLIDES:\n");
        for profile in &self.slides {
            out.push_str(&format!(
                "  [{}] {} - {}\n",
                profile.slide_index + 1,
                profile.layout_name,
                profile.suggested_use
            ));
            out.push_str(&format!(
                "      text: {}, images: {}, decorative: {}\n",
                profile.text_shapes_count,
                profile.image_shapes_count,
                profile.decorative_shapes_count
            ));
            if profile.has_title {
                out.push_str(&format!("      title: {}\n", profile.title_text));
            }
        }

        if !self.repetition_warnings.is_empty() {
            out.push_str("\nREPEATED LAYOUTS:\n");
            for warning in &self.repetition_warnings {
                out.push_str(&format!("  {warning}\n"));
            }
        }

        if !self.overflow_warnings.is_empty() {
            out.push_str("\nTEXT OVERFLOW:\n");
            for warning in &self.overflow_warnings {
                out.push_str(&format!("  slide {}: {}\n", warning.slide, warning.overflow));
            }
        }

        out
    }
}

/// Execute the inspect command
pub fn inspect_command(deck: &Path, format: OutputFormat) -> Result<()> {
    let presentation = open_presentation(deck, "Presentation")?;
    let report = InspectReport::new(file_name(deck), &presentation);

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize inspection report to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            print!("{}", report.render_text());
        }
    }

    Ok(())
}
