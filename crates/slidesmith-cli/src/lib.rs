//! slidesmith CLI - Command-line interface library
//!
//! This library provides the CLI functionality for slidesmith, including:
//! - Analyze: categorize template layouts and recommend a configuration
//! - Create: build a deck from a template and slide specifications
//! - Layouts / InitConfig: list layouts, write a configuration skeleton
//! - Inspect: layout usage, repetition and overflow warnings for a deck
//!
//! # Library Usage
//!
//! ```ignore
//! use slidesmith_cli::{analyze_command, create_command};
//!
//! analyze_command(Path::new("template.pptx"), Some(Path::new("template_config")))?;
//! create_command(
//!     Path::new("template.pptx"),
//!     Path::new("slides.json"),
//!     Path::new("deck.pptx"),
//!     Some(Path::new("template_config.json")),
//! )?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Survey a template and save the recommended configuration
//! slidesmith analyze template.pptx -o template_config
//!
//! # Generate a deck
//! slidesmith create -t template.pptx -s slides.json -o deck.pptx -c template_config.json
//!
//! # Inspect the result
//! slidesmith inspect deck.pptx --format json
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    analyze_command, create_command, init_config_command, inspect_command, layouts_command,
    render_layouts, survey_template,
};
pub use app::{run_cli, InspectReport, OutputFormat, OverflowWarning};
