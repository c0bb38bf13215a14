//! Integration tests for the slidesmith CLI
//!
//! These tests drive the command functions against synthesized templates:
//! template analysis -> configuration -> deck generation -> inspection.

use std::fs;

use slidesmith_cli::{analyze_command, create_command, init_config_command, survey_template};
use slidesmith_pptx::fixtures::TemplateBuilder;
use slidesmith_pptx::{Presentation, TemplateConfig};
use tempfile::TempDir;

fn setup() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(
        temp_dir.path().join("template.pptx"),
        TemplateBuilder::new().with_slides(&[0, 1]).build(),
    )
    .unwrap();
    temp_dir
}

#[test]
fn test_analyze_writes_three_files() {
    let temp_dir = setup();
    let base = temp_dir.path().join("corporate");

    analyze_command(&temp_dir.path().join("template.pptx"), Some(&base)).unwrap();

    let config = TemplateConfig::load(temp_dir.path().join("corporate.json")).unwrap();
    assert_eq!(config.get("title_slide"), Some(0));
    assert_eq!(config.get("content_slide"), Some(1));
    assert_eq!(config.get("two_column"), Some(3));
    assert_eq!(config.get("section_header"), Some(2));
    assert_eq!(config.get("blank"), Some(6));

    let analysis: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join("corporate_analysis.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(analysis["template_name"], "template.pptx");
    assert_eq!(analysis["total_layouts"], 7);
    assert_eq!(analysis["layouts"].as_array().unwrap().len(), 7);

    let report = fs::read_to_string(temp_dir.path().join("corporate.txt")).unwrap();
    assert!(report.contains("TEMPLATE ANALYSIS: template.pptx"));
    assert!(report.contains("RECOMMENDED CONFIGURATION:"));
}

#[test]
fn test_analyze_missing_template() {
    let temp_dir = TempDir::new().unwrap();
    let err = survey_template(&temp_dir.path().join("nope.pptx")).unwrap_err();
    assert!(err.to_string().contains("Template not found"));
}

#[test]
fn test_analyze_then_create() {
    let temp_dir = setup();
    let template = temp_dir.path().join("template.pptx");
    let base = temp_dir.path().join("config");
    analyze_command(&template, Some(&base)).unwrap();

    let slides = temp_dir.path().join("slides.json");
    fs::write(
        &slides,
        r#"[
            {"type": "title", "title": "Launch", "subtitle": "2024"},
            {"type": "content", "title": "Why", "content": ["Fast", "Safe", "Small"]},
            {"type": "two_column", "title": "Before / After", "left": "Slow", "right": "Fast"},
            {"type": "blank"}
        ]"#,
    )
    .unwrap();
    let output = temp_dir.path().join("deck.pptx");

    let count = create_command(
        &template,
        &slides,
        &output,
        Some(&temp_dir.path().join("config.json")),
    )
    .unwrap();
    assert_eq!(count, 4);

    let deck = Presentation::open(&output).unwrap();
    let layouts: Vec<_> = deck.slides().iter().map(|s| s.layout_name()).collect();
    assert_eq!(layouts, vec!["Title Slide", "Title and Content", "Two Content", "Blank"]);
    assert_eq!(deck.slide(1).unwrap().texts(), vec!["Why", "Fast\nSafe\nSmall"]);
}

#[test]
fn test_create_with_builtin_config() {
    let temp_dir = setup();
    let slides = temp_dir.path().join("slides.json");
    fs::write(&slides, r#"[{"type": "content", "title": "Only"}]"#).unwrap();
    let output = temp_dir.path().join("deck.pptx");

    create_command(&temp_dir.path().join("template.pptx"), &slides, &output, None).unwrap();

    let deck = Presentation::open(&output).unwrap();
    assert_eq!(deck.slide_count(), 1);
    assert_eq!(deck.slide(0).unwrap().texts()[0], "Only");
}

#[test]
fn test_create_reports_cause_chain() {
    let temp_dir = setup();
    let slides = temp_dir.path().join("slides.json");
    fs::write(&slides, r#"[{"type": "custom", "layout": 12}]"#).unwrap();
    let output = temp_dir.path().join("deck.pptx");

    let err = create_command(&temp_dir.path().join("template.pptx"), &slides, &output, None)
        .unwrap_err();

    let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
    assert!(chain[0].starts_with("Failed to create presentation"));
    assert!(chain
        .iter()
        .any(|e| e.contains("Layout index 12 out of range")));
    assert!(!output.exists());
}

#[test]
fn test_create_rejects_malformed_slides() {
    let temp_dir = setup();
    let slides = temp_dir.path().join("slides.json");
    fs::write(&slides, "{ not json").unwrap();

    let err = create_command(
        &temp_dir.path().join("template.pptx"),
        &slides,
        &temp_dir.path().join("deck.pptx"),
        None,
    )
    .unwrap_err();

    assert!(format!("{err:#}").contains("Format error in slide specification"));
}

#[test]
fn test_init_config_skeleton() {
    let temp_dir = setup();
    let path = temp_dir.path().join("template_config.json");

    init_config_command(&temp_dir.path().join("template.pptx"), Some(&path)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["title_slide"], 0);
    assert_eq!(value["content_slide"], 1);
    assert!(value["two_column"].is_null());
    assert!(value["blank"].is_null());
    assert!(value["note"].is_string());
}
