//! Directory conversion tests
//!
//! Each test builds a throwaway directory tree, converts it and inspects the written documents.

use pretty_assertions::assert_eq;
use std::path::Path;
use terrayml::convert::{ConvertError, Converter, Options};

const INSTANCES: &str = r#"
resource "aws_instance" "web" {
  ami = "ami-1"
}

resource "aws_instance" "db" {
  ami = "ami-2"
}
"#;

const VARIABLES: &str = r#"
variable "region" {
  default = "us-east-1"
}
"#;

const LOCALS: &str = r#"
locals {
  secret = "do not convert"
}
"#;

fn write(dir: &Path, files: &[(&str, &str)]) {
    std::fs::create_dir_all(dir).unwrap();
    for (name, contents) in files {
        std::fs::write(dir.join(name), contents).unwrap();
    }
}

fn single() -> Converter {
    Converter::new(Options {
        scan_children: false,
        ..Default::default()
    })
}

fn read_config(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".terrahub.yml")).expect("config must exist")
}

#[test]
fn in_place_document() {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("app");
    write(
        &app,
        &[
            ("a.tf", INSTANCES),
            ("b.tf", VARIABLES),
            ("locals.tf", LOCALS),
            ("default.tfvars", "region = \"eu-west-1\"\n"),
        ],
    );

    let report = single().convert_tree(&app, &app).unwrap();
    assert!(report.issues.is_empty());

    let document = read_config(&app);
    insta::assert_snapshot!(document.trim_end(), @r###"
    ## local config
    component:
      name: 'app'
      template:
        resource:
          aws_instance:
            web:
              ami: ami-1
            db:
              ami: ami-2
        variable:
          region:
            default: us-east-1
        tfvars:
          region: eu-west-1
    "###);
    assert!(document.ends_with("eu-west-1\n\n"));
}

#[test]
fn locals_are_excluded_and_deleted_in_place() {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("app");
    write(
        &app,
        &[
            ("a.tf", INSTANCES),
            ("b.tf", VARIABLES),
            ("locals.tf", LOCALS),
            ("default.tfvars", "region = \"eu-west-1\"\n"),
        ],
    );

    let report = single().convert_tree(&app, &app).unwrap();

    let document = read_config(&app);
    assert!(!document.contains("secret"));
    assert!(!document.contains("locals"));

    for name in ["a.tf", "b.tf", "locals.tf", "default.tfvars"] {
        assert!(!app.join(name).exists(), "{name} must be deleted");
    }

    let converted = &report.converted[0];
    assert_eq!(converted.files, vec![app.join("a.tf"), app.join("b.tf")]);
    assert_eq!(converted.deleted.len(), 4);
    assert!(converted.tfvars);
}

#[test]
fn lone_locals_file_is_deleted_in_place() {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("app");
    write(&app, &[("locals.tf", LOCALS)]);

    let report = single().convert_tree(&app, &app).unwrap();

    assert!(report.converted.is_empty());
    assert!(report.issues.is_empty());
    assert!(!app.join("locals.tf").exists());
    assert!(!app.join(".terrahub.yml").exists());
}

#[test]
fn only_the_exact_locals_file_is_deleted() {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("app");
    write(
        &app,
        &[
            ("a.tf", INSTANCES),
            ("locals.tf", LOCALS),
            ("my_locals.tf", "locals {\n  keep = 1\n}\n"),
        ],
    );

    let report = single().convert_tree(&app, &app).unwrap();

    assert!(!read_config(&app).contains("keep"));
    assert!(!app.join("locals.tf").exists());
    assert!(app.join("my_locals.tf").exists());
    assert_eq!(
        report.converted[0].deleted,
        vec![app.join("a.tf"), app.join("locals.tf")]
    );
}

#[test]
fn multi_line_strings_survive_conversion() {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("app");
    write(
        &app,
        &[
            (
                "a.tf",
                "resource \"aws_instance\" \"web\" {\n  user_data = <<EOF\n#!/bin/sh\n\necho hi\nEOF\n}\n",
            ),
            ("default.tfvars", "motd = \"line1\\n\\nline3\"\n"),
        ],
    );

    single().convert_tree(&app, &app).unwrap();

    let document: serde_yaml::Value =
        serde_yaml::from_str(&read_config(&app)).expect("document must be valid yaml");
    let template = &document["component"]["template"];

    assert_eq!(
        template["resource"]["aws_instance"]["web"]["user_data"].as_str(),
        Some("#!/bin/sh\n\necho hi\n")
    );
    assert_eq!(template["tfvars"]["motd"].as_str(), Some("line1\n\nline3"));
}

#[test]
fn separate_destination_keeps_sources() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("src");
    let destination = root.path().join("out");
    write(
        &source,
        &[
            ("a.tf", INSTANCES),
            ("locals.tf", LOCALS),
            ("default.tfvars", "region = \"eu-west-1\"\n"),
        ],
    );
    std::fs::create_dir_all(&destination).unwrap();

    let report = single().convert_tree(&source, &destination).unwrap();

    assert!(report.converted[0].deleted.is_empty());
    for name in ["a.tf", "locals.tf", "default.tfvars"] {
        assert!(source.join(name).exists(), "{name} must be kept");
    }

    let document = read_config(&destination);
    assert!(document.contains("  name: 'src'\n"));
    assert!(!source.join(".terrahub.yml").exists());
}

#[test]
fn keep_sources_in_place() {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("app");
    write(&app, &[("a.tf", INSTANCES)]);

    let converter = Converter::new(Options {
        scan_children: false,
        keep_sources: true,
        ..Default::default()
    });
    converter.convert_tree(&app, &app).unwrap();

    assert!(app.join("a.tf").exists());
    assert!(app.join(".terrahub.yml").exists());
}

#[test]
fn existing_document_is_extended() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("src");
    let destination = root.path().join("out");
    write(&source, &[("b.tf", VARIABLES)]);
    write(
        &destination,
        &[(
            ".terrahub.yml",
            "component:\n  name: 'custom'\n\n  dependsOn:\n    - ../network\n",
        )],
    );

    single().convert_tree(&source, &destination).unwrap();

    let expected = "\
component:
  name: 'custom'
  template:
    variable:
      region:
        default: us-east-1

  dependsOn:
    - ../network
";
    assert_eq!(read_config(&destination), expected);
}

#[test]
fn second_conversion_appends_template() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("src");
    let destination = root.path().join("out");
    write(&source, &[("b.tf", VARIABLES)]);

    // the destination does not exist yet
    single().convert_tree(&source, &destination).unwrap();
    write(&source, &[("b.tf", "output \"id\" {\n  value = \"x\"\n}\n")]);
    single().convert_tree(&source, &destination).unwrap();

    let document = read_config(&destination);
    assert_eq!(document.matches("component:").count(), 1);
    assert_eq!(document.matches("  template:").count(), 2);
    assert!(document.find("region").unwrap() < document.find("output").unwrap());
}

#[test]
fn child_directories_are_converted() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("src");
    let destination = root.path().join("out");
    write(&source.join("network"), &[("main.tf", VARIABLES)]);
    write(&source.join("compute"), &[("main.tf", INSTANCES)]);
    write(&source.join("docs"), &[("README.md", "nothing here")]);
    write(&source.join(".terraform"), &[("cached.tf", INSTANCES)]);
    write(&source.join("compute/nested"), &[("deep.tf", INSTANCES)]);

    let report = Converter::default()
        .convert_tree(&source, &destination)
        .unwrap();

    let outputs: Vec<_> = report.converted.iter().map(|c| c.output.clone()).collect();
    assert_eq!(
        outputs,
        vec![
            destination.join("compute/.terrahub.yml"),
            destination.join("network/.terrahub.yml"),
        ]
    );

    assert!(read_config(&destination.join("network")).contains("  name: 'network'\n"));
    assert!(!destination.join(".terraform").exists());
    assert!(!destination.join("docs/.terrahub.yml").exists());
    assert!(!destination.join("compute/nested").exists());
    assert!(!destination.join(".terrahub.yml").exists());
}

#[test]
fn missing_source_is_reported() {
    let root = tempfile::tempdir().unwrap();
    let report = Converter::default()
        .convert_tree(&root.path().join("missing"), root.path())
        .unwrap();

    assert!(report.converted.is_empty());
    assert!(!report.issues.is_empty());
    assert_eq!(report.issues[0].path, root.path().join("missing"));
}

#[test]
fn invalid_source_aborts_before_deleting() {
    let root = tempfile::tempdir().unwrap();
    let app = root.path().join("app");
    write(&app, &[("a.tf", INSTANCES), ("b.tf", "not = valid = hcl")]);

    let err = single().convert_tree(&app, &app).unwrap_err();

    assert!(matches!(err, ConvertError::Parse { ref path, .. } if path == &app.join("b.tf")));
    assert!(app.join("a.tf").exists());
    assert!(app.join("b.tf").exists());
    assert!(!app.join(".terrahub.yml").exists());
}
