//! assemble the final `.terrahub.yml` document
//!
//! A fresh document looks like this:
//!
//! ```yaml
//! ## local config
//! component:
//!   name: 'network'
//!   template:
//!     resource:
//!       ...
//!     tfvars:
//!       region: eu-west-1
//!
//! ```
//!
//! An existing document is kept as it is, the template section is inserted at its first blank
//! line or appended when there is none.
use crate::reshape::Layout;
use std::fmt::Write;

const HEADER: &str = "## local config";

/// Build the `template:` section from reshaped content and optional tfvars yaml
///
/// `content` is expected to be indented already (see [crate::reshape::reshape]), `tfvars` is
/// plain yaml and gets indented here. Every tfvars line is padded, blank ones included, so a block
/// scalar keeps its empty lines without opening a blank line in the document.
pub fn template_section(content: &str, tfvars: Option<&str>, layout: &Layout) -> String {
    let mut section = format!("{}template:\n", layout.pad(1));
    section.push_str(content);

    if let Some(tfvars) = tfvars {
        let _ = writeln!(section, "{}tfvars:", layout.pad(layout.content_level));
        let pad = layout.pad(layout.content_level + 1);
        for line in tfvars.lines() {
            let _ = writeln!(section, "{pad}{line}");
        }
    }

    section
}

/// Insert `section` into `existing` or scaffold a new document around it
pub fn compose(
    existing: Option<&str>,
    component_name: &str,
    section: &str,
    layout: &Layout,
) -> String {
    match existing {
        Some(existing) => splice(existing, section),
        None => scaffold(component_name, section, layout),
    }
}

/// A new document for `component_name`
///
/// Ends with a blank line, which is where the next [splice] will insert.
pub fn scaffold(component_name: &str, section: &str, layout: &Layout) -> String {
    format!(
        "{HEADER}\ncomponent:\n{}name: {}\n{section}\n",
        layout.pad(1),
        single_quoted(component_name)
    )
}

/// Insert `section` at the first blank line of `existing`
pub fn splice(existing: &str, section: &str) -> String {
    match existing.find("\n\n") {
        Some(index) => format!(
            "{}\n{section}\n{}",
            &existing[..index],
            &existing[index + 2..]
        ),
        None if existing.is_empty() || existing.ends_with('\n') => format!("{existing}{section}"),
        None => format!("{existing}\n{section}"),
    }
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(content: &str) -> String {
        template_section(content, None, &Layout::default())
    }

    #[test]
    fn scaffold_new_document() {
        let document = compose(
            None,
            "network",
            &section("    variable:\n      region: {}\n"),
            &Layout::default(),
        );

        let expected = "\
## local config
component:
  name: 'network'
  template:
    variable:
      region: {}

";
        assert_eq!(document, expected);
    }

    #[test]
    fn tfvars_are_nested_in_template() {
        let section = template_section(
            "    resource: {}\n",
            Some("region: eu-west-1\nzones:\n- a\n"),
            &Layout::default(),
        );

        let expected = "  template:
    resource: {}
    tfvars:
      region: eu-west-1
      zones:
      - a
";
        assert_eq!(section, expected);
    }

    #[test]
    fn tfvars_block_scalars_keep_blank_lines() {
        let section = template_section(
            "",
            Some("motd: |-\n  line1\n\n  line3\n"),
            &Layout::default(),
        );

        let expected = "  template:\n    tfvars:\n      motd: |-\n        line1\n      \n        line3\n";
        assert_eq!(section, expected);
        assert!(!section.contains("\n\n"));
    }

    #[test]
    fn splice_at_first_blank_line() {
        let existing = "component:\n  name: 'app'\n\n  build:\n    phase: x\n\nother: 1\n";
        let document = splice(existing, "  template:\n    a: 1\n");

        let expected =
            "component:\n  name: 'app'\n  template:\n    a: 1\n\n  build:\n    phase: x\n\nother: 1\n";
        assert_eq!(document, expected);
    }

    #[test]
    fn append_without_blank_line() {
        assert_eq!(
            splice("component:\n  name: 'app'\n", "  template:\n"),
            "component:\n  name: 'app'\n  template:\n"
        );
        assert_eq!(
            splice("component:\n  name: 'app'", "  template:\n"),
            "component:\n  name: 'app'\n  template:\n"
        );
    }

    #[test]
    fn compose_twice_keeps_single_component() {
        let layout = Layout::default();
        let first = compose(None, "app", &section("    a: 1\n"), &layout);
        let second = compose(Some(&first), "app", &section("    b: 2\n"), &layout);

        assert_eq!(second.matches("component:").count(), 1);

        let first_block = second.find("    a: 1").unwrap();
        let second_block = second.find("    b: 2").unwrap();
        assert!(first_block < second_block);

        let expected = "\
## local config
component:
  name: 'app'
  template:
    a: 1
  template:
    b: 2

";
        assert_eq!(second, expected);
    }

    #[test]
    fn component_name_is_quoted() {
        let document = scaffold("it's", "  template:\n", &Layout::default());
        assert!(document.contains("  name: 'it''s'\n"));
    }
}
