//! Front-matter splitting

use serde_yaml::{Mapping, Value};

/// Raw front-matter of a post, split from its body but not yet validated
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub data: Mapping,
}

impl FrontMatter {
    /// Split content into front-matter and body.
    ///
    /// Content without a leading `---` block yields an empty mapping and the
    /// whole text as body. An unterminated block or YAML that is not a
    /// mapping is an error.
    pub fn parse(content: &str) -> Result<(Self, &str), String> {
        let content = content.trim_start_matches('\u{feff}');
        let Some(rest) = content.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content));
        };

        // "----" or "--- foo" is not a delimiter line
        let first_line_end = rest.find('\n').unwrap_or(rest.len());
        if !rest[..first_line_end].trim().is_empty() {
            return Ok((FrontMatter::default(), content));
        }
        let rest = &rest[first_line_end..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        let (yaml_content, remaining) = if let Some(after) = rest.strip_prefix("---") {
            ("", after)
        } else if let Some(end_pos) = rest.find("\n---") {
            (&rest[..end_pos], &rest[end_pos + 4..])
        } else {
            return Err("front-matter block is not closed with '---'".to_string());
        };

        // Drop the remainder of the closing delimiter line
        let remaining = match remaining.find('\n') {
            Some(pos) if remaining[..pos].trim().is_empty() => &remaining[pos + 1..],
            None if remaining.trim().is_empty() => "",
            _ => remaining,
        };
        let body = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        match serde_yaml::from_str::<Value>(yaml_content) {
            Ok(Value::Mapping(data)) => Ok((FrontMatter { data }, body)),
            Ok(Value::Null) => Ok((FrontMatter::default(), body)),
            Ok(_) => Err("front-matter is not a key/value mapping".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Look up a field by name
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
tags:
  - rust
  - detection
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(
            fm.get("title").and_then(Value::as_str),
            Some("Hello World")
        );
        assert!(fm.get("tags").unwrap().is_sequence());
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_no_frontmatter_is_all_body() {
        let content = "# Heading\n\nJust text.\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.data.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let (fm, body) = FrontMatter::parse("---\n---\nBody\n").unwrap();
        assert!(fm.data.is_empty());
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_horizontal_rule_in_body_is_kept() {
        let content = "---\ntitle: A\nslug: a\n---\nIntro\n\n---\n\nMore\n";
        let (_, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(body, "Intro\n\n---\n\nMore\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_unclosed_block_is_error() {
        assert!(FrontMatter::parse("---\ntitle: Oops\n\nNo end").is_err());
    }

    #[test]
    fn test_non_mapping_is_error() {
        assert!(FrontMatter::parse("---\n- a\n- b\n---\nBody").is_err());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(FrontMatter::parse("---\ntitle: [unclosed\n---\nBody").is_err());
    }
}
