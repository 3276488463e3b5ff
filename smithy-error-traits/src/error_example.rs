/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use serde_json::json;
use smithy_error_model::traits::node_reader::*;
use smithy_error_model::{Node, ObjectNode, Trait, TraitError};

/// Defines examples for an error structure.
///
/// The examples are added to OpenAPI `components/examples` and referenced from the error
/// responses of every operation that can return the error.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorExampleTrait {
    pub examples: Vec<ErrorExampleEntry>,
}

/// A single error example.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorExampleEntry {
    pub title: String,
    pub documentation: Option<String>,
    pub content: ObjectNode,
}

impl ErrorExampleEntry {
    fn from_node(path: &str, node: &Node) -> Result<Self, TraitError> {
        let id = ErrorExampleTrait::ID;
        let entry = expect_object(id, path, node)?;
        let title = expect_string(
            id,
            &join(path, "title"),
            expect_member(id, path, entry, "title")?,
        )?;
        let content = expect_object(
            id,
            &join(path, "content"),
            expect_member(id, path, entry, "content")?,
        )?;
        let documentation = entry
            .get("documentation")
            .map(|doc| expect_string(id, &join(path, "documentation"), doc))
            .transpose()?;
        Ok(Self {
            title: title.into(),
            documentation: documentation.map(Into::into),
            content: content.clone(),
        })
    }

    fn to_node(&self) -> Node {
        let mut node = json!({ "title": self.title, "content": self.content });
        if let (Some(doc), Some(object)) = (&self.documentation, node.as_object_mut()) {
            object.insert("documentation".into(), Node::String(doc.clone()));
        }
        node
    }
}

impl ErrorExampleTrait {
    /// Parses every entry, returning the well-formed entries and one error per malformed entry.
    pub fn parse_entries(node: &Node) -> Result<(Vec<ErrorExampleEntry>, Vec<TraitError>), TraitError> {
        let mut entries = Vec::new();
        let mut errors = Vec::new();
        for (index, entry) in expect_array(Self::ID, "/", node)?.iter().enumerate() {
            match ErrorExampleEntry::from_node(&format!("/{index}"), entry) {
                Ok(entry) => entries.push(entry),
                Err(err) => errors.push(err),
            }
        }
        Ok((entries, errors))
    }

    /// The name of the example component for the entry at `index`:
    /// `<Error>Example` when there is a single entry, `<Error>Example1..N` otherwise.
    pub fn example_name(&self, error_name: &str, index: usize) -> String {
        if self.examples.len() > 1 {
            format!("{error_name}Example{}", index + 1)
        } else {
            format!("{error_name}Example")
        }
    }

    /// The key under which the entry at `index` is referenced from a response:
    /// `<Error>` when there is a single entry, `<Error>1..N` otherwise.
    pub fn reference_key(&self, error_name: &str, index: usize) -> String {
        if self.examples.len() > 1 {
            format!("{error_name}{}", index + 1)
        } else {
            error_name.to_string()
        }
    }
}

impl Trait for ErrorExampleTrait {
    const ID: &'static str = "com.example#errorExample";

    fn from_node(node: &Node) -> Result<Self, TraitError> {
        let (examples, mut errors) = Self::parse_entries(node)?;
        if !errors.is_empty() {
            return Err(errors.remove(0));
        }
        Ok(Self { examples })
    }

    fn to_node(&self) -> Node {
        Node::Array(self.examples.iter().map(ErrorExampleEntry::to_node).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_examples() {
        let node = json!([
            {"title": "Daily limit", "content": {"code": "TRANSFER_LIMIT_EXCEEDED"}},
            {"title": "Monthly limit", "documentation": "Rolling 30 days", "content": {}}
        ]);
        let parsed = ErrorExampleTrait::from_node(&node).unwrap();
        assert_eq!(parsed.examples.len(), 2);
        assert_eq!(parsed.examples[1].documentation.as_deref(), Some("Rolling 30 days"));
        assert_eq!(parsed.to_node(), node);
        assert_eq!(parsed.example_name("Limit", 0), "LimitExample1");
        assert_eq!(parsed.reference_key("Limit", 1), "Limit2");
    }

    #[test]
    fn single_example_names() {
        let parsed = ErrorExampleTrait::from_node(&json!([{"title": "t", "content": {}}])).unwrap();
        assert_eq!(parsed.example_name("Oops", 0), "OopsExample");
        assert_eq!(parsed.reference_key("Oops", 0), "Oops");
    }

    #[test]
    fn every_malformed_entry_is_reported() {
        let node = json!([
            {"content": {}},
            {"title": "ok", "content": {}},
            {"title": "bad content", "content": "nope"},
            {"title": 5, "content": {}}
        ]);
        let (entries, errors) = ErrorExampleTrait::parse_entries(&node).unwrap();
        assert_eq!(entries.len(), 1);
        let messages: Vec<_> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            vec![
                "`com.example#errorExample` is missing required property `/0/title`",
                "expected object at `/2/content` of `com.example#errorExample` but found string",
                "expected string at `/3/title` of `com.example#errorExample` but found number",
            ],
            messages
        );
        assert!(ErrorExampleTrait::from_node(&node).is_err());
        assert!(ErrorExampleTrait::from_node(&json!({})).is_err());
    }
}
