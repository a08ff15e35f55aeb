//! Tree translation, text extraction and search/replace over XML trees.

use crate::xml::{local_name, Comment, Element, Elements, Instruction, Node};
use crate::{error::Error, Result};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{trace, warn};

/// Tag used for elements that have no entry in the tag map.
pub const DEFAULT_TAG: &str = "p";

/// Shape classification of a node before translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeClass<'a> {
    Element(&'a Element),
    Comment(&'a Comment),
    Instruction(&'a Instruction),
    /// Not a usable element; carries a description of the problem.
    Malformed(String),
}

/// Classifies a node. Elements with an empty or illegal name are malformed.
pub fn classify(node: &Node) -> NodeClass<'_> {
    match node {
        Node::Element(e) => match malformed_reason(e) {
            Some(reason) => NodeClass::Malformed(reason),
            None => NodeClass::Element(e),
        },
        Node::Comment(c) => NodeClass::Comment(c),
        Node::Instruction(i) => NodeClass::Instruction(i),
    }
}

fn malformed_reason(element: &Element) -> Option<String> {
    let mut chars = element.name.chars();
    let Some(first) = chars.next() else {
        return Some("element without a name".to_string());
    };
    let valid_start = first.is_alphabetic() || first == '_' || first == ':';
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':'));
    if valid_start && valid_rest {
        None
    } else {
        Some(format!("invalid element name {:?}", element.name))
    }
}

/// What to do with attributes that have no entry in the attribute map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributePolicy {
    /// Leave the attribute out of the translated element.
    #[default]
    Drop,
    /// Copy the attribute with its original name.
    Keep,
    /// Fail the translation with [`Error::UnmappedAttribute`].
    Reject,
}

/// Tag and attribute renaming tables.
///
/// Lookups try the qualified name first (`text:p`) and then the local name
/// (`p`), so maps can be written without namespace prefixes.
#[derive(Debug, Clone)]
pub struct TranslationMap {
    pub tags: HashMap<String, String>,
    pub attributes: HashMap<String, String>,
    pub default_tag: String,
    pub unmapped_attributes: AttributePolicy,
}

impl Default for TranslationMap {
    fn default() -> Self {
        Self {
            tags: HashMap::new(),
            attributes: HashMap::new(),
            default_tag: DEFAULT_TAG.to_string(),
            unmapped_attributes: AttributePolicy::default(),
        }
    }
}

impl TranslationMap {
    /// The ODF content to HTML mapping.
    pub fn html() -> Self {
        let tags = [
            ("a", "a"),
            ("body", "body"),
            ("p", "p"),
            ("span", "span"),
            ("table", "table"),
            ("h", "h1"),
            ("table-row", "tr"),
            ("table-cell", "td"),
            ("image", "img"),
            ("list", "ol"),
            ("list-item", "li"),
        ];
        Self {
            tags: tags
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            attributes: HashMap::from([("style-name".to_string(), "class".to_string())]),
            ..Default::default()
        }
    }

    pub fn with_policy(mut self, policy: AttributePolicy) -> Self {
        self.unmapped_attributes = policy;
        self
    }

    /// Output tag for an input element name.
    pub fn tag(&self, name: &str) -> &str {
        lookup(&self.tags, name).unwrap_or(self.default_tag.as_str())
    }

    /// Output name for an input attribute name, if mapped.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        lookup(&self.attributes, name)
    }
}

fn lookup<'a>(map: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    map.get(name)
        .or_else(|| map.get(local_name(name)))
        .map(String::as_str)
}

/// Translates a node into the target vocabulary.
///
/// Comments are copied, processing instructions are dropped (`None`) and
/// malformed elements become comments, so every other input node yields
/// exactly one output node.
pub fn translate(node: &Node, map: &TranslationMap) -> Result<Option<Node>> {
    match classify(node) {
        NodeClass::Element(e) => Ok(Some(Node::Element(translate_valid(e, map)?))),
        NodeClass::Comment(c) => Ok(Some(Node::Comment(c.clone()))),
        NodeClass::Instruction(_) => Ok(None),
        NodeClass::Malformed(reason) => {
            trace!("Replacing malformed node with a comment: {}", reason);
            Ok(Some(Node::Comment(Comment {
                content: reason,
                tail: node.tail().map(str::to_string),
            })))
        }
    }
}

/// Translates an element subtree. A malformed root is returned as a
/// default-tag element wrapping the replacement comment.
pub fn translate_element(element: &Element, map: &TranslationMap) -> Result<Element> {
    match malformed_reason(element) {
        None => translate_valid(element, map),
        Some(reason) => Ok(Element::new(map.default_tag.clone()).with_child(Node::Comment(
            Comment::new(reason),
        ))),
    }
}

fn translate_valid(element: &Element, map: &TranslationMap) -> Result<Element> {
    let mut out = Element::new(map.tag(&element.name));
    out.text = element.text.clone();
    out.tail = element.tail.clone();

    for attr in &element.attributes {
        match map.attribute(&attr.name) {
            Some(name) => out.set_attribute(name, attr.value.clone()),
            None => match map.unmapped_attributes {
                AttributePolicy::Drop => {
                    trace!("Dropping unmapped attribute {} on {}", attr.name, element.name)
                }
                AttributePolicy::Keep => out.set_attribute(attr.name.clone(), attr.value.clone()),
                AttributePolicy::Reject => {
                    return Err(Error::UnmappedAttribute {
                        element: element.name.clone(),
                        attribute: attr.name.clone(),
                    })
                }
            },
        }
    }

    for child in &element.children {
        if let Some(translated) = translate(child, map)? {
            out.children.push(translated);
        }
    }
    Ok(out)
}

/// Direct text of each element in document order.
#[derive(Debug, Clone)]
pub struct TextNodes<'a> {
    elements: Elements<'a>,
    skip_blank: bool,
}

impl<'a> Iterator for TextNodes<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let element = self.elements.next()?;
            let text = element.text.as_deref().unwrap_or("");
            if self.skip_blank && text.trim().is_empty() {
                continue;
            }
            return Some(text);
        }
    }
}

/// Yields the direct text payload of `root` and every descendant element in
/// document order. With `skip_blank`, empty and whitespace-only texts are
/// left out.
pub fn extract_text(root: &Element, skip_blank: bool) -> TextNodes<'_> {
    TextNodes {
        elements: root.iter(),
        skip_blank,
    }
}

/// Runs a regex substitution over the text of every element.
///
/// Returns the number of elements whose text changed. An empty search is a
/// no-op; a search that does not compile is logged and also returns 0.
/// The replacement string uses `regex` expansion syntax (`$1`, `${name}`).
pub fn replace(root: &mut Element, search: &str, replacement: &str) -> usize {
    if search.is_empty() {
        return 0;
    }
    let regex = match Regex::new(search) {
        Ok(regex) => regex,
        Err(e) => {
            warn!("Could not compile regular expression {:?}: {}", search, e);
            return 0;
        }
    };
    replace_with(root, &regex, replacement)
}

/// [`replace`] with an already compiled expression.
pub fn replace_with(root: &mut Element, regex: &Regex, replacement: &str) -> usize {
    let mut count = 0;
    if let Some(text) = root.text.as_mut().filter(|t| !t.is_empty()) {
        let replaced = match regex.replace_all(text, replacement) {
            Cow::Borrowed(_) => None,
            Cow::Owned(new) => Some(new),
        };
        if let Some(new) = replaced.filter(|new| new.as_str() != text.as_str()) {
            *text = new;
            count += 1;
        }
    }
    for child in &mut root.children {
        if let Node::Element(e) = child {
            count += replace_with(e, regex, replacement);
        }
    }
    count
}
