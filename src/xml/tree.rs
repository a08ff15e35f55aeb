//! ElementTree-shaped XML model.
//!
//! Character data is split the way ElementTree splits it: `text` is the data
//! before an element's first child and `tail` is the data following the
//! element's end tag inside its parent.

/// XML declaration (`<?xml version="1.0" encoding="UTF-8"?>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: None,
        }
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlTree {
    pub declaration: Option<Declaration>,
    pub doctype: Option<String>,
    /// Comments and instructions before the root element.
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Comments and instructions after the root element.
    pub epilog: Vec<Node>,
}

impl XmlTree {
    pub fn new(root: Element) -> Self {
        Self {
            declaration: None,
            doctype: None,
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written in the source, e.g. `text:p`.
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub text: Option<String>,
    pub children: Vec<Node>,
    pub tail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub content: String,
    pub tail: Option<String>,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tail: None,
        }
    }
}

/// Processing instruction; `content` holds target and data verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instruction {
    pub content: String,
    pub tail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Comment(Comment),
    Instruction(Instruction),
}

impl Node {
    pub fn tail(&self) -> Option<&str> {
        match self {
            Node::Element(e) => e.tail.as_deref(),
            Node::Comment(c) => c.tail.as_deref(),
            Node::Instruction(i) => i.tail.as_deref(),
        }
    }

    pub fn tail_mut(&mut self) -> &mut Option<String> {
        match self {
            Node::Element(e) => &mut e.tail,
            Node::Comment(c) => &mut c.tail,
            Node::Instruction(i) => &mut i.tail,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Name without its namespace prefix (`text:p` -> `p`).
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute, replacing the value in place if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Pre-order iterator over this element and all descendant elements.
    pub fn iter(&self) -> Elements<'_> {
        Elements { stack: vec![self] }
    }

    /// First element in document order with the given qualified name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.iter().find(|e| e.name == name)
    }

    /// Concatenated text of this element and its descendants, tails included.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    if let Some(text) = &element.text {
        out.push_str(text);
    }
    for child in &element.children {
        if let Node::Element(e) = child {
            collect_text(e, out);
        }
        if let Some(tail) = child.tail() {
            out.push_str(tail);
        }
    }
}

pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Document-order iterator over elements. Cloning restarts from the
/// clone's position.
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack
            .extend(element.children.iter().rev().filter_map(Node::as_element));
        Some(element)
    }
}
