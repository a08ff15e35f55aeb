//! Builds an [`XmlTree`] from a string with `quick_xml`.

use super::tree::{Attribute, Comment, Declaration, Element, Instruction, Node, XmlTree};
use crate::{error::Error, Result};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;

/// Parses an XML document into a tree, keeping all character data.
pub fn parse(xml: &str) -> Result<XmlTree> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    reader.check_end_names(true);

    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(&e, reader.buffer_position()))?;
        let position = reader.buffer_position();
        match event {
            Event::Start(e) => builder.open(element_from_start(&e, position)?),
            Event::Empty(e) => builder.attach(Node::Element(element_from_start(&e, position)?))?,
            Event::End(_) => builder.close()?,
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| xml_error(&err, position))?;
                builder.text(&text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                builder.text(&text)?;
            }
            Event::Comment(e) => {
                let content = String::from_utf8_lossy(&e.into_inner()).into_owned();
                builder.attach(Node::Comment(Comment::new(content)))?;
            }
            Event::PI(e) => {
                let content = String::from_utf8_lossy(&e.into_inner()).into_owned();
                builder.attach(Node::Instruction(Instruction {
                    content,
                    tail: None,
                }))?;
            }
            Event::Decl(e) => builder.declaration = Some(declaration(&e, position)?),
            Event::DocType(e) => {
                let doctype = String::from_utf8_lossy(&e.into_inner()).trim().to_string();
                builder.doctype = Some(doctype);
            }
            Event::Eof => break,
        }
        buf.clear();
    }

    builder.finish()
}

fn xml_error(err: &dyn std::fmt::Display, position: usize) -> Error {
    Error::Xml(format!("{} at byte {}", err, position))
}

fn element_from_start(start: &BytesStart, position: usize) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(&e, position))?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| xml_error(&e, position))?
            .into_owned();
        element.attributes.push(Attribute { name, value });
    }
    Ok(element)
}

fn declaration(decl: &BytesDecl, position: usize) -> Result<Declaration> {
    let text = |bytes: std::borrow::Cow<[u8]>| String::from_utf8_lossy(&bytes).into_owned();
    let version = decl.version().map_err(|e| xml_error(&e, position))?;
    let encoding = decl
        .encoding()
        .transpose()
        .map_err(|e| xml_error(&e, position))?;
    let standalone = decl
        .standalone()
        .transpose()
        .map_err(|e| xml_error(&e, position))?;
    Ok(Declaration {
        version: text(version),
        encoding: encoding.map(text),
        standalone: standalone.map(text),
    })
}

#[derive(Default)]
struct TreeBuilder {
    declaration: Option<Declaration>,
    doctype: Option<String>,
    prolog: Vec<Node>,
    epilog: Vec<Node>,
    root: Option<Element>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn open(&mut self, element: Element) {
        self.open.push(element);
    }

    fn close(&mut self) -> Result<()> {
        let element = self
            .open
            .pop()
            .ok_or_else(|| Error::Xml("unexpected end tag".to_string()))?;
        self.attach(Node::Element(element))
    }

    fn attach(&mut self, node: Node) -> Result<()> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match node {
            Node::Element(element) => {
                if self.root.is_some() {
                    return Err(Error::Xml(format!(
                        "second root element <{}>",
                        element.name
                    )));
                }
                self.root = Some(element);
            }
            other if self.root.is_none() => self.prolog.push(other),
            other => self.epilog.push(other),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let Some(parent) = self.open.last_mut() else {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(Error::Xml(format!(
                "character data outside the root element: {:?}",
                text.trim()
            )));
        };
        let slot = match parent.children.last_mut() {
            Some(child) => child.tail_mut(),
            None => &mut parent.text,
        };
        slot.get_or_insert_with(String::new).push_str(text);
        Ok(())
    }

    fn finish(self) -> Result<XmlTree> {
        if let Some(unclosed) = self.open.last() {
            return Err(Error::Xml(format!("unclosed element <{}>", unclosed.name)));
        }
        let root = self
            .root
            .ok_or_else(|| Error::Xml("document has no root element".to_string()))?;
        Ok(XmlTree {
            declaration: self.declaration,
            doctype: self.doctype,
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}
