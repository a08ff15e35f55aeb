//! Ordered XML tree used for every parsed ODF component.

mod escape;
mod reader;
mod tree;
mod writer;

pub use escape::{escape_attr, escape_text};
pub use reader::parse;
pub use tree::{
    local_name, Attribute, Comment, Declaration, Element, Elements, Instruction, Node, XmlTree,
};
pub use writer::{write_element_string, write_tree, WriteMode};
