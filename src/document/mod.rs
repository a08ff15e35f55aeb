//! In-memory ODF document.

mod component;
mod mimetype;

pub use component::{Component, ComponentKind, MIMETYPE_PATH};
pub use mimetype::{extension_for_mimetype, mimetype_for_extension, ODF_FORMATS, ODF_PREFIX};

use crate::pattern::{Pattern, PatternOptions};
use crate::render::{HtmlRenderer, TextRenderer, XmlRenderer};
use crate::translate;
use crate::xml::XmlTree;
use crate::{error::Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Modification time of an archive entry.
pub type Timestamp = zip::DateTime;

/// Archive prefix under which ODF producers store embedded objects.
pub const PICTURES_PREFIX: &str = "Pictures/";

/// Element in `meta.xml` that names the document author.
const CREATOR_TAG: &str = "dc:creator";

/// An ODF document: the mimetype, the five reserved components, every other
/// archive entry, and the entry timestamps needed to write it back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    mimetype: String,
    components: [Component; 5],
    additional: BTreeMap<String, Vec<u8>>,
    timestamps: BTreeMap<String, Timestamp>,
    source: Option<PathBuf>,
}

impl Document {
    /// Creates an empty document with the given mimetype.
    pub fn new(mimetype: impl Into<String>) -> Self {
        Self {
            mimetype: mimetype.into(),
            ..Default::default()
        }
    }

    /// Builder-style variant of [`Document::set_component`].
    pub fn with_component(mut self, kind: ComponentKind, raw: impl Into<String>) -> Self {
        self.set_component(kind, raw.into());
        self
    }

    /// Stores raw component data, parsing it if it is non-empty XML.
    pub fn set_component(&mut self, kind: ComponentKind, raw: String) {
        self.components[kind.index()] = Component::from_raw(kind, raw);
    }

    pub fn component(&self, kind: ComponentKind) -> &Component {
        &self.components[kind.index()]
    }

    pub fn component_mut(&mut self, kind: ComponentKind) -> &mut Component {
        &mut self.components[kind.index()]
    }

    /// Component in its serialized form.
    pub fn component_string(&self, kind: ComponentKind) -> String {
        self.component(kind).to_xml_string()
    }

    /// Parsed tree of a component, if it was parsed.
    pub fn tree(&self, kind: ComponentKind) -> Option<&XmlTree> {
        self.component(kind).tree()
    }

    pub fn mimetype(&self) -> &str {
        &self.mimetype
    }

    pub fn set_mimetype(&mut self, mimetype: impl Into<String>) {
        self.mimetype = mimetype.into();
    }

    /// Archive entries that are not reserved components.
    pub fn additional(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.additional
    }

    /// Adds an archive entry, routing reserved paths to the mimetype or the
    /// matching component.
    pub fn insert_entry(
        &mut self,
        name: &str,
        data: Vec<u8>,
        timestamp: Option<Timestamp>,
    ) -> Result<()> {
        if name == MIMETYPE_PATH {
            self.mimetype = utf8_entry(name, data)?;
        } else if let Some(kind) = ComponentKind::from_path(name) {
            let raw = utf8_entry(name, data)?;
            self.set_component(kind, raw);
        } else {
            self.additional.insert(name.to_string(), data);
        }
        if let Some(timestamp) = timestamp {
            self.timestamps.insert(name.to_string(), timestamp);
        }
        Ok(())
    }

    pub fn timestamp(&self, name: &str) -> Option<Timestamp> {
        self.timestamps.get(name).copied()
    }

    pub fn timestamps(&self) -> &BTreeMap<String, Timestamp> {
        &self.timestamps
    }

    pub fn set_timestamp(&mut self, name: impl Into<String>, timestamp: Timestamp) {
        self.timestamps.insert(name.into(), timestamp);
    }

    /// File the document was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub(crate) fn set_source(&mut self, path: PathBuf) {
        self.source = Some(path);
    }

    /// First non-empty `dc:creator` in the metadata, or `""`.
    pub fn author(&self) -> String {
        self.tree(ComponentKind::Meta)
            .and_then(|tree| {
                tree.root
                    .iter()
                    .filter(|e| e.name == CREATOR_TAG)
                    .find_map(|e| e.text.as_deref().filter(|t| !t.is_empty()))
            })
            .unwrap_or_default()
            .to_string()
    }

    /// Canonical extension for the mimetype, or `""` if unknown.
    pub fn extension(&self) -> &'static str {
        extension_for_mimetype(&self.mimetype)
    }

    /// Embedded objects under `Pictures/` whose stripped name matches
    /// `filter` (glob or regex; `None` matches everything). Directory
    /// entries are not objects and never match.
    pub fn embedded_objects(
        &self,
        filter: Option<&str>,
        ignore_case: bool,
    ) -> Result<BTreeMap<&str, &[u8]>> {
        let options = PatternOptions {
            ignore_case,
            ..Default::default()
        };
        let pattern = Pattern::compile(filter, options)?;
        Ok(self
            .additional
            .iter()
            .filter_map(|(name, data)| {
                let stripped = name
                    .strip_prefix(PICTURES_PREFIX)
                    .filter(|s| !s.is_empty() && !s.ends_with('/'))?;
                pattern
                    .matches(stripped)
                    .then_some((stripped, data.as_slice()))
            })
            .collect())
    }

    /// Regex search/replace over the text of the content component.
    /// Returns the number of text nodes changed.
    pub fn replace(&mut self, search: &str, replacement: &str) -> usize {
        match self.component_mut(ComponentKind::Content).tree_mut() {
            Some(tree) => translate::replace(&mut tree.root, search, replacement),
            None => 0,
        }
    }

    /// Plain text of the content, one text node per line.
    pub fn to_text(&self, skip_blank_lines: bool) -> String {
        TextRenderer::new(skip_blank_lines).text(self)
    }

    /// HTML rendering of the content body.
    pub fn to_html(&self, title: &str) -> Result<String> {
        HtmlRenderer::new(title).html(self)
    }

    /// Serialized content XML, with a declaration if `encoding` is given.
    pub fn to_xml(&self, encoding: Option<&str>) -> String {
        XmlRenderer::new(encoding.map(str::to_string)).xml(self)
    }
}

fn utf8_entry(name: &str, data: Vec<u8>) -> Result<String> {
    String::from_utf8(data).map_err(|_| Error::InvalidUtf8 {
        entry: name.to_string(),
    })
}
