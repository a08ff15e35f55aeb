//! The reserved XML parts of an ODF package.

use crate::xml::{self, XmlTree};
use tracing::warn;

/// Archive path of the mimetype member. It is stored as a plain string and
/// never parsed.
pub const MIMETYPE_PATH: &str = "mimetype";

/// One of the five reserved, XML-bearing parts of an ODF document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentKind {
    Manifest,
    Content,
    Styles,
    Meta,
    Settings,
}

impl ComponentKind {
    /// All kinds in archive write order.
    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Manifest,
        ComponentKind::Content,
        ComponentKind::Styles,
        ComponentKind::Meta,
        ComponentKind::Settings,
    ];

    /// Reserved archive path of this component.
    pub fn path(self) -> &'static str {
        match self {
            ComponentKind::Manifest => "META-INF/manifest.xml",
            ComponentKind::Content => "content.xml",
            ComponentKind::Styles => "styles.xml",
            ComponentKind::Meta => "meta.xml",
            ComponentKind::Settings => "settings.xml",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Manifest => "manifest",
            ComponentKind::Content => "content",
            ComponentKind::Styles => "styles",
            ComponentKind::Meta => "meta",
            ComponentKind::Settings => "settings",
        }
    }

    /// Whether the reserved filename carries an XML extension.
    pub fn is_xml(self) -> bool {
        self.path().ends_with(".xml")
    }

    /// Looks up the component stored at an archive path.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.path() == path)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// A component in either raw or parsed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Raw(String),
    Parsed(XmlTree),
}

impl Default for Component {
    fn default() -> Self {
        Component::Raw(String::new())
    }
}

impl Component {
    /// Classifies raw component data: non-empty data for an XML kind is
    /// parsed, everything else stays raw. Data that fails to parse is kept
    /// raw so the package still round-trips.
    pub fn from_raw(kind: ComponentKind, raw: String) -> Self {
        if raw.is_empty() || !kind.is_xml() {
            return Component::Raw(raw);
        }
        match xml::parse(&raw) {
            Ok(tree) => Component::Parsed(tree),
            Err(e) => {
                warn!("Keeping {} unparsed: {}", kind.path(), e);
                Component::Raw(raw)
            }
        }
    }

    pub fn tree(&self) -> Option<&XmlTree> {
        match self {
            Component::Parsed(tree) => Some(tree),
            Component::Raw(_) => None,
        }
    }

    pub fn tree_mut(&mut self) -> Option<&mut XmlTree> {
        match self {
            Component::Parsed(tree) => Some(tree),
            Component::Raw(_) => None,
        }
    }

    /// Serialized form, as written to the archive.
    pub fn to_xml_string(&self) -> String {
        match self {
            Component::Raw(raw) => raw.clone(),
            Component::Parsed(tree) => xml::write_tree(tree),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Component::Raw(raw) if raw.is_empty())
    }
}
