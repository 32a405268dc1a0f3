//! Nodes of the art-movement taxonomy as read from the listing pages.

use reqwest::Url;

/// Level of a node in the era -> movement -> artist hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Era,
    Movement,
    Artist,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Era => "era",
            CategoryKind::Movement => "movement",
            CategoryKind::Artist => "artist",
        }
    }
}

/// A category read from a listing page. Immutable once read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub kind: CategoryKind,
    pub name: String,
    /// Page listing this node's children.
    pub link: Url,
}

impl CategoryNode {
    pub fn movement(name: impl Into<String>, link: Url) -> Self {
        Self {
            kind: CategoryKind::Movement,
            name: name.into(),
            link,
        }
    }

    pub fn artist(name: impl Into<String>, link: Url) -> Self {
        Self {
            kind: CategoryKind::Artist,
            name: name.into(),
            link,
        }
    }
}

/// An anchor on an artist's works listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintingLink {
    pub title: String,
    /// Detail page of the painting, not the image itself.
    pub link: Url,
}

/// Everything the root listing page exposes.
#[derive(Debug, Clone, Default)]
pub struct RootListing {
    /// All movements in page order. Era ranges index into this list.
    pub movements: Vec<CategoryNode>,
    /// Era header labels in page order.
    pub eras: Vec<String>,
}
