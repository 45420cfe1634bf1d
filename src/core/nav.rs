//! # Navigation Data Model
//!
//! The normalized shapes produced by extraction and held by the store.
//! Everything here is plain data — no ratatui types, no I/O — so the two
//! surfaces, the dump mode, and the tests all consume the same structures.

use serde::Serialize;

/// Authored brand markup from the head of the nav document.
///
/// Cloned on each render; the original stays with the tree.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Logo {
    /// Display text (first heading's text).
    pub text: String,
    /// Raw authored markup line, kept verbatim for re-render.
    pub source: String,
}

/// The navigation tree built once per run from the authored nav document.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct NavTree {
    pub logo: Option<Logo>,
    /// Ordered first-level entries, one per direct item of the top-level list.
    pub entries: Vec<NavEntry>,
}

impl NavTree {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A first-level navigation entry.
///
/// An entry is a `Group` iff its authored list item directly contains a
/// nested list; otherwise it is a `Leaf`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum NavEntry {
    Leaf {
        label: String,
        href: String,
        /// Raw authored markup for the item.
        source: String,
    },
    Group {
        label: String,
        source: String,
        children: Vec<NavChild>,
    },
}

impl NavEntry {
    pub fn label(&self) -> &str {
        match self {
            NavEntry::Leaf { label, .. } | NavEntry::Group { label, .. } => label,
        }
    }

    /// Stable id derived from the label.
    pub fn slug(&self) -> String {
        slugify(self.label())
    }

    pub fn has_children(&self) -> bool {
        matches!(self, NavEntry::Group { children, .. } if !children.is_empty())
    }
}

/// A second-level (category) item inside a `Group`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NavChild {
    pub title: String,
    /// Empty string for text-only children.
    pub href: String,
    pub source: String,
    /// Pending third-level reference ids, in authored order. The linking
    /// pass consumes matched ids one at a time; unmatched ids stay here
    /// for a future pass.
    pub third_level_ids: Vec<String>,
    /// Resolved third-level content. Invariant: once populated, the
    /// resolved id is no longer present in `third_level_ids`.
    pub third_level: Option<Level3Data>,
}

impl NavChild {
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }
}

/// Third-level content for one category, authored in its own fragment and
/// linked in by slug id.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Level3Data {
    pub id: String,
    pub items: Vec<Level3Item>,
}

/// One block of third-level content, classified by the arity of its
/// authored source (1, 3, or 4 lines).
#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum Level3Item {
    /// Non-card content (banner, intro text).
    Header { source: String },
    /// Simple linked text row.
    TitleDescription {
        title: String,
        description: String,
        url: String,
    },
    /// A visual card.
    Square {
        title: String,
        url: String,
        description: String,
        footer: String,
    },
}

/// Normalize a label into a stable hyphenated lowercase id.
///
/// Non-alphanumeric runs collapse to a single hyphen; leading and trailing
/// hyphens are trimmed. Two labels that slugify identically are
/// indistinguishable by the lookup functions — authored content is assumed
/// unique per level.
pub fn slugify(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_hyphen = false;
    for ch in label.chars() {
        if ch.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Women's Shoes"), "women-s-shoes");
        assert_eq!(slugify("New  Arrivals"), "new-arrivals");
        assert_eq!(slugify("SALE"), "sale");
    }

    #[test]
    fn slugify_trims_edge_hyphens() {
        assert_eq!(slugify("  Gift Cards!  "), "gift-cards");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn slugify_collapses_symbol_runs() {
        assert_eq!(slugify("Tops & Tees"), "tops-tees");
        assert_eq!(slugify("B2B // Wholesale"), "b2b-wholesale");
    }

    #[test]
    fn entry_slug_comes_from_label() {
        let entry = NavEntry::Group {
            label: "Home & Living".to_string(),
            source: String::new(),
            children: vec![],
        };
        assert_eq!(entry.slug(), "home-living");
        assert!(!entry.has_children());
    }

    #[test]
    fn group_with_children_has_children() {
        let entry = NavEntry::Group {
            label: "Women".to_string(),
            source: String::new(),
            children: vec![NavChild {
                title: "Shoes".to_string(),
                href: "/women/shoes".to_string(),
                source: String::new(),
                third_level_ids: vec![],
                third_level: None,
            }],
        };
        assert!(entry.has_children());
    }
}
