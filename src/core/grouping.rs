//! Run-grouping over third-level content.
//!
//! A single left-to-right scan that collapses consecutive runs of the same
//! variant into one rendered group: adjacency, not position, is the
//! grouping key. Naive per-item rendering would fragment visually related
//! cards into separate grids whenever interleaved with headers.

use crate::core::nav::Level3Item;

/// One renderable block produced by the scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentGroup {
    /// A lone non-card block; never grouped.
    Header(Level3Item),
    /// A run of consecutive `Square` cards rendered as one grid.
    Squares(Vec<Level3Item>),
    /// A run of consecutive `TitleDescription` rows rendered as one grid.
    Rows(Vec<Level3Item>),
}

impl ContentGroup {
    pub fn len(&self) -> usize {
        match self {
            ContentGroup::Header(_) => 1,
            ContentGroup::Squares(items) | ContentGroup::Rows(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collapse consecutive same-variant runs into groups.
///
/// Pure fold over the item slice; rendering consumes the group sequence
/// separately so one bad entry can be skipped without blanking the panel.
pub fn group_runs(items: &[Level3Item]) -> Vec<ContentGroup> {
    let mut groups: Vec<ContentGroup> = Vec::new();
    for item in items {
        match item {
            Level3Item::Header { .. } => groups.push(ContentGroup::Header(item.clone())),
            Level3Item::Square { .. } => match groups.last_mut() {
                Some(ContentGroup::Squares(run)) => run.push(item.clone()),
                _ => groups.push(ContentGroup::Squares(vec![item.clone()])),
            },
            Level3Item::TitleDescription { .. } => match groups.last_mut() {
                Some(ContentGroup::Rows(run)) => run.push(item.clone()),
                _ => groups.push(ContentGroup::Rows(vec![item.clone()])),
            },
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Level3Item {
        Level3Item::Header {
            source: "banner".to_string(),
        }
    }

    fn square(title: &str) -> Level3Item {
        Level3Item::Square {
            title: title.to_string(),
            url: "/x".to_string(),
            description: "d".to_string(),
            footer: "f".to_string(),
        }
    }

    fn row(title: &str) -> Level3Item {
        Level3Item::TitleDescription {
            title: title.to_string(),
            description: "d".to_string(),
            url: "/x".to_string(),
        }
    }

    #[test]
    fn canonical_interleaving() {
        let items = vec![header(), square("a"), square("b"), header(), row("c")];
        let groups = group_runs(&items);
        assert_eq!(groups.len(), 4);
        assert!(matches!(groups[0], ContentGroup::Header(_)));
        assert!(matches!(&groups[1], ContentGroup::Squares(run) if run.len() == 2));
        assert!(matches!(groups[2], ContentGroup::Header(_)));
        assert!(matches!(&groups[3], ContentGroup::Rows(run) if run.len() == 1));
    }

    #[test]
    fn adjacency_is_the_grouping_key() {
        // Same variants separated by a header never merge.
        let items = vec![square("a"), header(), square("b")];
        let groups = group_runs(&items);
        assert_eq!(groups.len(), 3);
        assert!(matches!(&groups[0], ContentGroup::Squares(run) if run.len() == 1));
        assert!(matches!(&groups[2], ContentGroup::Squares(run) if run.len() == 1));
    }

    #[test]
    fn headers_never_group() {
        let groups = group_runs(&[header(), header()]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn variant_change_starts_new_run() {
        let items = vec![square("a"), row("b"), square("c")];
        let groups = group_runs(&items);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(group_runs(&[]).is_empty());
    }
}
