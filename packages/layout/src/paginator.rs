//! # Pagination
//!
//! Single left-to-right greedy pass over the top-level nodes.
//!
//! - Page 1 has a smaller capacity (the title block sits on top of it).
//! - A section with children is kept together with them when a clean page
//!   boundary is available: if the whole subtree does not fit on a page
//!   that already has content, the page is flushed first.
//! - The section header is then emitted as a standalone banner (children
//!   cleared) followed by each child as its own page item, so a section
//!   that is taller than a fresh page spills child by child.
//! - Every other node is placed on the current page unless it overflows.
//!
//! A page is only flushed when it holds something, so no page is empty.

use covenant_parser::ast::DocumentNode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::estimator::{HeightEstimator, HeuristicEstimator};

/// Page capacities in estimator units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGeometry {
    pub first_page_capacity: u32,
    pub page_capacity: u32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            first_page_capacity: 700,
            page_capacity: 950,
        }
    }
}

impl PageGeometry {
    /// Capacity of the 1-based page `number`
    pub fn capacity(&self, number: usize) -> u32 {
        if number <= 1 {
            self.first_page_capacity
        } else {
            self.page_capacity
        }
    }
}

/// One printable page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based
    pub number: usize,

    /// Page items in order; section headers appear with empty children
    pub nodes: Vec<DocumentNode>,

    /// Estimated height used on this page
    pub height: u32,
}

/// Greedy paginator over a height estimator
#[derive(Debug, Clone, Default)]
pub struct Paginator<E = HeuristicEstimator> {
    estimator: E,
    geometry: PageGeometry,
}

impl Paginator<HeuristicEstimator> {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            estimator: HeuristicEstimator::default(),
            geometry,
        }
    }
}

impl<E: HeightEstimator> Paginator<E> {
    pub fn with_estimator(estimator: E, geometry: PageGeometry) -> Self {
        Self {
            estimator,
            geometry,
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Partition the top-level nodes into pages
    #[instrument(skip_all, fields(nodes = nodes.len()))]
    pub fn paginate(&self, nodes: &[DocumentNode]) -> Vec<Page> {
        let mut current = PageBuilder::new(self.geometry);

        for node in nodes {
            if node.is_section() && !node.children.is_empty() {
                let subtree = self.estimator.estimate_section_subtree(node);
                if current.overflows(subtree) {
                    current.flush();
                }

                let mut header = node.header_only();
                header.depth = 0;
                current.push(header, self.estimator.estimate(node));

                for child in &node.children {
                    let height = self.estimator.estimate(child);
                    if current.overflows(height) {
                        current.flush();
                    }

                    let mut item = child.clone();
                    item.depth = 1;
                    current.push(item, height);
                }
            } else {
                let height = self.estimator.estimate(node);
                if current.overflows(height) {
                    current.flush();
                }

                let mut item = node.clone();
                item.depth = 0;
                current.push(item, height);
            }
        }

        let pages = current.finish();
        debug!(pages = pages.len(), "Paginated document");
        pages
    }
}

/// Accumulator for the page being filled
struct PageBuilder {
    geometry: PageGeometry,
    pages: Vec<Page>,
    nodes: Vec<DocumentNode>,
    height: u32,
}

impl PageBuilder {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            nodes: Vec::new(),
            height: 0,
        }
    }

    fn number(&self) -> usize {
        self.pages.len() + 1
    }

    /// True if `height` does not fit and a flush would help
    fn overflows(&self, height: u32) -> bool {
        !self.nodes.is_empty()
            && self.height.saturating_add(height) > self.geometry.capacity(self.number())
    }

    fn push(&mut self, node: DocumentNode, height: u32) {
        self.nodes.push(node);
        self.height = self.height.saturating_add(height);
    }

    fn flush(&mut self) {
        if self.nodes.is_empty() {
            return;
        }

        let number = self.number();
        self.pages.push(Page {
            number,
            nodes: std::mem::take(&mut self.nodes),
            height: self.height,
        });
        self.height = 0;
    }

    fn finish(mut self) -> Vec<Page> {
        self.flush();
        self.pages
    }
}

/// Rebuild the top-level sequence from pages
///
/// Items at depth 1 are re-attached to the nearest preceding section, which
/// undoes the header flattening done by [`Paginator::paginate`].
pub fn reassemble(pages: &[Page]) -> Vec<DocumentNode> {
    let mut out: Vec<DocumentNode> = Vec::new();

    for node in pages.iter().flat_map(|page| &page.nodes) {
        if node.depth > 0 {
            if let Some(parent) = out.last_mut().filter(|last| last.is_section()) {
                parent.children.push(node.clone());
                continue;
            }
        }
        out.push(node.clone());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every node is `height` tall
    struct Uniform(u32);

    impl HeightEstimator for Uniform {
        fn estimate(&self, _node: &DocumentNode) -> u32 {
            self.0
        }
    }

    fn geometry(first: u32, rest: u32) -> PageGeometry {
        PageGeometry {
            first_page_capacity: first,
            page_capacity: rest,
        }
    }

    fn ids(page: &Page) -> Vec<&str> {
        page.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_empty_document_has_no_pages() {
        let paginator = Paginator::new(PageGeometry::default());
        assert!(paginator.paginate(&[]).is_empty());
    }

    #[test]
    fn test_leaves_fill_pages_greedily() {
        let nodes: Vec<_> = (0..5)
            .map(|i| DocumentNode::paragraph(format!("p{}", i), ""))
            .collect();
        let paginator = Paginator::with_estimator(Uniform(10), geometry(20, 30));

        let pages = paginator.paginate(&nodes);
        assert_eq!(pages.len(), 2);
        assert_eq!(ids(&pages[0]), vec!["p0", "p1"]);
        assert_eq!(ids(&pages[1]), vec!["p2", "p3", "p4"]);
        assert_eq!(pages[1].number, 2);
        assert_eq!(pages[1].height, 30);
    }

    #[test]
    fn test_section_moves_to_fresh_page_when_it_would_split() {
        let nodes = vec![
            DocumentNode::paragraph("intro", ""),
            DocumentNode::section("s", "S").with_children(vec![
                DocumentNode::subsection("s1", ""),
                DocumentNode::subsection("s2", ""),
            ]),
        ];
        // Subtree is 30; 10 + 30 > 35 so the section starts page 2
        let paginator = Paginator::with_estimator(Uniform(10), geometry(35, 100));

        let pages = paginator.paginate(&nodes);
        assert_eq!(pages.len(), 2);
        assert_eq!(ids(&pages[0]), vec!["intro"]);
        assert_eq!(ids(&pages[1]), vec!["s", "s1", "s2"]);
        assert!(pages[1].nodes[0].children.is_empty());
    }

    #[test]
    fn test_oversized_section_spills_without_empty_page() {
        let section = DocumentNode::section("s", "S").with_children(
            (0..5)
                .map(|i| DocumentNode::paragraph(format!("c{}", i), ""))
                .collect(),
        );
        let paginator = Paginator::with_estimator(Uniform(10), geometry(30, 30));

        let pages = paginator.paginate(&[section]);
        assert_eq!(pages.len(), 2);
        assert_eq!(ids(&pages[0]), vec!["s", "c0", "c1"]);
        assert_eq!(ids(&pages[1]), vec!["c2", "c3", "c4"]);
        assert!(pages.iter().all(|p| !p.nodes.is_empty()));
    }

    #[test]
    fn test_oversized_leaf_gets_its_own_page() {
        let nodes = vec![
            DocumentNode::paragraph("a", ""),
            DocumentNode::paragraph("huge", "x".repeat(5000)),
            DocumentNode::paragraph("b", ""),
        ];
        let paginator = Paginator::new(geometry(100, 100));

        let pages = paginator.paginate(&nodes);
        assert_eq!(pages.len(), 3);
        assert_eq!(ids(&pages[1]), vec!["huge"]);
    }

    #[test]
    fn test_empty_section_is_a_plain_item() {
        let nodes = vec![DocumentNode::section("a", "A"), DocumentNode::section("b", "B")];
        let paginator = Paginator::with_estimator(Uniform(10), geometry(15, 15));

        let pages = paginator.paginate(&nodes);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].nodes[0].id, "a");
    }

    #[test]
    fn test_reassemble_restores_subtrees() {
        let nodes = vec![
            DocumentNode::section("a", "A").with_children(vec![
                DocumentNode::subsection("a1", ""),
                DocumentNode::paragraph("a2", ""),
            ]),
            DocumentNode::section("b", "B"),
        ];
        let paginator = Paginator::with_estimator(Uniform(10), geometry(20, 20));

        let pages = paginator.paginate(&nodes);
        assert!(pages.len() > 1);
        assert_eq!(reassemble(&pages), nodes);
    }
}
