//! # Height estimation
//!
//! Unitless size estimates used only to compare blocks against page
//! capacity. They model line wrapping with a fixed characters-per-line
//! width and are tuned by hand, not measured.

use covenant_parser::ast::{DocumentNode, NodeKind};
use serde::{Deserialize, Serialize};

/// Strategy for estimating the rendered height of a node
pub trait HeightEstimator {
    /// Height of the node itself (children are not included)
    fn estimate(&self, node: &DocumentNode) -> u32;

    /// Height of a section plus each of its direct children
    fn estimate_section_subtree(&self, node: &DocumentNode) -> u32 {
        node.children
            .iter()
            .fold(self.estimate(node), |acc, child| acc.saturating_add(self.estimate(child)))
    }
}

impl<E: HeightEstimator + ?Sized> HeightEstimator for &E {
    fn estimate(&self, node: &DocumentNode) -> u32 {
        (**self).estimate(node)
    }

    fn estimate_section_subtree(&self, node: &DocumentNode) -> u32 {
        (**self).estimate_section_subtree(node)
    }
}

/// Constants behind [`HeuristicEstimator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimatorMetrics {
    /// Section banners have a fixed height
    pub section: u32,

    pub subsection_base: u32,
    pub subsection_line: u32,
    pub subsection_chars_per_line: u32,

    pub paragraph_base: u32,
    pub paragraph_line: u32,
    pub paragraph_chars_per_line: u32,

    pub list_base: u32,
    pub list_item: u32,

    /// Used for kinds the estimator does not know
    pub fallback: u32,
}

impl Default for EstimatorMetrics {
    fn default() -> Self {
        Self {
            section: 40,
            subsection_base: 30,
            subsection_line: 20,
            subsection_chars_per_line: 80,
            paragraph_base: 20,
            paragraph_line: 20,
            paragraph_chars_per_line: 100,
            list_base: 20,
            list_item: 24,
            fallback: 50,
        }
    }
}

/// Line-wrap heuristic over [`EstimatorMetrics`]
#[derive(Debug, Clone, Default)]
pub struct HeuristicEstimator {
    pub metrics: EstimatorMetrics,
}

impl HeuristicEstimator {
    pub fn new(metrics: EstimatorMetrics) -> Self {
        Self { metrics }
    }
}

impl HeightEstimator for HeuristicEstimator {
    fn estimate(&self, node: &DocumentNode) -> u32 {
        let m = &self.metrics;
        let len = u32::try_from(node.content.chars().count()).unwrap_or(u32::MAX);

        match node.kind {
            NodeKind::Section => m.section,
            NodeKind::Subsection => m.subsection_base.saturating_add(
                m.subsection_line
                    .saturating_mul(lines(len, m.subsection_chars_per_line)),
            ),
            NodeKind::Paragraph => m.paragraph_base.saturating_add(
                m.paragraph_line
                    .saturating_mul(lines(len, m.paragraph_chars_per_line)),
            ),
            NodeKind::BulletList => {
                let items = u32::try_from(node.items.len()).unwrap_or(u32::MAX);
                m.list_base.saturating_add(m.list_item.saturating_mul(items))
            }
            NodeKind::Unknown => m.fallback,
        }
    }
}

/// `ceil(len / width)`; a zero width counts as a single line
fn lines(len: u32, width: u32) -> u32 {
    if width == 0 {
        return 1;
    }
    len.div_ceil(width)
}
