//! Pagination properties over generated agreements

use covenant_layout::{
    reassemble, EstimatorMetrics, HeightEstimator, HeuristicEstimator, PageGeometry, Paginator,
};
use covenant_parser::{renumber, DocumentNode};

/// Small deterministic generator so the shapes vary between cases
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn generated_tree(seed: u64) -> Vec<DocumentNode> {
    let mut rng = Lcg(seed);
    let sections = 1 + rng.next(12);

    let nodes: Vec<DocumentNode> = (0..sections)
        .map(|s| {
            let children = (0..rng.next(7))
                .map(|c| {
                    let id = format!("n{}-{}", s, c);
                    let text = "w".repeat(rng.next(400) as usize);
                    match rng.next(3) {
                        0 => DocumentNode::subsection(id, text),
                        1 => DocumentNode::paragraph(id, text),
                        _ => DocumentNode::bullet_list(
                            id,
                            (0..1 + rng.next(6)).map(|i| format!("item {}", i)),
                        ),
                    }
                })
                .collect();
            DocumentNode::section(format!("s{}", s), "CLAUSE").with_children(children)
        })
        .collect();

    renumber(&nodes)
}

#[test]
fn test_pages_cover_document_in_order() {
    let paginator = Paginator::new(PageGeometry::default());

    for seed in 0..64 {
        let nodes = generated_tree(seed);
        let pages = paginator.paginate(&nodes);

        assert_eq!(reassemble(&pages), nodes, "seed {}", seed);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            assert!(!page.nodes.is_empty());
        }
    }
}

#[test]
fn test_page_heights_respect_capacity_unless_single_item() {
    let geometry = PageGeometry::default();
    let paginator = Paginator::new(geometry);
    let estimator = HeuristicEstimator::default();

    for seed in 0..64 {
        let pages = paginator.paginate(&generated_tree(seed));
        for page in &pages {
            let sum: u32 = page.nodes.iter().map(|n| estimator.estimate(n)).sum();
            assert_eq!(sum, page.height);

            assert!(
                page.height <= geometry.capacity(page.number) || page.nodes.len() == 1,
                "seed {} page {} height {}",
                seed,
                page.number,
                page.height
            );
        }
    }
}

#[test]
fn test_first_page_capacity_is_smaller() {
    // Each paragraph is 20 + 20 * 1 = 40 high
    let nodes: Vec<_> = (0..30)
        .map(|i| DocumentNode::paragraph(format!("p{}", i), "x".repeat(50)))
        .collect();
    let geometry = PageGeometry {
        first_page_capacity: 200,
        page_capacity: 400,
    };

    let pages = Paginator::new(geometry).paginate(&nodes);

    // Cumulative height of p5 is 240: over page 1, under the later capacity
    assert_eq!(pages[0].nodes.len(), 5);
    assert_eq!(pages[0].nodes.last().unwrap().id, "p4");
    assert_eq!(pages[1].nodes[0].id, "p5");
    assert_eq!(pages[1].nodes.len(), 10);
}

#[test]
fn test_custom_metrics_change_packing() {
    let nodes: Vec<_> = (0..4)
        .map(|i| DocumentNode::section(format!("s{}", i), "S"))
        .collect();
    let geometry = PageGeometry {
        first_page_capacity: 100,
        page_capacity: 100,
    };

    let default_pages = Paginator::new(geometry).paginate(&nodes);
    assert_eq!(default_pages.len(), 2);

    let tall = HeuristicEstimator::new(EstimatorMetrics {
        section: 100,
        ..EstimatorMetrics::default()
    });
    let tall_pages = Paginator::with_estimator(tall, geometry).paginate(&nodes);
    assert_eq!(tall_pages.len(), 4);
}

#[test]
fn test_section_kept_with_children_when_possible() {
    let nodes = vec![
        DocumentNode::section("a", "A").with_children(vec![DocumentNode::paragraph(
            "a1",
            "x".repeat(900),
        )]),
        DocumentNode::section("b", "B").with_children(vec![
            DocumentNode::subsection("b1", "short"),
            DocumentNode::subsection("b2", "short"),
        ]),
    ];
    // a = 40 + 200 = 240; b = 40 + 50 + 50 = 140; 380 > 300
    let geometry = PageGeometry {
        first_page_capacity: 300,
        page_capacity: 300,
    };

    let pages = Paginator::new(geometry).paginate(&nodes);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].nodes[0].id, "b");
    assert_eq!(pages[0].nodes.len(), 2);
}
