use covenant_layout::{PageGeometry, Paginator};
use covenant_parser::{DocumentNode, DocumentStructure};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn contract(sections: usize) -> DocumentStructure {
    let mut doc = DocumentStructure::new("SERVICE AGREEMENT", "Leiden", "01.01.2026");
    for s in 0..sections {
        let children = (0..8)
            .map(|c| match c % 4 {
                0 => DocumentNode::subsection(
                    format!("s{}-{}", s, c),
                    "The contractor performs the services with due care and skill.",
                ),
                1 => DocumentNode::paragraph(format!("p{}-{}", s, c), "x".repeat(240)),
                2 => DocumentNode::bullet_list(format!("l{}-{}", s, c), ["a", "b", "c", "d"]),
                _ => DocumentNode::subsection(format!("t{}-{}", s, c), "y".repeat(170)),
            })
            .collect();
        doc.nodes
            .push(DocumentNode::section(format!("s{}", s), "CLAUSE").with_children(children));
    }
    doc
}

fn paginate_small_contract(c: &mut Criterion) {
    let doc = contract(5);
    let paginator = Paginator::new(PageGeometry::default());

    c.bench_function("paginate_small_contract", |b| {
        b.iter(|| paginator.paginate(black_box(&doc.nodes)))
    });
}

fn paginate_large_contract(c: &mut Criterion) {
    let doc = contract(120);
    let paginator = Paginator::new(PageGeometry::default());

    c.bench_function("paginate_large_contract", |b| {
        b.iter(|| paginator.paginate(black_box(&doc.nodes)))
    });
}

criterion_group!(benches, paginate_small_contract, paginate_large_contract);
criterion_main!(benches);
