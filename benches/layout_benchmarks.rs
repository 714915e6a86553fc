use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sidequest_core::layout::{layout_tree, LayoutConfig};
use sidequest_core::models::{DecisionEdge, DecisionNode, Polarity};
use sidequest_core::parser::parse_storylines;

/// Complete ternary tree of the given depth
fn ternary_tree(depth: u32) -> (Vec<DecisionNode>, Vec<DecisionEdge>) {
    let mut nodes = vec![DecisionNode::root("root")];
    let mut edges = Vec::new();
    let mut frontier = vec![nodes[0].id.clone()];

    for _ in 0..depth {
        let mut next = Vec::new();
        for parent in &frontier {
            for polarity in Polarity::OUTCOME_CYCLE {
                let child = DecisionNode::outcome("outcome", polarity);
                edges.push(DecisionEdge::connect(parent, &child.id));
                next.push(child.id.clone());
                nodes.push(child);
            }
        }
        frontier = next;
    }
    (nodes, edges)
}

fn benchmark_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();
    for depth in [3, 6] {
        let (nodes, edges) = ternary_tree(depth);
        c.bench_function(&format!("layout_ternary_depth_{depth}"), |b| {
            b.iter(|| layout_tree(black_box(&nodes), black_box(&edges), &config))
        });
    }
}

fn benchmark_storyline_parsing(c: &mut Criterion) {
    let raw = r#"[
        {"text": "a", "polarity": "positive", "next": {"text": "b", "polarity": "neutral", "next": {"text": "c", "polarity": "negative"}}},
        {"text": "a", "polarity": "neutral", "next": {"text": "b", "polarity": "positive", "next": {"text": "c", "polarity": "negative"}}},
        {"text": "a", "polarity": "negative", "next": {"text": "b", "polarity": "neutral", "next": {"text": "c", "polarity": "positive"}}}
    ]"#;
    c.bench_function("parse_storylines", |b| {
        b.iter(|| parse_storylines(black_box(raw), Some(3)))
    });
}

criterion_group!(benches, benchmark_layout, benchmark_storyline_parsing);
criterion_main!(benches);
