use criterion::{Criterion, criterion_group, criterion_main};
use std::collections::VecDeque;
use std::hint::black_box;
use twentyq::lisp::{LispWriter, Traversal, parse_str};
use twentyq::model::KnowledgeTree;
use twentyq::tracer::{contrast, locate, render};

const TREE_SIZES: &[(&str, usize)] = &[("objects-1k", 1_000), ("objects-10k", 10_000)];

/// Grows a balanced knowledge tree with `num_objects` leaves by splitting
/// leaves in breadth-first order.
fn generate_tree(num_objects: usize) -> KnowledgeTree {
    let mut tree = KnowledgeTree::new("object 0");
    let mut leaves = VecDeque::from([tree.root_index()]);
    for i in 1..num_objects {
        let leaf = leaves.pop_front().unwrap();
        let (yes, no) = tree
            .split(leaf, &format!("object {i}"), &format!("question {i}?"))
            .unwrap();
        leaves.push_back(yes);
        leaves.push_back(no);
    }
    tree
}

fn codec(c: &mut Criterion) {
    for &(name, size) in TREE_SIZES {
        let tree = generate_tree(size);
        let text = LispWriter::new(Traversal::Prefix)
            .with_compact_leaves(true)
            .write(&tree);

        c.bench_function(&format!("parse {name}"), |b| {
            b.iter(|| parse_str(black_box(&text)).unwrap());
        });
        c.bench_function(&format!("write {name}"), |b| {
            b.iter(|| LispWriter::new(Traversal::Prefix).write(black_box(&tree)));
        });
        c.bench_function(&format!("verify {name}"), |b| {
            b.iter(|| black_box(&tree).verify().unwrap());
        });
    }
}

fn tracer(c: &mut Criterion) {
    for &(name, size) in TREE_SIZES {
        let tree = generate_tree(size);
        let last = format!("object {}", size / 2);
        let first = "object 0";

        c.bench_function(&format!("locate {name}"), |b| {
            b.iter(|| locate(&tree, black_box(&last)).unwrap());
        });

        let p1 = locate(&tree, first).unwrap().unwrap();
        let p2 = locate(&tree, &last).unwrap().unwrap();
        c.bench_function(&format!("render+contrast {name}"), |b| {
            b.iter(|| {
                render(&tree, black_box(&p1)).unwrap();
                contrast(&tree, black_box(&p1), black_box(&p2)).unwrap()
            });
        });
    }
}

criterion_group!(regression, codec, tracer);
criterion_main!(regression);
