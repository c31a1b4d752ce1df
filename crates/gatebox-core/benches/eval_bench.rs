//! Benchmarks for gatebox evaluation performance.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gatebox_core::{
    build_blueprint, evaluate_truth_table, make_custom_gate_class, CompositeType, GateId, Limits,
    Network,
};

/// Build a chain of NOT gates fed by a one-bit source.
fn build_chain(depth: usize) -> (Network, GateId) {
    let mut net = Network::with_limits(Limits::permissive());
    let src = net.add_sysin("SysIN", 1).unwrap();
    let mut last = src;
    for i in 0..depth {
        let not = net.add_not(format!("not{i}")).unwrap();
        net.wire_up(last, not, 0, 0).unwrap();
        last = not;
    }
    (net, last)
}

/// Build a balanced AND tree over `width` source bits.
fn build_and_tree(width: usize) -> (Network, GateId, GateId) {
    let mut net = Network::with_limits(Limits::permissive());
    let src = net.add_sysin("SysIN", width).unwrap();

    let mut layer: Vec<(GateId, usize)> = (0..width).map(|port| (src, port)).collect();
    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len() / 2 + 1);
        for pair in layer.chunks(2) {
            match pair {
                [(a, pa), (b, pb)] => {
                    let and = net.add_and("AND").unwrap();
                    net.wire_up(*a, and, *pa, 0).unwrap();
                    net.wire_up(*b, and, *pb, 1).unwrap();
                    next.push((and, 0));
                }
                [single] => next.push(*single),
                _ => unreachable!(),
            }
        }
        layer = next;
    }
    (net, src, layer[0].0)
}

/// NOT(AND(i0, i1)) as a composite type.
fn nand_type() -> CompositeType {
    let mut net = Network::new();
    let input = net.add_sysin("SysIN", 2).unwrap();
    let and = net.add_and("AND").unwrap();
    let not = net.add_not("NOT").unwrap();
    net.wire_up(input, and, 0, 0).unwrap();
    net.wire_up(input, and, 1, 1).unwrap();
    net.wire_up(and, not, 0, 0).unwrap();
    let blueprint = build_blueprint(&net, input, &[not], &net.connections()).unwrap();
    make_custom_gate_class("NAND", blueprint)
}

fn bench_state_chain(c: &mut Criterion) {
    let (mut chain_10, out_10) = build_chain(10);
    let (mut chain_100, out_100) = build_chain(100);

    c.bench_function("state_not_chain_10", |b| {
        b.iter(|| chain_10.state(black_box(out_10)))
    });

    c.bench_function("state_not_chain_100", |b| {
        b.iter(|| chain_100.state(black_box(out_100)))
    });
}

fn bench_state_tree(c: &mut Criterion) {
    let (mut net, src, root) = build_and_tree(64);
    net.set_inputs(src, &[true; 64]).unwrap();

    c.bench_function("state_and_tree_64", |b| {
        b.iter(|| net.state(black_box(root)))
    });
}

fn bench_truth_table(c: &mut Criterion) {
    let (mut net, src, root) = build_and_tree(8);

    c.bench_function("truth_table_and_tree_8", |b| {
        b.iter(|| evaluate_truth_table(&mut net, black_box(root), black_box(src)))
    });
}

fn bench_composite(c: &mut Criterion) {
    let nand = nand_type();

    c.bench_function("instantiate_nand", |b| {
        b.iter(|| {
            let mut net = Network::new();
            net.instantiate(black_box(&nand), "NAND").unwrap()
        })
    });

    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 2).unwrap();
    let gate = net.instantiate(&nand, "NAND").unwrap();
    net.wire_up(src, gate, 0, 0).unwrap();
    net.wire_up(src, gate, 1, 1).unwrap();

    c.bench_function("state_nand_instance", |b| {
        b.iter(|| net.state(black_box(gate)))
    });
}

criterion_group!(
    benches,
    bench_state_chain,
    bench_state_tree,
    bench_truth_table,
    bench_composite,
);

criterion_main!(benches);
