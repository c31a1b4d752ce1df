//! Golden circuit integration tests.
//!
//! These tests drive complete networks from wiring through evaluation,
//! composite synthesis and truth tables.

use gatebox_core::{
    build_blueprint, evaluate_truth_table, make_custom_gate_class, CompositeType, EvalError,
    GateId, Network, WireError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Wire `width` consecutive outputs of `from` into inputs of `to`.
fn wire_bus(net: &mut Network, from: GateId, to: GateId, width: usize) {
    for port in 0..width {
        net.wire_up(from, to, port, port).expect("bus wire should be accepted");
    }
}

/// Editor network computing NOT(AND(i0, i1)), returned with its
/// SysIN and output gate.
fn nand_editor() -> (Network, GateId, GateId) {
    let mut net = Network::new();
    let input = net.add_sysin("SysIN", 2).unwrap();
    let and = net.add_and("AND").unwrap();
    let not = net.add_not("NOT").unwrap();
    let out = net.add_pass("SysOUT", 1).unwrap();
    wire_bus(&mut net, input, and, 2);
    net.wire_up(and, not, 0, 0).unwrap();
    net.wire_up(not, out, 0, 0).unwrap();
    (net, input, out)
}

fn nand_type() -> CompositeType {
    let (net, input, out) = nand_editor();
    let blueprint = build_blueprint(&net, input, &[out], &net.connections()).unwrap();
    make_custom_gate_class("NAND", blueprint)
}

/// NOT(false) = true, NOT(true) = false
#[test]
fn test_not_truth_table() {
    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 1).unwrap();
    let not = net.add_not("NOT").unwrap();
    net.wire_up(src, not, 0, 0).unwrap();

    let table = evaluate_truth_table(&mut net, not, src).unwrap();
    let rows: Vec<(Vec<bool>, Vec<bool>)> = table
        .rows()
        .iter()
        .map(|r| (r.inputs.clone(), r.outputs.clone()))
        .collect();
    assert_eq!(
        rows,
        vec![(vec![false], vec![true]), (vec![true], vec![false])]
    );
}

/// SysIN width 2 feeding AND gives exactly four rows in binary order.
#[test]
fn test_and_truth_table_order() {
    init_tracing();
    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 2).unwrap();
    let and = net.add_and("AND").unwrap();
    wire_bus(&mut net, src, and, 2);

    let table = evaluate_truth_table(&mut net, and, src).unwrap();
    let expected = [
        ([false, false], false),
        ([false, true], false),
        ([true, false], false),
        ([true, true], true),
    ];

    assert_eq!(table.len(), expected.len());
    for (row, (inputs, output)) in table.rows().iter().zip(expected) {
        assert_eq!(row.inputs, inputs.to_vec());
        assert_eq!(row.outputs, vec![output]);
    }
}

/// One source output wired to two sinks delivers the same bit to both.
#[test]
fn test_fan_out() {
    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 1).unwrap();
    let left = net.add_pass("left", 1).unwrap();
    let right = net.add_pass("right", 1).unwrap();
    net.wire_up(src, left, 0, 0).unwrap();
    net.wire_up(src, right, 0, 0).unwrap();

    for value in [true, false, true] {
        net.set_inputs(src, &[value]).unwrap();
        assert_eq!(net.state(left).unwrap(), vec![value]);
        assert_eq!(net.state(right).unwrap(), vec![value]);
    }
}

/// AND with one input wired fails; wiring the second input fixes it.
#[test]
fn test_partial_wiring_then_complete() {
    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 2).unwrap();
    let and = net.add_and("AND").unwrap();
    net.wire_up(src, and, 0, 0).unwrap();

    let err = net.state(and).unwrap_err();
    assert_eq!(
        err,
        EvalError::NotFullyWired {
            gate: "AND".to_string(),
            wired: vec![0],
        }
    );
    assert_eq!(err.to_string(), "gate AND not fully wired up, ports [0]");

    net.wire_up(src, and, 1, 1).unwrap();
    assert_eq!(net.state(and).unwrap(), vec![false]);
}

/// Two instances of one composite type evaluate independently and agree
/// with the template network.
#[test]
fn test_composite_independence() {
    init_tracing();
    let nand = nand_type();

    let mut net = Network::new();
    let src_a = net.add_sysin("a", 2).unwrap();
    let src_b = net.add_sysin("b", 2).unwrap();
    let gate_a = net.instantiate(&nand, "A").unwrap();
    let gate_b = net.instantiate(&nand, "B").unwrap();
    wire_bus(&mut net, src_a, gate_a, 2);
    wire_bus(&mut net, src_b, gate_b, 2);

    // (true, false) -> AND = false -> NOT = true
    net.set_inputs(src_a, &[true, false]).unwrap();
    net.set_inputs(src_b, &[true, false]).unwrap();
    assert_eq!(net.state(gate_a).unwrap(), vec![true]);
    assert_eq!(net.state(gate_b).unwrap(), vec![true]);

    // Driving A must not move B.
    net.set_inputs(src_a, &[true, true]).unwrap();
    assert_eq!(net.state(gate_a).unwrap(), vec![false]);
    assert_eq!(net.output_values(gate_b), Some(vec![true]));
    assert_eq!(net.state(gate_b).unwrap(), vec![true]);

    // The template network is untouched by either instance.
    let (mut template, input, out) = nand_editor();
    template.set_inputs(input, &[true, false]).unwrap();
    assert_eq!(template.state(out).unwrap(), vec![true]);
}

/// Instances do not share state with the network the blueprint came from.
#[test]
fn test_composite_detached_from_template() {
    let (mut editor, input, out) = nand_editor();
    let blueprint = build_blueprint(&editor, input, &[out], &editor.connections()).unwrap();
    let nand = make_custom_gate_class("NAND", blueprint);

    let src = editor.add_sysin("drive", 2).unwrap();
    let gate = editor.instantiate(&nand, "NAND").unwrap();
    wire_bus(&mut editor, src, gate, 2);

    editor.set_inputs(input, &[true, true]).unwrap();
    editor.set_inputs(src, &[false, false]).unwrap();
    assert_eq!(editor.state(out).unwrap(), vec![false]);
    assert_eq!(editor.state(gate).unwrap(), vec![true]);

    // Rewiring the template after capture does not reach the instance.
    editor.remove(out).unwrap();
    assert_eq!(editor.state(gate).unwrap(), vec![true]);
}

/// Composite inside composite: AND built from two NANDs.
#[test]
fn test_nested_composite() {
    let nand = nand_type();

    let mut editor = Network::new();
    let input = editor.add_sysin("SysIN", 2).unwrap();
    let first = editor.instantiate(&nand, "nand").unwrap();
    let invert = editor.instantiate(&nand, "invert").unwrap();
    wire_bus(&mut editor, input, first, 2);
    editor.wire_up(first, invert, 0, 0).unwrap();
    editor.wire_up(first, invert, 0, 1).unwrap();

    let blueprint = build_blueprint(&editor, input, &[invert], &editor.connections()).unwrap();
    let and = make_custom_gate_class("AND2", blueprint);

    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 2).unwrap();
    let gate = net.instantiate(&and, "AND2").unwrap();
    wire_bus(&mut net, src, gate, 2);

    let table = evaluate_truth_table(&mut net, gate, src).unwrap();
    let outputs: Vec<bool> = table.rows().iter().map(|r| r.outputs[0]).collect();
    assert_eq!(outputs, vec![false, false, false, true]);
}

/// Composite outputs concatenate the declared output gates in order.
#[test]
fn test_composite_output_order() {
    let mut editor = Network::new();
    let input = editor.add_sysin("SysIN", 2).unwrap();
    let and = editor.add_and("AND").unwrap();
    let swap = editor.add_pass("swap", 2).unwrap();
    wire_bus(&mut editor, input, and, 2);
    editor.wire_up(input, swap, 0, 1).unwrap();
    editor.wire_up(input, swap, 1, 0).unwrap();

    let blueprint =
        build_blueprint(&editor, input, &[swap, and], &editor.connections()).unwrap();
    let ty = make_custom_gate_class("SWAP_AND", blueprint);
    assert_eq!(ty.num_out(), 3);

    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 2).unwrap();
    let gate = net.instantiate(&ty, "SWAP_AND").unwrap();
    wire_bus(&mut net, src, gate, 2);

    net.set_inputs(src, &[true, false]).unwrap();
    assert_eq!(net.state(gate).unwrap(), vec![false, true, false]);
}

/// Resizing severs wires; the network reports what was cut.
#[test]
fn test_resize_workflow() {
    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 1).unwrap();
    let out = net.add_pass("SysOUT", 1).unwrap();
    net.wire_up(src, out, 0, 0).unwrap();

    let severed = net.increase_ports(src).unwrap();
    assert_eq!(severed.len(), 1);
    assert!(net.state(out).is_err());

    net.increase_ports(out).unwrap();
    wire_bus(&mut net, src, out, 2);
    net.set_inputs(src, &[false, true]).unwrap();
    assert_eq!(net.state(out).unwrap(), vec![false, true]);
}

/// Removed gates leave no dangling wires.
#[test]
fn test_remove_gate() {
    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 1).unwrap();
    let not = net.add_not("NOT").unwrap();
    let out = net.add_pass("SysOUT", 1).unwrap();
    net.wire_up(src, not, 0, 0).unwrap();
    net.wire_up(not, out, 0, 0).unwrap();

    net.remove(not).unwrap();
    assert_eq!(
        net.wire_up(not, out, 0, 0),
        Err(WireError::UnknownGate(not))
    );
    assert_eq!(
        net.state(out),
        Err(EvalError::NotFullyWired {
            gate: "SysOUT".to_string(),
            wired: vec![],
        })
    );
}

/// Feedback wiring is reported, not recursed into.
#[test]
fn test_feedback_loop() {
    let mut net = Network::new();
    let src = net.add_sysin("SysIN", 1).unwrap();
    let and = net.add_and("AND").unwrap();
    let not = net.add_not("NOT").unwrap();
    net.wire_up(src, and, 0, 0).unwrap();
    net.wire_up(not, and, 0, 1).unwrap();
    net.wire_up(and, not, 0, 0).unwrap();

    assert!(matches!(
        net.state(not),
        Err(EvalError::CycleDetected { .. })
    ));
}
