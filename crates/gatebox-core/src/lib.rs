//! gatebox: a logic network evaluation engine.
//!
//! # Overview
//!
//! A [`Network`] is an arena of gates with multi-bit ports, wired together
//! at runtime and evaluated on demand. Key properties:
//!
//! - **Lazy evaluation**: reading a gate's state recomputes its upstream
//!   closure, nothing is cached across reads
//! - **Partial-wiring detection**: a gate whose inputs are not all wired
//!   fails to evaluate with [`EvalError::NotFullyWired`]
//! - **Cycle detection**: feedback wiring fails with
//!   [`EvalError::CycleDetected`] instead of recursing forever
//! - **Composite gates**: a wired sub-network is captured as a
//!   [`Blueprint`] and turned into a new gate type whose every instance
//!   owns a private copy of the sub-network
//!
//! # Example
//!
//! ```
//! use gatebox_core::{evaluate_truth_table, Network};
//!
//! // NAND = NOT(AND(i0, i1))
//! let mut net = Network::new();
//! let input = net.add_sysin("SysIN", 2).unwrap();
//! let and = net.add_and("AND").unwrap();
//! let not = net.add_not("NOT").unwrap();
//!
//! net.wire_up(input, and, 0, 0).unwrap();
//! net.wire_up(input, and, 1, 1).unwrap();
//! net.wire_up(and, not, 0, 0).unwrap();
//!
//! net.set_state(input, &[0, 1], &[true, false]).unwrap();
//! assert_eq!(net.state(not).unwrap(), vec![true]);
//!
//! let table = evaluate_truth_table(&mut net, not, input).unwrap();
//! let outputs: Vec<bool> = table.rows().iter().map(|r| r.outputs[0]).collect();
//! assert_eq!(outputs, vec![true, true, true, false]);
//! ```
//!
//! # Composite gates
//!
//! ```
//! use gatebox_core::{build_blueprint, make_custom_gate_class, Network};
//!
//! let mut editor = Network::new();
//! let input = editor.add_sysin("SysIN", 2).unwrap();
//! let and = editor.add_and("AND").unwrap();
//! let not = editor.add_not("NOT").unwrap();
//! editor.wire_up(input, and, 0, 0).unwrap();
//! editor.wire_up(input, and, 1, 1).unwrap();
//! editor.wire_up(and, not, 0, 0).unwrap();
//!
//! let blueprint = build_blueprint(&editor, input, &[not], &editor.connections()).unwrap();
//! let nand = make_custom_gate_class("NAND", blueprint);
//!
//! let mut net = Network::new();
//! let src = net.add_sysin("in", 2).unwrap();
//! let gate = net.instantiate(&nand, "NAND").unwrap();
//! net.wire_up(src, gate, 0, 0).unwrap();
//! net.wire_up(src, gate, 1, 1).unwrap();
//!
//! net.set_inputs(src, &[true, true]).unwrap();
//! assert_eq!(net.state(gate).unwrap(), vec![false]);
//! ```
//!
//! # Threading
//!
//! Networks are single-actor: every mutation and every state read takes
//! `&mut self`. Share one across threads only behind external
//! synchronization.

pub mod blueprint;
pub mod composite;
pub mod error;
pub mod eval;
pub mod gate;
pub mod limits;
pub mod network;
pub mod port;
pub mod truth_table;

pub use blueprint::{build_blueprint, Blueprint, BlueprintConnection, GateSpec, SpecKind};
pub use composite::{make_custom_gate_class, CompositeInstance, CompositeType};
pub use error::{BuildError, EvalError, StateError, WireError};
pub use gate::{Connection, Gate, GateId, GateKind, Primitive, PrimitiveKind, WireRow};
pub use limits::{Limits, TABLE_WIDTH_CEILING};
pub use network::Network;
pub use port::Port;
pub use truth_table::{combination, evaluate_truth_table, TruthRow, TruthTable};
