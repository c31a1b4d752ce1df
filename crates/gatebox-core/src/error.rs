//! Error types for network editing, construction and evaluation.

use thiserror::Error;

use crate::gate::GateId;

/// Errors raised by the wiring mutation API.
///
/// A rejected mutation leaves the network untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// No live gate under this handle.
    #[error("unknown gate {0}")]
    UnknownGate(GateId),

    /// Source and sink are the same gate.
    #[error("gate {gate} cannot be wired to itself")]
    SelfWiring { gate: String },

    /// Sink input index is not below the sink's input count.
    #[error("gate {gate} has no input {port} (num_in = {num_in})")]
    InputOutOfRange {
        gate: String,
        port: usize,
        num_in: usize,
    },

    /// Source output index is not below the source's output count.
    #[error("gate {gate} has no output {port} (num_out = {num_out})")]
    OutputOutOfRange {
        gate: String,
        port: usize,
        num_out: usize,
    },

    /// The sink input already has a wire.
    #[error("input {port} of gate {gate} is already driven")]
    InputAlreadyDriven { gate: String, port: usize },

    /// Sink is a pure source whose state is set externally.
    #[error("gate {gate} is a source and takes no wires")]
    SinkIsSource { gate: String },

    /// Unwiring an input that has no wire.
    #[error("input {port} of gate {gate} is not wired")]
    NotWired { gate: String, port: usize },

    /// Only PASS and SysIN gates change width.
    #[error("gate {gate} cannot be resized")]
    NotResizable { gate: String },
}

/// Errors raised when writing the state of a source gate.
///
/// Validation happens before any port is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// No live gate under this handle.
    #[error("unknown gate {0}")]
    UnknownGate(GateId),

    /// State can only be assigned to SysIN gates.
    #[error("gate {gate} is not a source")]
    NotASource { gate: String },

    /// Index and value sequences differ in length.
    #[error("idxs and vals length mismatch ({indices} != {values})")]
    LengthMismatch { indices: usize, values: usize },

    /// Index is not below the gate's output count.
    #[error("gate {gate} has no port {port} (num_out = {num_out})")]
    PortOutOfRange {
        gate: String,
        port: usize,
        num_out: usize,
    },
}

/// Errors raised while reading gate state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// No live gate under this handle.
    #[error("unknown gate {0}")]
    UnknownGate(GateId),

    /// The wired input indices do not cover `0..num_in`.
    #[error("gate {gate} not fully wired up, ports {wired:?}")]
    NotFullyWired { gate: String, wired: Vec<usize> },

    /// The upstream walk came back to a gate still being computed.
    #[error("cycle detected at gate {gate}")]
    CycleDetected { gate: String },

    /// A wire reads an output port its source no longer has.
    #[error("gate {gate} reads missing output {port} of its source")]
    StaleWire { gate: String, port: usize },

    /// Truth tables are driven through SysIN gates only.
    #[error("gate {gate} is not a source")]
    NotASource { gate: String },

    /// Truth table would exceed the configured input width.
    #[error("truth table width {width} exceeds maximum ({max})")]
    TableTooWide { width: usize, max: usize },

    /// Driving a source failed.
    #[error(transparent)]
    State(#[from] StateError),
}

/// Errors raised while constructing gates, capturing blueprints or
/// instantiating composite gates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No live gate under this handle.
    #[error("unknown gate {0}")]
    UnknownGate(GateId),

    /// Gates have at least one input and one output.
    #[error("gate {gate} must have at least one input and one output")]
    ZeroWidth { gate: String },

    /// Two widths that must agree differ.
    #[error("gate {gate} width mismatch: expected {expected}, found {found}")]
    PortWidthMismatch {
        gate: String,
        expected: usize,
        found: usize,
    },

    /// Maximum live gate count exceeded.
    #[error("maximum gates exceeded ({0})")]
    MaxGatesExceeded(usize),

    /// Every gate handle has been handed out; handles are never reused.
    #[error("gate handles exhausted")]
    HandlesExhausted,

    /// Maximum composite nesting depth exceeded.
    #[error("maximum composite nesting exceeded ({0})")]
    MaxNestingExceeded(usize),

    /// The designated input gate is not a SysIN.
    #[error("input gate {gate} is not a source")]
    InputNotSource { gate: String },

    /// No output gate was designated.
    #[error("composite has no outputs")]
    NoOutputs,

    /// Blueprint refers to a local gate ID it does not define.
    #[error("blueprint has no gate with local ID {0}")]
    UnknownLocalId(usize),

    /// Replaying a connection failed.
    #[error(transparent)]
    Wire(#[from] WireError),
}
