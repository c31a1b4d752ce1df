//! Gate variants, gate handles and the per-gate wiring table.

use std::fmt;

use crate::composite::CompositeInstance;
use crate::error::BuildError;
use crate::port::Port;

/// Stable handle to a gate inside a [`Network`](crate::Network).
///
/// Handles are never reused after the gate is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(pub(crate) u32);

impl GateId {
    /// Slot index inside the owning network.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Built-in gate variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    /// Logical negation, one input, one output.
    Not,
    /// Logical AND, two inputs, one output.
    And,
    /// Identity over N inputs and N outputs.
    Pass,
    /// External source of N bits, never recomputed from upstream.
    SysIn,
}

impl PrimitiveKind {
    /// Name given to gates of this kind when none is supplied.
    pub fn default_name(self) -> &'static str {
        match self {
            PrimitiveKind::Not => "NOT",
            PrimitiveKind::And => "AND",
            PrimitiveKind::Pass => "PASS",
            PrimitiveKind::SysIn => "SysIN",
        }
    }

    /// Whether `increase_ports`/`decrease_ports` apply.
    pub fn is_resizable(self) -> bool {
        matches!(self, PrimitiveKind::Pass | PrimitiveKind::SysIn)
    }
}

/// A primitive gate variant together with its port counts.
///
/// Construct through [`Primitive::new`] (or the shorthand constructors),
/// which rejects widths the variant cannot have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Primitive {
    kind: PrimitiveKind,
    num_in: usize,
    num_out: usize,
}

impl Primitive {
    /// One-bit NOT.
    pub const NOT: Primitive = Primitive {
        kind: PrimitiveKind::Not,
        num_in: 1,
        num_out: 1,
    };

    /// Two-input AND.
    pub const AND: Primitive = Primitive {
        kind: PrimitiveKind::And,
        num_in: 2,
        num_out: 1,
    };

    /// Create a primitive, validating its port counts.
    pub fn new(kind: PrimitiveKind, num_in: usize, num_out: usize) -> Result<Self, BuildError> {
        let gate = kind.default_name().to_string();
        if num_in == 0 || num_out == 0 {
            return Err(BuildError::ZeroWidth { gate });
        }

        let (expected, found) = match kind {
            PrimitiveKind::Not if num_in != 1 => (1, num_in),
            PrimitiveKind::Not | PrimitiveKind::And if num_out != 1 => (1, num_out),
            PrimitiveKind::And if num_in != 2 => (2, num_in),
            PrimitiveKind::Pass | PrimitiveKind::SysIn if num_in != num_out => (num_in, num_out),
            _ => {
                return Ok(Self {
                    kind,
                    num_in,
                    num_out,
                })
            }
        };
        Err(BuildError::PortWidthMismatch {
            gate,
            expected,
            found,
        })
    }

    /// PASS gate of the given width.
    pub fn pass(width: usize) -> Result<Self, BuildError> {
        Self::new(PrimitiveKind::Pass, width, width)
    }

    /// SysIN gate of the given width.
    pub fn sysin(width: usize) -> Result<Self, BuildError> {
        Self::new(PrimitiveKind::SysIn, width, width)
    }

    pub fn kind(self) -> PrimitiveKind {
        self.kind
    }

    pub fn num_in(self) -> usize {
        self.num_in
    }

    pub fn num_out(self) -> usize {
        self.num_out
    }

    /// Whether this is a pure source (SysIN).
    pub fn is_source(self) -> bool {
        self.kind == PrimitiveKind::SysIn
    }

    /// Evaluate the combinational function on fully collected inputs.
    ///
    /// `inputs` has exactly `num_in` entries.
    pub fn compute(self, inputs: &[bool]) -> Vec<bool> {
        match self.kind {
            PrimitiveKind::Not => vec![!inputs[0]],
            PrimitiveKind::And => vec![inputs[0] && inputs[1]],
            PrimitiveKind::Pass | PrimitiveKind::SysIn => inputs.to_vec(),
        }
    }

    fn with_width(self, width: usize) -> Self {
        Self {
            kind: self.kind,
            num_in: width,
            num_out: width,
        }
    }
}

/// One row of a gate's wiring table: which upstream output feeds which
/// local input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireRow {
    pub from: GateId,
    pub from_port: usize,
    pub to_port: usize,
}

/// A wire as seen from the whole network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub from: GateId,
    pub to: GateId,
    pub from_port: usize,
    pub to_port: usize,
}

impl Connection {
    pub fn new(from: GateId, to: GateId, from_port: usize, to_port: usize) -> Self {
        Self {
            from,
            to,
            from_port,
            to_port,
        }
    }

    /// Whether either endpoint belongs to `gate`.
    pub fn touches(&self, gate: GateId) -> bool {
        self.from == gate || self.to == gate
    }
}

/// What a gate computes.
#[derive(Debug)]
pub enum GateKind {
    Primitive(Primitive),
    Composite(Box<CompositeInstance>),
}

/// A node in the logic network.
///
/// A gate owns its output ports and, as a sink, the wiring table of its
/// inputs. Sources are referenced by handle and never owned.
#[derive(Debug)]
pub struct Gate {
    pub(crate) name: String,
    pub(crate) kind: GateKind,
    pub(crate) num_in: usize,
    pub(crate) num_out: usize,
    pub(crate) outputs: Vec<Port>,
    pub(crate) wiring: Vec<WireRow>,
}

impl Gate {
    pub(crate) fn primitive(name: String, primitive: Primitive) -> Self {
        Self::with_kind(
            name,
            GateKind::Primitive(primitive),
            primitive.num_in(),
            primitive.num_out(),
        )
    }

    pub(crate) fn composite(name: String, instance: CompositeInstance) -> Self {
        let num_in = instance.composite_type().num_in();
        let num_out = instance.composite_type().num_out();
        Self::with_kind(name, GateKind::Composite(Box::new(instance)), num_in, num_out)
    }

    fn with_kind(name: String, kind: GateKind, num_in: usize, num_out: usize) -> Self {
        Self {
            name,
            kind,
            num_in,
            num_out,
            outputs: vec![Port::default(); num_out],
            wiring: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &GateKind {
        &self.kind
    }

    pub fn num_in(&self) -> usize {
        self.num_in
    }

    pub fn num_out(&self) -> usize {
        self.num_out
    }

    /// Output ports in index order.
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    /// Incoming wires in the order they were made.
    pub fn wiring(&self) -> &[WireRow] {
        &self.wiring
    }

    /// Pure sources are read directly and never pulled from upstream.
    pub fn is_base_layer(&self) -> bool {
        matches!(self.kind, GateKind::Primitive(p) if p.is_source())
    }

    /// Output values as last committed.
    pub fn values(&self) -> Vec<bool> {
        self.outputs.iter().map(Port::read).collect()
    }

    /// Distinct wired input indices, ascending.
    pub fn wired_inputs(&self) -> Vec<usize> {
        let mut wired: Vec<usize> = self.wiring.iter().map(|row| row.to_port).collect();
        wired.sort_unstable();
        wired.dedup();
        wired
    }

    /// Whether the wired inputs cover exactly `0..num_in`.
    pub fn is_fully_wired(&self) -> bool {
        let wired = self.wired_inputs();
        wired.len() == self.num_in && wired.iter().enumerate().all(|(i, &port)| i == port)
    }

    pub(crate) fn commit(&mut self, values: &[bool]) {
        debug_assert_eq!(values.len(), self.outputs.len(), "gate {}", self.name);
        for (port, &value) in self.outputs.iter_mut().zip(values) {
            port.write(value);
        }
    }

    /// Rebuild a resizable primitive at a new width with fresh ports and
    /// no wiring.
    pub(crate) fn resize(&mut self, width: usize) {
        if let GateKind::Primitive(primitive) = &mut self.kind {
            *primitive = primitive.with_width(width);
            self.num_in = width;
            self.num_out = width;
            self.outputs = vec![Port::default(); width];
            self.wiring.clear();
        }
    }
}
