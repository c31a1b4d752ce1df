//! Gate arena and the wiring mutation API.

use tracing::debug;

use crate::error::{BuildError, StateError, WireError};
use crate::gate::{Connection, Gate, GateId, GateKind, Primitive, PrimitiveKind, WireRow};
use crate::limits::Limits;

/// An arena of gates wired into a logic network.
///
/// Gates are addressed by [`GateId`]. Removing a gate frees its slot for
/// good, so a stale handle is reported as unknown rather than aliasing a
/// newer gate. Slots of removed gates stay allocated as empty entries, so
/// a network that adds and removes gates indefinitely eventually fails
/// with [`BuildError::HandlesExhausted`].
///
/// The network is single-actor: every mutation and every state read takes
/// `&mut self`.
#[derive(Debug, Default)]
pub struct Network {
    slots: Vec<Option<Gate>>,
    live: usize,
    limits: Limits,
    /// Composite depth of this network, 0 for a top-level network.
    pub(crate) nesting: usize,
}

fn next_id(slot: usize) -> Result<GateId, BuildError> {
    u32::try_from(slot)
        .map(GateId)
        .map_err(|_| BuildError::HandlesExhausted)
}

impl Network {
    /// Create an empty network with default limits.
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create an empty network with custom limits.
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
            limits,
            nesting: 0,
        }
    }

    pub(crate) fn nested(limits: Limits, nesting: usize) -> Self {
        Self {
            nesting,
            ..Self::with_limits(limits)
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Number of live gates.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Handles of all live gates, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = GateId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| GateId(index as u32))
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn gate_mut(&mut self, id: GateId) -> Option<&mut Gate> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub(crate) fn insert(&mut self, gate: Gate) -> Result<GateId, BuildError> {
        if self.live >= self.limits.max_gates {
            return Err(BuildError::MaxGatesExceeded(self.limits.max_gates));
        }
        let id = next_id(self.slots.len())?;
        debug!(gate = %id, name = gate.name(), "added gate");
        self.slots.push(Some(gate));
        self.live += 1;
        Ok(id)
    }

    /// Add a primitive gate.
    pub fn add_primitive(
        &mut self,
        name: impl Into<String>,
        primitive: Primitive,
    ) -> Result<GateId, BuildError> {
        self.insert(Gate::primitive(name.into(), primitive))
    }

    pub fn add_not(&mut self, name: impl Into<String>) -> Result<GateId, BuildError> {
        self.add_primitive(name, Primitive::NOT)
    }

    pub fn add_and(&mut self, name: impl Into<String>) -> Result<GateId, BuildError> {
        self.add_primitive(name, Primitive::AND)
    }

    pub fn add_pass(&mut self, name: impl Into<String>, width: usize) -> Result<GateId, BuildError> {
        self.add_primitive(name, Primitive::pass(width)?)
    }

    pub fn add_sysin(
        &mut self,
        name: impl Into<String>,
        width: usize,
    ) -> Result<GateId, BuildError> {
        self.add_primitive(name, Primitive::sysin(width)?)
    }

    /// Feed output `from_port` of `from` into input `to_port` of `to`.
    ///
    /// Indices are validated immediately. Each input takes at most one
    /// wire; outputs fan out freely.
    pub fn wire_up(
        &mut self,
        from: GateId,
        to: GateId,
        from_port: usize,
        to_port: usize,
    ) -> Result<(), WireError> {
        let source = self.gate(from).ok_or(WireError::UnknownGate(from))?;
        let sink = self.gate(to).ok_or(WireError::UnknownGate(to))?;

        if from == to {
            return Err(WireError::SelfWiring {
                gate: sink.name.clone(),
            });
        }
        if sink.is_base_layer() {
            return Err(WireError::SinkIsSource {
                gate: sink.name.clone(),
            });
        }
        if from_port >= source.num_out {
            return Err(WireError::OutputOutOfRange {
                gate: source.name.clone(),
                port: from_port,
                num_out: source.num_out,
            });
        }
        if to_port >= sink.num_in {
            return Err(WireError::InputOutOfRange {
                gate: sink.name.clone(),
                port: to_port,
                num_in: sink.num_in,
            });
        }
        if sink.wiring.iter().any(|row| row.to_port == to_port) {
            return Err(WireError::InputAlreadyDriven {
                gate: sink.name.clone(),
                port: to_port,
            });
        }

        debug!(%from, %to, from_port, to_port, "wired");
        if let Some(sink) = self.gate_mut(to) {
            sink.wiring.push(WireRow {
                from,
                from_port,
                to_port,
            });
        }
        Ok(())
    }

    /// Remove the wire feeding input `to_port` of `to`.
    pub fn unwire(&mut self, to: GateId, to_port: usize) -> Result<Connection, WireError> {
        let sink = self.gate_mut(to).ok_or(WireError::UnknownGate(to))?;
        let position = sink
            .wiring
            .iter()
            .position(|row| row.to_port == to_port)
            .ok_or_else(|| WireError::NotWired {
                gate: sink.name.clone(),
                port: to_port,
            })?;
        let row = sink.wiring.remove(position);

        debug!(from = %row.from, %to, to_port, "unwired");
        Ok(Connection::new(row.from, to, row.from_port, row.to_port))
    }

    /// Remove a gate and every wire touching it.
    ///
    /// Returns the severed wires.
    pub fn remove(&mut self, id: GateId) -> Result<Vec<Connection>, WireError> {
        if self.gate(id).is_none() {
            return Err(WireError::UnknownGate(id));
        }
        let severed = self.sever(id);
        self.slots[id.index()] = None;
        self.live -= 1;

        debug!(gate = %id, severed = severed.len(), "removed gate");
        Ok(severed)
    }

    /// Grow a PASS or SysIN gate by one port on each side.
    ///
    /// Every wire touching the gate is severed and returned.
    pub fn increase_ports(&mut self, id: GateId) -> Result<Vec<Connection>, WireError> {
        let width = self.resizable_width(id)?;
        self.resize(id, width + 1)
    }

    /// Shrink a PASS or SysIN gate by one port on each side.
    ///
    /// A no-op at width one. Otherwise every wire touching the gate is
    /// severed and returned.
    pub fn decrease_ports(&mut self, id: GateId) -> Result<Vec<Connection>, WireError> {
        let width = self.resizable_width(id)?;
        if width <= 1 {
            return Ok(Vec::new());
        }
        self.resize(id, width - 1)
    }

    fn resizable_width(&self, id: GateId) -> Result<usize, WireError> {
        let gate = self.gate(id).ok_or(WireError::UnknownGate(id))?;
        match gate.kind() {
            GateKind::Primitive(p) if p.kind().is_resizable() => Ok(p.num_out()),
            _ => Err(WireError::NotResizable {
                gate: gate.name.clone(),
            }),
        }
    }

    fn resize(&mut self, id: GateId, width: usize) -> Result<Vec<Connection>, WireError> {
        let severed = self.sever(id);
        let gate = self.gate_mut(id).ok_or(WireError::UnknownGate(id))?;
        gate.resize(width);

        debug!(gate = %id, width, severed = severed.len(), "resized gate");
        Ok(severed)
    }

    /// Drop every wire whose source or sink is `id`.
    fn sever(&mut self, id: GateId) -> Vec<Connection> {
        let mut severed = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(gate) = slot else { continue };
            let sink = GateId(index as u32);
            gate.wiring.retain(|row| {
                let touches = sink == id || row.from == id;
                if touches {
                    severed.push(Connection::new(row.from, sink, row.from_port, row.to_port));
                }
                !touches
            });
        }
        severed
    }

    /// Every live wire, ordered by sink then by wiring order.
    pub fn connections(&self) -> Vec<Connection> {
        self.ids()
            .filter_map(|to| self.gate(to).map(|gate| (to, gate)))
            .flat_map(|(to, gate)| {
                gate.wiring
                    .iter()
                    .map(move |row| Connection::new(row.from, to, row.from_port, row.to_port))
            })
            .collect()
    }

    /// Assign `values[i]` to output `indices[i]` of a SysIN gate.
    ///
    /// All-or-nothing: nothing is written unless every index is valid
    /// and both sequences have the same length.
    pub fn set_state(
        &mut self,
        id: GateId,
        indices: &[usize],
        values: &[bool],
    ) -> Result<(), StateError> {
        let gate = self.gate_mut(id).ok_or(StateError::UnknownGate(id))?;
        if !gate.is_base_layer() {
            return Err(StateError::NotASource {
                gate: gate.name.clone(),
            });
        }
        if indices.len() != values.len() {
            return Err(StateError::LengthMismatch {
                indices: indices.len(),
                values: values.len(),
            });
        }
        if let Some(&port) = indices.iter().find(|&&port| port >= gate.num_out) {
            return Err(StateError::PortOutOfRange {
                gate: gate.name.clone(),
                port,
                num_out: gate.num_out,
            });
        }

        for (&port, &value) in indices.iter().zip(values) {
            gate.outputs[port].write(value);
        }
        Ok(())
    }

    /// Assign every output of a SysIN gate, in port order.
    pub fn set_inputs(&mut self, id: GateId, values: &[bool]) -> Result<(), StateError> {
        let width = self.gate(id).ok_or(StateError::UnknownGate(id))?.num_out;
        let indices: Vec<usize> = (0..width).collect();
        self.set_state(id, &indices, values)
    }

    /// Output values as last committed, without recomputing.
    pub fn output_values(&self, id: GateId) -> Option<Vec<bool>> {
        self.gate(id).map(Gate::values)
    }

    /// Kind of a primitive gate, `None` for composites and unknown gates.
    pub fn primitive_kind(&self, id: GateId) -> Option<PrimitiveKind> {
        match self.gate(id)?.kind() {
            GateKind::Primitive(p) => Some(p.kind()),
            GateKind::Composite(_) => None,
        }
    }
}
