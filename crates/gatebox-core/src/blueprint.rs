//! Declarative templates for composite gates.
//!
//! A [`Blueprint`] is captured from a live network and holds no handle
//! into it: every gate is described by value (variant and width, or the
//! nested composite type) and every connection by blueprint-local IDs.

use std::collections::HashMap;

use tracing::debug;

use crate::composite::CompositeType;
use crate::error::{BuildError, WireError};
use crate::gate::{Connection, Gate, GateId, GateKind, Primitive};
use crate::network::Network;

/// How to build one gate of a blueprint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecKind {
    Primitive(Primitive),
    Composite(CompositeType),
}

/// A gate of a blueprint: its name and how to build a fresh copy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateSpec {
    name: String,
    kind: SpecKind,
}

impl GateSpec {
    pub fn new(name: impl Into<String>, kind: SpecKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Describe a live gate. Wiring and port values are not captured.
    pub fn of(gate: &Gate) -> Self {
        let kind = match gate.kind() {
            GateKind::Primitive(primitive) => SpecKind::Primitive(*primitive),
            GateKind::Composite(instance) => SpecKind::Composite(instance.composite_type().clone()),
        };
        Self::new(gate.name(), kind)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &SpecKind {
        &self.kind
    }

    pub fn num_in(&self) -> usize {
        match &self.kind {
            SpecKind::Primitive(primitive) => primitive.num_in(),
            SpecKind::Composite(ty) => ty.num_in(),
        }
    }

    pub fn num_out(&self) -> usize {
        match &self.kind {
            SpecKind::Primitive(primitive) => primitive.num_out(),
            SpecKind::Composite(ty) => ty.num_out(),
        }
    }

    fn is_source(&self) -> bool {
        matches!(self.kind, SpecKind::Primitive(p) if p.is_source())
    }
}

/// A connection between two blueprint gates, by local ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlueprintConnection {
    pub from: usize,
    pub to: usize,
    pub from_port: usize,
    pub to_port: usize,
}

/// Immutable template of a composite gate.
///
/// Local gate IDs are indices into [`Blueprint::gates`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blueprint {
    gates: Vec<GateSpec>,
    connections: Vec<BlueprintConnection>,
    input: usize,
    outputs: Vec<usize>,
    num_in: usize,
    num_out: usize,
}

impl Blueprint {
    /// Assemble a blueprint from parts, deriving the port counts from the
    /// anchors and validating the result.
    pub fn from_parts(
        gates: Vec<GateSpec>,
        connections: Vec<BlueprintConnection>,
        input: usize,
        outputs: Vec<usize>,
    ) -> Result<Self, BuildError> {
        let num_in = gates
            .get(input)
            .ok_or(BuildError::UnknownLocalId(input))?
            .num_out();
        let mut num_out = 0;
        for &local in &outputs {
            num_out += gates
                .get(local)
                .ok_or(BuildError::UnknownLocalId(local))?
                .num_out();
        }

        let blueprint = Self {
            gates,
            connections,
            input,
            outputs,
            num_in,
            num_out,
        };
        blueprint.validate()?;
        Ok(blueprint)
    }

    pub fn gates(&self) -> &[GateSpec] {
        &self.gates
    }

    pub fn connections(&self) -> &[BlueprintConnection] {
        &self.connections
    }

    /// Local ID of the SysIN gate driven by the composite's inputs.
    pub fn input(&self) -> usize {
        self.input
    }

    /// Local IDs of the gates whose outputs, concatenated in this order,
    /// form the composite's outputs.
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    pub fn num_in(&self) -> usize {
        self.num_in
    }

    pub fn num_out(&self) -> usize {
        self.num_out
    }

    /// Check the blueprint can be instantiated: local IDs resolve, the
    /// input anchor is a source, port counts agree and every connection
    /// would be accepted by [`Network::wire_up`].
    ///
    /// Nested composite blueprints are checked too.
    pub fn validate(&self) -> Result<(), BuildError> {
        let spec = |local: usize| self.gates.get(local).ok_or(BuildError::UnknownLocalId(local));

        for gate in &self.gates {
            match gate.kind() {
                SpecKind::Primitive(p) => {
                    Primitive::new(p.kind(), p.num_in(), p.num_out())?;
                }
                SpecKind::Composite(ty) => ty.blueprint().validate()?,
            }
        }

        let input = spec(self.input)?;
        if !input.is_source() {
            return Err(BuildError::InputNotSource {
                gate: input.name.clone(),
            });
        }
        if input.num_out() != self.num_in {
            return Err(BuildError::PortWidthMismatch {
                gate: input.name.clone(),
                expected: self.num_in,
                found: input.num_out(),
            });
        }

        if self.outputs.is_empty() {
            return Err(BuildError::NoOutputs);
        }
        let mut num_out = 0;
        for &local in &self.outputs {
            num_out += spec(local)?.num_out();
        }
        if num_out != self.num_out {
            return Err(BuildError::PortWidthMismatch {
                gate: "outputs".to_string(),
                expected: self.num_out,
                found: num_out,
            });
        }

        let mut driven = HashMap::new();
        for c in &self.connections {
            let source = spec(c.from)?;
            let sink = spec(c.to)?;
            if c.from == c.to {
                return Err(WireError::SelfWiring {
                    gate: sink.name.clone(),
                }
                .into());
            }
            if sink.is_source() {
                return Err(WireError::SinkIsSource {
                    gate: sink.name.clone(),
                }
                .into());
            }
            if c.from_port >= source.num_out() {
                return Err(WireError::OutputOutOfRange {
                    gate: source.name.clone(),
                    port: c.from_port,
                    num_out: source.num_out(),
                }
                .into());
            }
            if c.to_port >= sink.num_in() {
                return Err(WireError::InputOutOfRange {
                    gate: sink.name.clone(),
                    port: c.to_port,
                    num_in: sink.num_in(),
                }
                .into());
            }
            if driven.insert((c.to, c.to_port), c.from).is_some() {
                return Err(WireError::InputAlreadyDriven {
                    gate: sink.name.clone(),
                    port: c.to_port,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Capture a blueprint from a live network.
///
/// Every gate named by `connections`, plus the `input` anchor and the
/// `outputs`, is described by value and given a local ID in order of
/// first appearance. The composite's inputs drive `input`, which must be
/// a SysIN gate; its outputs are those of `outputs`, concatenated in the
/// given order.
pub fn build_blueprint(
    network: &Network,
    input: GateId,
    outputs: &[GateId],
    connections: &[Connection],
) -> Result<Blueprint, BuildError> {
    if outputs.is_empty() {
        return Err(BuildError::NoOutputs);
    }
    let anchor = network.gate(input).ok_or(BuildError::UnknownGate(input))?;
    if !anchor.is_base_layer() {
        return Err(BuildError::InputNotSource {
            gate: anchor.name().to_string(),
        });
    }

    let mut locals: HashMap<GateId, usize> = HashMap::new();
    let mut involved: Vec<GateId> = Vec::new();
    let mut local = |id: GateId| -> usize {
        *locals.entry(id).or_insert_with(|| {
            involved.push(id);
            involved.len() - 1
        })
    };

    let connection_specs: Vec<BlueprintConnection> = connections
        .iter()
        .map(|c| BlueprintConnection {
            from: local(c.from),
            to: local(c.to),
            from_port: c.from_port,
            to_port: c.to_port,
        })
        .collect();
    let input_local = local(input);
    let output_locals: Vec<usize> = outputs.iter().map(|&id| local(id)).collect();

    let gates = involved
        .iter()
        .map(|&id| {
            network
                .gate(id)
                .map(GateSpec::of)
                .ok_or(BuildError::UnknownGate(id))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        gates = gates.len(),
        connections = connection_specs.len(),
        "captured blueprint"
    );
    Blueprint::from_parts(gates, connection_specs, input_local, output_locals)
}
