//! Composite gate types and their instances.

use std::sync::Arc;

use tracing::debug;

use crate::blueprint::{Blueprint, SpecKind};
use crate::error::{BuildError, EvalError};
use crate::gate::{Gate, GateId};
use crate::limits::Limits;
use crate::network::Network;

/// A gate type synthesized from a [`Blueprint`].
///
/// Cloning is cheap; the blueprint is shared and immutable. Each
/// [`Network::instantiate`] call builds a fresh private copy of the
/// blueprint's sub-network.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeType {
    name: String,
    blueprint: Arc<Blueprint>,
}

/// Turn a blueprint into a constructible gate type.
pub fn make_custom_gate_class(name: impl Into<String>, blueprint: Blueprint) -> CompositeType {
    let name = name.into();
    debug!(
        name = %name,
        num_in = blueprint.num_in(),
        num_out = blueprint.num_out(),
        "made composite gate type"
    );
    CompositeType {
        name,
        blueprint: Arc::new(blueprint),
    }
}

impl CompositeType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    pub fn num_in(&self) -> usize {
        self.blueprint.num_in()
    }

    pub fn num_out(&self) -> usize {
        self.blueprint.num_out()
    }
}

/// The private sub-network behind one composite gate.
#[derive(Debug)]
pub struct CompositeInstance {
    ty: CompositeType,
    network: Network,
    input: GateId,
    outputs: Vec<GateId>,
}

impl CompositeInstance {
    fn build(ty: &CompositeType, limits: Limits, nesting: usize) -> Result<Self, BuildError> {
        if nesting > limits.max_nesting {
            return Err(BuildError::MaxNestingExceeded(limits.max_nesting));
        }
        let blueprint = ty.blueprint();
        blueprint.validate()?;
        let mut network = Network::nested(limits, nesting);

        let mut locals = Vec::with_capacity(blueprint.gates().len());
        for spec in blueprint.gates() {
            let id = match spec.kind() {
                SpecKind::Primitive(primitive) => network.add_primitive(spec.name(), *primitive)?,
                SpecKind::Composite(nested) => network.instantiate(nested, spec.name())?,
            };
            locals.push(id);
        }
        let resolve = |local: usize| {
            locals
                .get(local)
                .copied()
                .ok_or(BuildError::UnknownLocalId(local))
        };

        for c in blueprint.connections() {
            network.wire_up(resolve(c.from)?, resolve(c.to)?, c.from_port, c.to_port)?;
        }
        let input = resolve(blueprint.input())?;
        let outputs = blueprint
            .outputs()
            .iter()
            .map(|&local| resolve(local))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ty: ty.clone(),
            network,
            input,
            outputs,
        })
    }

    pub fn composite_type(&self) -> &CompositeType {
        &self.ty
    }

    /// The private sub-network.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Handle of the internal SysIN gate, inside [`Self::network`].
    pub fn input_gate(&self) -> GateId {
        self.input
    }

    /// Handles of the internal output gates, inside [`Self::network`].
    pub fn output_gates(&self) -> &[GateId] {
        &self.outputs
    }

    /// Drive the internal source with `inputs` and read every output gate
    /// in declaration order.
    pub(crate) fn compute(&mut self, inputs: &[bool]) -> Result<Vec<bool>, EvalError> {
        self.network.set_inputs(self.input, inputs)?;

        let mut state = Vec::with_capacity(self.ty.num_out());
        for &gate in &self.outputs {
            state.extend(self.network.state(gate)?);
        }
        Ok(state)
    }
}

impl Network {
    /// Place a new instance of a composite gate type.
    ///
    /// The blueprint is replayed into a private network owned by the new
    /// gate; nothing is shared with other instances or with the gates the
    /// blueprint was captured from.
    pub fn instantiate(
        &mut self,
        ty: &CompositeType,
        name: impl Into<String>,
    ) -> Result<GateId, BuildError> {
        let instance = CompositeInstance::build(ty, self.limits(), self.nesting + 1)?;
        let name = name.into();
        debug!(
            name = %name,
            kind = ty.name(),
            gates = instance.network.len(),
            "instantiated composite gate"
        );
        self.insert(Gate::composite(name, instance))
    }
}
