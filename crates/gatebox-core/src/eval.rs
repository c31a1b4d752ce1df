//! On-demand evaluation of gate state.
//!
//! Every read of a non-source gate recomputes its whole upstream closure.
//! A recompute is three visible steps: collect the inputs (pull upstream,
//! validate wiring), compute the outputs (pure), commit them to the ports.
//!
//! The upstream walk is an explicit depth-first worklist, so chain depth
//! is bounded by memory and not by the call stack.

use std::collections::{BTreeSet, HashSet};

use tracing::{trace, warn};

use crate::error::EvalError;
use crate::gate::{GateId, GateKind};
use crate::network::Network;

/// Bookkeeping for a single state read.
///
/// `done` holds gates already recomputed during this read so shared
/// ancestors run once; `visiting` holds the current upstream path and
/// detects cycles. Nothing survives past the read.
#[derive(Debug, Default)]
struct Sweep {
    visiting: HashSet<GateId>,
    done: HashSet<GateId>,
}

/// Worklist step for one gate.
#[derive(Debug, Clone, Copy)]
enum Phase {
    /// Check wiring and schedule the sources.
    Enter,
    /// Every source is up to date: collect, compute, commit.
    Exit,
}

impl Network {
    /// Recompute a gate from its upstream closure and return its outputs,
    /// in port order.
    ///
    /// Source gates return their ports directly.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A gate in the upstream closure is not fully wired
    /// - The upstream closure contains a cycle
    /// - A composite gate's private network fails to evaluate
    pub fn state(&mut self, id: GateId) -> Result<Vec<bool>, EvalError> {
        let gate = self.gate(id).ok_or(EvalError::UnknownGate(id))?;
        if gate.is_base_layer() {
            return Ok(gate.values());
        }

        if let Err(err) = self.recompute(id) {
            warn!(gate = %id, error = %err, "evaluation failed");
            return Err(err);
        }
        self.output_values(id).ok_or(EvalError::UnknownGate(id))
    }

    fn recompute(&mut self, root: GateId) -> Result<(), EvalError> {
        let mut sweep = Sweep::default();
        let mut work = vec![(root, Phase::Enter)];

        while let Some((id, phase)) = work.pop() {
            match phase {
                Phase::Enter => self.enter(id, &mut sweep, &mut work)?,
                Phase::Exit => {
                    let inputs = self.collect_inputs(id)?;
                    let outputs = self.compute(id, &inputs)?;
                    self.commit(id, &outputs)?;
                    sweep.visiting.remove(&id);
                    sweep.done.insert(id);
                }
            }
        }
        Ok(())
    }

    /// Verify the gate is fully wired and schedule its distinct sources
    /// ahead of its own recompute.
    fn enter(
        &self,
        id: GateId,
        sweep: &mut Sweep,
        work: &mut Vec<(GateId, Phase)>,
    ) -> Result<(), EvalError> {
        if sweep.done.contains(&id) {
            return Ok(());
        }
        let gate = self.gate(id).ok_or(EvalError::UnknownGate(id))?;
        if gate.is_base_layer() {
            sweep.done.insert(id);
            return Ok(());
        }
        if sweep.visiting.contains(&id) {
            return Err(EvalError::CycleDetected {
                gate: gate.name.clone(),
            });
        }

        let wired: BTreeSet<usize> = gate.wiring.iter().map(|row| row.to_port).collect();
        if wired.len() != gate.num_in || wired.iter().any(|&port| port >= gate.num_in) {
            return Err(EvalError::NotFullyWired {
                gate: gate.name.clone(),
                wired: wired.into_iter().collect(),
            });
        }

        sweep.visiting.insert(id);
        work.push((id, Phase::Exit));
        let mut scheduled = HashSet::new();
        for row in gate.wiring.iter().rev() {
            if scheduled.insert(row.from) {
                work.push((row.from, Phase::Enter));
            }
        }
        Ok(())
    }

    /// Copy each wired bit into a fresh input buffer. Sources are already
    /// recomputed for this read.
    fn collect_inputs(&self, id: GateId) -> Result<Vec<bool>, EvalError> {
        let gate = self.gate(id).ok_or(EvalError::UnknownGate(id))?;
        let mut bridge = vec![false; gate.num_in];
        for row in &gate.wiring {
            let source = self.gate(row.from).ok_or(EvalError::UnknownGate(row.from))?;
            let port = source
                .outputs
                .get(row.from_port)
                .ok_or_else(|| EvalError::StaleWire {
                    gate: gate.name.clone(),
                    port: row.from_port,
                })?;
            bridge[row.to_port] = port.read();
        }
        Ok(bridge)
    }

    fn compute(&mut self, id: GateId, inputs: &[bool]) -> Result<Vec<bool>, EvalError> {
        let gate = self.gate_mut(id).ok_or(EvalError::UnknownGate(id))?;
        trace!(gate = %id, name = gate.name(), ?inputs, "recompute");
        match &mut gate.kind {
            GateKind::Primitive(primitive) => Ok(primitive.compute(inputs)),
            GateKind::Composite(instance) => instance.compute(inputs),
        }
    }

    fn commit(&mut self, id: GateId, outputs: &[bool]) -> Result<(), EvalError> {
        let gate = self.gate_mut(id).ok_or(EvalError::UnknownGate(id))?;
        gate.commit(outputs);
        Ok(())
    }
}
