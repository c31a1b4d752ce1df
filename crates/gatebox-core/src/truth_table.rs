//! Exhaustive truth tables.

use std::fmt;

use tracing::debug;

use crate::error::EvalError;
use crate::gate::GateId;
use crate::network::Network;

/// One input combination and the outputs it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TruthRow {
    pub inputs: Vec<bool>,
    pub outputs: Vec<bool>,
}

/// Full characterization of a gate over every input combination.
///
/// Rows are in binary counting order: row `i` drives the source with the
/// bits of `i`, most significant bit on port 0.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TruthTable {
    gate: String,
    input_width: usize,
    rows: Vec<TruthRow>,
}

impl TruthTable {
    /// Name of the characterized gate.
    pub fn gate(&self) -> &str {
        &self.gate
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    pub fn rows(&self) -> &[TruthRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn bit(value: bool) -> char {
    if value {
        '1'
    } else {
        '0'
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = (0..self.input_width).map(|i| format!("I{i}")).collect();
        writeln!(f, "{}   | {}", columns.join("  "), self.gate)?;
        writeln!(f, "{}", "-".repeat(4 * self.input_width + 10))?;

        for row in &self.rows {
            let inputs: Vec<String> = row.inputs.iter().map(|&v| bit(v).to_string()).collect();
            let outputs: String = row.outputs.iter().map(|&v| bit(v)).collect();
            writeln!(f, "{}   |  {}", inputs.join("   "), outputs)?;
        }
        Ok(())
    }
}

/// Bits of `index` over `width` ports, most significant first.
///
/// Ports beyond the bit width of `usize` read as zero.
pub fn combination(index: usize, width: usize) -> Vec<bool> {
    (0..width)
        .map(|port| {
            u32::try_from(width - 1 - port)
                .ok()
                .and_then(|shift| index.checked_shr(shift))
                .is_some_and(|bits| bits & 1 == 1)
        })
        .collect()
}

/// Drive `sysin` through all `2^n` combinations of its `n` outputs and
/// record the state of `gate` after each.
///
/// Every row fully re-evaluates `gate`. The source is left holding the
/// last combination (all ones).
///
/// # Errors
///
/// Returns an error if `sysin` is not a source, if its width exceeds
/// [`Limits::table_width`](crate::Limits::table_width), or if
/// reading `gate` fails.
pub fn evaluate_truth_table(
    network: &mut Network,
    gate: GateId,
    sysin: GateId,
) -> Result<TruthTable, EvalError> {
    let source = network.gate(sysin).ok_or(EvalError::UnknownGate(sysin))?;
    if !source.is_base_layer() {
        return Err(EvalError::NotASource {
            gate: source.name().to_string(),
        });
    }
    let width = source.num_out();
    let max = network.limits().table_width();
    let count = u32::try_from(width)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .filter(|_| width <= max)
        .ok_or(EvalError::TableTooWide { width, max })?;
    let name = network
        .gate(gate)
        .ok_or(EvalError::UnknownGate(gate))?
        .name()
        .to_string();

    let ports: Vec<usize> = (0..width).collect();
    let mut rows = Vec::with_capacity(count);
    for index in 0..count {
        let inputs = combination(index, width);
        network.set_state(sysin, &ports, &inputs)?;
        let outputs = network.state(gate)?;
        rows.push(TruthRow { inputs, outputs });
    }

    debug!(gate = %name, rows = rows.len(), "evaluated truth table");
    Ok(TruthTable {
        gate: name,
        input_width: width,
        rows,
    })
}
