//! Grid emitter: resolves the invocation grid against synthesized slices and
//! concatenates their packed words in boustrophedon order (§4.3).

use crate::ast::Invocation;
use crate::error::{CompileError, Result};
use crate::pack::pack;
use crate::synth::SynthesizedSlice;
use std::collections::HashMap;

/// Resolves `invocation` against `slices`, verifies rectangularity, and emits
/// the bitstream in bottom-up, alternating-direction row order.
pub fn emit(slices: &HashMap<String, SynthesizedSlice>, invocation: &Invocation) -> Result<Vec<u8>> {
    let width = invocation.rows.first().map(|r| r.len()).unwrap_or(0);
    for row in &invocation.rows {
        if row.len() != width {
            return Err(CompileError::slice_invocation(
                "invocation grid rows are not rectangular",
            ));
        }
    }

    let mut bottom_up: Vec<Vec<&String>> = invocation
        .rows
        .iter()
        .rev()
        .map(|r| r.iter().collect())
        .collect();
    for (row_idx, row) in bottom_up.iter_mut().enumerate() {
        if row_idx % 2 == 1 {
            row.reverse();
        }
    }

    let mut out = Vec::with_capacity(4 * invocation.rows.len() * width);
    for row in bottom_up {
        for name in row {
            let slice = slices.get(name).ok_or_else(|| {
                CompileError::slice_invocation(format!("invocation references undefined slice {name:?}"))
            })?;
            out.extend_from_slice(&pack(slice));
        }
    }
    Ok(out)
}
