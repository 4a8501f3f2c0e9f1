//! Compiler for DHDL, a small hardware description language targeting a
//! fixed, grid-based reconfigurable logic fabric.
//!
//! The pipeline is `parser::parse` → `synth::synthesize` (per slice) →
//! `grid::emit`. Every stage is a pure function of its inputs; there is no
//! shared mutable state and nothing to tear down between compilations.

pub mod ast;
pub mod error;
pub mod fabric;
pub mod grid;
pub mod pack;
pub mod parser;
pub mod span;
pub mod synth;

use log::info;
use std::collections::HashMap;

pub use error::{CompileError, Result};

/// Compiles a complete DHDL source file to its bitstream.
pub fn compile(source: &str) -> Result<Vec<u8>> {
    let program = parser::parse(source)?;
    info!("parsed {} slice definition(s)", program.slices.len());

    let mut slices = HashMap::with_capacity(program.slices.len());
    for def in &program.slices {
        let synthesized = synth::synthesize(def)?;
        slices.insert(def.name.clone(), synthesized);
    }

    let bitstream = grid::emit(&slices, &program.invocation)?;
    info!("emitted {} byte(s) of bitstream", bitstream.len());
    Ok(bitstream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compiles_reference_fixture() {
        assert_eq!(compile("slice foo {} foo").unwrap(), vec![0x56, 0x1e, 0x00, 0x00]);
    }

    #[test]
    fn compiles_boustrophedon_grid() {
        let bitstream = compile("slice a {} slice b { l0 </> r0; } a b, a b").unwrap();
        assert_eq!(
            bitstream,
            vec![0x56, 0x1e, 0x00, 0x00, 0x56, 0x1c, 0x00, 0x00, 0x56, 0x1c, 0x00, 0x00, 0x56, 0x1e, 0x00, 0x00]
        );
    }

    #[test]
    fn unknown_invocation_slice_surfaces_slice_invocation_error() {
        let err = compile("slice foo {} bar").unwrap_err();
        assert!(matches!(err, CompileError::SliceInvocation { .. }));
    }

    #[test]
    fn malformed_source_surfaces_parse_error() {
        let err = compile("slice foo { l0 -> ; } foo").unwrap_err();
        assert!(matches!(err, CompileError::Parse { .. }));
    }
}
