//! Slice synthesis: turns one `SliceDefinition`'s statements into a concrete,
//! resource-checked slice configuration (§4.1).

use crate::ast::{Expr, SliceDefinition, Statement, SyncMode};
use crate::error::{CompileError, Result};
use crate::fabric::{self, INPUTS, NUM_LUTS, OUTPUTS, SWITCHES};
use log::{debug, trace};
use std::collections::HashMap;

/// A fully resolved slice configuration, ready to be packed to 4 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedSlice {
    pub input_muxes: [u8; 3],
    pub output_enables: [[bool; 2]; 2],
    pub luts: [[bool; 8]; 2],
    pub asyncs: [bool; 2],
    pub bus_switches: HashMap<(&'static str, &'static str), bool>,
}

/// Accumulates synthesis state while walking a `SliceDefinition`'s statements.
struct Builder {
    input_muxes: [Option<u8>; 3],
    output_enables: [[bool; 2]; 2],
    lut_exprs: [Option<Expr>; NUM_LUTS],
    asyncs: [Option<bool>; NUM_LUTS],
    bus_switches: HashMap<(&'static str, &'static str), Option<bool>>,
    bus_switch_defaults: HashMap<(&'static str, &'static str), bool>,
}

impl Builder {
    fn new() -> Self {
        Builder {
            input_muxes: [None; 3],
            output_enables: [[false; 2]; 2],
            lut_exprs: [None, None],
            asyncs: [None; NUM_LUTS],
            bus_switches: SWITCHES.iter().map(|&k| (k, None)).collect(),
            bus_switch_defaults: SWITCHES.iter().map(|&k| (k, true)).collect(),
        }
    }

    fn pick_lut(&mut self, name: &str, outputs: &[String], span: crate::span::Span) -> Result<usize> {
        for (lut_id, (a, b)) in OUTPUTS.iter().enumerate() {
            let pair: [&str; 2] = [a, b];
            if outputs.iter().all(|o| pair.contains(&o.as_str())) {
                for (out_idx, out) in pair.iter().enumerate() {
                    if outputs.iter().any(|o| o == out) {
                        self.output_enables[lut_id][out_idx] = true;
                        for (switch, default) in self.bus_switch_defaults.iter_mut() {
                            if switch.0 == *out || switch.1 == *out {
                                *default = false;
                            }
                        }
                    }
                }
                trace!("slice {name}: statement at {span} bound to LUT {lut_id}");
                return Ok(lut_id);
            }
        }
        Err(CompileError::slice_configuration(
            span,
            format!("no LUT is capable of outputting to all of {outputs:?}"),
        ))
    }

    fn assign_inputs(&mut self, name: &str, expr: &Expr, span: crate::span::Span) -> Result<()> {
        for bus_name in expr.bus_ids() {
            match fabric::input_position(bus_name) {
                Some((pair_idx, idx)) => {
                    match self.input_muxes[pair_idx] {
                        None => {
                            self.input_muxes[pair_idx] = Some(idx);
                            trace!("slice {name}: input mux {pair_idx} set to {idx} for bus {bus_name}");
                        }
                        Some(existing) if existing == idx => {}
                        Some(_) => {
                            return Err(CompileError::slice_configuration(
                                span,
                                format!("cannot find appropriate input mux setting for {bus_name:?}"),
                            ))
                        }
                    }
                }
                None => {
                    return Err(CompileError::slice_configuration(
                        span,
                        format!("cannot find appropriate input mux setting for {bus_name:?}"),
                    ))
                }
            }
        }
        Ok(())
    }

    fn parse_assignment(&mut self, name: &str, assignment: &crate::ast::Assignment) -> Result<()> {
        let lut_id = self.pick_lut(name, &assignment.outputs, assignment.span)?;
        if self.lut_exprs[lut_id].is_some() {
            return Err(CompileError::slice_configuration(
                assignment.span,
                "statement requires a LUT that is already in use",
            ));
        }
        self.asyncs[lut_id] = Some(assignment.mode.is_async());
        self.assign_inputs(name, &assignment.expr, assignment.span)?;
        self.lut_exprs[lut_id] = Some(assignment.expr.clone());
        Ok(())
    }

    fn parse_bus_switch(&mut self, switch: &crate::ast::BusSwitch) -> Result<()> {
        let key = fabric::switch_key(&switch.bus_a, &switch.bus_b).ok_or_else(|| {
            CompileError::slice_configuration(
                switch.span,
                format!(
                    "cannot connect bus lines {} and {}",
                    switch.bus_a, switch.bus_b
                ),
            )
        })?;
        let slot = self.bus_switches.get_mut(&key).expect("switch_key returns a SWITCHES member");
        if slot.is_some() {
            return Err(CompileError::slice_configuration(
                switch.span,
                format!(
                    "duplicate definition for bus switch between {} and {}",
                    switch.bus_a, switch.bus_b
                ),
            ));
        }
        *slot = Some(switch.connected);
        Ok(())
    }

    fn finish(mut self, name: &str) -> SynthesizedSlice {
        let input_muxes = [
            self.input_muxes[0].unwrap_or(0),
            self.input_muxes[1].unwrap_or(0),
            self.input_muxes[2].unwrap_or(0),
        ];
        let asyncs = [
            self.asyncs[0].unwrap_or(true),
            self.asyncs[1].unwrap_or(true),
        ];
        let mut bus_switches = HashMap::new();
        for (key, value) in self.bus_switches.drain() {
            let resolved = value.unwrap_or_else(|| self.bus_switch_defaults[&key]);
            bus_switches.insert(key, resolved);
        }

        let mut luts = [[false; 8]; 2];
        for lut_id in 0..NUM_LUTS {
            for idx in 0..8usize {
                let mut vars: HashMap<&str, bool> = HashMap::new();
                for (i, (a, b)) in INPUTS.iter().enumerate() {
                    let selected = if input_muxes[i] == 0 { a } else { b };
                    vars.insert(selected, (idx >> i) & 1 != 0);
                }
                luts[lut_id][idx] = match &self.lut_exprs[lut_id] {
                    Some(e) => e.eval(&vars),
                    None => false,
                };
            }
        }
        debug!("slice {name}: synthesized luts={luts:?} muxes={input_muxes:?}");

        SynthesizedSlice {
            input_muxes,
            output_enables: self.output_enables,
            luts,
            asyncs,
            bus_switches,
        }
    }
}

/// Synthesizes one slice definition, or fails with the location of the first
/// statement that violates a resource constraint.
pub fn synthesize(def: &SliceDefinition) -> Result<SynthesizedSlice> {
    let mut builder = Builder::new();
    debug!("synthesizing slice {}", def.name);
    for statement in &def.statements {
        match statement {
            Statement::Assignment(a) => builder.parse_assignment(&def.name, a)?,
            Statement::BusSwitch(s) => builder.parse_bus_switch(s)?,
        }
    }
    Ok(builder.finish(&def.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use pretty_assertions::assert_eq;

    fn synth_from(src: &str) -> SynthesizedSlice {
        let program = parser::parse(src).expect("parses");
        synthesize(&program.slices[0]).expect("synthesizes")
    }

    #[test]
    fn empty_slice_has_all_defaults() {
        let slice = synth_from("slice foo {} a, a");
        assert_eq!(slice.input_muxes, [0, 0, 0]);
        assert_eq!(slice.output_enables, [[false, false], [false, false]]);
        assert_eq!(slice.luts, [[false; 8], [false; 8]]);
        assert_eq!(slice.asyncs, [true, true]);
        assert!(slice.bus_switches.values().all(|&v| v));
    }

    #[test]
    fn explicit_switch_is_honored() {
        let slice = synth_from("slice foo { l1 </> r1; } a, a");
        assert_eq!(slice.bus_switches[&("l1", "r1")], false);
    }

    #[test]
    fn lut_truth_table_matches_xor_of_three_inputs() {
        let slice = synth_from("slice foo { l0 ^ u0 ^ r1 -> r0;} a, a");
        assert_eq!(
            slice.luts[1],
            [false, true, true, false, true, false, false, true]
        );
    }

    #[test]
    fn lut_order_matches_declaration_order() {
        let slice = synth_from("slice foo { l0 -> r0; u0 -> d0; } a, a");
        assert_eq!(
            slice.luts[1],
            [false, true, false, true, false, true, false, true]
        );
        assert_eq!(
            slice.luts[0],
            [false, false, true, true, false, false, true, true]
        );
    }

    #[test]
    fn input_muxes_select_second_bus_in_pair() {
        let slice = synth_from("slice foo { l1 -> r1; u1 -> d1; } a, a");
        assert_eq!(slice.input_muxes, [0, 1, 0]);
    }

    #[test]
    fn output_enables_cover_every_named_output() {
        let slice = synth_from("slice foo { l1 -> r0 -> r1; } a, a");
        assert_eq!(slice.output_enables, [[false, false], [true, true]]);
    }

    #[test]
    fn sync_flag_is_recorded_per_lut() {
        let slice = synth_from("slice foo { l0 sync -> r0; u0 sync -> d0; } a, a");
        assert_eq!(slice.asyncs, [false, false]);
    }

    #[test]
    fn switch_default_flips_when_a_lut_drives_an_endpoint() {
        let slice = synth_from("slice foo { l0 -> r1; } a, a");
        assert_eq!(slice.bus_switches[&("l0", "r0")], true);
        assert_eq!(slice.bus_switches[&("l1", "r1")], false);
    }

    #[test]
    fn constant_literal_fills_whole_truth_table() {
        let slice = synth_from("slice foo { 1 -> r0; } a, a");
        assert_eq!(slice.luts[1], [true; 8]);
    }

    #[test]
    fn not_inverts_alternating_entries() {
        let slice = synth_from("slice foo { !l0 -> r0; } a, a");
        assert_eq!(slice.luts[1], [true, false, true, false, true, false, true, false]);
    }

    #[test]
    fn unroutable_output_fails() {
        let program = parser::parse("slice foo { l0 -> r0 -> d0; } a, a").unwrap();
        let err = synthesize(&program.slices[0]).unwrap_err();
        assert!(matches!(err, CompileError::SliceConfiguration { .. }));
    }

    #[test]
    fn duplicate_lut_binding_fails() {
        let program = parser::parse("slice foo { l0 -> r0; u0 -> r1 -> r0; } a, a").unwrap();
        let err = synthesize(&program.slices[0]).unwrap_err();
        assert!(matches!(err, CompileError::SliceConfiguration { .. }));
    }

    #[test]
    fn conflicting_input_mux_fails() {
        let program = parser::parse("slice foo { l0 & l1 -> r0; } a, a").unwrap();
        let err = synthesize(&program.slices[0]).unwrap_err();
        assert!(matches!(err, CompileError::SliceConfiguration { .. }));
    }

    #[test]
    fn duplicate_switch_definition_fails() {
        let program = parser::parse("slice foo { l0 <-> r0; l0 </> r0; } a, a").unwrap();
        let err = synthesize(&program.slices[0]).unwrap_err();
        assert!(matches!(err, CompileError::SliceConfiguration { .. }));
    }

    #[test]
    fn invalid_switch_endpoints_fail() {
        let program = parser::parse("slice foo { l0 <-> u0; } a, a").unwrap();
        let err = synthesize(&program.slices[0]).unwrap_err();
        assert!(matches!(err, CompileError::SliceConfiguration { .. }));
    }
}
