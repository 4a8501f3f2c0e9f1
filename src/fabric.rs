//! Compile-time fixed description of the target fabric. Changing any of these
//! constants changes the bitstream format; they are not runtime-configurable.

/// Three input multiplexers; each picks one of two bus names. The index
/// within a pair is the mux selector bit.
pub const INPUTS: [(&str, &str); 3] = [("l1", "l0"), ("u0", "u1"), ("r1", "r0")];

/// Two LUTs per slice, each an 8-entry truth table over the three inputs.
pub const NUM_LUTS: usize = 2;

/// LUT 0 may drive bus lines `d1`,`d0`; LUT 1 may drive `r0`,`r1`.
pub const OUTPUTS: [(&str, &str); 2] = [("d1", "d0"), ("r0", "r1")];

/// Four bidirectional bus-switch pairs, in canonical (and packing) order.
pub const SWITCHES: [(&str, &str); 4] = [("l0", "r0"), ("l1", "r1"), ("d1", "u1"), ("d0", "u0")];

/// Finds which `INPUTS` pair contains `bus`, and the index (0 or 1) within it.
pub fn input_position(bus: &str) -> Option<(usize, u8)> {
    for (pair_idx, (a, b)) in INPUTS.iter().enumerate() {
        if *a == bus {
            return Some((pair_idx, 0));
        }
        if *b == bus {
            return Some((pair_idx, 1));
        }
    }
    None
}

/// Finds which `OUTPUTS` pair (LUT id) contains `bus`, and the index within it.
pub fn output_position(bus: &str) -> Option<(usize, usize)> {
    for (lut_id, (a, b)) in OUTPUTS.iter().enumerate() {
        if *a == bus {
            return Some((lut_id, 0));
        }
        if *b == bus {
            return Some((lut_id, 1));
        }
    }
    None
}

/// Sorts `(a, b)` lexicographically and returns the matching `SWITCHES` entry, if any.
pub fn switch_key(a: &str, b: &str) -> Option<(&'static str, &'static str)> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    SWITCHES
        .iter()
        .copied()
        .find(|(sa, sb)| *sa == lo && *sb == hi)
}
