//! Serializes a `SynthesizedSlice` to its 4-byte fabric configuration word (§4.2).

use crate::fabric::SWITCHES;
use crate::synth::SynthesizedSlice;

/// Packs booleans into a byte, LSB-first: `pack([b0, b1, ...]) = sum(bi * 2^i)`.
fn pack_bools(bits: &[bool]) -> u8 {
    bits.iter()
        .enumerate()
        .fold(0u8, |acc, (i, &b)| acc | ((b as u8) << i))
}

/// Packs one synthesized slice into its 4-byte word: `async_oe, switch_mux, lut_1, lut_0`.
pub fn pack(slice: &SynthesizedSlice) -> [u8; 4] {
    let async_oe = pack_bools(&[
        false,
        slice.asyncs[0],
        slice.asyncs[1],
        slice.output_enables[0][0],
        !slice.output_enables[0][1],
        slice.output_enables[1][0],
        !slice.output_enables[1][1],
    ]);

    let mut switch_mux_bits = vec![false];
    for key in SWITCHES {
        switch_mux_bits.push(slice.bus_switches[&key]);
    }
    switch_mux_bits.push(slice.input_muxes[0] != 0);
    switch_mux_bits.push(slice.input_muxes[1] != 0);
    switch_mux_bits.push(slice.input_muxes[2] != 0);
    let switch_mux = pack_bools(&switch_mux_bits);

    let lut_1 = pack_bools(&slice.luts[1]);
    let lut_0 = pack_bools(&slice.luts[0]);

    [async_oe, switch_mux, lut_1, lut_0]
}
