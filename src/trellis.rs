//! Output table for a convolutional code
//!
//! The table has one entry per value of the `order`-bit shift register and holds the `rate`
//! concatenated output bits for that register, with the parity of `register AND polynomials[j]`
//! at bit position `j`.

/// Returns the output table for the given code.
///
/// # Parameters
///
/// - `rate`: Number of output bits per input bit.
///
/// - `order`: Number of bits in the shift register.
///
/// - `polynomials`: Tap masks, one per output bit. Each must fit in `order` bits.
///
/// # Returns
///
/// - `table`: Concatenated output bits for every possible shift register value.
pub(crate) fn output_table(rate: usize, order: usize, polynomials: &[u16]) -> Vec<u16> {
    debug_assert_eq!(polynomials.len(), rate);
    let mut table = vec![0u16; 1 << order];
    for (register, out) in table.iter_mut().enumerate() {
        for (shift, &poly) in polynomials.iter().enumerate() {
            let parity = (register as u16 & poly).count_ones() as u16 & 1;
            *out |= parity << shift;
        }
    }
    table
}
