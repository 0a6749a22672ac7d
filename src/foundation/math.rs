/// `x * y / 255`, rounded to nearest.
pub(crate) fn mul_div255(x: u8, y: u8) -> u8 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u8
}
