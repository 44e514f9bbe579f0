/// Straight-alpha linear blend of one channel: `(src*a + dst*(255-a)) / 255`, rounded.
pub(crate) fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = u16::from(alpha);
    let inv = 255u16 - a;
    let v = (u32::from(src) * u32::from(a) + u32::from(dst) * u32::from(inv) + 127) / 255;
    v.min(255) as u8
}

/// Number of decimal digits needed to print `v`.
pub(crate) fn decimal_digits(v: u64) -> usize {
    v.checked_ilog10().map_or(1, |d| d as usize + 1)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
