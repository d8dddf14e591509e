/// Pixel boundary that dimensions are padded to when artifact reduction is on.
/// JPEG works on 8x8 blocks (16x16 with chroma subsampling).
pub const ALIGNMENT: u32 = 16;

/// Round `num` up to the next multiple of [`ALIGNMENT`] when `align` is set.
///
/// Values that are already aligned, and every value when `align` is false,
/// are returned unchanged. Saturates at `u32::MAX`.
pub fn align_to_boundary(num: u32, align: bool) -> u32 {
    let rem = num % ALIGNMENT;
    if !align || rem == 0 {
        return num;
    }
    num.saturating_add(ALIGNMENT - rem)
}
