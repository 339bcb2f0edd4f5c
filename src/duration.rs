/// Playback length of a sequence in seconds.
///
/// The product is computed in 32-bit wrapping arithmetic, so a pathological
/// `frame_count` (above roughly 16.8M frames at 255 ms) wraps instead of
/// saturating.  Existing players behave the same way.
pub fn sequence_duration_seconds(frame_count: u32, frame_step_time_millis: u8) -> f32 {
    let millis = frame_count.wrapping_mul(u32::from(frame_step_time_millis));
    millis as f32 / 1000.0
}
