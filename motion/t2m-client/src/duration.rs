//! Requested animation length

/// Longest animation the service generates, in seconds
pub const MAX_DURATION_SECONDS: u32 = 30;

/// How the length of a generated animation is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestDuration {
    /// Let the service decide
    #[default]
    Auto,
    Seconds(u32),
    /// A frame count at the scene frame rate
    Frames(u32),
}

impl RequestDuration {
    /// Seconds to put in the request, `0` for [`RequestDuration::Auto`]
    pub fn seconds(&self, fps: u32) -> u32 {
        match *self {
            RequestDuration::Auto => 0,
            RequestDuration::Seconds(seconds) => seconds.clamp(1, MAX_DURATION_SECONDS),
            RequestDuration::Frames(frames) => {
                let fps = fps.max(1);
                let seconds = (f64::from(frames) / f64::from(fps)).round_ties_even() as u32;
                seconds.clamp(1, MAX_DURATION_SECONDS)
            }
        }
    }
}

/// Snap a frame count to a whole number of seconds
///
/// Counts above the maximum duration or below one second are clamped.
/// Otherwise a remainder smaller than half a second rounds up to the next
/// second and any larger remainder rounds down.
pub fn snap_frames(frames: u32, fps: u32) -> u32 {
    let fps = fps.max(1);
    // Whole seconds that still fit in a u32 frame count
    let max_seconds = MAX_DURATION_SECONDS.min(u32::MAX / fps);
    let max_frames = max_seconds * fps;
    if frames > max_frames {
        return max_frames;
    }
    if frames < fps {
        return fps;
    }

    let remainder = frames % fps;
    if remainder == 0 {
        frames
    } else if remainder < half_second(fps) {
        frames - remainder + fps
    } else {
        frames - remainder
    }
}

fn half_second(fps: u32) -> u32 {
    (f64::from(fps) / 2.0).round_ties_even() as u32
}
