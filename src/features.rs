//! Feature vector assembly.
//!
//! Rolling averages are approximated by jittering the current reading with a
//! uniform factor, and the three FFT slots are zero. Neither is derived from
//! real history; the window size is carried through for display only.

use rand::Rng;

use crate::config::defaults::{FEATURE_COUNT, ROLLING_JITTER_MAX, ROLLING_JITTER_MIN};
use crate::types::{FeatureVector, SensorInput};

/// Index of the first FFT placeholder.
pub const FFT_START: usize = 4;

/// Build the 7-element feature vector for one reading.
pub fn assemble<R: Rng + ?Sized>(input: &SensorInput, rng: &mut R) -> FeatureVector {
    let vib_rolling = input.vibration * rng.gen_range(ROLLING_JITTER_MIN..ROLLING_JITTER_MAX);
    let temp_rolling = input.temperature * rng.gen_range(ROLLING_JITTER_MIN..ROLLING_JITTER_MAX);

    let mut features = [0.0; FEATURE_COUNT];
    features[0] = input.vibration;
    features[1] = input.temperature;
    features[2] = vib_rolling;
    features[3] = temp_rolling;
    FeatureVector(features)
}
