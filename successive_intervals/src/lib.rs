mod config;
pub mod builder;
pub mod manual;
pub mod normal;

use log::debug;

pub use crate::builder::*;
pub use crate::config::*;

/// Stand-in for the infinite z-scores of the two ends of the scale.
pub const Z_BOUND: f64 = 3.9;

/// The z-score of a midpoint, saturated at `Z_BOUND` when the midpoint
/// is exactly 0 or 1.
pub fn clamped_z(midpoint: f64) -> f64 {
    if midpoint == 0.0 {
        -Z_BOUND
    } else if midpoint == 1.0 {
        Z_BOUND
    } else {
        normal::inverse_cdf(midpoint)
    }
}

/// Runs the Method of Successive Intervals on the answers to one item.
///
/// Arguments:
/// * `observations` the answers, one per respondent. Only the values 1 to 5 are
/// counted: missing cells and values out of range are left out of the frequencies
/// and of the total `n`.
///
/// Returns an error if none of the observations is in range.
///
/// ```
/// use successive_intervals::*;
///
/// let item = Item::from_values("Q1", &[1, 1, 2, 3, 3, 3, 4, 5, 5, 5]);
/// let stats = transform(&item.observations)?;
/// assert_eq!(stats.frequency, [2, 1, 3, 1, 3]);
/// assert_eq!(stats.rounded, [0, 1, 1, 2, 2]);
/// # Ok::<(), MsiError>(())
/// ```
pub fn transform(observations: &[Observation]) -> Result<CategoryStats, MsiError> {
    let mut frequency = [0u64; NUM_CATEGORIES];
    let mut excluded: u64 = 0;
    for v in observations.iter().flatten() {
        match CATEGORIES.iter().position(|c| c == v) {
            Some(idx) => frequency[idx] += 1,
            None => excluded += 1,
        }
    }

    let n: u64 = frequency.iter().sum();
    if n == 0 {
        return Err(MsiError::NoObservations);
    }
    let total = n as f64;

    let proportion = frequency.map(|f| f as f64 / total);

    let mut cumulative = [0.0; NUM_CATEGORIES];
    let mut acc = 0.0;
    for (idx, p) in proportion.iter().enumerate() {
        acc += p;
        cumulative[idx] = acc;
    }

    let mut midpoint = [0.0; NUM_CATEGORIES];
    for idx in 0..NUM_CATEGORIES {
        midpoint[idx] = cumulative[idx] - proportion[idx] / 2.0;
    }

    let complement = midpoint.map(|m| 0.5 - m);
    let z = midpoint.map(clamped_z);
    let min_z = z.iter().cloned().fold(f64::INFINITY, f64::min);
    let zc = z.map(|v| v - min_z);
    let rounded = zc.map(round_half_even);

    debug!(
        "transform: n: {:?} excluded: {:?} frequency: {:?} z: {:?}",
        n, excluded, frequency, z
    );

    Ok(CategoryStats {
        n,
        excluded,
        frequency,
        proportion,
        cumulative,
        midpoint,
        complement,
        z,
        zc,
        rounded,
    })
}

fn round_half_even(x: f64) -> i64 {
    x.round_ties_even() as i64
}
