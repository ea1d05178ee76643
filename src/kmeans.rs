extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::block::mean_round;
use crate::histogram::{Color, ColorHistogram};
use crate::remap::nearest;

/// Number of refinement rounds. Fixed; there is no convergence test.
pub const KMEANS_ITERATIONS: usize = 10;

/// Cluster the distinct colors of `hist` into `k` centroids.
///
/// Centroid `i` starts at distinct color `i % n` in first-seen order, so
/// asking for more clusters than there are colors yields duplicate seeds.
/// Each round assigns every distinct color (unweighted) to its nearest
/// centroid and moves each centroid to the rounded mean of its members; a
/// centroid with no members stays put.
pub fn kmeans(hist: &ColorHistogram, k: usize) -> Vec<Color> {
    if hist.is_empty() || k == 0 {
        return Vec::new();
    }

    let colors = hist.colors();
    let mut centroids: Vec<Color> = (0..k).map(|i| colors[i % colors.len()]).collect();

    let mut sums = vec![[0u64; 3]; k];
    let mut counts = vec![0u64; k];

    for _ in 0..KMEANS_ITERATIONS {
        sums.iter_mut().for_each(|s| *s = [0; 3]);
        counts.iter_mut().for_each(|c| *c = 0);

        for &c in &colors {
            let i = nearest(&centroids, c);
            sums[i][0] += c[0] as u64;
            sums[i][1] += c[1] as u64;
            sums[i][2] += c[2] as u64;
            counts[i] += 1;
        }

        for (i, centroid) in centroids.iter_mut().enumerate() {
            let n = counts[i];
            if n > 0 {
                *centroid = [
                    mean_round(sums[i][0], n),
                    mean_round(sums[i][1], n),
                    mean_round(sums[i][2], n),
                ];
            }
        }
    }

    log::debug!(
        "kmeans: {} distinct colors -> {} centroids",
        colors.len(),
        centroids.len()
    );

    centroids
}
