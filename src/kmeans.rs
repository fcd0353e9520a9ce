//! Lloyd's-iteration k-means over RGB samples.
//!
//! The clusterer is fully deterministic: initialization is one of the
//! [`InitPolicy`] variants, assignment ties go to the lowest cluster id, and
//! a cluster that loses all of its samples keeps its previous centroid.

use std::time::Duration;

use web_time::Instant;

use crate::error::QuantizeError;
use crate::features::{Sample, distance_squared};

/// Largest supported cluster count; one per canonical color.
pub const MAX_CLUSTERS: usize = 5;

/// How the starting centroids are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitPolicy {
    /// Deterministic k-means++: start from sample 0, then repeatedly take
    /// the sample farthest from its nearest chosen centroid (lowest index
    /// wins ties).
    #[default]
    FarthestPoint,
    /// The first `k` distinct samples in index order.
    FirstDistinct,
}

/// Why the iteration loop stopped. Every variant carries a usable result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// No sample changed cluster between two consecutive assign steps.
    Converged,
    /// `max_iterations` assign/update rounds ran without converging.
    IterationCap,
    /// The configured deadline elapsed.
    Deadline,
}

impl Termination {
    pub const fn as_str(self) -> &'static str {
        match self {
            Termination::Converged => "converged",
            Termination::IterationCap => "iteration-cap",
            Termination::Deadline => "deadline",
        }
    }
}

#[derive(Clone, Debug)]
pub struct KMeansConfig {
    /// Number of clusters, in `1..=MAX_CLUSTERS`.
    pub k: usize,
    /// Upper bound on assign/update rounds. Must be at least 1.
    pub max_iterations: usize,
    pub init: InitPolicy,
    /// Optional wall-clock budget, checked after every update step.
    pub deadline: Option<Duration>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            k: MAX_CLUSTERS,
            max_iterations: 500,
            init: InitPolicy::default(),
            deadline: None,
        }
    }
}

impl KMeansConfig {
    /// # Errors
    ///
    /// Returns [`QuantizeError::InvalidClusterCount`] or
    /// [`QuantizeError::InvalidMaxIterations`] for out-of-range parameters.
    pub fn validate(&self) -> Result<(), QuantizeError> {
        if self.k == 0 || self.k > MAX_CLUSTERS {
            return Err(QuantizeError::InvalidClusterCount(self.k));
        }
        if self.max_iterations == 0 {
            return Err(QuantizeError::InvalidMaxIterations);
        }
        Ok(())
    }
}

/// Result of a clustering run.
#[derive(Clone, Debug)]
pub struct Clustering {
    /// Cluster id for every sample, index-aligned with the input.
    pub assignments: Vec<usize>,
    /// One centroid per cluster id.
    pub centroids: Vec<Sample>,
    /// Number of assign steps executed.
    pub iterations: usize,
    pub termination: Termination,
}

impl Clustering {
    /// Number of samples assigned to each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &cluster in &self.assignments {
            sizes[cluster] += 1;
        }
        sizes
    }
}

/// Partition `samples` into `config.k` clusters.
///
/// # Errors
///
/// Fails with [`QuantizeError::EmptyInput`] when `samples` is empty, or with
/// a configuration error from [`KMeansConfig::validate`].
pub fn cluster(samples: &[Sample], config: &KMeansConfig) -> Result<Clustering, QuantizeError> {
    config.validate()?;
    if samples.is_empty() {
        return Err(QuantizeError::EmptyInput);
    }

    let started = Instant::now();
    let mut centroids = match config.init {
        InitPolicy::FarthestPoint => farthest_point_init(samples, config.k),
        InitPolicy::FirstDistinct => first_distinct_init(samples, config.k),
    };

    let mut assignments: Vec<usize> = Vec::new();
    let mut termination = Termination::IterationCap;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        iterations += 1;

        let next = assign(samples, &centroids);
        let changed = if assignments.is_empty() {
            next.len()
        } else {
            next.iter().zip(&assignments).filter(|(a, b)| a != b).count()
        };
        assignments = next;
        tracing::debug!(iteration = iterations, changed, "k-means assign step");

        if changed == 0 {
            termination = Termination::Converged;
            break;
        }

        update(samples, &assignments, &mut centroids);

        if config.deadline.is_some_and(|limit| started.elapsed() >= limit) {
            termination = Termination::Deadline;
            break;
        }
    }

    match termination {
        Termination::Converged => {
            tracing::info!(iterations, "k-means converged");
        }
        Termination::IterationCap | Termination::Deadline => {
            tracing::warn!(
                iterations,
                reason = termination.as_str(),
                "k-means stopped before convergence"
            );
        }
    }

    Ok(Clustering {
        assignments,
        centroids,
        iterations,
        termination,
    })
}

/// Index of the centroid closest to `sample`; the lowest id wins ties.
#[inline]
pub fn nearest_centroid(sample: &Sample, centroids: &[Sample]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = distance_squared(sample, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    best
}

/// Deterministic k-means++ seeding.
fn farthest_point_init(samples: &[Sample], k: usize) -> Vec<Sample> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(samples[0]);

    let mut min_distances = vec![f64::INFINITY; samples.len()];

    while centroids.len() < k {
        let last = centroids[centroids.len() - 1];
        let mut far_idx = 0;
        let mut far_dist = 0.0;
        for (i, sample) in samples.iter().enumerate() {
            let dist = distance_squared(sample, &last);
            if dist < min_distances[i] {
                min_distances[i] = dist;
            }
            if min_distances[i] > far_dist {
                far_dist = min_distances[i];
                far_idx = i;
            }
        }

        if far_dist == 0.0 {
            // Every sample coincides with a chosen centroid.
            break;
        }
        centroids.push(samples[far_idx]);
    }

    pad_centroids(&mut centroids, samples[0], k);
    centroids
}

fn first_distinct_init(samples: &[Sample], k: usize) -> Vec<Sample> {
    let mut centroids: Vec<Sample> = Vec::with_capacity(k);
    for sample in samples {
        if centroids.len() == k {
            break;
        }
        if !centroids.contains(sample) {
            centroids.push(*sample);
        }
    }

    pad_centroids(&mut centroids, samples[0], k);
    centroids
}

/// Fill up to `k` centroids with copies of `filler`. The copies never win a
/// tie against the original, so their clusters stay empty.
fn pad_centroids(centroids: &mut Vec<Sample>, filler: Sample, k: usize) {
    if centroids.len() < k {
        tracing::debug!(
            distinct = centroids.len(),
            k,
            "fewer distinct samples than clusters"
        );
        centroids.resize(k, filler);
    }
}

#[cfg(not(feature = "parallel"))]
fn assign(samples: &[Sample], centroids: &[Sample]) -> Vec<usize> {
    samples
        .iter()
        .map(|sample| nearest_centroid(sample, centroids))
        .collect()
}

#[cfg(feature = "parallel")]
fn assign(samples: &[Sample], centroids: &[Sample]) -> Vec<usize> {
    use rayon::prelude::*;

    samples
        .par_iter()
        .map(|sample| nearest_centroid(sample, centroids))
        .collect()
}

/// Per-cluster component sums and member counts.
struct Accumulator {
    sums: Vec<Sample>,
    counts: Vec<usize>,
}

impl Accumulator {
    fn new(k: usize) -> Self {
        Self {
            sums: vec![[0.0; 3]; k],
            counts: vec![0; k],
        }
    }

    fn add(mut self, sample: &Sample, cluster: usize) -> Self {
        self.counts[cluster] += 1;
        for (sum, value) in self.sums[cluster].iter_mut().zip(sample) {
            *sum += value;
        }
        self
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    fn merge(mut self, other: Self) -> Self {
        for (cluster, count) in other.counts.into_iter().enumerate() {
            self.counts[cluster] += count;
            for (sum, value) in self.sums[cluster].iter_mut().zip(other.sums[cluster]) {
                *sum += value;
            }
        }
        self
    }
}

#[cfg(not(feature = "parallel"))]
fn accumulate(samples: &[Sample], assignments: &[usize], k: usize) -> Accumulator {
    samples
        .iter()
        .zip(assignments)
        .fold(Accumulator::new(k), |acc, (sample, &cluster)| acc.add(sample, cluster))
}

#[cfg(feature = "parallel")]
fn accumulate(samples: &[Sample], assignments: &[usize], k: usize) -> Accumulator {
    use rayon::prelude::*;

    samples
        .par_iter()
        .zip(assignments.par_iter())
        .fold(
            || Accumulator::new(k),
            |acc, (sample, &cluster)| acc.add(sample, cluster),
        )
        .reduce(|| Accumulator::new(k), Accumulator::merge)
}

/// Move each centroid to the mean of its members. Empty clusters keep
/// their previous centroid.
fn update(samples: &[Sample], assignments: &[usize], centroids: &mut [Sample]) {
    let acc = accumulate(samples, assignments, centroids.len());
    for ((centroid, sum), count) in centroids.iter_mut().zip(acc.sums).zip(acc.counts) {
        if count == 0 {
            continue;
        }
        let n = count as f64;
        *centroid = [sum[0] / n, sum[1] / n, sum[2] / n];
    }
}
