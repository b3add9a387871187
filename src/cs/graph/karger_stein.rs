//! Karger-Stein recursive contraction for 3-uniform hypergraphs.
//!
//! A single trial contracts random hyperedges until at most three components
//! remain. While more than three components are left, the trial forks with
//! probability `3 / N`: the contracted copy is explored, then the uncontracted
//! instance is retried along an independent random path. At three components
//! every remaining edge is tried in turn, so small instances are resolved
//! exactly.
//!
//! Trials are repeated until a wall-clock budget runs out. Every terminal state
//! reports its cut to a [`MinCutTracker`], which keeps the smallest cut value
//! and the distinct edge sets (by XOR fingerprint) that reach it.
//!
//! # Example
//!
//! ```rust
//! use hypercut::cs::graph::hypergraph::HypergraphInput;
//! use hypercut::cs::graph::karger_stein::{HypergraphMinCut, MinCutConfig};
//!
//! let input: HypergraphInput = "4 3\n1 2 3\n1 2 4\n3 4 1\n".parse().unwrap();
//! let config = MinCutConfig::default().with_seed(42).with_max_trials(200);
//! let report = HypergraphMinCut::new(config).run(&input).unwrap();
//! assert_eq!(report.min_cut, 2);
//! assert_eq!(report.distinct_cuts, 3);
//! ```

use crate::cs::graph::hypergraph::{Hypergraph, HypergraphInput};
use crate::error::Result;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Numerator of the branch probability `p = BRANCH_FACTOR / N`.
///
/// A hyperedge contraction can remove up to two components, so the graph
/// constant 2 becomes 3.
pub const BRANCH_FACTOR: f64 = 3.0;

/// A cut reported by a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutCandidate {
    pub size: usize,
    pub fingerprint: u64,
    /// Sorted ids of the cut edges
    pub edges: Vec<usize>,
}

impl CutCandidate {
    fn from_terminal(graph: &Hypergraph) -> Self {
        let mut edges = graph.cut_edges().to_vec();
        edges.sort_unstable();
        Self {
            size: graph.cut_size(),
            fingerprint: graph.fingerprint(),
            edges,
        }
    }
}

/// Best cut value seen so far and the distinct cuts achieving it.
#[derive(Debug, Clone)]
pub struct MinCutTracker {
    best: usize,
    cuts: BTreeMap<u64, Vec<usize>>,
}

impl MinCutTracker {
    /// Starts from a known upper bound, typically the total edge count.
    pub fn new(upper_bound: usize) -> Self {
        Self {
            best: upper_bound,
            cuts: BTreeMap::new(),
        }
    }

    /// Records a terminal cut. Returns `true` if it lowered the best value.
    ///
    /// A smaller cut discards every cut recorded before it; an equal cut is
    /// added unless its fingerprint is already known; a larger one is ignored.
    pub fn consider(&mut self, candidate: CutCandidate) -> bool {
        let lowered = candidate.size < self.best;
        if lowered {
            debug!(
                "minimum cut lowered from {} to {}",
                self.best, candidate.size
            );
            self.best = candidate.size;
            self.cuts.clear();
        }
        if candidate.size == self.best {
            self.cuts
                .entry(candidate.fingerprint)
                .or_insert(candidate.edges);
        }
        lowered
    }

    /// Folds another tracker (e.g. from a worker thread) into this one.
    pub fn merge(&mut self, other: MinCutTracker) {
        if other.best < self.best {
            self.best = other.best;
            self.cuts.clear();
        }
        if other.best == self.best {
            for (fingerprint, edges) in other.cuts {
                self.cuts.entry(fingerprint).or_insert(edges);
            }
        }
    }

    pub fn best(&self) -> usize {
        self.best
    }

    pub fn distinct_cuts(&self) -> usize {
        self.cuts.len()
    }

    /// Fingerprint to sorted cut-edge ids, for every cut of the best value.
    pub fn witnesses(&self) -> &BTreeMap<u64, Vec<usize>> {
        &self.cuts
    }
}

/// Pending work of a trial.
enum Frame {
    /// An instance not yet examined
    Visit(Hypergraph),
    /// A three-component instance whose edges are contracted one at a time;
    /// `next` is the index of the next edge to try
    Exhaust { parent: Hypergraph, next: usize },
}

/// Per-trial counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TrialStats {
    terminals: usize,
    peak_frames: usize,
}

/// Runs one Karger-Stein trial on `graph`, reporting terminal cuts to
/// `tracker`. Returns the number of terminal states reached.
///
/// Branches are kept on an explicit stack, so each child is explored
/// completely before its next sibling, exactly like the recursive
/// formulation, but without its call-stack depth. Children of a
/// three-component instance are built one at a time when their frame is
/// popped, so live copies stay proportional to the depth, not the edge count.
pub fn karger_stein<R: Rng + ?Sized>(
    graph: Hypergraph,
    rng: &mut R,
    tracker: &mut MinCutTracker,
) -> usize {
    let stats = run_frames(graph, rng, tracker);
    trace!("peak of {} pending frames", stats.peak_frames);
    stats.terminals
}

fn run_frames<R: Rng + ?Sized>(
    graph: Hypergraph,
    rng: &mut R,
    tracker: &mut MinCutTracker,
) -> TrialStats {
    let mut stats = TrialStats::default();
    let mut stack = vec![Frame::Visit(graph)];

    while let Some(frame) = stack.pop() {
        let mut g = match frame {
            Frame::Visit(g) => g,
            Frame::Exhaust { parent, next } => {
                if next < parent.edge_count() {
                    let mut child = parent.clone();
                    child.contract(Some(next), rng);
                    stack.push(Frame::Exhaust {
                        parent,
                        next: next + 1,
                    });
                    stack.push(Frame::Visit(child));
                    stats.peak_frames = stats.peak_frames.max(stack.len());
                }
                continue;
            }
        };

        if g.components() <= 3 {
            g.reduce();
        }

        if g.components() == 2 || g.edge_count() == 0 {
            tracker.consider(CutCandidate::from_terminal(&g));
            stats.terminals += 1;
            continue;
        }

        if g.components() == 3 {
            stack.push(Frame::Exhaust { parent: g, next: 0 });
            stats.peak_frames = stats.peak_frames.max(stack.len());
            continue;
        }
        debug_assert!(g.components() > 3);

        // More than three components but only loops left: already disconnected.
        g.remove_self_loops();
        if g.edge_count() == 0 {
            tracker.consider(CutCandidate::from_terminal(&g));
            stats.terminals += 1;
            continue;
        }

        let p = BRANCH_FACTOR / g.components() as f64;
        let mut contracted = g.clone();
        contracted.contract(None, rng);

        if rng.gen::<f64>() < p {
            stack.push(Frame::Visit(g));
        }
        stack.push(Frame::Visit(contracted));
        stats.peak_frames = stats.peak_frames.max(stack.len());
    }

    stats
}

/// Parameters of a min-cut run
#[derive(Debug, Clone)]
pub struct MinCutConfig {
    /// No new trial starts once this much time has elapsed
    pub time_budget: Duration,
    /// Seed for reproducible runs; entropy when `None`
    pub seed: Option<u64>,
    /// Optional cap on the number of trials
    pub max_trials: Option<usize>,
    /// Worker threads running independent trials
    pub threads: usize,
}

impl Default for MinCutConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(2),
            seed: None,
            max_trials: None,
            threads: 1,
        }
    }
}

impl MinCutConfig {
    pub fn with_time_budget(mut self, time_budget: Duration) -> Self {
        self.time_budget = time_budget;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_trials(mut self, max_trials: usize) -> Self {
        self.max_trials = Some(max_trials);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

/// Outcome of a min-cut run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinCutReport {
    pub min_cut: usize,
    /// Distinct edge sets of size `min_cut` that were found
    pub distinct_cuts: usize,
    pub trials: usize,
    pub elapsed: Duration,
    /// Fingerprint to sorted 1-based input edge indices of each minimum cut
    pub witnesses: BTreeMap<u64, Vec<usize>>,
}

impl fmt::Display for MinCutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.min_cut, self.distinct_cuts)
    }
}

/// Trial driver: repeats [`karger_stein`] until the budget is spent.
#[derive(Debug, Clone, Default)]
pub struct HypergraphMinCut {
    config: MinCutConfig,
}

impl HypergraphMinCut {
    pub fn new(config: MinCutConfig) -> Self {
        Self { config }
    }

    fn make_rng(&self) -> ChaCha20Rng {
        match self.config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        }
    }

    /// Builds the instance with edge ranks drawn from the run's generator,
    /// then runs trials on it.
    pub fn run(&self, input: &HypergraphInput) -> Result<MinCutReport> {
        let mut rng = self.make_rng();
        let graph = input.to_hypergraph(&mut rng)?;
        self.run_graph(&graph, &mut rng)
    }

    /// Runs trials on an already built hypergraph, drawing from `rng`.
    ///
    /// With more than one thread, each worker gets its own generator seeded
    /// from `rng` and its own tracker; trackers are merged at the end.
    pub fn run_graph<R: Rng + ?Sized>(
        &self,
        graph: &Hypergraph,
        rng: &mut R,
    ) -> Result<MinCutReport> {
        let start = Instant::now();
        let started = AtomicUsize::new(0);
        let threads = self.config.threads.max(1);

        let (tracker, trials) = if threads == 1 {
            self.run_trials(graph, rng, start, &started)
        } else {
            let seeds: Vec<u64> = (0..threads).map(|_| rng.gen()).collect();
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            let results: Vec<(MinCutTracker, usize)> = pool.install(|| {
                seeds
                    .into_par_iter()
                    .map(|seed| {
                        let mut worker_rng = ChaCha20Rng::seed_from_u64(seed);
                        self.run_trials(graph, &mut worker_rng, start, &started)
                    })
                    .collect()
            });

            let mut tracker = MinCutTracker::new(graph.edge_count());
            let mut trials = 0;
            for (local, count) in results {
                tracker.merge(local);
                trials += count;
            }
            (tracker, trials)
        };

        let elapsed = start.elapsed();
        debug!(
            "{} trials in {:?} on {} threads: min cut {} ({} distinct)",
            trials,
            elapsed,
            threads,
            tracker.best(),
            tracker.distinct_cuts()
        );

        let witnesses: BTreeMap<u64, Vec<usize>> = tracker
            .witnesses()
            .iter()
            .map(|(&fingerprint, edges)| (fingerprint, edges.iter().map(|id| id + 1).collect()))
            .collect();

        Ok(MinCutReport {
            min_cut: tracker.best(),
            distinct_cuts: tracker.distinct_cuts(),
            trials,
            elapsed,
            witnesses,
        })
    }

    /// Trial loop shared by the sequential and parallel paths. At least one
    /// trial runs; a trial that has started always completes.
    fn run_trials<R: Rng + ?Sized>(
        &self,
        graph: &Hypergraph,
        rng: &mut R,
        start: Instant,
        started: &AtomicUsize,
    ) -> (MinCutTracker, usize) {
        let max_trials = self.config.max_trials.unwrap_or(usize::MAX).max(1);
        let mut tracker = MinCutTracker::new(graph.edge_count());
        let mut trials = 0;

        loop {
            if started.fetch_add(1, Ordering::Relaxed) >= max_trials {
                break;
            }
            let terminals = karger_stein(graph.clone(), rng, &mut tracker);
            trials += 1;
            trace!(
                "trial {} reached {} terminal states, best {}",
                trials,
                terminals,
                tracker.best()
            );
            if start.elapsed() >= self.config.time_budget {
                break;
            }
        }

        (tracker, trials)
    }
}
