use std::fmt;
use std::time::Duration;

/// Simulated-time units added per decision step
pub const TIMESTEP: f64 = 1.0;

/// An ordered key-value record of diagnostic values
///
/// Environments use it to expose per-episode figures, and the agent uses it
/// to expose hyperparameters and running averages. The [`Display`](fmt::Display)
/// impl writes one `key value` line per entry, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Report {
    entries: Vec<(&'static str, f64)>,
}

impl Report {
    /// Initialize a report with the provided keys, all set to zero
    pub fn new(keys: Vec<&'static str>) -> Self {
        Self {
            entries: keys.into_iter().map(|k| (k, 0.0)).collect(),
        }
    }

    /// Mutable access to the value under `key`, appending a zero entry if absent
    pub fn entry(&mut self, key: &'static str) -> &mut f64 {
        let ix = match self.entries.iter().position(|(k, _)| *k == key) {
            Some(ix) => ix,
            None => {
                self.entries.push((key, 0.0));
                self.entries.len() - 1
            }
        };
        &mut self.entries[ix].1
    }

    /// Value under `key`, if present
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Report keys, in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Report values, in insertion order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    /// Take the current values, resetting every entry to zero
    pub fn take(&mut self) -> Vec<(&'static str, f64)> {
        let taken = self.entries.clone();
        for (_, v) in &mut self.entries {
            *v = 0.0;
        }
        taken
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.entries {
            writeln!(f, "{k} {v}")?;
        }
        Ok(())
    }
}

/// Transient statistics for the episode in progress
///
/// Cleared at every episode boundary.
#[derive(Debug, Clone, Default)]
pub struct EpisodeStats {
    /// Elapsed simulated time
    pub time: f64,
    /// Decisions taken
    pub steps: u64,
    /// Sum of chosen action indices
    pub action_sum: f64,
    /// Decisions taken on the explore branch
    pub random_actions: u64,
    /// Wall-clock time spent choosing actions
    pub decision_time: Duration,
    /// Actions taken this episode, in order
    pub run: Vec<usize>,
}

impl EpisodeStats {
    pub(crate) fn record_step(&mut self, action: usize, random: bool, elapsed: Duration) {
        self.steps += 1;
        self.action_sum += action as f64;
        self.time += TIMESTEP;
        self.run.push(action);
        self.decision_time += elapsed;
        if random {
            self.random_actions += 1;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.time = 0.0;
        self.steps = 0;
        self.action_sum = 0.0;
        self.random_actions = 0;
        self.decision_time = Duration::ZERO;
        self.run.clear();
    }
}

/// Statistics that persist across episode boundaries
///
/// The `avg_*` figures are incremental means over completed episodes,
/// normalized by elapsed simulated time where noted. They survive until
/// [`reset`](Self::reset) is called.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    episodes: u32,
    avg_decision_time: f64,
    avg_action: f64,
    avg_random_actions: f64,
    avg_episode_time: f64,
    total_decision_time: Duration,
    best_time: f64,
    best_run: Vec<usize>,
}

impl RunningStats {
    /// Fold a finished episode into the running averages
    pub(crate) fn record(&mut self, episode: &EpisodeStats) {
        self.episodes += 1;
        let n = self.episodes as f64;

        // Zero-step episodes fold in as zeros
        let (latency, action, random) = if episode.steps == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (
                episode.decision_time.as_secs_f64() / episode.time,
                episode.action_sum / episode.time,
                episode.random_actions as f64 / episode.time,
            )
        };

        self.avg_decision_time += (latency - self.avg_decision_time) / n;
        self.avg_action += (action - self.avg_action) / n;
        self.avg_random_actions += (random - self.avg_random_actions) / n;
        self.avg_episode_time += (episode.time - self.avg_episode_time) / n;

        if episode.time > self.best_time {
            self.best_time = episode.time;
            self.best_run = episode.run.clone();
        }

        self.total_decision_time += episode.decision_time;
    }

    /// Discard the running averages and their episode count
    ///
    /// The best run and the cumulative decision-time total are preserved.
    pub fn reset(&mut self) {
        self.episodes = 0;
        self.avg_decision_time = 0.0;
        self.avg_action = 0.0;
        self.avg_random_actions = 0.0;
        self.avg_episode_time = 0.0;
    }

    /// Episodes folded in since construction or the last [`reset`](Self::reset)
    pub fn episodes(&self) -> u32 {
        self.episodes
    }

    /// Mean wall-clock seconds spent choosing actions, per unit of simulated time
    pub fn avg_decision_time(&self) -> f64 {
        self.avg_decision_time
    }

    /// Mean chosen action index, per unit of simulated time
    pub fn avg_action(&self) -> f64 {
        self.avg_action
    }

    /// Mean explore-branch decisions, per unit of simulated time
    pub fn avg_random_actions(&self) -> f64 {
        self.avg_random_actions
    }

    /// Mean episode duration in simulated time
    pub fn avg_episode_time(&self) -> f64 {
        self.avg_episode_time
    }

    /// Duration of the longest episode seen so far
    pub fn best_time(&self) -> f64 {
        self.best_time
    }

    /// Action sequence of the longest episode seen so far
    pub fn best_run(&self) -> &[usize] {
        &self.best_run
    }

    /// Wall-clock time spent choosing actions across all completed episodes
    pub fn total_decision_time(&self) -> Duration {
        self.total_decision_time
    }
}
