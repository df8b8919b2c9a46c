use std::mem::size_of;
use std::time::Instant;

use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::Uniform;

use crate::{
    decay,
    env::Environment,
    error::{Error, Result},
    exploration::{Choice, EpsilonGreedy},
    stats::{EpisodeStats, Report, RunningStats},
};

/// Dense state-action value table
///
/// Values are stored row-major in a flat contiguous buffer of length
/// `num_states * num_actions`, addressed as `state * num_actions + action`.
/// The table is never resized after construction, and every access is
/// bounds-checked against the configured dimensions.
#[derive(Debug, Clone)]
pub struct QTable {
    values: Vec<f64>,
    num_states: usize,
    num_actions: usize,
}

impl QTable {
    /// Allocate a table filled with independent uniform-random values in `[-1, 1]`
    pub fn new<R: Rng + ?Sized>(
        num_states: usize,
        num_actions: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if num_states == 0 || num_actions == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "table dimensions must be positive, got {num_states} states x {num_actions} actions"
                ),
            });
        }

        let dist = Uniform::new_inclusive(-1.0, 1.0);
        let values = (0..num_states * num_actions)
            .map(|_| rng.sample(dist))
            .collect::<Vec<f64>>();

        debug!(
            "allocated Q table: {} entries ({:.2} MB)",
            values.len(),
            (values.len() * size_of::<f64>()) as f64 / 1_048_576.0
        );

        Ok(Self {
            values,
            num_states,
            num_actions,
        })
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    fn index(&self, state: usize, action: usize) -> Result<usize> {
        if state >= self.num_states {
            return Err(Error::StateOutOfRange {
                state,
                num_states: self.num_states,
            });
        }
        if action >= self.num_actions {
            return Err(Error::ActionOutOfRange {
                action,
                num_actions: self.num_actions,
            });
        }
        Ok(state * self.num_actions + action)
    }

    fn row(&self, state: usize) -> Result<&[f64]> {
        if state >= self.num_states {
            return Err(Error::StateOutOfRange {
                state,
                num_states: self.num_states,
            });
        }
        let start = state * self.num_actions;
        Ok(&self.values[start..start + self.num_actions])
    }

    /// Value recorded for a state-action pair
    pub fn get(&self, state: usize, action: usize) -> Result<f64> {
        Ok(self.values[self.index(state, action)?])
    }

    /// Overwrite the value recorded for a state-action pair
    pub fn set(&mut self, state: usize, action: usize, value: f64) -> Result<()> {
        let ix = self.index(state, action)?;
        self.values[ix] = value;
        Ok(())
    }

    /// Greedy action at `state`
    ///
    /// Scans the row in index order; replacement requires a strictly greater
    /// value, so ties keep the lowest-indexed action.
    pub fn greedy_action(&self, state: usize) -> Result<usize> {
        let row = self.row(state)?;
        let mut action = 0;
        let mut max_q = row[0];
        for (i, &q) in row.iter().enumerate().skip(1) {
            if q > max_q {
                max_q = q;
                action = i;
            }
        }
        Ok(action)
    }

    /// Maximum value over all actions at `state`
    pub fn max_value(&self, state: usize) -> Result<f64> {
        let row = self.row(state)?;
        Ok(row.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }
}

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone, PartialEq)]
pub struct QTableAgentConfig {
    /// Episode budget the exploration schedule decays over
    pub num_episodes: u32,
    /// Starting exploration probability
    pub explore_start: f64,
    /// Final exploration probability
    pub explore_end: f64,
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            num_episodes: 10_000,
            explore_start: 1.0,
            explore_end: 0.01,
            alpha: 0.7,
            gamma: 0.99,
        }
    }
}

impl QTableAgentConfig {
    fn validate(&self) -> Result<()> {
        if self.num_episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: String::from("`num_episodes` must be positive"),
            });
        }
        if !(self.explore_start >= self.explore_end && self.explore_end >= 0.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "exploration schedule requires `explore_start` >= `explore_end` >= 0, \
                     got start {} end {}",
                    self.explore_start, self.explore_end
                ),
            });
        }
        check_interval("alpha", self.alpha)?;
        check_interval("gamma", self.gamma)?;
        Ok(())
    }
}

fn check_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfiguration {
            message: format!("`{name}` must be in the interval [0, 1], got {value}"),
        })
    }
}

/// A Q-learning agent over a dense state-action value table
///
/// The agent owns the value table, the exploration schedule, and episode
/// statistics. The caller owns the loop: request an action with
/// [`select_action`](Self::select_action), feed the observed transition into
/// [`update`](Self::update), and close each episode with
/// [`end_episode`](Self::end_episode). [`go`](Self::go) wraps that sequence
/// for environments implementing [`Environment`].
///
/// A single agent instance expects one logical training loop; nothing here is
/// synchronized for concurrent mutation.
pub struct QTableAgent<R: Rng = StdRng> {
    table: QTable,
    exploration: EpsilonGreedy<decay::Linear>,
    config: QTableAgentConfig,
    episode: u32,
    stats: RunningStats,
    current: EpisodeStats,
    rng: R,
}

impl<R: Rng> QTableAgent<R> {
    /// Initialize a new `QTableAgent` with the provided random source
    ///
    /// The table is filled with independent uniform-random values in `[-1, 1]`
    /// and the exploration rate starts at `explore_start`, stepping down to
    /// `explore_end` over `num_episodes` episode boundaries.
    pub fn new(
        num_states: usize,
        num_actions: usize,
        config: QTableAgentConfig,
        mut rng: R,
    ) -> Result<Self> {
        config.validate()?;
        let table = QTable::new(num_states, num_actions, &mut rng)?;
        let schedule = decay::Linear::over(
            config.num_episodes,
            config.explore_start,
            config.explore_end,
        )?;

        Ok(Self {
            table,
            exploration: EpsilonGreedy::new(schedule),
            config,
            episode: 0,
            stats: RunningStats::default(),
            current: EpisodeStats::default(),
            rng,
        })
    }

    /// Choose an action for `state` under the epsilon greedy policy
    ///
    /// The greedy action is always computed, with a strict-greater scan so ties
    /// keep the lowest index; on an explore step the returned action is instead
    /// drawn uniformly over the full action range. The wall-clock duration of
    /// the decision is accumulated into the episode statistics and never
    /// touches the random sequence.
    pub fn select_action(&mut self, state: usize) -> Result<usize> {
        let start = Instant::now();

        let choice = self.exploration.choose(self.episode, &mut self.rng);
        let greedy = self.table.greedy_action(state)?;
        let action = match choice {
            Choice::Exploit => greedy,
            Choice::Explore => self.rng.gen_range(0..self.table.num_actions()),
        };

        self.current
            .record_step(action, matches!(choice, Choice::Explore), start.elapsed());

        Ok(action)
    }

    /// Apply the one-step Q-learning update for an observed transition
    ///
    /// Terminal transitions write `reward` into the table directly; there is
    /// no discounted continuation past the end of an episode.
    pub fn update(
        &mut self,
        prev_state: usize,
        cur_state: usize,
        prev_action: usize,
        reward: f64,
        done: bool,
    ) -> Result<()> {
        let max_q = self.table.max_value(cur_state)?;
        let q = self.table.get(prev_state, prev_action)?;

        let value = if done {
            reward
        } else {
            q + self.config.alpha * (reward + self.config.gamma * max_q - q)
        };

        self.table.set(prev_state, prev_action, value)
    }

    /// Close the episode in progress
    ///
    /// Folds the finished episode into the running averages and the best-run
    /// record, advances the exploration schedule by one step, and clears the
    /// per-episode counters.
    pub fn end_episode(&mut self) {
        self.stats.record(&self.current);
        self.current.clear();
        self.episode += 1;

        trace!(
            "episode {} complete, epsilon {:.4}",
            self.episode,
            self.epsilon()
        );
    }

    /// Discard accumulated running averages without touching the value table
    /// or the exploration schedule
    pub fn reset_running_averages(&mut self) {
        self.stats.reset();
    }

    /// Run one full episode in `env`
    ///
    /// Drives the select/observe/update loop until the environment reports a
    /// terminal transition, then closes the episode.
    pub fn go<E: Environment>(&mut self, env: &mut E) -> Result<()> {
        let mut state = env.reset();
        loop {
            let action = self.select_action(state)?;
            let (next_state, reward, done) = env.step(action);
            self.update(state, next_state, action, reward, done)?;
            if done {
                break;
            }
            state = next_state;
        }
        self.end_episode();
        Ok(())
    }

    /// Exploration probability for the next decision
    pub fn epsilon(&self) -> f64 {
        self.exploration.epsilon(self.episode)
    }

    /// Completed episodes since construction
    pub fn episode(&self) -> u32 {
        self.episode
    }

    pub fn config(&self) -> &QTableAgentConfig {
        &self.config
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    /// Statistics persisted across episodes
    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }

    /// Statistics for the episode in progress
    pub fn current_episode(&self) -> &EpisodeStats {
        &self.current
    }

    /// Hyperparameters and running averages as an ordered key-value [`Report`]
    pub fn summary(&self) -> Report {
        let mut report = Report::default();
        *report.entry("num_episodes") = self.config.num_episodes as f64;
        *report.entry("explore_start") = self.config.explore_start;
        *report.entry("explore_end") = self.config.explore_end;
        *report.entry("discount") = self.config.gamma;
        *report.entry("learning_rate") = self.config.alpha;
        *report.entry("epsilon") = self.epsilon();
        *report.entry("episodes") = self.stats.episodes() as f64;
        *report.entry("avg_decision_time") = self.stats.avg_decision_time();
        *report.entry("avg_action") = self.stats.avg_action();
        *report.entry("avg_random_actions") = self.stats.avg_random_actions();
        *report.entry("avg_episode_time") = self.stats.avg_episode_time();
        *report.entry("best_episode_time") = self.stats.best_time();
        *report.entry("total_decision_time_ms") =
            self.stats.total_decision_time().as_secs_f64() * 1e3;
        report
    }
}

impl QTableAgent<StdRng> {
    /// Initialize with a seeded [`StdRng`] for reproducible runs
    pub fn with_seed(
        num_states: usize,
        num_actions: usize,
        config: QTableAgentConfig,
        seed: u64,
    ) -> Result<Self> {
        Self::new(num_states, num_actions, config, StdRng::seed_from_u64(seed))
    }
}
