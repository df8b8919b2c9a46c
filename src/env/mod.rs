/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one
/// agent and finite state and action spaces, both addressed by index. The
/// indices double as coordinates into the value table of a tabular agent.
pub trait Environment {
    /// Number of distinct states
    fn num_states(&self) -> usize;

    /// Number of distinct actions
    fn num_actions(&self) -> usize;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the starting state
    fn reset(&mut self) -> usize;

    /// Update the environment in response to an action taken by an agent
    ///
    /// **Returns** `(next_state, reward, done)`
    fn step(&mut self, action: usize) -> (usize, f64, bool);
}
