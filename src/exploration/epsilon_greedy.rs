use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
///
/// The random source is passed in by the caller so that a seeded generator
/// produces a reproducible sequence of choices.
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// Epsilon threshold at episode `episode`
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.epsilon.evaluate(episode as f64)
    }

    /// Invoke epsilon greedy policy for the current episode
    ///
    /// Draws from `rng` exactly once.
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        if rng.gen::<f64>() < self.epsilon(episode) {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay;

    #[test]
    fn zero_epsilon_always_exploits() {
        let policy = EpsilonGreedy::new(decay::Constant::new(0.0));
        let mut rng = StdRng::seed_from_u64(0);
        for episode in 0..100 {
            assert!(matches!(policy.choose(episode, &mut rng), Choice::Exploit));
        }
    }

    #[test]
    fn full_epsilon_always_explores() {
        let policy = EpsilonGreedy::new(decay::Constant::new(1.0));
        let mut rng = StdRng::seed_from_u64(0);
        for episode in 0..100 {
            assert!(matches!(policy.choose(episode, &mut rng), Choice::Explore));
        }
    }

    #[test]
    fn epsilon_follows_decay() {
        let policy = EpsilonGreedy::new(decay::Linear::over(10, 1.0, 0.0).unwrap());
        assert_eq!(policy.epsilon(0), 1.0);
        assert!((policy.epsilon(5) - 0.5).abs() < 1e-12);
        assert_eq!(policy.epsilon(20), 0.0);
    }
}
