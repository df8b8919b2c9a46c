use crate::error::{Error, Result};

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f64) -> f64;
}

fn validate(rate: f64, vi: f64, vf: f64) -> Result<()> {
    ((rate >= 0.0 && vi >= vf) || (rate < 0.0 && vi <= vf))
        .then_some(())
        .ok_or_else(|| Error::InvalidConfiguration {
            message: String::from("`vi - vf` must have the same sign as `rate`"),
        })
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f64) -> f64 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> - rt, v<sub>f</sub>)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linear {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Linear {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }

    /// Construct a schedule that steps from `vi` down to `vf` in `n` equal
    /// decrements, one per unit of `t`
    pub fn over(n: u32, vi: f64, vf: f64) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidConfiguration {
                message: String::from("`n` must be positive"),
            });
        }
        Self::new((vi - vf) / n as f64, vi, vf)
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { rate, vi, vf } = self;
        (vi - rate * t).max(vf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_functional() {
        assert!(validate(1.0, 1.0, 0.0).is_ok());
        assert!(validate(0.0, 0.5, 0.5).is_ok());
        assert!(validate(1.0, -1.0, 0.0).is_err());
        assert!(validate(-1.0, 1.0, 0.0).is_err());
        assert!(validate(-1.0, -1.0, 0.0).is_ok());
    }

    #[test]
    fn constant_decay() {
        let x = Constant::new(1.0);
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(1.0), 1.0);
    }

    #[test]
    fn linear_decay() {
        let x = Linear::new(0.5, 2.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 1.5);
        assert_eq!(x.evaluate(10.0), 0.5);
    }

    #[test]
    fn linear_over_n_steps() {
        let x = Linear::over(10, 1.0, 0.0).unwrap();
        assert_eq!(x.evaluate(0.0), 1.0);
        assert!((x.evaluate(5.0) - 0.5).abs() < 1e-12);
        assert_eq!(x.evaluate(10.0), 0.0);
        assert_eq!(x.evaluate(20.0), 0.0, "clamped at vf");
    }

    #[test]
    fn linear_over_flat_schedule() {
        let x = Linear::over(10, 0.3, 0.3).unwrap();
        assert_eq!(x.evaluate(0.0), 0.3);
        assert_eq!(x.evaluate(100.0), 0.3);
    }

    #[test]
    fn linear_over_zero_steps_rejected() {
        assert!(Linear::over(0, 1.0, 0.0).is_err());
    }
}
