use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds a piecewise-linear time history defined by (time, value) pairs
///
/// The value is linearly interpolated between consecutive pairs and clamped to
/// the first (last) value before (after) the defined time range.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct History {
    /// Holds the times in strictly increasing order
    pub times: Vec<f64>,

    /// Holds the values corresponding to each time
    pub values: Vec<f64>,
}

impl History {
    /// Allocates a new instance
    pub fn new(times: &[f64], values: &[f64]) -> Result<Self, StrError> {
        let history = History {
            times: times.to_vec(),
            values: values.to_vec(),
        };
        history.validate()?;
        Ok(history)
    }

    /// Returns a history with a constant value
    pub fn constant(value: f64) -> Self {
        History {
            times: vec![0.0],
            values: vec![value],
        }
    }

    /// Returns a history growing linearly from zero at t = 0 to `value` at t = 1
    pub fn ramp(value: f64) -> Self {
        History {
            times: vec![0.0, 1.0],
            values: vec![0.0, value],
        }
    }

    /// Checks the consistency of the data (e.g., after deserialization)
    pub fn validate(&self) -> Result<(), StrError> {
        if self.times.is_empty() {
            return Err("history must have at least one (time, value) pair");
        }
        if self.times.len() != self.values.len() {
            return Err("history must have the same number of times and values");
        }
        for i in 1..self.times.len() {
            if self.times[i] <= self.times[i - 1] {
                return Err("history times must be strictly increasing");
            }
        }
        Ok(())
    }

    /// Returns the interpolated value at time t
    pub fn value(&self, t: f64) -> f64 {
        let n = self.times.len();
        if t <= self.times[0] {
            return self.values[0];
        }
        if t >= self.times[n - 1] {
            return self.values[n - 1];
        }
        let i = match self.times.binary_search_by(|probe| probe.total_cmp(&t)) {
            Ok(i) => return self.values[i],
            Err(i) => i, // times[i-1] < t < times[i]
        };
        let (t0, t1) = (self.times[i - 1], self.times[i]);
        let (v0, v1) = (self.values[i - 1], self.values[i]);
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::History;
    use russell_lab::approx_eq;

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            History::new(&[], &[]).err(),
            Some("history must have at least one (time, value) pair")
        );
        assert_eq!(
            History::new(&[0.0, 1.0], &[0.0]).err(),
            Some("history must have the same number of times and values")
        );
        assert_eq!(
            History::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).err(),
            Some("history times must be strictly increasing")
        );
    }

    #[test]
    fn value_works() {
        let h = History::new(&[0.0, 1.0, 3.0], &[0.0, 10.0, 30.0]).unwrap();
        assert_eq!(h.value(-1.0), 0.0);
        assert_eq!(h.value(0.0), 0.0);
        approx_eq(h.value(0.25), 2.5, 1e-15);
        assert_eq!(h.value(1.0), 10.0);
        approx_eq(h.value(2.0), 20.0, 1e-15);
        assert_eq!(h.value(3.0), 30.0);
        assert_eq!(h.value(5.0), 30.0);

        let c = History::constant(7.0);
        assert_eq!(c.value(0.0), 7.0);
        assert_eq!(c.value(100.0), 7.0);

        let r = History::ramp(2.0);
        approx_eq(r.value(0.5), 1.0, 1e-15);
    }

    #[test]
    fn deserialize_works() {
        let h: History = serde_json::from_str(r#"{"times":[0.0,2.0],"values":[1.0,3.0]}"#).unwrap();
        h.validate().unwrap();
        approx_eq(h.value(1.0), 2.0, 1e-15);
    }
}
