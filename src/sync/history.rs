use std::collections::VecDeque;

pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationPoint {
    pub move_index: usize,
    pub evaluation: f64,
}

/// Rolling window of evaluations that feeds the chart
///
/// Holds at most [`HISTORY_CAPACITY`] points; appending past it evicts the oldest.
#[derive(Debug, Clone)]
pub struct EvaluationHistory {
    points: VecDeque<EvaluationPoint>,
    capacity: usize,
}

impl Default for EvaluationHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl EvaluationHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, move_index: usize, evaluation: f64) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(EvaluationPoint {
            move_index,
            evaluation,
        });
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Chart labels and values, as two parallel sequences
    pub fn series(&self) -> (Vec<usize>, Vec<f64>) {
        self.points
            .iter()
            .map(|p| (p.move_index, p.evaluation))
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_exceeds_capacity() {
        let mut history = EvaluationHistory::default();
        for i in 0..120 {
            history.push(i, i as f64 / 10.0);
            assert!(history.len() <= HISTORY_CAPACITY);
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn fifty_first_point_evicts_the_oldest() {
        let mut history = EvaluationHistory::default();
        for i in 1..=51 {
            history.push(i, i as f64);
        }
        let (labels, values) = history.series();
        assert_eq!(labels, (2..=51).collect::<Vec<_>>());
        assert_eq!(values.first(), Some(&2.0));
        assert_eq!(values.last(), Some(&51.0));
    }

    #[test]
    fn clear_empties_both_series() {
        let mut history = EvaluationHistory::default();
        history.push(2, 0.3);
        history.push(4, -0.1);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.series(), (Vec::new(), Vec::new()));
    }
}
