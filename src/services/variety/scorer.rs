use std::collections::HashSet;

/// Jaccard similarity of two fingerprint sets, 0 when either is empty
pub fn overlap(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f64 / union as f64
}

/// Freshness of a candidate against recent history, in [0, 1].
///
/// History is ordered most recent first. Route `i` in the history weighs
/// `decay^i`, so repeating yesterday's walk costs more than repeating last
/// month's.
#[derive(Debug, Clone, Copy)]
pub struct VarietyScorer {
    decay: f64,
}

impl VarietyScorer {
    pub fn new(decay: f64) -> Self {
        VarietyScorer { decay }
    }

    pub fn score(&self, candidate: &[String], history: &[Vec<String>]) -> f64 {
        if history.is_empty() {
            return 1.0;
        }

        let mut weighted_overlap = 0.0;
        let mut total_weight = 0.0;
        let mut weight = 1.0;

        for past in history {
            weighted_overlap += overlap(candidate, past) * weight;
            total_weight += weight;
            weight *= self.decay;
        }

        let average = weighted_overlap / total_weight;
        (1.0 - average).max(0.0)
    }
}
