use crate::models::{Route, RouteCandidate, RouteRequest};

/// Ranks candidates by how well they fit the requested duration, with a
/// bonus for freshness, and promotes the winner to a [`Route`].
pub struct CandidateSelector {
    freshness_weight: f64,
}

impl CandidateSelector {
    pub fn new(freshness_weight: f64) -> Self {
        CandidateSelector { freshness_weight }
    }

    /// `max(0, 1 - |duration - target| / target + freshness * weight)`
    pub fn composite_score(&self, candidate: &RouteCandidate, target_minutes: f64) -> f64 {
        let duration_error = (candidate.duration_minutes - target_minutes).abs() / target_minutes;
        let freshness_bonus = candidate.freshness * self.freshness_weight;
        (1.0 - duration_error + freshness_bonus).max(0.0)
    }

    /// Overwrite every score with the composite score and sort best first.
    /// Equal scores keep proposal order.
    pub fn rank(&self, candidates: &mut [RouteCandidate], target_minutes: f64) {
        for candidate in candidates.iter_mut() {
            candidate.score = self.composite_score(candidate, target_minutes);
        }
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    pub fn select(&self, mut candidates: Vec<RouteCandidate>, request: &RouteRequest) -> Option<Route> {
        if candidates.is_empty() {
            return None;
        }

        self.rank(&mut candidates, request.target_duration_minutes);
        let best = candidates.swap_remove(0);

        tracing::debug!(
            score = best.score,
            freshness = best.freshness,
            "Selected candidate: {:.2}km, {:.1}min (target {}min)",
            best.distance_km,
            best.duration_minutes,
            request.target_duration_minutes
        );

        Some(Route::from_candidate(best, request.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, PaceSetting};

    fn candidate(duration_minutes: f64, freshness: f64) -> RouteCandidate {
        let start = Coordinates::new(51.5074, -0.1278).unwrap();
        RouteCandidate {
            coordinates: vec![start, Coordinates::new(51.51, -0.12).unwrap(), start],
            distance_km: duration_minutes / 12.0,
            duration_minutes,
            fingerprints: vec![format!("fp-{}", duration_minutes)],
            freshness,
            score: freshness,
        }
    }

    fn request(target: f64) -> RouteRequest {
        RouteRequest::new(
            Coordinates::new(51.5074, -0.1278).unwrap(),
            target,
            PaceSetting::default(),
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn empty_candidates_select_nothing() {
        let selector = CandidateSelector::new(0.3);
        assert!(selector.select(vec![], &request(30.0)).is_none());
    }

    #[test]
    fn exact_duration_beats_double_duration() {
        let selector = CandidateSelector::new(0.3);
        let exact = candidate(30.0, 1.0);
        let double = candidate(60.0, 1.0);

        assert!((selector.composite_score(&exact, 30.0) - 1.3).abs() < 1e-12);
        // 1 - 1 + 0.3
        assert!((selector.composite_score(&double, 30.0) - 0.3).abs() < 1e-12);

        let route = selector.select(vec![double, exact], &request(30.0)).unwrap();
        assert_eq!(route.duration_minutes, 30.0);
    }

    #[test]
    fn freshness_breaks_near_ties() {
        let selector = CandidateSelector::new(0.3);
        let stale = candidate(30.0, 0.0);
        let fresh = candidate(31.0, 1.0);

        let route = selector.select(vec![stale, fresh], &request(30.0)).unwrap();
        assert_eq!(route.duration_minutes, 31.0);
    }

    #[test]
    fn score_is_floored_at_zero() {
        let selector = CandidateSelector::new(0.3);
        assert_eq!(selector.composite_score(&candidate(300.0, 0.0), 30.0), 0.0);
    }

    #[test]
    fn ties_keep_proposal_order() {
        let selector = CandidateSelector::new(0.3);
        let mut first = candidate(30.0, 0.5);
        first.fingerprints = vec!["first".to_string()];
        let mut second = candidate(30.0, 0.5);
        second.fingerprints = vec!["second".to_string()];

        let mut ranked = vec![first, second];
        selector.rank(&mut ranked, 30.0);
        assert_eq!(ranked[0].fingerprints, vec!["first".to_string()]);
        assert_eq!(ranked[0].score, ranked[1].score);
    }

    #[test]
    fn selected_route_carries_candidate_data() {
        let selector = CandidateSelector::new(0.3);
        let req = request(30.0);
        let route = selector.select(vec![candidate(30.0, 1.0)], &req).unwrap();

        assert_eq!(route.start_point, req.start);
        assert_eq!(route.fingerprints, vec!["fp-30".to_string()]);
        assert!(!route.is_favorite);
    }
}
