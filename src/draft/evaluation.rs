//! Prospect evaluation: scores a prospect against a team's roster needs so
//! an AI-controlled team's pick can be chosen automatically.

use crate::store::draft::{DraftProspect, ScoutingConfidence};

/// One team's need at a position, 1 (no need) to 5 (must address).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamNeed {
    pub position: &'static str,
    pub urgency: u8,
}

/// How `evaluate` weighs scouted talent against positional need.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationWeights {
    pub talent_weight: f64,
    pub need_weight: f64,
    pub risk_penalty: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            talent_weight: 1.0,
            need_weight: 6.0,
            risk_penalty: 4.0,
        }
    }
}

fn confidence_uncertainty(confidence: ScoutingConfidence) -> f64 {
    match confidence {
        ScoutingConfidence::High => 0.1,
        ScoutingConfidence::Medium => 0.35,
        ScoutingConfidence::Low => 0.75,
    }
}

fn urgency_for(needs: &[TeamNeed], position: &str) -> u8 {
    needs
        .iter()
        .find(|n| n.position == position)
        .map(|n| n.urgency)
        .unwrap_or(1)
}

/// score(prospect, needs, weights) = talent_weight * scouted_overall
///   + need_weight * (urgency - 1)
///   - risk_penalty * uncertainty(scouting_confidence)
///
/// Higher is better. Only the prospect's *scouted* overall feeds the
/// score — the true overall is hidden from team decision-making exactly as
/// it is from a human GM, and only surfaces once a prospect is drafted.
pub fn evaluate(prospect: &DraftProspect, needs: &[TeamNeed], weights: &EvaluationWeights) -> f64 {
    let urgency = urgency_for(needs, &prospect.position);
    weights.talent_weight * prospect.scouted_overall as f64
        + weights.need_weight * (urgency as f64 - 1.0)
        - weights.risk_penalty * confidence_uncertainty(prospect.scouting_confidence)
}

/// Picks the highest-scoring undrafted prospect, or `None` if the pool is
/// empty. Ties break toward the lexically earlier (last_name, first_name)
/// pair so automated evaluation is reproducible across runs.
pub fn best_available<'a>(
    prospects: &'a [DraftProspect],
    needs: &[TeamNeed],
    weights: &EvaluationWeights,
) -> Option<&'a DraftProspect> {
    prospects.iter().max_by(|a, b| {
        let score_a = evaluate(a, needs, weights);
        let score_b = evaluate(b, needs, weights);
        score_a
            .partial_cmp(&score_b)
            .unwrap()
            .then_with(|| b.last_name.cmp(&a.last_name))
            .then_with(|| b.first_name.cmp(&a.first_name))
    })
}
