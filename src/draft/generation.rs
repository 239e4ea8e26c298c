//! Generates a draft class's prospect pool and a season's pick order.
//!
//! Builds a fresh scouting class every offseason from position-distribution
//! weights and per-archetype attribute spreads, using `rand`'s
//! `Rng`/distribution traits rather than hand-rolled weighted sampling.

use rand::Rng;
use serde_json::json;

use crate::error::Result;
use crate::ids::{DynastyId, TeamId};
use crate::store::draft::{DraftClassId, NewDraftPick, NewDraftProspect, ScoutingConfidence};
use crate::store::txn::Txn;

/// Position weights for a 300-prospect class, roughly mirroring actual NFL
/// draft-class composition. Skill positions are the most plentiful; the
/// round totals don't need to sum exactly to the target size since the
/// caller rounds.
const POSITION_WEIGHTS: &[(&str, u32)] = &[
    ("QB", 12),
    ("RB", 22),
    ("WR", 36),
    ("TE", 18),
    ("OT", 20),
    ("OG", 18),
    ("C", 10),
    ("EDGE", 26),
    ("DT", 22),
    ("LB", 28),
    ("CB", 34),
    ("S", 24),
    ("K", 4),
    ("P", 4),
];

const ARCHETYPES: &[&str] = &[
    "Speed Rusher",
    "Power Back",
    "Field General",
    "Shutdown Corner",
    "Possession Receiver",
    "Pass Protector",
    "Run Stopper",
    "Hybrid Athlete",
];

const DEVELOPMENT_CURVES: &[&str] = &["Early", "Standard", "Late", "Boom-Bust"];
const COLLEGES: &[&str] = &[
    "Ohio State",
    "Alabama",
    "Georgia",
    "Michigan",
    "Texas",
    "LSU",
    "Oregon",
    "Clemson",
    "Penn State",
    "Florida State",
    "Notre Dame",
    "USC",
];

fn weighted_position(rng: &mut impl Rng) -> &'static str {
    let total: u32 = POSITION_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (position, weight) in POSITION_WEIGHTS {
        if roll < *weight {
            return position;
        }
        roll -= weight;
    }
    POSITION_WEIGHTS.last().unwrap().0
}

fn scouting_confidence_for(rng: &mut impl Rng) -> ScoutingConfidence {
    match rng.gen_range(0..3) {
        0 => ScoutingConfidence::Low,
        1 => ScoutingConfidence::Medium,
        _ => ScoutingConfidence::High,
    }
}

/// Builds `count` prospects with randomized but plausible attributes.
/// `rng` is caller-supplied so tests and the CLI can choose between a
/// seeded (reproducible) and OS-entropy source.
pub fn generate_prospects(count: u16, rng: &mut impl Rng) -> Vec<NewDraftProspect> {
    (0..count)
        .map(|_| {
            let position = weighted_position(rng);
            let true_overall = rng.gen_range(45..=95);
            let confidence = scouting_confidence_for(rng);
            let noise: i16 = match confidence {
                ScoutingConfidence::High => rng.gen_range(-3..=3),
                ScoutingConfidence::Medium => rng.gen_range(-8..=8),
                ScoutingConfidence::Low => rng.gen_range(-18..=18),
            };
            let scouted_overall = (true_overall as i16 + noise).clamp(30, 99) as u8;
            let projected_pick_min = rng.gen_range(1..=220u16);
            let spread = rng.gen_range(5..=40u16);

            NewDraftProspect {
                first_name: random_first_name(rng).to_string(),
                last_name: random_last_name(rng).to_string(),
                position: position.to_string(),
                age: rng.gen_range(20..=23),
                true_overall,
                scouted_overall,
                scouting_confidence: confidence,
                projected_pick_min,
                projected_pick_max: (projected_pick_min + spread).min(262),
                college: COLLEGES[rng.gen_range(0..COLLEGES.len())].to_string(),
                archetype: ARCHETYPES[rng.gen_range(0..ARCHETYPES.len())].to_string(),
                development_curve: DEVELOPMENT_CURVES[rng.gen_range(0..DEVELOPMENT_CURVES.len())]
                    .to_string(),
                attributes: json!({
                    "speed": rng.gen_range(50..=99),
                    "strength": rng.gen_range(50..=99),
                    "agility": rng.gen_range(50..=99),
                    "awareness": rng.gen_range(40..=95),
                }),
            }
        })
        .collect()
}

const FIRST_NAMES: &[&str] = &[
    "James", "Marcus", "Devon", "Tyler", "Malik", "Jordan", "Cameron", "Isaiah", "Xavier", "Caleb",
    "Elijah", "Austin", "Trevor", "Dominic", "Brandon",
];
const LAST_NAMES: &[&str] = &[
    "Johnson", "Williams", "Brown", "Davis", "Wilson", "Moore", "Taylor", "Anderson", "Thomas",
    "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia",
];

fn random_first_name(rng: &mut impl Rng) -> &'static str {
    FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())]
}

fn random_last_name(rng: &mut impl Rng) -> &'static str {
    LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())]
}

/// Persist a full prospect pool under a new draft class for `season`.
pub fn generate_and_store_class(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    prospect_count: u16,
    rng: &mut impl Rng,
) -> Result<DraftClassId> {
    let class_id = txn.create_draft_class(dynasty_id, season, prospect_count)?;
    for prospect in generate_prospects(prospect_count, rng) {
        txn.insert_prospect(dynasty_id, class_id, &prospect)?;
    }
    Ok(class_id)
}

/// Builds a standard 7-round, 32-team pick order (no compensatory picks).
/// `draft_position` maps each team to its 1..=32 slot, typically inverse to
/// the prior season's standings (worst record picks first).
pub fn generate_standard_pick_order(
    txn: &Txn<'_>,
    dynasty_id: &DynastyId,
    season: u16,
    draft_position: &[TeamId],
) -> Result<()> {
    let mut overall = 1u16;
    for round in 1..=7u8 {
        for (slot, team_id) in draft_position.iter().enumerate() {
            txn.create_draft_pick(
                dynasty_id,
                season,
                &NewDraftPick {
                    round,
                    pick_in_round: (slot + 1) as u16,
                    overall_pick: overall,
                    original_owner_team: *team_id,
                    is_compensatory: false,
                },
            )?;
            overall += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::Store;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_prospects_have_plausible_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let prospects = generate_prospects(50, &mut rng);
        assert_eq!(prospects.len(), 50);
        for p in &prospects {
            assert!(p.true_overall >= 45 && p.true_overall <= 95);
            assert!(p.age >= 20 && p.age <= 23);
            assert!(p.projected_pick_max >= p.projected_pick_min);
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let a = generate_prospects(10, &mut rng_a);
        let b = generate_prospects(10, &mut rng_b);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.true_overall, y.true_overall);
            assert_eq!(x.position, y.position);
        }
    }

    #[test]
    fn standard_pick_order_has_224_picks_in_overall_order() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();

        let order: Vec<TeamId> = (1..=32).map(TeamId::new).collect();
        generate_standard_pick_order(&txn, &dynasty_id, 2026, &order).unwrap();

        let picks = txn.draft_order_for_season(&dynasty_id, 2026).unwrap();
        assert_eq!(picks.len(), 224);
        assert_eq!(picks[0].overall_pick, 1);
        assert_eq!(picks[0].original_owner_team, TeamId::new(1));
        assert_eq!(picks[223].overall_pick, 224);
    }

    #[test]
    fn generate_and_store_class_persists_requested_count() {
        let mut store = Store::open_in_memory().unwrap();
        let dynasty_id = DynastyId::new("d1");
        let txn = store.begin(dynasty_id.clone()).unwrap();
        txn.create_dynasty("D", "Owner", None, 0).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let class_id = generate_and_store_class(&txn, &dynasty_id, 2026, 30, &mut rng).unwrap();
        let prospects = txn.undrafted_prospects(&dynasty_id, class_id).unwrap();
        assert_eq!(prospects.len(), 30);
    }
}
