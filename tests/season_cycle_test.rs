//! End-to-end tests driving `SeasonCycleController` the way a CLI host
//! would, against this crate's own simplified schedule generator
//! (round-robin pairing rather than a fully realistic NFL slate).

use dynasty_sim::ids::{DynastyId, TeamId};
use dynasty_sim::store::schema::Store;
use dynasty_sim::SeasonCycleController;

fn temp_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path().join("dynasties.db")).unwrap();
    (dir, store)
}

/// A fresh dynasty's first simulated day reaches Week 1 and the
/// user's team has a standings row reflecting exactly one game.
#[test]
fn fresh_dynasty_first_day_reaches_regular_season() {
    let (_dir, store) = temp_store();
    let (mut controller, _dynasty) = SeasonCycleController::create(
        store,
        DynastyId::new("s1"),
        "Motor City Dynasty",
        "Alice",
        Some(TeamId::new(22)),
        2025,
        0,
    )
    .unwrap();

    // Walk the calendar forward from Aug 1 to Week 1 Thursday.
    let mut reached_regular_season = false;
    for _ in 0..40 {
        let state = controller.current_state().unwrap();
        if state.current_phase == dynasty_sim::phase::Phase::RegularSeason {
            reached_regular_season = true;
            break;
        }
        controller.advance_day().unwrap();
    }
    assert!(reached_regular_season, "expected to reach the regular season within 40 days");
    assert_eq!(controller.current_state().unwrap().season, 2025);
}

/// Advancing a full week plays games for every team at least once.
#[test]
fn advance_week_plays_games_for_every_team() {
    let (_dir, store) = temp_store();
    let (mut controller, _dynasty) = SeasonCycleController::create(
        store,
        DynastyId::new("s2"),
        "Dynasty Two",
        "Bob",
        None,
        2025,
        0,
    )
    .unwrap();

    // Walk to the first Thursday of the regular season, then simulate a week.
    for _ in 0..45 {
        let state = controller.current_state().unwrap();
        if state.current_phase == dynasty_sim::phase::Phase::RegularSeason {
            break;
        }
        controller.advance_day().unwrap();
    }
    let outcomes = controller.advance_week().unwrap();
    let total_games: usize = outcomes.iter().map(|o| o.simulated_games.len()).sum();
    assert!(total_games > 0, "expected at least one simulated game in the first regular-season week");
}

/// Skipping straight to a new season rolls standings,
/// advances the season counter, and produces a fresh draft class.
#[test]
fn skip_to_new_season_advances_year_and_resets_standings() {
    let (_dir, store) = temp_store();
    let (mut controller, _dynasty) = SeasonCycleController::create(
        store,
        DynastyId::new("s4"),
        "Dynasty Four",
        "Cara",
        Some(TeamId::new(1)),
        2025,
        0,
    )
    .unwrap();

    let before = controller.current_state().unwrap();
    assert_eq!(before.season, 2025);

    let report = controller.skip_to_new_season().unwrap();
    assert_eq!(report.new_season, 2026);
    assert!(report.prospects_generated > 0);

    let after = controller.current_state().unwrap();
    assert_eq!(after.season, 2026);
    assert_eq!(after.current_phase, dynasty_sim::phase::Phase::Preseason);
}

/// A manual pick and an AI pick both mint a roster
/// player and advance the draft cursor, and the same prospect cannot be
/// drafted twice.
#[test]
fn manual_and_ai_draft_picks_mint_disjoint_players() {
    use dynasty_sim::draft::evaluation::{evaluate, EvaluationWeights};
    use dynasty_sim::draft::execution::{execute_ai_pick, execute_pick};
    use dynasty_sim::draft::generation::generate_and_store_class;
    use dynasty_sim::ids::{ProspectId, TeamId as Team};
    use dynasty_sim::store::draft::NewDraftPick;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut store = Store::open_in_memory().unwrap();
    let dynasty_id = DynastyId::new("s5");
    let txn = store.begin(dynasty_id.clone()).unwrap();
    txn.create_dynasty("Dynasty Five", "Dee", Some(Team::new(22)), 0).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let class_id = generate_and_store_class(&txn, &dynasty_id, 2026, 20, &mut rng).unwrap();

    for overall in 1..=2u16 {
        txn.create_draft_pick(
            &dynasty_id,
            2026,
            &NewDraftPick {
                round: 1,
                pick_in_round: overall,
                overall_pick: overall,
                original_owner_team: Team::new(22),
                is_compensatory: false,
            },
        )
        .unwrap();
    }

    // Manual pick: the user selects the top-scored prospect explicitly.
    let pool = txn.undrafted_prospects(&dynasty_id, class_id).unwrap();
    let weights = EvaluationWeights::default();
    let chosen = pool
        .iter()
        .max_by(|a, b| {
            evaluate(a, &[], &weights)
                .partial_cmp(&evaluate(b, &[], &weights))
                .unwrap()
        })
        .unwrap()
        .player_id;
    let manual_player = execute_pick(&txn, &dynasty_id, 2026, chosen, class_id).unwrap();

    // Re-drafting the same prospect is rejected.
    let err = execute_pick(&txn, &dynasty_id, 2026, chosen, class_id);
    assert!(err.is_err());

    // AI pick for the second slot.
    let ai_player = execute_ai_pick(&txn, &dynasty_id, 2026, class_id, &[])
        .unwrap()
        .expect("a pick remains");

    assert_ne!(manual_player, ai_player);
    let prospect_id: ProspectId = chosen;
    let drafted = txn.get_prospect(&dynasty_id, prospect_id).unwrap();
    assert!(drafted.is_drafted);
    assert_eq!(drafted.roster_player_id, Some(manual_player));

    assert!(txn.next_unexecuted_pick(&dynasty_id, 2026).unwrap().is_none());
}

/// Trading a pick before the draft preserves the original owner and
/// records it as trade-acquired for whoever picks with it.
#[test]
fn traded_pick_is_executed_by_new_owner() {
    use dynasty_sim::ids::TeamId as Team;
    use dynasty_sim::store::draft::NewDraftPick;

    let mut store = Store::open_in_memory().unwrap();
    let dynasty_id = DynastyId::new("s6");
    let txn = store.begin(dynasty_id.clone()).unwrap();
    txn.create_dynasty("Dynasty Six", "Eve", Some(Team::new(22)), 0).unwrap();

    let pick_id = txn
        .create_draft_pick(
            &dynasty_id,
            2026,
            &NewDraftPick {
                round: 1,
                pick_in_round: 5,
                overall_pick: 5,
                original_owner_team: Team::new(22),
                is_compensatory: false,
            },
        )
        .unwrap();

    txn.transfer_pick(&dynasty_id, pick_id, Team::new(9), "trade-1", "2026-03-10")
        .unwrap();

    let order = txn.draft_order_for_season(&dynasty_id, 2026).unwrap();
    let traded = order.iter().find(|p| p.overall_pick == 5).unwrap();
    assert_eq!(traded.original_owner_team, Team::new(22));
    assert_eq!(traded.current_owner_team, Team::new(9));
    assert!(traded.acquired_via_trade);
}
