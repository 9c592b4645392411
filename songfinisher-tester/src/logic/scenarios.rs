//! Scenario catalogue driven against seeded game sessions.

use anyhow::{Context, Result, ensure};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::convert::TryFrom;

use songfinisher_game::{
    Catalog, ChallengeOutcome, CharacterId, Direction, GameSession, Position, RewardKind,
    RewardOutcome, TickOutcome, TimerState, Zone,
};

const CARD_SAMPLE_SIZE: usize = 4000;
const CARD_TOLERANCE: f64 = 0.05;
const RANDOM_WALK_STEPS: usize = 500;
const DEDUP_ROUNDS: usize = 40;

/// Inputs shared by every scenario run.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx {
    pub seed: u64,
    pub character: CharacterId,
}

impl ScenarioCtx {
    fn session(self) -> Result<GameSession> {
        let mut session = GameSession::with_seed(Catalog::builtin(), self.seed);
        ensure!(
            session.select_character(self.character.as_str()),
            "character {} missing from catalog",
            self.character
        );
        Ok(session)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TestScenario {
    pub key: &'static str,
    pub description: &'static str,
    pub run: fn(ScenarioCtx) -> Result<()>,
}

const SCENARIOS: &[TestScenario] = &[
    TestScenario {
        key: "smoke",
        description: "Fresh session, one roll and one draw",
        run: smoke,
    },
    TestScenario {
        key: "zone-tour",
        description: "Visit and clear every elemental zone",
        run: zone_tour,
    },
    TestScenario {
        key: "timer-expiry",
        description: "Let a challenge run out and confirm it is forfeited",
        run: timer_expiry,
    },
    TestScenario {
        key: "reward-resolution",
        description: "Each completion pays the reward its challenge names",
        run: reward_resolution,
    },
    TestScenario {
        key: "achievement-dedup",
        description: "Repeated achievement challenges unlock once",
        run: achievement_dedup,
    },
    TestScenario {
        key: "card-distribution",
        description: "Card draws stay uniform over the deck",
        run: card_distribution,
    },
    TestScenario {
        key: "zone-interrupt",
        description: "Entering a new zone abandons the unfinished challenge",
        run: zone_interrupt,
    },
    TestScenario {
        key: "random-walk",
        description: "Random inputs never break session invariants",
        run: random_walk,
    },
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.description)).collect()
}

#[must_use]
pub fn all_scenario_keys() -> Vec<String> {
    SCENARIOS.iter().map(|s| s.key.to_string()).collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<TestScenario> {
    SCENARIOS.iter().copied().find(|s| s.key == key)
}

const fn corner(zone: Zone) -> Position {
    match zone {
        Zone::Earth => Position::new(0, 0),
        Zone::Water => Position::new(10, 0),
        Zone::Air => Position::new(0, 10),
        Zone::Fire => Position::new(10, 10),
        Zone::Neutral => Position::new(5, 5),
    }
}

fn check(session: &GameSession) -> Result<()> {
    session
        .check_invariants()
        .context("invariant check failed")
}

fn smoke(ctx: ScenarioCtx) -> Result<()> {
    let mut session = ctx.session()?;
    ensure!(session.position() == Position::new(5, 5), "bad start cell");
    ensure!(session.zone() == Zone::Neutral, "start is not neutral");
    let roll = session.roll_die();
    ensure!((1..=6).contains(&roll), "die rolled {roll}");
    ensure!(session.momentum() == 0, "die roll changed momentum");
    let card = session.draw_card().context("deck is empty")?;
    ensure!(session.cards().is_empty(), "plain draw {} entered hand", card.id);
    check(&session)
}

fn zone_tour(ctx: ScenarioCtx) -> Result<()> {
    let mut session = ctx.session()?;
    for zone in Zone::ELEMENTAL {
        session.move_to(Position::new(5, 5));
        let outcome = session.move_to(corner(zone));
        let challenge = outcome
            .challenge
            .with_context(|| format!("no challenge issued in {zone}"))?;
        ensure!(
            session.catalog().challenge(&challenge.id).map(|(z, _)| z) == Some(zone),
            "challenge {} does not belong to {zone}",
            challenge.id
        );
        ensure!(
            session.time_remaining() == challenge.time_limit,
            "timer not set to {}s",
            challenge.time_limit
        );
        session
            .complete_challenge()
            .with_context(|| format!("{} could not be completed", challenge.id))?;
        check(&session)?;
    }
    let completed = session
        .history()
        .iter()
        .filter(|r| r.outcome == ChallengeOutcome::Completed)
        .count();
    ensure!(completed == 4, "expected 4 completions, saw {completed}");
    Ok(())
}

fn timer_expiry(ctx: ScenarioCtx) -> Result<()> {
    let mut session = ctx.session()?;
    let mut rng = SmallRng::seed_from_u64(ctx.seed);
    let zone = Zone::ELEMENTAL[rng.gen_range(0..Zone::ELEMENTAL.len())];
    session.move_to(corner(zone));
    let limit = session
        .active_challenge()
        .map(|c| c.time_limit)
        .context("no challenge issued")?;

    let mut ticks = 0;
    while session.tick() != TickOutcome::Expired {
        ticks += 1;
        ensure!(ticks <= limit, "timer ran past its {limit}s limit");
    }
    ensure!(ticks + 1 == limit, "expired after {} ticks", ticks + 1);
    ensure!(
        session.timer().state() == TimerState::Expired,
        "timer not expired"
    );
    ensure!(
        session.complete_challenge().is_none(),
        "expired challenge was completed"
    );
    check(&session)
}

fn reward_resolution(ctx: ScenarioCtx) -> Result<()> {
    let mut session = ctx.session()?;
    for zone in Zone::ELEMENTAL {
        session.move_to(Position::new(5, 5));
        session.move_to(corner(zone));
        let momentum_before = session.momentum();
        let resolution = session
            .complete_challenge()
            .context("no challenge to complete")?;
        match (resolution.challenge.reward, &resolution.reward) {
            (RewardKind::Momentum, RewardOutcome::Momentum { total }) => {
                ensure!(*total > momentum_before, "momentum did not grow");
            }
            (RewardKind::Card, RewardOutcome::Card(card)) => {
                ensure!(session.cards().contains(&card.id), "card not held");
            }
            (RewardKind::Achievement, RewardOutcome::Achievement { id, .. }) => {
                ensure!(
                    session.achievements().contains(id),
                    "achievement {id} missing"
                );
            }
            (kind, reward) => anyhow::bail!("{kind:?} challenge paid {reward:?}"),
        }
        ensure!(
            session.active_challenge().is_none(),
            "challenge still active"
        );
        check(&session)?;
    }
    Ok(())
}

fn achievement_dedup(ctx: ScenarioCtx) -> Result<()> {
    let mut session = ctx.session()?;
    for round in 0..DEDUP_ROUNDS {
        let zone = Zone::ELEMENTAL[round % Zone::ELEMENTAL.len()];
        session.move_to(Position::new(5, 5));
        session.move_to(corner(zone));
        session.complete_challenge();
        check(&session)?;
    }
    for id in session.achievements() {
        let (_, challenge) = session
            .catalog()
            .challenge(id)
            .with_context(|| format!("unknown achievement {id}"))?;
        ensure!(
            challenge.reward == RewardKind::Achievement,
            "{id} is not an achievement challenge"
        );
    }
    Ok(())
}

fn card_distribution(ctx: ScenarioCtx) -> Result<()> {
    let mut session = ctx.session()?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..CARD_SAMPLE_SIZE {
        let card = session.draw_card().context("deck is empty")?;
        *counts.entry(card.id).or_default() += 1;
    }
    let deck = session.catalog().cards.len();
    ensure!(counts.len() == deck, "only {} of {deck} cards drawn", counts.len());
    let expected = 1.0 / f64::from(u32::try_from(deck)?);
    let total = f64::from(u32::try_from(CARD_SAMPLE_SIZE)?);
    for (id, count) in counts {
        let observed = f64::from(u32::try_from(count)?) / total;
        ensure!(
            (observed - expected).abs() <= CARD_TOLERANCE,
            "card {id} drawn at {observed:.3}, expected {expected:.3}"
        );
    }
    Ok(())
}

fn zone_interrupt(ctx: ScenarioCtx) -> Result<()> {
    let mut session = ctx.session()?;
    let mut rng = SmallRng::seed_from_u64(ctx.seed);
    let first = Zone::ELEMENTAL[rng.gen_range(0..Zone::ELEMENTAL.len())];
    let second = Zone::ELEMENTAL
        .into_iter()
        .find(|z| *z != first)
        .context("need two zones")?;

    session.move_to(corner(first));
    let abandoned = session
        .active_challenge()
        .cloned()
        .context("no challenge in first zone")?;
    session.tick();
    session.move_to(corner(second));

    let record = session.history().last().context("no history record")?;
    ensure!(
        record.challenge_id == abandoned.id && record.outcome == ChallengeOutcome::Abandoned,
        "expected {} abandoned, got {record:?}",
        abandoned.id
    );
    let active = session.active_challenge().context("no replacement")?;
    ensure!(
        session.catalog().challenge(&active.id).map(|(z, _)| z) == Some(second),
        "replacement not from {second}"
    );
    ensure!(
        session.time_remaining() == active.time_limit,
        "replacement timer not fresh"
    );
    check(&session)
}

fn random_walk(ctx: ScenarioCtx) -> Result<()> {
    let mut session = ctx.session()?;
    let mut rng = SmallRng::seed_from_u64(ctx.seed ^ 0x5F5F_5F5F);
    for step in 0..RANDOM_WALK_STEPS {
        match rng.gen_range(0..8) {
            0..=2 => {
                session.step(Direction::ALL[rng.gen_range(0..Direction::ALL.len())]);
            }
            3 => {
                session.move_to(Position::new(rng.gen_range(-2..13), rng.gen_range(-2..13)));
            }
            4 => {
                session.complete_challenge();
            }
            5 => {
                session.roll_die();
            }
            6 => {
                session.draw_card();
            }
            _ => {
                for _ in 0..rng.gen_range(1..90) {
                    session.tick();
                }
            }
        }
        session
            .check_invariants()
            .with_context(|| format!("after step {step}"))?;
    }
    Ok(())
}
