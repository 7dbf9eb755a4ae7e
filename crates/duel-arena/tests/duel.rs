//! End-to-end duel scenarios driven through `Arena::tick`

use std::sync::Arc;

use duel_agent::{KnightAgent, LearningConfig, MemoryStore, PolicySaver, QTable};
use duel_arena::{Arena, ArenaConfig, NullPresentation, Outcome, SparringPartner};
use duel_core::{
    ActionOutcome, AnimationComplete, AnimationCue, AnimationKey, ArmorSlot, AttackKind,
    AttackPhase, BlockPhase, CombatantId, Facing, FailureReason, ImpactReport, InputFrame, RewardEvent,
    Trigger, Vec2,
};

const FRAME: f32 = 16.67;

/// Greedy knight, no reactive shield, so scenarios are scripted end to end
fn config() -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.learning = LearningConfig::greedy();
    config.reactive_block.probability = 0.0;
    config.seed = 7;
    config
}

fn agent(config: &ArenaConfig) -> KnightAgent {
    KnightAgent::new(config.learning.clone(), QTable::new())
}

/// Hero squared up 84 units south of the knight, facing it
fn face_off(mut arena: Arena) -> Arena {
    let knight_at = arena.knight().position;
    let hero = &mut arena.duel_mut().hero;
    hero.position = Vec2::new(knight_at.x, knight_at.y + 84.0);
    hero.facing = Facing::N;
    arena
}

fn headless() -> Arena {
    let config = config();
    let agent = agent(&config);
    face_off(Arena::headless(config, agent).unwrap())
}

fn run(arena: &mut Arena, first: InputFrame, ticks: usize) -> Vec<ImpactReport> {
    let mut impacts = arena.tick(&first, FRAME).impacts;
    for _ in 1..ticks {
        impacts.extend(arena.tick(&InputFrame::idle(), FRAME).impacts);
    }
    impacts
}

#[test]
fn test_vitals_stay_in_bounds_over_scripted_run() {
    let config = ArenaConfig {
        seed: 11,
        ..ArenaConfig::default()
    };
    let bounds = config.bounds;
    let mut arena = Arena::headless(config.clone(), agent(&config)).unwrap();
    let mut partner = SparringPartner::new(3);
    let mut episodes = 0;

    for _ in 0..20_000 {
        let input = partner.next_input(&arena, FRAME);
        let report = arena.tick(&input, FRAME);
        for c in [arena.hero(), arena.knight()] {
            assert!((0.0..=c.max_health).contains(&c.health), "{} health {}", c.id, c.health);
            assert!(
                (0.0..=c.max_stamina).contains(&c.stamina),
                "{} stamina {}",
                c.id,
                c.stamina
            );
            assert!(c.position.x >= bounds.min.x && c.position.x <= bounds.max.x);
            assert!(c.position.y >= bounds.min.y && c.position.y <= bounds.max.y);
            for slot in [ArmorSlot::Helmet, ArmorSlot::Breastplate, ArmorSlot::Greaves] {
                assert!(c.armor.durability(slot) >= 0.0);
            }
        }
        if report.outcome.is_over() {
            episodes += 1;
            arena.reset();
        }
    }
    assert!(arena.agent().stats().decisions > 0);
    assert!(episodes > 0, "the sparring partner should finish at least one duel");
}

#[test]
fn test_sensor_fires_once_per_swing() {
    let mut arena = headless();
    let impacts = run(&mut arena, InputFrame::idle().with_trigger(Trigger::AttackLight), 60);
    let from_hero: Vec<_> = impacts
        .iter()
        .filter(|i| i.attacker == CombatantId::Hero)
        .collect();
    assert_eq!(from_hero.len(), 1);
    assert!(arena.sensors().iter().all(|s| s.origin != CombatantId::Hero));
}

#[test]
fn test_facing_block_absorbs_the_hit() {
    let mut arena = headless();
    {
        let knight = &mut arena.duel_mut().knight;
        knight.block = BlockPhase::BlockMid;
        knight.block_held = true;
    }
    let durability = arena.knight().armor.durability(ArmorSlot::Breastplate);

    let impacts = run(&mut arena, InputFrame::idle().with_trigger(Trigger::AttackHeavy), 10);
    assert_eq!(impacts.len(), 1);
    assert!(impacts[0].blocked);
    assert_eq!(impacts[0].damage, 0.0);
    assert_eq!(arena.knight().health, 50.0);
    assert_eq!(arena.knight().armor.durability(ArmorSlot::Breastplate), durability);
}

#[test]
fn test_short_on_stamina_attack_does_nothing() {
    let mut arena = headless();
    {
        let hero = &mut arena.duel_mut().hero;
        hero.set_stamina(10.0);
        hero.stamina_regen_delay_ms = 10_000.0;
    }
    let report = arena.tick(&InputFrame::idle().with_trigger(Trigger::AttackLight), FRAME);
    assert_eq!(
        report.hero_actions,
        vec![(
            Trigger::AttackLight,
            ActionOutcome::Failure(FailureReason::InsufficientStamina)
        )]
    );
    assert_eq!(arena.hero().stamina, 10.0);
    assert_eq!(arena.hero().attack, AttackPhase::Idle);

    let impacts = run(&mut arena, InputFrame::idle(), 20);
    assert!(impacts.iter().all(|i| i.attacker != CombatantId::Hero));
}

#[test]
fn test_lethal_hit_ends_the_duel_once() {
    let mut arena = headless();
    arena.duel_mut().knight.set_health(12.0);

    let impacts = run(&mut arena, InputFrame::idle().with_trigger(Trigger::Special), 30);
    let deaths: Vec<_> = impacts.iter().filter(|i| i.died).collect();
    assert_eq!(deaths.len(), 1);
    assert_eq!(deaths[0].target, CombatantId::Knight);
    assert_eq!(deaths[0].kind, AttackKind::Special);

    assert_eq!(arena.outcome(), Outcome::HeroWon);
    assert_eq!(arena.knight().health, 0.0);
    assert!(arena.knight().dead);
    assert_eq!(arena.hero().health, 100.0, "simultaneous blows from the dead are dropped");

    let ledger = arena.agent().stats().episode_reward;
    assert_eq!(ledger.component(RewardEvent::Death), -100.0);
    assert_eq!(ledger.component(RewardEvent::DamageTaken), -20.0);
    assert!(arena.agent().last_decision().is_none());
}

#[test]
fn test_exhaustion_drops_the_shield_then_refunds() {
    let mut arena = headless();
    {
        let knight = &mut arena.duel_mut().knight;
        knight.block = BlockPhase::BlockMid;
        knight.block_held = true;
        knight.set_stamina(0.0);
    }

    arena.tick(&InputFrame::idle(), FRAME);
    assert_eq!(arena.knight().block, BlockPhase::Idle);
    assert!(!arena.knight().block_held);
    assert!(arena.knight().block_disabled);

    let mut elapsed = 0.0;
    while arena.knight().block_disabled {
        arena.tick(&InputFrame::idle(), FRAME);
        elapsed += FRAME;
        assert!(elapsed < 1_100.0, "exhaustion must expire");
        if arena.knight().block_disabled {
            assert_eq!(arena.knight().stamina, 0.0);
        }
    }
    assert!(elapsed >= 1_000.0);
    assert_eq!(arena.knight().stamina, 1.0);
}

#[test]
fn test_stale_completion_is_ignored() {
    let config = config();
    let agent = agent(&config);
    let mut arena = Arena::new(config, agent, Box::new(NullPresentation)).unwrap();

    run(&mut arena, InputFrame::idle().with_trigger(Trigger::AttackHeavy), 8);
    let AttackPhase::Active { kind, generation } = arena.hero().attack else {
        panic!("expected an active swing, got {:?}", arena.hero().attack);
    };

    let stale = AnimationComplete {
        combatant: CombatantId::Hero,
        cue: AnimationCue {
            key: AnimationKey::Attack(kind),
            generation: generation - 1,
        },
    };
    arena.notify_animation_complete(stale);
    arena.tick(&InputFrame::idle(), FRAME);
    assert!(matches!(arena.hero().attack, AttackPhase::Active { .. }));

    let live = AnimationComplete {
        combatant: CombatantId::Hero,
        cue: AnimationCue {
            key: AnimationKey::Attack(kind),
            generation,
        },
    };
    arena.notify_animation_complete(live);
    arena.tick(&InputFrame::idle(), FRAME);
    assert_eq!(arena.hero().attack, AttackPhase::Idle);
}

#[test]
fn test_same_seed_same_duel() {
    let play = || {
        let config = ArenaConfig {
            seed: 21,
            ..ArenaConfig::default()
        };
        let mut arena = Arena::headless(config.clone(), agent(&config)).unwrap();
        let mut partner = SparringPartner::new(8);
        for _ in 0..3_000 {
            let input = partner.next_input(&arena, FRAME);
            if arena.tick(&input, FRAME).outcome.is_over() {
                arena.reset();
            }
        }
        arena.state_hash().unwrap()
    };
    let first = play();
    assert_eq!(first.len(), 64);
    assert_eq!(first, play());
}

#[test]
fn test_reset_restores_combatants_and_keeps_learning() {
    let mut arena = headless();
    run(&mut arena, InputFrame::idle().with_trigger(Trigger::AttackLight), 120);
    assert!(!arena.agent().table().is_empty());
    let learned = arena.agent().table().clone();

    arena.reset();
    let fresh = ArenaConfig::default();
    assert_eq!(arena.tick_count(), 0);
    assert_eq!(arena.outcome(), Outcome::Ongoing);
    assert_eq!(arena.hero().position, fresh.hero.spawn);
    assert_eq!(arena.knight().health, fresh.knight.max_health);
    assert!(arena.sensors().is_empty());
    assert_eq!(arena.agent().table(), &learned);
}

#[test]
fn test_telemetry_batches_are_broadcast() {
    let mut arena = headless();
    let mut rx = arena.subscribe_telemetry();
    run(&mut arena, InputFrame::idle().with_trigger(Trigger::AttackLight), 12);

    let batch = rx.try_recv().expect("a flush after 150 ms");
    assert!(
        batch
            .records
            .iter()
            .any(|r| r.actor == CombatantId::Hero && r.action == "attack_melee")
    );
    assert!(
        batch
            .records
            .iter()
            .any(|r| r.actor == CombatantId::Knight && r.action == "attack")
    );
}

#[tokio::test]
async fn test_episode_end_persists_policy() {
    let config = config();
    let store = Arc::new(MemoryStore::new());
    let agent = agent(&config).with_saver(PolicySaver::spawn(store.clone()));
    let mut arena = face_off(Arena::headless(config, agent).unwrap());
    arena.duel_mut().knight.set_health(12.0);

    run(&mut arena, InputFrame::idle().with_trigger(Trigger::Special), 30);
    assert_eq!(arena.outcome(), Outcome::HeroWon);

    let table = arena.shutdown().await;
    assert!(store.save_count() >= 1);
    assert_eq!(store.snapshot(), Some(table));
}
