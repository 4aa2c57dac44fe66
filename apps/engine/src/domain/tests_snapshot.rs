use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::{
    EnemyConfig, Phase, QualificationMarker, RevealCard, RevealProgress, Role, RosterEntry,
    RoundPlan, RoundSession, RoundSnapshot, Settings, TimerState, Winner,
};

fn start(hint: bool, seed: u64) -> RoundSession {
    let settings = Settings {
        enemy_config: EnemyConfig::Both,
        show_category_hint: hint,
        timer_duration_secs: 90,
        ..Settings::default()
    };
    let roster = (0..5)
        .map(|i| RosterEntry::new(i, format!("P{i}")))
        .collect();
    RoundSession::start(
        RoundPlan::from_settings(&settings, roster),
        &mut ChaCha8Rng::seed_from_u64(seed),
    )
    .expect("round starts")
}

fn card_for(round: &RoundSession, role: Role) -> RevealCard {
    let (pos, player) = round
        .players()
        .iter()
        .enumerate()
        .find(|(_, p)| p.role == role)
        .expect("role dealt");
    RevealCard::for_player(round, player, pos + 1)
}

#[test]
fn civilian_card_shows_word_and_category() {
    let round = start(false, 1);
    let card = card_for(&round, Role::Civilian);
    assert_eq!(card.word.as_deref(), Some(round.secret_word()));
    assert_eq!(card.category.as_deref(), Some(round.word_category()));
    assert_eq!(card.total, 5);
}

#[test]
fn enemy_cards_hide_the_word() {
    let round = start(false, 2);
    for role in [Role::Impostor, Role::MrWolf] {
        let card = card_for(&round, role);
        assert!(card.word.is_none());
        assert!(card.category.is_none());
    }
}

#[test]
fn category_hint_reaches_enemies() {
    let round = start(true, 3);
    let card = card_for(&round, Role::Impostor);
    assert!(card.word.is_none());
    assert_eq!(card.category.as_deref(), Some(round.word_category()));
}

#[test]
fn live_snapshot_keeps_secrets() {
    let mut round = start(false, 4);
    round.reveal_current().expect("reveal");
    let snap = RoundSnapshot::of(&round);
    assert_eq!(snap.phase, Phase::Reveal);
    assert!(snap.card_visible);
    assert_eq!(snap.current_revealer, Some(round.players()[0].id));
    assert!(snap.players.iter().all(|p| p.role.is_none()));
    assert!(snap.result.is_none());
    assert_eq!(snap.timer.display, "1:30");
    assert_eq!(snap.timer.state, TimerState::Idle);

    let json = serde_json::to_string(&snap).expect("serialize");
    assert!(!json.contains(round.secret_word()));
}

#[test]
fn resolved_snapshot_reveals_everything() {
    let mut round = start(false, 5);
    loop {
        round.reveal_current().expect("reveal");
        if round.acknowledge_reveal().expect("ack") == RevealProgress::Complete {
            break;
        }
    }
    round.request_vote().expect("vote");
    let impostor = round.holders_of(Role::Impostor).next().expect("impostor").id;
    round.cast_vote(impostor).expect("vote");

    let snap = RoundSnapshot::of(&round);
    let result = snap.result.expect("result view");
    assert_eq!(result.winner, Winner::Players);
    assert_eq!(result.word, round.secret_word());
    assert_eq!(result.voted_player, Some(impostor));
    assert_eq!(result.enemies.len(), 2);
    assert!(snap.players.iter().all(|p| p.role.is_some()));
    assert!(!snap.card_visible);
}

#[test]
fn qualification_marker_serializes_upper_snake() {
    let json = serde_json::to_string(&QualificationMarker::Qualified).expect("serialize");
    assert_eq!(json, "\"QUALIFIED\"");
}
