use crate::domain::{
    EnemyConfig, GameMode, Phase, RevealProgress, Role, Settings, Tick, TimerState, Winner,
};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::services::session::{GameSession, Stage};

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("P{i}")).collect()
}

fn tournament(n: usize, rounds: u32) -> GameSession {
    GameSession::with_seed(
        Settings {
            player_names: names(n),
            mode: GameMode::Tournament,
            total_rounds: rounds,
            timer_duration_secs: 60,
            ..Settings::default()
        },
        99,
    )
}

fn reveal_all(session: &mut GameSession) {
    loop {
        session.reveal_current().expect("reveal");
        if session.acknowledge_reveal().expect("ack") == RevealProgress::Complete {
            break;
        }
    }
}

fn impostor_of(session: &GameSession) -> u32 {
    session
        .round()
        .and_then(|r| r.holders_of(Role::Impostor).next())
        .map(|p| p.id)
        .expect("impostor seated")
}

fn play_players_win(session: &mut GameSession) {
    reveal_all(session);
    session.request_vote().expect("vote");
    let impostor = impostor_of(session);
    assert_eq!(session.cast_vote(impostor), Ok(Phase::Result));
}

#[test]
fn start_game_validates_settings() {
    let mut session = GameSession::with_seed(
        Settings {
            player_names: names(2),
            ..Settings::default()
        },
        1,
    );
    let err = session.start_game().unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::TooFewPlayers));
    assert_eq!(session.stage(), Stage::Lobby);
    assert!(session.round().is_none());
}

#[test]
fn round_calls_need_an_active_round() {
    let mut session = tournament(3, 1);
    assert_eq!(session.tick(), Err(DomainError::NoActiveRound));
    assert_eq!(session.cast_vote(0), Err(DomainError::NoActiveRound));
    assert!(matches!(
        session.advance_tournament(),
        Err(DomainError::InvalidTransition(_))
    ));
}

#[test]
fn reveal_card_only_while_showing() {
    let mut session = tournament(3, 1);
    session.start_game().expect("start");
    assert!(session.reveal_card().is_none());

    let card = session.reveal_current().expect("reveal");
    assert_eq!(card.position, 1);
    assert_eq!(card.total, 3);
    assert_eq!(session.reveal_card(), Some(card));

    session.acknowledge_reveal().expect("ack");
    assert!(session.reveal_card().is_none());
}

#[test]
fn single_game_finishes_after_one_round() {
    let mut session = GameSession::with_seed(
        Settings {
            player_names: names(4),
            ..Settings::default()
        },
        2,
    );
    let snapshot = session.start_game().expect("start");
    assert_eq!(snapshot.phase, Phase::Reveal);
    assert_eq!(snapshot.round_number, 1);

    assert_eq!(
        session.advance_tournament(),
        Err(DomainError::phase_mismatch(Phase::Result, Phase::Reveal))
    );

    play_players_win(&mut session);
    assert_eq!(session.advance_tournament(), Ok(Stage::Finished));
    assert_eq!(session.advance_tournament(), Err(DomainError::TournamentOver));
    assert_eq!(session.start_game(), Err(DomainError::TournamentOver));
    assert!(session.leaderboard().entries.iter().all(|e| e.score == 0));
}

#[test]
fn tournament_alternates_rounds_and_leaderboard() {
    let mut session = tournament(4, 2);
    session.start_game().expect("start");

    play_players_win(&mut session);
    assert_eq!(session.advance_tournament(), Ok(Stage::Leaderboard));
    let board = session.leaderboard();
    assert_eq!(board.current_round, 1);
    assert_eq!(board.entries.iter().map(|e| e.score).sum::<u32>(), 300);

    assert_eq!(session.advance_tournament(), Ok(Stage::InRound));
    assert_eq!(session.round().map(|r| r.round_number()), Some(2));
    play_players_win(&mut session);
    assert_eq!(session.advance_tournament(), Ok(Stage::Leaderboard));

    // Four players: no final.
    let board = session.leaderboard();
    assert!(!board.can_play_final);
    assert!(board.is_tournament_over);
    assert_eq!(session.advance_tournament(), Ok(Stage::Finished));
}

#[test]
fn tournament_with_five_players_plays_a_final() {
    let mut session = tournament(5, 1);
    session.start_game().expect("start");
    play_players_win(&mut session);
    session.advance_tournament().expect("leaderboard");
    assert!(session.leaderboard().can_play_final);

    assert_eq!(session.advance_tournament(), Ok(Stage::InRound));
    let round = session.round().expect("final round");
    assert!(round.is_final_round());
    assert_eq!(round.players().len(), 4);
    assert_eq!(round.enemy_config(), EnemyConfig::ImpostorOnly);

    play_players_win(&mut session);
    session.advance_tournament().expect("leaderboard");
    assert!(session.leaderboard().is_tournament_over);
    assert_eq!(session.advance_tournament(), Ok(Stage::Finished));
}

#[test]
fn wolf_guess_result_is_recorded_once() {
    let mut session = GameSession::with_seed(
        Settings {
            player_names: names(4),
            mode: GameMode::Tournament,
            total_rounds: 1,
            enemy_config: EnemyConfig::WolfOnly,
            ..Settings::default()
        },
        3,
    );
    session.start_game().expect("start");
    reveal_all(&mut session);
    session.request_vote().expect("vote");
    let wolf = session
        .round()
        .and_then(|r| r.holders_of(Role::MrWolf).next())
        .map(|p| p.id)
        .expect("wolf");
    assert_eq!(session.cast_vote(wolf), Ok(Phase::WolfGuess));

    let word = session.round().expect("round").secret_word().to_string();
    assert_eq!(session.submit_wolf_guess(&word), Ok(true));
    assert!(session.submit_wolf_guess(&word).is_err());

    let board = session.leaderboard();
    assert_eq!(board.entries[0].id, wolf);
    assert_eq!(board.entries[0].score, 500);
    assert_eq!(board.entries.iter().map(|e| e.score).sum::<u32>(), 500);
    assert_eq!(session.round().and_then(|r| r.winner()), Some(Winner::MrWolf));
}

#[test]
fn restart_tears_down_round_and_zeroes_scores() {
    let mut session = tournament(5, 2);
    session.start_game().expect("start");
    play_players_win(&mut session);
    session.advance_tournament().expect("leaderboard");
    session.advance_tournament().expect("round two");
    reveal_all(&mut session);
    session.tick().expect("tick");

    session.restart();
    assert_eq!(session.stage(), Stage::Lobby);
    assert!(session.round().is_none());
    assert_eq!(session.tick(), Err(DomainError::NoActiveRound));
    assert_eq!(session.request_vote(), Err(DomainError::NoActiveRound));
    assert!(session.leaderboard().entries.iter().all(|e| e.score == 0));

    session.start_game().expect("start again");
    assert_eq!(session.round().map(|r| r.round_number()), Some(1));
    assert_eq!(
        session.round().map(|r| r.timer().state()),
        Some(TimerState::Idle)
    );
}

#[test]
fn same_seed_replays_the_same_round() {
    let mut a = tournament(6, 1);
    let mut b = tournament(6, 1);
    a.start_game().expect("start");
    b.start_game().expect("start");
    let (ra, rb) = (a.round().expect("a"), b.round().expect("b"));
    assert_eq!(ra.secret_word(), rb.secret_word());
    assert_eq!(ra.players(), rb.players());

    // A restart moves to a fresh stream.
    a.restart();
    a.start_game().expect("restart");
    let again = a.round().expect("a again");
    let same_table = again.players() == b.round().expect("b").players()
        && again.secret_word() == b.round().expect("b").secret_word();
    assert!(!same_table);
}

#[test]
fn settings_locked_during_round_and_validated_on_leaderboard() {
    let mut session = tournament(5, 2);
    session.start_game().expect("start");
    assert!(matches!(
        session.update_settings(Settings::default()),
        Err(DomainError::InvalidTransition(_))
    ));

    play_players_win(&mut session);
    session.advance_tournament().expect("leaderboard");

    let mut edited = session.settings().clone();
    edited.player_names = names(2);
    assert_eq!(
        session
            .update_settings(edited)
            .unwrap_err()
            .validation_kind(),
        Some(&ValidationKind::TooFewPlayers)
    );

    let before: Vec<(String, u32)> = session
        .tournament()
        .standings()
        .iter()
        .map(|e| (e.name.clone(), e.score))
        .collect();
    let mut edited = session.settings().clone();
    edited.player_names[0] = "Renamed".to_string();
    session.update_settings(edited).expect("rename");

    let after = session.tournament().standings();
    assert_eq!(after[0].name, "Renamed");
    assert_eq!(after[0].score, 0);
    assert_eq!(after[1].score, before[1].1);
}

#[test]
fn finished_tournament_refuses_settings_and_new_rounds() {
    let mut session = tournament(5, 1);
    session.start_game().expect("start");
    play_players_win(&mut session);
    session.advance_tournament().expect("leaderboard");
    session.advance_tournament().expect("final");
    play_players_win(&mut session);
    session.advance_tournament().expect("leaderboard");
    assert!(session.leaderboard().is_tournament_over);

    let mut edited = session.settings().clone();
    edited.total_rounds = 5;
    assert_eq!(session.update_settings(edited), Err(DomainError::TournamentOver));
    assert_eq!(session.settings().total_rounds, 1);
    assert_eq!(session.tournament().total_rounds(), 1);

    assert_eq!(session.advance_tournament(), Ok(Stage::Finished));
    assert!(session.round().map_or(false, |r| r.is_final_round()));
}

#[test]
fn round_count_cannot_drop_below_rounds_played() {
    let mut session = tournament(5, 3);
    session.start_game().expect("start");
    play_players_win(&mut session);
    session.advance_tournament().expect("leaderboard");
    session.advance_tournament().expect("round 2");
    play_players_win(&mut session);
    session.advance_tournament().expect("leaderboard");

    let mut edited = session.settings().clone();
    edited.total_rounds = 1;
    assert!(matches!(
        session.update_settings(edited),
        Err(DomainError::InvalidTransition(_))
    ));
    assert_eq!(session.tournament().total_rounds(), 3);

    let mut edited = session.settings().clone();
    edited.total_rounds = 2;
    session.update_settings(edited).expect("end regular rounds now");
    assert!(session.leaderboard().can_play_final);
}

#[test]
fn timer_expiry_through_session() {
    let mut session = tournament(3, 1);
    session.start_game().expect("start");
    reveal_all(&mut session);
    for _ in 1..60 {
        assert!(matches!(session.tick(), Ok(Tick::Running { .. })));
    }
    assert_eq!(session.tick(), Ok(Tick::Expired));
    assert_eq!(session.round_phase(), Some(Phase::Voting));
    assert_eq!(session.tick(), Ok(Tick::Ignored));
}
