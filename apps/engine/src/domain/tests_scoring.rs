use crate::domain::scoring::{
    CIVILIAN_WIN_POINTS, ENEMIES_WIN_POINTS, IMPOSTOR_WIN_POINTS, WOLF_WIN_POINTS,
};
use crate::domain::{
    compute_scores, points_for, score_deltas, GameMode, Player, Role, RoundOutcome, WinMethod,
    Winner,
};

fn player(id: u32, role: Role, score: u32) -> Player {
    Player {
        id,
        name: format!("P{id}"),
        role,
        score,
    }
}

fn table() -> Vec<Player> {
    vec![
        player(0, Role::Civilian, 0),
        player(1, Role::Impostor, 100),
        player(2, Role::Civilian, 200),
        player(3, Role::MrWolf, 0),
        player(4, Role::Civilian, 50),
    ]
}

fn scores(players: &[Player]) -> Vec<u32> {
    players.iter().map(|p| p.score).collect()
}

#[test]
fn civilians_share_a_players_win() {
    let out = compute_scores(
        &table(),
        RoundOutcome::new(Winner::Players, WinMethod::Vote),
        false,
        GameMode::Tournament,
    );
    assert_eq!(scores(&out), vec![100, 100, 300, 0, 150]);
}

#[test]
fn impostor_win_pays_only_the_impostor() {
    let out = compute_scores(
        &table(),
        RoundOutcome::new(Winner::Impostor, WinMethod::Vote),
        false,
        GameMode::Tournament,
    );
    assert_eq!(scores(&out), vec![0, 400, 200, 0, 50]);
}

#[test]
fn wolf_win_pays_only_the_wolf() {
    let out = compute_scores(
        &table(),
        RoundOutcome::new(Winner::MrWolf, WinMethod::Guess),
        false,
        GameMode::Tournament,
    );
    assert_eq!(scores(&out), vec![0, 100, 200, 500, 50]);
}

#[test]
fn enemies_win_pays_each_enemy() {
    let out = compute_scores(
        &table(),
        RoundOutcome::new(Winner::Enemies, WinMethod::Vote),
        false,
        GameMode::Tournament,
    );
    assert_eq!(scores(&out), vec![0, 400, 200, 300, 50]);
}

#[test]
fn final_round_doubles_every_award() {
    assert_eq!(points_for(Role::Civilian, Winner::Players, true), 2 * CIVILIAN_WIN_POINTS);
    assert_eq!(points_for(Role::Impostor, Winner::Impostor, true), 2 * IMPOSTOR_WIN_POINTS);
    assert_eq!(points_for(Role::MrWolf, Winner::MrWolf, true), 2 * WOLF_WIN_POINTS);
    assert_eq!(points_for(Role::MrWolf, Winner::Enemies, true), 2 * ENEMIES_WIN_POINTS);
    assert_eq!(points_for(Role::Civilian, Winner::Impostor, true), 0);
}

#[test]
fn losing_roles_earn_nothing() {
    assert_eq!(points_for(Role::Impostor, Winner::Players, false), 0);
    assert_eq!(points_for(Role::MrWolf, Winner::Impostor, false), 0);
    assert_eq!(points_for(Role::Impostor, Winner::MrWolf, false), 0);
    assert_eq!(points_for(Role::Civilian, Winner::Enemies, false), 0);
}

#[test]
fn single_mode_never_changes_scores() {
    let players = table();
    let out = compute_scores(
        &players,
        RoundOutcome::new(Winner::Players, WinMethod::Vote),
        true,
        GameMode::Single,
    );
    assert_eq!(out, players);
    assert!(score_deltas(
        &players,
        RoundOutcome::new(Winner::Players, WinMethod::Vote),
        true,
        GameMode::Single
    )
    .iter()
    .all(|(_, d)| *d == 0));
}

#[test]
fn deltas_follow_player_order() {
    let deltas = score_deltas(
        &table(),
        RoundOutcome::new(Winner::MrWolf, WinMethod::Guess),
        true,
        GameMode::Tournament,
    );
    assert_eq!(deltas, vec![(0, 0), (1, 0), (2, 0), (3, 1000), (4, 0)]);
}

#[test]
fn scores_saturate_instead_of_wrapping() {
    let players = vec![player(0, Role::Civilian, u32::MAX - 1)];
    let out = compute_scores(
        &players,
        RoundOutcome::new(Winner::Players, WinMethod::Vote),
        false,
        GameMode::Tournament,
    );
    assert_eq!(out[0].score, u32::MAX);
}
