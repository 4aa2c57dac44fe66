//! Session-level services on top of the pure domain.

pub mod clock;
pub mod session;
pub mod tournament;

#[cfg(test)]
mod tests_session;

pub use clock::{spawn_round_clock, ClockStop, RoundClock};
pub use session::{GameSession, SessionSnapshot, Stage};
pub use tournament::{carry_scores, Tournament, FINALISTS};
