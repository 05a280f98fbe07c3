//! Turn engine for a two-team quiz match.
//!
//! The engine is split between a pure reducer ([`state_machine`]) that owns every
//! gameplay rule, and an async [`driver`] that feeds it intents and countdown ticks,
//! publishes the resulting state and performs the side effects the reducer asks for.

/// Async runtime wiring the reducer, the countdown and the backend together.
pub mod driver;
/// Question records as consumed by the engine.
pub mod question;
/// Winner selection and qualitative feedback tiers.
pub mod scoring;
/// Unbiased in-place shuffling of a question batch.
pub mod shuffle;
/// Match phases, events and the transition function.
pub mod state_machine;
/// Team identities and rosters.
pub mod team;
/// Cancellable one-second countdown ticker.
pub mod timer;

/// Seconds granted to the active team for each question.
pub const QUESTION_DURATION_SECS: u8 = 10;

pub use self::driver::{DriverError, MatchAssets, MatchDriver, MatchHandle, load_match};
pub use self::question::Question;
pub use self::scoring::{FeedbackTier, winner};
pub use self::state_machine::{
    InvalidTransition, MatchEffect, MatchError, MatchEvent, MatchPhase, MatchResult, MatchState,
    Transition, TurnOutcome, transition,
};
pub use self::team::{Team, TeamId, Teams};
