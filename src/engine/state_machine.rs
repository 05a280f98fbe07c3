use std::sync::Arc;

use thiserror::Error;

use super::{
    QUESTION_DURATION_SECS,
    question::{OPTION_COUNT, Question},
    scoring::{FeedbackTier, winner},
    team::{Team, TeamId, Teams},
};

/// High-level phases a match goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Teams are being configured; no countdown runs.
    Setup,
    /// A question is on screen and its countdown is running.
    Active,
    /// Every question of the batch has been played. Terminal.
    GameOver,
}

/// Events that can be applied to a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// Replace a team's name and roster while in setup.
    ConfigureTeam {
        /// Team being configured.
        team: TeamId,
        /// Display name.
        name: String,
        /// Member names, in order.
        members: Vec<String>,
    },
    /// Leave setup and show the first question.
    Start,
    /// One second of the countdown elapsed.
    Tick,
    /// The active team picked an option (1-based).
    Answer {
        /// Selected option, 1 to 4.
        option: u8,
    },
    /// The active team ran out of time.
    Timeout,
    /// Toggle audio cues on or off.
    ToggleMute,
}

/// How the last turn ended, exposed so presentation can pick a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The selected option was right.
    Correct,
    /// The selected option was wrong.
    Incorrect,
    /// The countdown reached zero before any answer.
    TimedOut,
}

/// Final result submitted to the leaderboard when a match ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Winning team.
    pub winner: TeamId,
    /// Winning team's name.
    pub team_name: String,
    /// Winning team's members.
    pub members: Vec<String>,
    /// Winning team's score.
    pub score: u32,
}

/// Side effects requested by a transition, performed by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEffect {
    /// Play the audio cue matching the outcome. Never emitted while muted.
    PlayCue(TurnOutcome),
    /// Append the winning team to the leaderboard. Emitted once per match.
    SubmitResult(MatchResult),
}

/// Output of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub state: MatchState,
    /// Effects to perform, in order.
    pub effects: Vec<MatchEffect>,
}

impl Transition {
    fn quiet(state: MatchState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// Error returned when an event is not valid in the current phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// Phase the match was in when the event arrived.
    pub from: MatchPhase,
    /// The rejected event.
    pub event: MatchEvent,
}

/// Reasons an event is rejected. A rejected event never changes the state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Either team lacks a name or members.
    #[error("Please enter team names and member names for both teams")]
    TeamsIncomplete,
    /// The match has no question to play.
    #[error("no questions loaded for this match")]
    EmptyBatch,
    /// The selected option does not exist.
    #[error("option {0} does not exist (expected 1 to 4)")]
    InvalidOption(u8),
    /// The event does not apply to the current phase.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
}

/// Complete state of a match. Every change goes through [`transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    questions: Arc<[Question]>,
    teams: Teams,
    phase: MatchPhase,
    current_question: usize,
    active_team: TeamId,
    remaining_secs: u8,
    muted: bool,
    last_outcome: Option<TurnOutcome>,
}

impl MatchState {
    /// Create a match in setup for the given (already shuffled) batch.
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into(),
            teams: Teams::default(),
            phase: MatchPhase::Setup,
            current_question: 0,
            active_team: TeamId::Team1,
            remaining_secs: QUESTION_DURATION_SECS,
            muted: false,
            last_outcome: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Whether the match is over.
    pub fn is_game_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }

    /// Number of questions in the batch.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// 0-based index of the question being played; equals the question count once
    /// the match is over.
    pub fn current_question_index(&self) -> usize {
        self.current_question
    }

    /// Question being played, if any.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            MatchPhase::GameOver => None,
            _ => self.questions.get(self.current_question),
        }
    }

    /// Team entitled to answer the current question.
    pub fn active_team(&self) -> TeamId {
        self.active_team
    }

    /// Team reading the current question to the active team.
    pub fn asking_team(&self) -> TeamId {
        self.active_team.other()
    }

    /// Borrow a team.
    pub fn team(&self, id: TeamId) -> &Team {
        self.teams.get(id)
    }

    /// Both teams.
    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    /// Seconds left on the countdown.
    pub fn remaining_secs(&self) -> u8 {
        self.remaining_secs
    }

    /// Whether audio cues are muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// How the last turn ended.
    pub fn last_outcome(&self) -> Option<TurnOutcome> {
        self.last_outcome
    }

    /// Winner of a finished match.
    pub fn winner(&self) -> Option<TeamId> {
        self.is_game_over().then(|| {
            winner(
                self.teams.get(TeamId::Team1).score,
                self.teams.get(TeamId::Team2).score,
            )
        })
    }

    /// Feedback tier for a team's current score.
    pub fn feedback(&self, id: TeamId) -> FeedbackTier {
        FeedbackTier::for_score(self.teams.get(id).score, self.questions.len())
    }

    /// Compute the state following `event`, leaving `self` untouched.
    pub fn apply(&self, event: MatchEvent) -> Result<Transition, MatchError> {
        match (self.phase, event) {
            (_, MatchEvent::ToggleMute) => {
                let mut next = self.clone();
                next.muted = !next.muted;
                Ok(Transition::quiet(next))
            }
            (
                MatchPhase::Setup,
                MatchEvent::ConfigureTeam {
                    team,
                    name,
                    members,
                },
            ) => {
                let mut next = self.clone();
                *next.teams.get_mut(team) = Team::new(name, members);
                Ok(Transition::quiet(next))
            }
            (MatchPhase::Setup, MatchEvent::Start) => self.start(),
            (MatchPhase::Active, MatchEvent::Tick) => Ok(self.tick()),
            // The countdown may still fire once after the match left `Active`.
            (MatchPhase::Setup | MatchPhase::GameOver, MatchEvent::Tick) => {
                Ok(Transition::quiet(self.clone()))
            }
            (MatchPhase::Active, MatchEvent::Answer { option }) => self.answer(option),
            (MatchPhase::Active, MatchEvent::Timeout) => {
                Ok(self.clone().resolve_turn(TurnOutcome::TimedOut))
            }
            (from, event) => Err(InvalidTransition { from, event }.into()),
        }
    }

    fn start(&self) -> Result<Transition, MatchError> {
        if !self.teams.all_configured() {
            return Err(MatchError::TeamsIncomplete);
        }
        if self.questions.is_empty() {
            return Err(MatchError::EmptyBatch);
        }

        let mut next = self.clone();
        next.phase = MatchPhase::Active;
        next.current_question = 0;
        next.active_team = TeamId::Team1;
        next.remaining_secs = QUESTION_DURATION_SECS;
        next.last_outcome = None;
        Ok(Transition::quiet(next))
    }

    fn tick(&self) -> Transition {
        let mut next = self.clone();
        next.remaining_secs = next.remaining_secs.saturating_sub(1);
        if next.remaining_secs == 0 {
            next.resolve_turn(TurnOutcome::TimedOut)
        } else {
            Transition::quiet(next)
        }
    }

    fn answer(&self, option: u8) -> Result<Transition, MatchError> {
        if !(1..=OPTION_COUNT).contains(&option) {
            return Err(MatchError::InvalidOption(option));
        }

        let correct = self
            .current_question()
            .is_some_and(|question| question.is_correct(option));
        let outcome = if correct {
            TurnOutcome::Correct
        } else {
            TurnOutcome::Incorrect
        };
        Ok(self.clone().resolve_turn(outcome))
    }

    /// Score the turn, then move to the next question or end the match.
    fn resolve_turn(mut self, outcome: TurnOutcome) -> Transition {
        if outcome == TurnOutcome::Correct {
            self.teams.get_mut(self.active_team).score += 1;
        }
        self.last_outcome = Some(outcome);

        let mut effects = Vec::new();
        if !self.muted {
            effects.push(MatchEffect::PlayCue(outcome));
        }

        if self.current_question + 1 < self.questions.len() {
            self.current_question += 1;
            self.remaining_secs = QUESTION_DURATION_SECS;
            self.active_team = self.active_team.other();
        } else {
            self.current_question = self.questions.len();
            self.phase = MatchPhase::GameOver;
            effects.push(MatchEffect::SubmitResult(self.result()));
        }

        Transition {
            state: self,
            effects,
        }
    }

    fn result(&self) -> MatchResult {
        let team1 = self.teams.get(TeamId::Team1);
        let team2 = self.teams.get(TeamId::Team2);
        let winner = winner(team1.score, team2.score);
        let team = self.teams.get(winner);

        MatchResult {
            winner,
            team_name: team.name.clone(),
            members: team.members.clone(),
            score: team.score,
        }
    }
}

/// Pure reducer: the state following `event`, or why `event` was rejected.
pub fn transition(state: &MatchState, event: MatchEvent) -> Result<Transition, MatchError> {
    state.apply(event)
}
