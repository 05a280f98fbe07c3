use std::sync::Arc;

use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::{
    question::Question,
    shuffle::shuffled,
    state_machine::{
        MatchEffect, MatchError, MatchEvent, MatchPhase, MatchResult, MatchState, Transition,
        TurnOutcome,
    },
    timer::{Countdown, CountdownTick, TICK_PERIOD},
};
use crate::{
    client::QuizBackend,
    dto::leaderboard::{CreateLeaderboardEntryRequest, LeaderboardRowDto},
};

const COMMAND_BUFFER: usize = 16;

/// Everything fetched before a match can be set up.
#[derive(Debug, Clone, Default)]
pub struct MatchAssets {
    /// Shuffled batch. Empty when the fetch failed.
    pub questions: Vec<Question>,
    /// Leaderboard rows as served. Empty when the fetch failed.
    pub leaderboard: Vec<LeaderboardRowDto>,
}

/// Fetch a question batch and the leaderboard concurrently.
///
/// Failures are logged and leave the corresponding field empty; an empty batch keeps
/// the match from starting.
pub async fn load_match(backend: &Arc<dyn QuizBackend>) -> MatchAssets {
    let (questions, leaderboard) =
        futures::join!(backend.fetch_questions(), backend.fetch_leaderboard());

    let questions = match questions {
        Ok(questions) => {
            debug!(count = questions.len(), "fetched question batch");
            shuffled(questions)
        }
        Err(err) => {
            error!(error = %err, "error fetching questions");
            Vec::new()
        }
    };

    let leaderboard = leaderboard.unwrap_or_else(|err| {
        error!(error = %err, "error fetching leaderboard");
        Vec::new()
    });

    MatchAssets {
        questions,
        leaderboard,
    }
}

/// Errors returned by [`MatchHandle::dispatch`].
#[derive(Debug, Error)]
pub enum DriverError {
    /// The engine refused the event; the match state is unchanged.
    #[error(transparent)]
    Rejected(#[from] MatchError),
    /// The driver task is gone.
    #[error("match driver has stopped")]
    Closed,
}

struct Command {
    event: MatchEvent,
    reply: oneshot::Sender<Result<MatchState, MatchError>>,
}

/// Owner of a running match: applies events, drives the countdown and performs
/// the effects the engine asks for.
pub struct MatchDriver {
    backend: Arc<dyn QuizBackend>,
    state: MatchState,
    state_tx: watch::Sender<MatchState>,
    leaderboard_tx: Arc<watch::Sender<Vec<LeaderboardRowDto>>>,
    cues_tx: mpsc::UnboundedSender<TurnOutcome>,
    commands: mpsc::Receiver<Command>,
    ticks_tx: mpsc::UnboundedSender<CountdownTick>,
    ticks_rx: mpsc::UnboundedReceiver<CountdownTick>,
    countdown: Option<Countdown>,
    generation: u64,
    shutdown: CancellationToken,
}

impl MatchDriver {
    /// Start a driver for a fresh match in setup and return its handle.
    pub fn spawn(backend: Arc<dyn QuizBackend>, assets: MatchAssets) -> MatchHandle {
        let state = MatchState::new(assets.questions);
        let (state_tx, state_rx) = watch::channel(state.clone());
        let (leaderboard_tx, leaderboard_rx) = watch::channel(assets.leaderboard);
        let (cues_tx, cues_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let driver = Self {
            backend,
            state,
            state_tx,
            leaderboard_tx: Arc::new(leaderboard_tx),
            cues_tx,
            commands,
            ticks_tx,
            ticks_rx,
            countdown: None,
            generation: 0,
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(driver.run());

        MatchHandle {
            commands: commands_tx,
            state: state_rx,
            leaderboard: leaderboard_rx,
            cues: Some(cues_rx),
            shutdown,
            task,
        }
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                command = self.commands.recv() => match command {
                    Some(Command { event, reply }) => {
                        let _ = reply.send(self.apply(event));
                    }
                    None => break,
                },
                Some(tick) = self.ticks_rx.recv() => self.on_tick(tick),
            }
        }

        self.countdown = None;
        debug!("match driver stopped");
    }

    fn on_tick(&mut self, tick: CountdownTick) {
        let current = self.countdown.as_ref().map(Countdown::generation);
        if current != Some(tick.generation) {
            trace!(generation = tick.generation, "ignoring stale countdown tick");
            return;
        }
        if let Err(err) = self.apply(MatchEvent::Tick) {
            warn!(error = %err, "countdown tick rejected");
        }
    }

    fn apply(&mut self, event: MatchEvent) -> Result<MatchState, MatchError> {
        let before = (self.state.phase(), self.state.current_question_index());
        let Transition { state, effects } = self.state.apply(event)?;
        self.state = state;

        for effect in effects {
            self.perform(effect);
        }
        if before != (self.state.phase(), self.state.current_question_index()) {
            self.rearm_countdown();
        }

        self.state_tx.send_replace(self.state.clone());
        Ok(self.state.clone())
    }

    /// A fresh countdown per question; none outside `Active`.
    fn rearm_countdown(&mut self) {
        self.countdown = None;
        if self.state.phase() == MatchPhase::Active {
            self.generation += 1;
            self.countdown = Some(Countdown::arm(
                self.generation,
                TICK_PERIOD,
                &self.shutdown,
                self.ticks_tx.clone(),
            ));
        }
    }

    fn perform(&self, effect: MatchEffect) {
        match effect {
            MatchEffect::PlayCue(outcome) => {
                let _ = self.cues_tx.send(outcome);
            }
            MatchEffect::SubmitResult(result) => self.submit_detached(result),
        }
    }

    /// Append the result without blocking the match, then refresh the leaderboard.
    fn submit_detached(&self, result: MatchResult) {
        let backend = Arc::clone(&self.backend);
        let leaderboard = Arc::clone(&self.leaderboard_tx);
        let token = self.shutdown.child_token();

        let MatchResult {
            winner,
            team_name,
            members,
            score,
        } = result;
        let entry = CreateLeaderboardEntryRequest {
            team_name: team_name.clone(),
            member_names: members,
            score: i32::try_from(score).unwrap_or(i32::MAX),
        };

        tokio::spawn(async move {
            let submitted = tokio::select! {
                _ = token.cancelled() => {
                    debug!(team = %team_name, "leaderboard submission cancelled");
                    return;
                }
                submitted = backend.submit_result(entry) => submitted,
            };

            match submitted {
                Ok(id) => info!(id, %winner, team = %team_name, score, "score added to leaderboard"),
                Err(err) => {
                    error!(error = %err, team = %team_name, score, "error adding score to leaderboard");
                    return;
                }
            }

            let refreshed = tokio::select! {
                _ = token.cancelled() => return,
                refreshed = backend.fetch_leaderboard() => refreshed,
            };
            match refreshed {
                Ok(rows) => {
                    leaderboard.send_replace(rows);
                }
                Err(err) => warn!(error = %err, "error refreshing leaderboard"),
            }
        });
    }
}

/// Client side of a running [`MatchDriver`].
pub struct MatchHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<MatchState>,
    leaderboard: watch::Receiver<Vec<LeaderboardRowDto>>,
    cues: Option<mpsc::UnboundedReceiver<TurnOutcome>>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl MatchHandle {
    /// Apply `event` and return the resulting state.
    pub async fn dispatch(&self, event: MatchEvent) -> Result<MatchState, DriverError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command { event, reply })
            .await
            .map_err(|_| DriverError::Closed)?;
        let outcome = response.await.map_err(|_| DriverError::Closed)?;
        Ok(outcome?)
    }

    /// Latest match state, updated after every applied event and tick.
    pub fn state(&self) -> watch::Receiver<MatchState> {
        self.state.clone()
    }

    /// Leaderboard rows, refreshed after the match result is stored.
    pub fn leaderboard(&self) -> watch::Receiver<Vec<LeaderboardRowDto>> {
        self.leaderboard.clone()
    }

    /// Audio cues to play. Can be taken once.
    pub fn take_cues(&mut self) -> Option<mpsc::UnboundedReceiver<TurnOutcome>> {
        self.cues.take()
    }

    /// Stop the countdown and any in-flight submission, then wait for the driver.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(err) = self.task.await {
            warn!(error = %err, "match driver task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use futures::future::BoxFuture;
    use reqwest::StatusCode;

    use super::*;
    use crate::{
        client::{ClientError, ClientResult},
        dto::leaderboard::encode_member_names,
        engine::{InvalidTransition, QUESTION_DURATION_SECS, TeamId},
    };

    #[derive(Clone, Copy, Default)]
    enum SubmitMode {
        #[default]
        Store,
        Fail,
        Hang,
    }

    #[derive(Default)]
    struct FakeBackend {
        questions: Vec<Question>,
        fail_fetch: bool,
        submit: SubmitMode,
        rows: Mutex<Vec<LeaderboardRowDto>>,
        submitted: Mutex<Vec<CreateLeaderboardEntryRequest>>,
    }

    impl QuizBackend for Arc<FakeBackend> {
        fn fetch_questions(&self) -> BoxFuture<'static, ClientResult<Vec<Question>>> {
            let backend = Arc::clone(self);
            Box::pin(async move {
                if backend.fail_fetch {
                    return Err(ClientError::RequestStatus {
                        path: "/api/questions",
                        status: StatusCode::INTERNAL_SERVER_ERROR,
                    });
                }
                Ok(backend.questions.clone())
            })
        }

        fn fetch_leaderboard(&self) -> BoxFuture<'static, ClientResult<Vec<LeaderboardRowDto>>> {
            let backend = Arc::clone(self);
            Box::pin(async move {
                if backend.fail_fetch {
                    return Err(ClientError::RequestStatus {
                        path: "/api/leaderboard",
                        status: StatusCode::INTERNAL_SERVER_ERROR,
                    });
                }
                Ok(backend.rows.lock().unwrap().clone())
            })
        }

        fn submit_result(
            &self,
            entry: CreateLeaderboardEntryRequest,
        ) -> BoxFuture<'static, ClientResult<i32>> {
            let backend = Arc::clone(self);
            Box::pin(async move {
                match backend.submit {
                    SubmitMode::Store => {}
                    SubmitMode::Fail => {
                        backend.submitted.lock().unwrap().push(entry);
                        return Err(ClientError::RequestStatus {
                            path: "/api/leaderboard",
                            status: StatusCode::INTERNAL_SERVER_ERROR,
                        });
                    }
                    SubmitMode::Hang => {
                        backend.submitted.lock().unwrap().push(entry);
                        return futures::future::pending().await;
                    }
                }
                let mut rows = backend.rows.lock().unwrap();
                let id = rows.len() as i32 + 1;
                rows.push(LeaderboardRowDto {
                    id,
                    team_name: entry.team_name.clone(),
                    member_names: encode_member_names(&entry.member_names).unwrap(),
                    score: entry.score,
                    created_at: "2024-01-01T00:00:00Z".into(),
                });
                backend.submitted.lock().unwrap().push(entry);
                Ok(id)
            })
        }
    }

    fn question(id: i32) -> Question {
        Question {
            id,
            prompt: format!("question {id}"),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option: 1,
        }
    }

    fn fake(count: i32) -> Arc<FakeBackend> {
        Arc::new(FakeBackend {
            questions: (1..=count).map(question).collect(),
            ..FakeBackend::default()
        })
    }

    fn row(id: i32, team_name: &str, score: i32) -> LeaderboardRowDto {
        LeaderboardRowDto {
            id,
            team_name: team_name.into(),
            member_names: r#"["X"]"#.into(),
            score,
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    async fn spawn_started(fake: &Arc<FakeBackend>) -> MatchHandle {
        spawn_started_with(fake, Vec::new()).await
    }

    async fn spawn_started_with(
        fake: &Arc<FakeBackend>,
        leaderboard: Vec<LeaderboardRowDto>,
    ) -> MatchHandle {
        let backend: Arc<dyn QuizBackend> = Arc::new(Arc::clone(fake));
        let assets = MatchAssets {
            questions: fake.questions.clone(),
            leaderboard,
        };
        let handle = MatchDriver::spawn(backend, assets);
        for (team, name, member) in [(TeamId::Team1, "Alpha", "A"), (TeamId::Team2, "Beta", "B")] {
            handle
                .dispatch(MatchEvent::ConfigureTeam {
                    team,
                    name: name.into(),
                    members: vec![member.into()],
                })
                .await
                .unwrap();
        }
        handle.dispatch(MatchEvent::Start).await.unwrap();
        handle
    }

    #[tokio::test]
    async fn load_match_keeps_the_whole_batch() {
        let fake = fake(10);
        let backend: Arc<dyn QuizBackend> = Arc::new(Arc::clone(&fake));

        let assets = load_match(&backend).await;
        let mut ids: Vec<i32> = assets.questions.iter().map(|question| question.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn load_match_failure_leaves_an_empty_batch() {
        let backend: Arc<dyn QuizBackend> = Arc::new(Arc::new(FakeBackend {
            questions: vec![question(1)],
            fail_fetch: true,
            ..FakeBackend::default()
        }));

        let assets = load_match(&backend).await;
        assert!(assets.questions.is_empty());
        assert!(assets.leaderboard.is_empty());

        let handle = MatchDriver::spawn(backend, assets);
        for team in [TeamId::Team1, TeamId::Team2] {
            handle
                .dispatch(MatchEvent::ConfigureTeam {
                    team,
                    name: "T".into(),
                    members: vec!["M".into()],
                })
                .await
                .unwrap();
        }
        let err = handle.dispatch(MatchEvent::Start).await.unwrap_err();
        assert!(matches!(err, DriverError::Rejected(MatchError::EmptyBatch)));
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_events_leave_state_unchanged() {
        let backend: Arc<dyn QuizBackend> = Arc::new(fake(2));
        let handle = MatchDriver::spawn(
            backend,
            MatchAssets {
                questions: vec![question(1), question(2)],
                leaderboard: Vec::new(),
            },
        );
        let state = handle.state();

        let err = handle.dispatch(MatchEvent::Start).await.unwrap_err();
        assert!(matches!(err, DriverError::Rejected(MatchError::TeamsIncomplete)));

        let err = handle
            .dispatch(MatchEvent::Answer { option: 1 })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DriverError::Rejected(MatchError::InvalidTransition(InvalidTransition {
                from: MatchPhase::Setup,
                ..
            }))
        ));
        assert_eq!(state.borrow().phase(), MatchPhase::Setup);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_ticks_down_then_times_out() {
        let fake = fake(2);
        let handle = spawn_started(&fake).await;
        let mut state = handle.state();

        let snapshot = state
            .wait_for(|state| state.remaining_secs() == 7)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.current_question_index(), 0);
        assert_eq!(snapshot.active_team(), TeamId::Team1);

        let snapshot = state
            .wait_for(|state| state.current_question_index() == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.remaining_secs(), QUESTION_DURATION_SECS);
        assert_eq!(snapshot.active_team(), TeamId::Team2);
        assert_eq!(snapshot.last_outcome(), Some(TurnOutcome::TimedOut));
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn finished_match_submits_winner_and_refreshes_leaderboard() {
        let fake = fake(2);
        let mut handle = spawn_started(&fake).await;
        let mut cues = handle.take_cues().unwrap();
        let mut leaderboard = handle.leaderboard();

        let state = handle
            .dispatch(MatchEvent::Answer { option: 1 })
            .await
            .unwrap();
        assert_eq!(state.team(TeamId::Team1).score, 1);
        assert_eq!(cues.recv().await, Some(TurnOutcome::Correct));

        let state = handle
            .dispatch(MatchEvent::Answer { option: 3 })
            .await
            .unwrap();
        assert!(state.is_game_over());
        assert_eq!(cues.recv().await, Some(TurnOutcome::Incorrect));

        leaderboard.changed().await.unwrap();
        let rows = leaderboard.borrow().clone();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team_name, "Alpha");
        assert_eq!(rows[0].score, 1);

        let submitted = fake.submitted.lock().unwrap().clone();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].member_names, vec!["A"]);
        handle.shutdown().await;
    }

    async fn play_to_game_over(handle: &MatchHandle) -> MatchState {
        handle
            .dispatch(MatchEvent::Answer { option: 1 })
            .await
            .unwrap();
        tokio::time::timeout(
            Duration::from_secs(1),
            handle.dispatch(MatchEvent::Answer { option: 1 }),
        )
        .await
        .expect("final answer blocked on the submission")
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn failed_submission_keeps_the_previous_leaderboard() {
        let fake = Arc::new(FakeBackend {
            questions: vec![question(1), question(2)],
            submit: SubmitMode::Fail,
            ..FakeBackend::default()
        });
        let previous = vec![row(7, "Veterans", 9)];
        let handle = spawn_started_with(&fake, previous.clone()).await;
        let leaderboard = handle.leaderboard();

        let state = play_to_game_over(&handle).await;
        assert!(state.is_game_over());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fake.submitted.lock().unwrap().len(), 1);
        assert!(!leaderboard.has_changed().unwrap());
        assert_eq!(*leaderboard.borrow(), previous);
        assert_eq!(handle.state().borrow().phase(), MatchPhase::GameOver);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_submission_does_not_hold_up_the_match_or_shutdown() {
        let fake = Arc::new(FakeBackend {
            questions: vec![question(1), question(2)],
            submit: SubmitMode::Hang,
            ..FakeBackend::default()
        });
        let previous = vec![row(3, "Veterans", 4)];
        let handle = spawn_started_with(&fake, previous.clone()).await;
        let leaderboard = handle.leaderboard();

        let state = play_to_game_over(&handle).await;
        assert!(state.is_game_over());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fake.submitted.lock().unwrap().len(), 1);

        tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
            .await
            .expect("shutdown waited on the stalled submission");
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(*leaderboard.borrow(), previous);
        assert_eq!(Arc::strong_count(&fake), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn final_cue_is_queued_before_game_over_is_published() {
        let fake = fake(1);
        let mut handle = spawn_started(&fake).await;
        let mut cues = handle.take_cues().unwrap();
        let mut state = handle.state();

        handle
            .dispatch(MatchEvent::Answer { option: 2 })
            .await
            .unwrap();
        state.wait_for(MatchState::is_game_over).await.unwrap();

        assert_eq!(cues.try_recv(), Ok(TurnOutcome::Incorrect));
        assert!(cues.try_recv().is_err());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn muted_match_plays_no_cue() {
        let fake = fake(3);
        let mut handle = spawn_started(&fake).await;
        let mut cues = handle.take_cues().unwrap();

        handle.dispatch(MatchEvent::ToggleMute).await.unwrap();
        handle
            .dispatch(MatchEvent::Answer { option: 1 })
            .await
            .unwrap();
        assert!(cues.try_recv().is_err());

        handle.dispatch(MatchEvent::ToggleMute).await.unwrap();
        handle
            .dispatch(MatchEvent::Answer { option: 2 })
            .await
            .unwrap();
        assert_eq!(cues.recv().await, Some(TurnOutcome::Incorrect));
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_countdown() {
        let fake = fake(2);
        let handle = spawn_started(&fake).await;
        let state = handle.state();

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        let snapshot = state.borrow();
        assert_eq!(snapshot.phase(), MatchPhase::Active);
        assert_eq!(snapshot.current_question_index(), 0);
        assert_eq!(snapshot.remaining_secs(), QUESTION_DURATION_SECS);
    }
}
