//! Terminal front end: plays one two-team match against a running quiz API.

use std::{
    env,
    io::{self, Write},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, bail};
use pick_a_brain::{
    client::{ApiClient, LeaderboardView, QuizBackend},
    engine::{
        DriverError, MatchDriver, MatchError, MatchEvent, MatchHandle, MatchPhase, MatchState,
        TeamId, TurnOutcome, load_match, team::parse_members,
    },
};
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::mpsc::UnboundedReceiver,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const API_URL_ENV: &str = "PICK_A_BRAIN_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:5000";
const LEADERBOARD_REFRESH_TIMEOUT: Duration = Duration::from_secs(5);

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let base_url = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.into());
    let client = ApiClient::new(&base_url).context("building API client")?;
    let backend: Arc<dyn QuizBackend> = Arc::new(client);

    println!("Loading questions from {base_url}...");
    let assets = load_match(&backend).await;
    if assets.questions.is_empty() {
        bail!("no questions could be loaded from {base_url}");
    }

    println!("\n=== Leaderboard ===");
    print_leaderboard(&LeaderboardView::from_rows(assets.leaderboard.clone()));

    let mut handle = MatchDriver::spawn(backend, assets);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let outcome = async {
        setup_teams(&handle, &mut input).await?;
        play(&mut handle, &mut input).await?;
        finish(&handle).await;
        anyhow::Ok(())
    }
    .await;

    handle.shutdown().await;
    outcome
}

/// Ask for both rosters until the match accepts to start.
async fn setup_teams(handle: &MatchHandle, input: &mut InputLines) -> anyhow::Result<()> {
    loop {
        for team in [TeamId::Team1, TeamId::Team2] {
            let label = match team {
                TeamId::Team1 => "Team 1",
                TeamId::Team2 => "Team 2",
            };
            let name = prompt(input, &format!("{label} name: ")).await?;
            let members = prompt(input, &format!("{label} members (comma separated): ")).await?;
            handle
                .dispatch(MatchEvent::ConfigureTeam {
                    team,
                    name,
                    members: parse_members(&members),
                })
                .await?;
        }

        match handle.dispatch(MatchEvent::Start).await {
            Ok(_) => return Ok(()),
            Err(DriverError::Rejected(MatchError::TeamsIncomplete)) => {
                println!("{}", MatchError::TeamsIncomplete);
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Relay answers and mute toggles until the last question is resolved.
async fn play(handle: &mut MatchHandle, input: &mut InputLines) -> anyhow::Result<()> {
    let mut state = handle.state();
    let mut cues = handle
        .take_cues()
        .context("audio cues already taken")?;

    let mut shown = None;
    println!("\nAnswer with 1-4, type `m` to toggle sound.");

    loop {
        let current = state.borrow_and_update().clone();
        if current.is_game_over() {
            // The last cue is queued before the final state is published.
            drain_cues(&mut cues);
            return Ok(());
        }
        if shown != Some(current.current_question_index()) {
            shown = Some(current.current_question_index());
            print_question(&current);
        }
        print_countdown(&current);

        tokio::select! {
            changed = state.changed() => changed.context("match driver stopped")?,
            Some(cue) = cues.recv() => print_cue(cue),
            line = input.next_line() => {
                let Some(line) = line.context("reading answer")? else {
                    bail!("input closed before the match ended");
                };
                handle_input(handle, line.trim()).await?;
            }
        }
    }
}

async fn handle_input(handle: &MatchHandle, line: &str) -> anyhow::Result<()> {
    let toggles_mute = line.eq_ignore_ascii_case("m");
    let event = if toggles_mute {
        MatchEvent::ToggleMute
    } else {
        match line.parse::<u8>() {
            Ok(option) => MatchEvent::Answer { option },
            Err(_) => {
                println!("Type a number from 1 to 4, or `m`.");
                return Ok(());
            }
        }
    };

    match handle.dispatch(event).await {
        Ok(state) => {
            if toggles_mute {
                println!("Sound {}.", if state.is_muted() { "off" } else { "on" });
            }
            Ok(())
        }
        Err(DriverError::Rejected(err)) => {
            println!("{err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Final scores, winner, then the leaderboard once the result has been stored.
async fn finish(handle: &MatchHandle) {
    let state = handle.state().borrow().clone();
    let total = state.question_count();

    println!("\n=== Game over ===");
    for (id, team) in state.teams().iter() {
        println!(
            "{} {}: {}/{}",
            state.feedback(id).emoji(),
            team.name,
            team.score,
            total
        );
    }
    if let Some(winner) = state.winner() {
        println!("Winner: {}", state.team(winner).name);
    }

    let mut leaderboard = handle.leaderboard();
    if tokio::time::timeout(LEADERBOARD_REFRESH_TIMEOUT, leaderboard.changed())
        .await
        .is_err()
    {
        println!("(leaderboard not refreshed yet)");
    }
    println!("\n=== Leaderboard ===");
    print_leaderboard(&LeaderboardView::from_rows(leaderboard.borrow().clone()));
}

async fn prompt(input: &mut InputLines, label: &str) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush().context("flushing stdout")?;
    match input.next_line().await.context("reading input")? {
        Some(line) => Ok(line.trim().to_owned()),
        None => bail!("input closed during team setup"),
    }
}

fn print_question(state: &MatchState) {
    let Some(question) = state.current_question() else {
        return;
    };
    let asking = state.team(state.asking_team());
    let answering = state.team(state.active_team());

    println!(
        "\nQuestion {}/{}: {} asks, {} answers",
        state.current_question_index() + 1,
        state.question_count(),
        asking.name,
        answering.name
    );
    println!("{}", question.prompt);
    for (index, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", index + 1);
    }
}

fn print_countdown(state: &MatchState) {
    if state.phase() != MatchPhase::Active {
        return;
    }
    print!("\r{:>2}s left > ", state.remaining_secs());
    let _ = io::stdout().flush();
}

fn print_cue(cue: TurnOutcome) {
    let text = match cue {
        TurnOutcome::Correct => "Correct!",
        TurnOutcome::Incorrect => "Wrong answer.",
        TurnOutcome::TimedOut => "Time's up!",
    };
    println!("\x07\n{text}");
}

fn drain_cues(cues: &mut UnboundedReceiver<TurnOutcome>) {
    while let Ok(cue) = cues.try_recv() {
        print_cue(cue);
    }
}

fn print_leaderboard(view: &LeaderboardView) {
    if view.is_empty() {
        println!("(no entries yet)");
        return;
    }
    for (rank, row) in view.rows().iter().enumerate() {
        match row {
            Ok(entry) => println!(
                "{:>2}. {} ({}) {}",
                rank + 1,
                entry.team_name,
                entry.members.join(", "),
                entry.score
            ),
            Err(err) => println!("{:>2}. {} [{err}]", rank + 1, err.score),
        }
    }
}

fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
