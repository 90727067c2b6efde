//! Line-oriented terminal front end.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, instrument};

use crate::client::{ClientError, GameBackend};
use crate::reconciler::{LocalView, Reconciler};

const GALLOWS: [&str; 7] = [
    "  +---+\n      |\n      |\n      |\n     ===",
    "  +---+\n  O   |\n      |\n      |\n     ===",
    "  +---+\n  O   |\n  |   |\n      |\n     ===",
    "  +---+\n  O   |\n /|   |\n      |\n     ===",
    "  +---+\n  O   |\n /|\\  |\n      |\n     ===",
    "  +---+\n  O   |\n /|\\  |\n /    |\n     ===",
    "  +---+\n  O   |\n /|\\  |\n / \\  |\n     ===",
];

/// A line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Guess a letter.
    Guess(String),
    /// Start a new game.
    Start,
    /// Abandon the current game and start over.
    Reset,
    /// Show win/loss totals.
    Stats,
    /// Reload the game from the server.
    Refresh,
    /// Hide the win or loss notice.
    Dismiss,
    /// Leave.
    Quit,
    /// Blank line.
    Empty,
}

impl Command {
    /// Parses one input line. Anything not a known command is a guess.
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            ":start" | ":new" => Self::Start,
            ":reset" => Self::Reset,
            ":stats" => Self::Stats,
            ":refresh" => Self::Refresh,
            ":ok" => Self::Dismiss,
            ":quit" | ":q" => Self::Quit,
            other => Self::Guess(other.to_string()),
        }
    }
}

/// Gallows figure for a number of wrong guesses out of a budget.
pub fn gallows(wrong: u8, max_attempts: u8) -> &'static str {
    let stages = GALLOWS.len() - 1;
    let stage = if max_attempts == 0 {
        0
    } else {
        (usize::from(wrong) * stages).div_ceil(usize::from(max_attempts))
    };
    GALLOWS[stage.min(stages)]
}

/// Renders the whole screen for a view.
pub fn render(view: &LocalView) -> String {
    if !view.initialized() {
        return format!(
            "{}\n\nType :start to begin, :refresh to reload, :quit to leave.\n",
            view.status_message()
        );
    }

    let mut out = String::new();
    out.push_str(gallows(view.wrong_guesses(), *view.max_attempts()));
    out.push_str("\n\n");
    out.push_str(&format!("  {}\n\n", view.spaced_word()));

    let guessed: String = view.guessed_letters().iter().collect();
    out.push_str(&format!(
        "Guessed: {}   Attempts: {}/{}\n",
        if guessed.is_empty() { "-" } else { guessed.as_str() },
        view.remaining_attempts(),
        view.max_attempts()
    ));

    if *view.show_celebration() {
        out.push_str("\n*** You won! ***  (:ok to dismiss, :reset to play again)\n");
    } else if *view.show_failure() {
        out.push_str("\n*** You lost. ***  (:ok to dismiss, :reset to play again)\n");
    }
    out.push_str(&format!("{}\n", view.status_message()));
    out
}

fn prompt(view: &LocalView) -> &'static str {
    if view.accepts_guess() {
        "guess> "
    } else {
        "> "
    }
}

/// Runs the interactive loop on stdin/stdout until `:quit` or end of input.
///
/// Request failures are shown to the player and the loop carries on.
///
/// # Errors
///
/// Fails only if the terminal itself cannot be read or written.
#[instrument(skip(reconciler), fields(player_id = %reconciler.session().player_id()))]
pub async fn run<B: GameBackend>(mut reconciler: Reconciler<B>) -> anyhow::Result<()> {
    info!("Starting terminal session");
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Failures are recorded on the view and rendered below.
    let _ = reconciler.refresh().await;
    if !reconciler.view().initialized() && reconciler.view().last_error().is_none() {
        let _ = reconciler.start().await;
    }

    loop {
        let screen = render(reconciler.view());
        stdout.write_all(screen.as_bytes()).await?;
        stdout.write_all(prompt(reconciler.view()).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("End of input");
            break;
        };

        let result = match Command::parse(&line) {
            Command::Quit => break,
            Command::Empty => Ok(()),
            Command::Dismiss => {
                reconciler.dismiss_notice();
                Ok(())
            }
            Command::Start => reconciler.start().await,
            Command::Reset => reconciler.reset().await,
            Command::Refresh => reconciler.refresh().await,
            Command::Guess(input) => reconciler.guess(&input).await,
            Command::Stats => match reconciler
                .backend()
                .stats(reconciler.session().player_id())
                .await
            {
                Ok(stats) => {
                    let text = format!(
                        "Played {} | won {} | lost {} | win rate {:.0}%\n",
                        stats.total_games(),
                        stats.wins(),
                        stats.losses(),
                        stats.win_rate()
                    );
                    stdout.write_all(text.as_bytes()).await?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
        };

        if let Err(ClientError::Transport(reason)) = &result {
            let text = format!("Could not reach the game server ({}). Try again.\n", reason);
            stdout.write_all(text.as_bytes()).await?;
        } else if let Err(e) = &result {
            debug!(error = %e, "Command rejected");
        }
    }

    info!("Terminal session ended");
    Ok(())
}
