//! Interactive draw handler
//!
//! Reads one key per line: `s`tart, `r`edraw, `n`ext group, `f`inish and
//! `b`ack. The session ends on `f`, `b` or end of input. While reels spin,
//! each frame redraws one status line in place.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::config::Settings;
use crate::draw::{
    PickAction, PickEvent, PickOrchestrator, PickOutcome, PickPhase, RandomIndexSelector, ReelKind, ReelSnapshot,
};
use crate::storage::Library;
use crate::utils::errors::Result;
use super::library::{find_class, find_question_set};
use super::write_text;

/// Map one input line to an action
pub fn parse_action(line: &str) -> Option<PickAction> {
    match line.trim().to_ascii_lowercase().as_str() {
        "s" | "start" => Some(PickAction::Start),
        "r" | "redraw" => Some(PickAction::ReDraw),
        "n" | "next" => Some(PickAction::NextGroup),
        "f" | "finish" => Some(PickAction::Finish),
        "b" | "back" | "q" => Some(PickAction::GoBack),
        _ => None,
    }
}

/// Handle `draw <class> <set>`
pub async fn handle_draw<R, W>(
    library: &Library,
    settings: &Settings,
    class: &str,
    set: &str,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let session = library.begin_draw(find_class(library, class)?, find_question_set(library, set)?)?;
    let orchestrator = PickOrchestrator::from_settings(session, settings, RandomIndexSelector::from_entropy())?;
    run_draw(orchestrator, input, out).await
}

/// Drive `orchestrator` from `input` until the session is done
pub async fn run_draw<R, W>(mut orchestrator: PickOrchestrator, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut events = orchestrator.subscribe();
    let mut frames = ReelFrames::subscribe(&orchestrator);
    let mut lines = input.lines();

    write_text(
        out,
        &format!(
            "Drawing from {} with {}\n",
            orchestrator.session().class_name(),
            orchestrator.session().question_set_name()
        ),
    )
    .await?;

    while orchestrator.phase() != PickPhase::Done {
        write_text(out, &prompt(&orchestrator.available_actions())).await?;

        let Some(line) = lines.next_line().await? else {
            info!("Input closed, leaving draw");
            break;
        };
        let Some(action) = parse_action(&line) else {
            write_text(out, &format!("Unknown key {:?}\n", line.trim())).await?;
            continue;
        };

        let result = {
            let perform = orchestrator.perform(action);
            tokio::pin!(perform);
            loop {
                tokio::select! {
                    result = &mut perform => break result,
                    Ok(()) = frames.group.changed() => frames.redraw(out).await?,
                    Ok(()) = frames.question.changed() => frames.redraw(out).await?,
                    Ok(()) = frames.pool.changed() => frames.redraw(out).await?,
                    Ok(()) = frames.student.changed() => frames.redraw(out).await?,
                }
            }
        };
        frames.finish_line(out).await?;

        match result {
            Ok(outcome) => {
                write_text(out, &drain_events(&mut events)).await?;
                if let Some(outcome) = outcome {
                    let total = orchestrator.session().original_group_count();
                    write_text(out, &describe_outcome(&outcome, total)).await?;
                }
            }
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Draw action failed");
                write_text(out, &format!("Cannot {}: {}\n", action, e)).await?;
            }
            Err(e) => return Err(e),
        }
    }

    write_text(
        out,
        &format!("Draw finished with {} picks\n", orchestrator.session().picked_count()),
    )
    .await
}

/// Live frames of every reel, drawn as one `\r`-refreshed line
struct ReelFrames {
    group: watch::Receiver<ReelSnapshot>,
    question: watch::Receiver<ReelSnapshot>,
    pool: watch::Receiver<ReelSnapshot>,
    student: watch::Receiver<ReelSnapshot>,
    last_line: String,
}

impl ReelFrames {
    fn subscribe(orchestrator: &PickOrchestrator) -> Self {
        let mut frames = Self {
            group: orchestrator.subscribe_reel(ReelKind::Group),
            question: orchestrator.subscribe_reel(ReelKind::Question),
            pool: orchestrator.subscribe_reel(ReelKind::Pool),
            student: orchestrator.subscribe_reel(ReelKind::Student),
            last_line: String::new(),
        };
        // Resting layouts are not worth a frame
        frames.group.borrow_and_update();
        frames.question.borrow_and_update();
        frames.pool.borrow_and_update();
        frames.student.borrow_and_update();
        frames
    }

    async fn redraw<W: AsyncWrite + Unpin>(&mut self, out: &mut W) -> Result<()> {
        let mut parts = Vec::with_capacity(4);
        for receiver in [&mut self.group, &mut self.question, &mut self.pool, &mut self.student] {
            let snapshot = receiver.borrow_and_update();
            if !snapshot.visible.is_empty() {
                parts.push(render_reel(&snapshot));
            }
        }
        let line = parts.join(" | ");
        if line.is_empty() || line == self.last_line {
            return Ok(());
        }
        write_text(out, &format!("\r{}", line)).await?;
        self.last_line = line;
        Ok(())
    }

    /// End the frame line so the next output starts on its own line
    async fn finish_line<W: AsyncWrite + Unpin>(&mut self, out: &mut W) -> Result<()> {
        if self.last_line.is_empty() {
            return Ok(());
        }
        self.last_line.clear();
        write_text(out, "\n").await
    }
}

/// `kind: a [b] c` with the row nearest the center bracketed
///
/// Rows away from the center are cut down in proportion to their emphasis.
fn render_reel(snapshot: &ReelSnapshot) -> String {
    let centered = snapshot
        .visible
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.emphasis.total_cmp(&b.emphasis))
        .map(|(position, _)| position);

    let rows: Vec<String> = snapshot
        .visible
        .iter()
        .enumerate()
        .map(|(position, row)| {
            if Some(position) == centered {
                format!("[{}]", row.text)
            } else {
                let keep = (row.text.chars().count() as f64 * row.emphasis).ceil() as usize;
                row.text.chars().take(keep.max(1)).collect()
            }
        })
        .collect();
    format!("{}: {}", snapshot.kind.as_str(), rows.join(" "))
}

fn prompt(actions: &[PickAction]) -> String {
    if actions.is_empty() {
        return "> ".to_string();
    }
    let keys: Vec<&str> = actions
        .iter()
        .map(|action| match action {
            PickAction::Start => "[s]tart",
            PickAction::ReDraw => "[r]edraw",
            PickAction::NextGroup => "[n]ext group",
            PickAction::Finish => "[f]inish",
            PickAction::GoBack => "[b]ack",
        })
        .collect();
    format!("{} > ", keys.join(" "))
}

fn drain_events(events: &mut broadcast::Receiver<PickEvent>) -> String {
    let mut text = String::new();
    loop {
        match events.try_recv() {
            Ok(PickEvent::GroupRemoved { name, remaining }) => {
                text.push_str(&format!("Group {} is done, {} left\n", name, remaining));
            }
            Ok(PickEvent::ReelSettled { reel, text: item, .. }) => {
                text.push_str(&format!("  {} reel stopped on {}\n", reel.as_str(), item));
            }
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped = skipped, "Draw events lagged");
            }
            Err(_) => break,
        }
    }
    text
}

fn describe_outcome(outcome: &PickOutcome, total_groups: usize) -> String {
    format!(
        "Group: {}\nStudent: {} ({})\nQuestion: {}\nPicked {} of {} groups\n",
        outcome.group.name,
        outcome.student.name,
        outcome.student.num,
        outcome.question.text,
        outcome.picked_count,
        total_groups
    )
}
