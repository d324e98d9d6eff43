//! Human-readable session summaries.

use crate::orchestration::domain::{AbortReason, Outcome, SessionReport};

/// Renders the notification text for a closed session.
///
/// Every outcome produces a summary, so a session that did not finish still
/// tells its readers why.
#[must_use]
pub fn render_summary(report: &SessionReport) -> String {
    let invocations = report.transcript().invocations().count();
    let failed = report
        .transcript()
        .invocations()
        .filter(|invocation| !invocation.is_success())
        .count();
    let subject = report.subject();
    let rounds = report.rounds_used();

    let mut summary = match report.outcome() {
        Outcome::Completed { answer } => {
            format!("Review of {subject} completed after {rounds} round(s).\n\n{answer}")
        }
        Outcome::Aborted {
            reason: AbortReason::BudgetExhausted,
        } => format!(
            "Review of {subject} stopped: the turn budget ran out after {rounds} round(s) \
             without a final answer."
        ),
        Outcome::Aborted {
            reason: AbortReason::Cancelled,
        } => format!(
            "Review of {subject} was cancelled after {rounds} round(s), usually because a newer \
             event arrived for the same subject."
        ),
        Outcome::Failed { error } => {
            format!("Review of {subject} failed after {rounds} round(s): {error}.")
        }
    };

    if invocations > 0 {
        summary.push_str(&format!(
            "\n\nTool invocations: {invocations} ({failed} failed)."
        ));
    }
    summary
}
