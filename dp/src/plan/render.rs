//! Agenda rendering

use super::types::Plan;

/// Newline-joined agenda: a heading plus one `HH:MM–HH:MM — title` line
/// per task, in the plan's (ascending start) order.
pub fn render_agenda(plan: &Plan) -> String {
    if plan.tasks.is_empty() {
        return "Nothing to schedule.".to_string();
    }

    let mut lines = vec![format!("Agenda for {}:", plan.label)];
    for t in &plan.tasks {
        lines.push(format!(
            "{}–{} — {}",
            t.start.format("%H:%M"),
            t.end().format("%H:%M"),
            t.title
        ));
    }
    lines.join("\n")
}
