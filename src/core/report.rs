use crate::core::{Grouping, HistoryLog};

/// `Team N: a, b` per group, blank line between groups.
pub fn render_grouping(grouping: &Grouping) -> String {
    grouping
        .iter()
        .enumerate()
        .map(|(i, team)| {
            let names: Vec<&str> = team.iter().map(|p| p.as_str()).collect();
            format!("Team {}: {}", i + 1, names.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_history(history: &HistoryLog) -> String {
    if history.is_empty() {
        return "(no history)".to_string();
    }

    history
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "#{} {}\n{}",
                i + 1,
                entry.timestamp.to_rfc3339(),
                render_grouping(&entry.teams)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
