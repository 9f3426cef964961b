use colored::{ColoredString, Colorize};

use crate::core::render;
use crate::core::{EvaluationResult, ItemState, State};

/// State name colored the way monitoring GUIs show it
pub fn format_state(state: State) -> ColoredString {
    match state {
        State::Ok => state.name().green().bold(),
        State::Warn => state.name().yellow().bold(),
        State::Crit => state.name().red().bold(),
        State::Unknown => state.name().magenta().bold(),
    }
}

/// `STATE - text | perfdata`, the classic plugin output line
pub fn format_result(result: &EvaluationResult) -> String {
    let mut line = format!("{} - {}", format_state(result.state), result.text);
    if !result.perfdata.is_empty() {
        line.push_str(&format!(" | {}", result.perf_string().dimmed()));
    }
    line
}

/// One line per stored item for `store list`
pub fn format_item_state(key: &str, state: &ItemState) -> String {
    match state {
        ItemState::Counter(counter) => format!(
            "{}  {} {} ({})",
            key.cyan(),
            "counter".dimmed(),
            counter.last_value,
            render::timestamp(counter.last_timestamp)
        ),
        ItemState::Average { timestamp, average } => format!(
            "{}  {} {:.2} ({})",
            key.cyan(),
            "average".dimmed(),
            average,
            render::timestamp(*timestamp)
        ),
    }
}
