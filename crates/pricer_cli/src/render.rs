use pricer_core::{Msg, PricerViewModel};

/// Console line for a progress message, if it deserves one.
pub fn progress_line(msg: &Msg) -> Option<String> {
    match msg {
        Msg::CardSearchEnded {
            source,
            card,
            outcome,
        } => Some(format!("[{source}] {card}: {outcome}")),
        Msg::SourceEnded { source } => Some(format!("[{source}] finished")),
        Msg::SourceFailed { source, message } => Some(format!("[{source}] failed: {message}")),
        Msg::SearchFinished { cancelled: true } => Some("Search stopped.".to_string()),
        _ => None,
    }
}

/// One status line per source, e.g. `Draco: stopped at 3/10`.
pub fn source_summary(view: &PricerViewModel) -> Vec<String> {
    view.sources
        .iter()
        .map(|source| format!("{}: {}", source.source, source.status_label()))
        .collect()
}
