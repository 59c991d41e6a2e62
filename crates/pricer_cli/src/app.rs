use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::{anyhow, bail, Context};
use chrono::Local;
use pricer_core::{format_card_list, parse_card_list, update, Msg, Phase, PricerState, SourceId};
use pricer_engine::vendors::default_sources;
use pricer_engine::{AtomicFileWriter, PriceGrid, PriceSource, ReportKind, SearchEngine};
use pricer_logging::{pricer_info, pricer_warn, LogDestination};

use crate::args::CliArgs;
use crate::config::{load_config, PricerConfig};
use crate::effects::EffectRunner;
use crate::render;

const CSV_SEPARATOR: &str = ",";

pub fn run(args: CliArgs) -> anyhow::Result<()> {
    let (config, config_error) = match load_config(args.config.as_deref()) {
        Ok(config) => (config, None),
        Err(err) => (PricerConfig::default(), Some(err)),
    };
    if !pricer_logging::initialize(config.log, config.level_filter())
        && config.log != LogDestination::Off
    {
        eprintln!("warning: no logger installed, continuing without a log");
    }
    if let Some(err) = config_error {
        pricer_warn!("{err}; using defaults");
        eprintln!("warning: {err}; using defaults");
    }

    let sources = default_sources(&config.fetch).context("setting up the built-in sources")?;
    if args.list_sources {
        for source in &sources {
            let identity = source.identity();
            println!(
                "{:<16} {} ({})",
                identity.name(),
                identity.base_url(),
                identity.currency()
            );
        }
        return Ok(());
    }
    if let Some(card) = &args.url {
        for source in &sources {
            println!("{}: {}", source.identity().name(), source.search_url(card));
        }
        return Ok(());
    }

    let deck = args.deck.as_deref().ok_or_else(|| anyhow!("no deck file given"))?;
    let text = fs::read_to_string(deck).with_context(|| format!("reading {}", deck.display()))?;
    let entries = parse_card_list(&text).with_context(|| format!("parsing {}", deck.display()))?;
    let wanted = if args.sources.is_empty() {
        &config.enabled_sources
    } else {
        &args.sources
    };
    let enabled = select_sources(&sources, wanted)?;
    pricer_info!("Pricing {} with {} cards", deck.display(), entries.len());

    let engine = Arc::new(SearchEngine::new(sources)?);
    let (msg_tx, msg_rx) = mpsc::channel();
    let runner = EffectRunner::new(engine.clone(), msg_tx.clone());

    let mut state = PricerState::new();
    let mut startup = vec![Msg::CardsImported(entries)];
    startup.extend(enabled.into_iter().map(Msg::ToggleSource));
    startup.push(Msg::StartClicked);
    for msg in startup {
        state = dispatch(state, msg, &runner);
    }
    if state.phase() != Phase::Searching {
        bail!(failure_text(&state));
    }

    let view = state.view();
    println!(
        "Searching {} cards at {} sources, press Enter to stop.",
        view.rows.len(),
        view.columns.len()
    );
    spawn_stop_on_enter(msg_tx);

    while state.phase() == Phase::Searching {
        let msg = msg_rx.recv().context("search events stopped arriving")?;
        if let Some(line) = render::progress_line(&msg) {
            println!("{line}");
        }
        state = dispatch(state, msg, &runner);
    }
    if state.phase() != Phase::Finished {
        bail!(failure_text(&state));
    }
    engine.wait();

    let grid = PriceGrid::build(state.settings(), &engine.stores());
    println!();
    print!("{}", grid.to_fixed_width());
    for line in render::source_summary(&state.view()) {
        println!("{line}");
    }

    write_reports(&args, &config, &state, &grid)
}

fn dispatch(state: PricerState, msg: Msg, runner: &EffectRunner) -> PricerState {
    let (state, effects) = update(state, msg);
    runner.apply(effects);
    state
}

fn failure_text(state: &PricerState) -> String {
    state
        .view()
        .last_error
        .unwrap_or_else(|| "the search did not start".to_string())
}

fn spawn_stop_on_enter(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || stop_on_enter(io::stdin().lock(), &msg_tx));
}

/// Sends `StopClicked` once a line arrives. A closed or failing input never
/// stops the search.
fn stop_on_enter(mut input: impl BufRead, msg_tx: &mpsc::Sender<Msg>) -> bool {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(read) if read > 0 => msg_tx.send(Msg::StopClicked).is_ok(),
        _ => false,
    }
}

/// Maps source names to ids, ignoring case. No names selects every source.
pub fn select_sources(
    available: &[Arc<dyn PriceSource>],
    names: &[String],
) -> anyhow::Result<Vec<SourceId>> {
    if names.is_empty() {
        return Ok(available.iter().map(|source| source.id().clone()).collect());
    }
    let mut selected: Vec<SourceId> = Vec::new();
    for name in names {
        let source = available
            .iter()
            .find(|source| source.identity().name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                let known: Vec<&str> = available.iter().map(|s| s.identity().name()).collect();
                anyhow!("unknown source '{name}', known sources: {}", known.join(", "))
            })?;
        if !selected.contains(source.id()) {
            selected.push(source.id().clone());
        }
    }
    Ok(selected)
}

fn write_reports(
    args: &CliArgs,
    config: &PricerConfig,
    state: &PricerState,
    grid: &PriceGrid,
) -> anyhow::Result<()> {
    let csv = grid.to_delimited(CSV_SEPARATOR);
    let text = grid.to_fixed_width();

    if let Some(path) = &args.csv {
        write_to(path, &csv)?;
    }
    if let Some(path) = &args.txt {
        write_to(path, &text)?;
    }
    if args.export {
        let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
        let writer = AtomicFileWriter::new(config.output_dir.clone());
        let card_list = format_card_list(&state.settings().entries());
        for (kind, content) in [
            (ReportKind::Csv, &csv),
            (ReportKind::Text, &text),
            (ReportKind::CardList, &card_list),
        ] {
            let path = writer
                .write(&kind.export_name(&stamp), content)
                .with_context(|| format!("exporting to {}", config.output_dir.display()))?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn write_to(path: &Path, content: &str) -> anyhow::Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("{} is not a file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let written = AtomicFileWriter::new(dir)
        .write(file_name, content)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {}", written.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use pricer_engine::FetchSettings;
    use tempfile::TempDir;

    use super::*;

    fn sources() -> Vec<Arc<dyn PriceSource>> {
        default_sources(&FetchSettings::default()).unwrap()
    }

    #[test]
    fn no_names_select_every_source() {
        let selected = select_sources(&sources(), &[]).unwrap();
        let names: Vec<&str> = selected.iter().map(|id| id.name()).collect();
        assert_eq!(names, vec!["Cerny Rytir", "Draco", "Modra Vevericka"]);
    }

    #[test]
    fn names_match_ignoring_case() {
        let names = vec!["draco".to_string(), "CERNY RYTIR".to_string(), "Draco".to_string()];
        let selected = select_sources(&sources(), &names).unwrap();
        let names: Vec<&str> = selected.iter().map(|id| id.name()).collect();
        assert_eq!(names, vec!["Draco", "Cerny Rytir"]);
    }

    #[test]
    fn unknown_name_lists_known_sources() {
        let err = select_sources(&sources(), &["Troll".to_string()]).unwrap_err();
        assert!(err.to_string().contains("known sources: Cerny Rytir, Draco, Modra Vevericka"));
    }

    #[test]
    fn enter_stops_but_closed_input_does_not() {
        let (tx, rx) = mpsc::channel();
        assert!(!stop_on_enter(io::empty(), &tx));
        assert!(rx.try_recv().is_err());

        assert!(stop_on_enter(io::Cursor::new("\n"), &tx));
        assert!(matches!(rx.try_recv(), Ok(Msg::StopClicked)));
    }

    #[test]
    fn reports_go_next_to_the_named_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prices.csv");
        let written = write_to(&path, "Name,\n").unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read_to_string(path).unwrap(), "Name,\n");
    }
}
