use std::path::PathBuf;

use clap::Parser;

/// Prices a card list at the supported web shops.
///
/// Press Enter while searching to stop after the current card.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "card-pricer", version, about)]
pub struct CliArgs {
    /// Card list to price, one card per line with an optional quantity.
    #[arg(required_unless_present_any = ["list_sources", "url"])]
    pub deck: Option<PathBuf>,

    /// Read settings from this RON file instead of `card_pricer.ron`.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Search only this source; repeat for more.
    #[arg(long = "source", value_name = "NAME")]
    pub sources: Vec<String>,

    /// Write the price grid as CSV.
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Write the price grid as a text table.
    #[arg(long, value_name = "FILE")]
    pub txt: Option<PathBuf>,

    /// Write CSV, text and card list reports to the output directory.
    #[arg(long)]
    pub export: bool,

    /// Print the known sources and exit.
    #[arg(long)]
    pub list_sources: bool,

    /// Print each source's search page for a card and exit.
    #[arg(long, value_name = "CARD")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("card-pricer").chain(args.iter().copied()))
    }

    #[test]
    fn definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn full_command_line() {
        let args = parse(&[
            "deck.txt",
            "--source",
            "Draco",
            "--source",
            "Cerny Rytir",
            "--csv",
            "out.csv",
            "--export",
        ])
        .unwrap();
        assert_eq!(
            args,
            CliArgs {
                deck: Some(PathBuf::from("deck.txt")),
                config: None,
                sources: vec!["Draco".to_string(), "Cerny Rytir".to_string()],
                csv: Some(PathBuf::from("out.csv")),
                txt: None,
                export: true,
                list_sources: false,
                url: None,
            }
        );
    }

    #[test]
    fn lookups_need_no_deck() {
        let args = parse(&["--url", "Lightning Bolt"]).unwrap();
        assert_eq!(args.url.as_deref(), Some("Lightning Bolt"));
        assert!(parse(&["--list-sources"]).unwrap().list_sources);
    }

    #[test]
    fn errors_name_the_problem() {
        let kind = |args: &[&str]| parse(args).unwrap_err().kind();
        assert_eq!(kind(&[]), ErrorKind::MissingRequiredArgument);
        assert_eq!(kind(&["deck.txt", "--csv"]), ErrorKind::InvalidValue);
        assert_eq!(kind(&["deck.txt", "--fast"]), ErrorKind::UnknownArgument);
        assert_eq!(kind(&["a.txt", "b.txt"]), ErrorKind::UnknownArgument);
    }
}
