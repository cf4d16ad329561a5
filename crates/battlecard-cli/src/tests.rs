use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["battlecard"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_list_command() {
    let cli = Cli::try_parse_from(["battlecard", "list"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::List)));
}

#[test]
fn show_defaults_to_selection_and_all_sections() {
    let cli = Cli::try_parse_from(["battlecard", "show"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Show {
            id: None,
            section: None
        })
    ));
}

#[test]
fn show_parses_section_key() {
    let cli = Cli::try_parse_from(["battlecard", "show", "buffer", "--section", "red_flags"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Show {
            id: Some(ref id),
            section: Some(SectionType::RedFlags)
        }) if id == "buffer"
    ));
}

#[test]
fn show_rejects_unknown_section() {
    let result = Cli::try_parse_from(["battlecard", "show", "buffer", "--section", "gossip"]);
    assert!(result.is_err());
}

#[test]
fn add_requires_name_and_url() {
    let cli = Cli::try_parse_from([
        "battlecard",
        "add",
        "--name",
        "Later",
        "--url",
        "https://later.com",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Add { ref name, ref url }) if name == "Later" && url == "https://later.com"
    ));

    assert!(Cli::try_parse_from(["battlecard", "add", "--name", "Later"]).is_err());
}

#[test]
fn refresh_takes_id_or_all() {
    let cli = Cli::try_parse_from(["battlecard", "refresh", "hootsuite"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Refresh { id: Some(ref id), all: false }) if id == "hootsuite"
    ));

    let cli = Cli::try_parse_from(["battlecard", "refresh", "--all"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Refresh { id: None, all: true })
    ));
}

#[test]
fn refresh_needs_a_target() {
    assert!(Cli::try_parse_from(["battlecard", "refresh"]).is_err());
    assert!(Cli::try_parse_from(["battlecard", "refresh", "buffer", "--all"]).is_err());
}

#[test]
fn export_defaults_to_pdf_in_current_dir() {
    let cli = Cli::try_parse_from(["battlecard", "export", "buffer"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export {
            ref id,
            format: ExportFormat::Pdf,
            ref out,
        }) if id == "buffer" && out == &PathBuf::from(".")
    ));
}

#[test]
fn export_accepts_doc_alias() {
    let cli = Cli::try_parse_from([
        "battlecard",
        "export",
        "buffer",
        "--format",
        "doc",
        "--out",
        "reports",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Export {
            format: ExportFormat::Html,
            ref out,
            ..
        }) if out == &PathBuf::from("reports")
    ));
}

#[test]
fn export_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["battlecard", "export", "buffer", "--format", "xlsx"]).is_err());
}

#[test]
fn parses_logo_subcommands() {
    let cli = Cli::try_parse_from(["battlecard", "logo", "set", "brand.svg"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Logo {
            command: LogoCommands::Set { ref path }
        }) if path == &PathBuf::from("brand.svg")
    ));

    let cli = Cli::try_parse_from(["battlecard", "logo", "clear"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Logo {
            command: LogoCommands::Clear
        })
    ));
}

#[test]
fn ask_with_competitor() {
    let cli = Cli::try_parse_from([
        "battlecard",
        "ask",
        "How do they price?",
        "--competitor",
        "sprout_social",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Ask {
            ref question,
            competitor: Some(ref c),
        }) if question == "How do they price?" && c == "sprout_social"
    ));
}

#[test]
fn check_stale_dry_run() {
    let cli = Cli::try_parse_from(["battlecard", "check-stale", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::CheckStale { dry_run: true })
    ));
}
