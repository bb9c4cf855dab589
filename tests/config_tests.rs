use clap::{CommandFactory, FromArgMatches, Parser};
use recall_wager::config::{
    validate_subject, BiasMode, DesignParams, PayoffTable, SessionArgs, StimulusParams,
};
use recall_wager::WagerError;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    session: SessionArgs,
}

fn parse(args: &[&str]) -> (TestCli, clap::ArgMatches) {
    let matches = TestCli::command().get_matches_from(std::iter::once("test").chain(args.iter().copied()));
    let cli = TestCli::from_arg_matches(&matches).unwrap();
    (cli, matches)
}

#[rstest]
#[case(16, true)]
#[case(48, true)]
#[case(548, true)]
#[case(12, false)]
#[case(552, false)]
#[case(18, false)]
#[case(0, false)]
fn test_n_items_bounds(#[case] n_items: usize, #[case] ok: bool) {
    let args = SessionArgs {
        n_items,
        ..SessionArgs::default()
    };
    assert_eq!(args.validate().is_ok(), ok, "n_items={}", n_items);
}

#[test]
fn test_n_items_error_kind() {
    let args = SessionArgs {
        n_items: 17,
        ..SessionArgs::default()
    };
    match args.validate() {
        Err(WagerError::InvalidInput(msg)) => assert!(msg.contains("multiple of 4")),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

// edge_blocks, guess_replications
#[rstest]
#[case(usize::MAX, 2)]
#[case(usize::MAX / 2 + 1, 2)]
#[case(2, 2)]
#[case(1, usize::MAX)]
#[case(1, 65)]
#[case(1, 0)]
fn test_design_counts_out_of_range(#[case] edge_blocks: usize, #[case] guess_replications: usize) {
    let params = DesignParams {
        edge_blocks,
        guess_replications,
        ..DesignParams::default()
    };
    assert!(matches!(
        params.validate(16),
        Err(WagerError::InvalidInput(_))
    ));
}

#[test]
fn test_design_counts_at_upper_bound() {
    let params = DesignParams {
        guess_replications: 64,
        ..DesignParams::default()
    };
    assert!(params.validate(16).is_ok());
}

#[rstest]
#[case("../p01")]
#[case("data/p01")]
#[case("p01\\x")]
#[case("..")]
#[case("")]
fn test_subject_must_be_a_file_name(#[case] subject: &str) {
    assert!(validate_subject(subject).is_err());
    let args = SessionArgs {
        subject: Some(subject.to_string()),
        ..SessionArgs::default()
    };
    assert!(matches!(args.validate(), Err(WagerError::InvalidInput(_))));
}

#[test]
fn test_plain_subject_ids_pass() {
    assert!(validate_subject("p01").is_ok());
    assert!(validate_subject("p.01-b").is_ok());
    assert!(validate_subject(&SessionArgs::default().subject_id()).is_ok());
}

#[test]
fn test_sources_capped_at_digit_keys() {
    let labels = |n: usize| {
        (0..n)
            .map(|i| format!("S{}:s{}_", i, i))
            .collect::<Vec<_>>()
            .join(",")
    };
    let ten = StimulusParams {
        sources: labels(10),
        ..StimulusParams::default()
    };
    assert_eq!(ten.parse_sources().unwrap().len(), 10);

    let eleven = StimulusParams {
        sources: labels(11),
        ..StimulusParams::default()
    };
    assert!(matches!(
        eleven.parse_sources(),
        Err(WagerError::InvalidInput(_))
    ));
}

#[test]
fn test_edge_blocks_must_leave_a_testable_block() {
    let mut args = SessionArgs {
        n_items: 16,
        ..SessionArgs::default()
    };
    args.design.edge_blocks = 2;
    assert!(args.validate().is_err());
    args.design.edge_blocks = 1;
    assert!(args.validate().is_ok());
}

#[test]
fn test_block_size_must_split_over_sources() {
    let mut args = SessionArgs::default();
    args.stimuli.sources = "A:a,B:b,C:c".to_string();
    assert!(args.validate().is_err());
    args.design.block_size = 6;
    args.design.practice_items = 6;
    args.n_items = 48;
    assert!(args.validate().is_ok());
}

#[test]
fn test_parse_sources() {
    let params = StimulusParams {
        sources: " A:a , B : face_ ".to_string(),
        ..StimulusParams::default()
    };
    let specs = params.parse_sources().unwrap();
    assert_eq!(specs.len(), 2);
    assert_eq!((specs[0].label.as_str(), specs[0].prefix.as_str()), ("A", "a"));
    assert_eq!((specs[1].label.as_str(), specs[1].prefix.as_str()), ("B", "face_"));
}

#[rstest]
#[case("A:a")]
#[case("A:a,A:b")]
#[case("A:a,B")]
#[case("A:a,:b")]
fn test_parse_sources_rejects(#[case] sources: &str) {
    let params = StimulusParams {
        sources: sources.to_string(),
        ..StimulusParams::default()
    };
    assert!(matches!(
        params.parse_sources(),
        Err(WagerError::InvalidInput(_))
    ));
}

#[test]
fn test_cli_defaults_and_alias() {
    let (cli, _) = parse(&[]);
    assert_eq!(cli.session.n_items, 48);
    assert_eq!(cli.session.bias, BiasMode::Within);
    assert_eq!(cli.session.payoffs, PayoffTable::default());

    let (cli, _) = parse(&["--n_items", "24", "--bias", "between", "--seed", "9"]);
    assert_eq!(cli.session.n_items, 24);
    assert_eq!(cli.session.bias, BiasMode::Between);
    assert_eq!(cli.session.seed, Some(9));
}

#[test]
fn test_payoff_file_with_cli_override() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"payoff_safe_hit": 5, "payoff_risky_miss": -4}}"#).unwrap();
    let path = file.path().to_string_lossy().into_owned();

    let (cli, matches) = parse(&["--payoffs", &path, "--payoff-risky-miss=-7"]);
    let table = cli.session.resolve_payoffs(Some(&matches)).unwrap();
    assert_eq!(
        table,
        PayoffTable {
            payoff_safe_hit: 5,
            payoff_risky_hit: 1,
            payoff_safe_miss: -1,
            payoff_risky_miss: -7,
        }
    );
}

#[test]
fn test_payoff_flags_without_file() {
    let (cli, matches) = parse(&["--payoff-safe-hit", "4", "--payoff-safe-miss", "-2"]);
    let table = cli.session.resolve_payoffs(Some(&matches)).unwrap();
    assert_eq!(table.payoff_safe_hit, 4);
    assert_eq!(table.payoff_safe_miss, -2);
    assert_eq!(table.payoff_risky_miss, -3);
}

#[test]
fn test_bad_payoff_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    let args = SessionArgs {
        payoffs_file: Some(file.path().to_string_lossy().into_owned()),
        ..SessionArgs::default()
    };
    assert!(matches!(
        args.resolve_payoffs(None),
        Err(WagerError::Json(_))
    ));
}

#[test]
fn test_subject_id() {
    let args = SessionArgs {
        subject: Some("p07".to_string()),
        ..SessionArgs::default()
    };
    assert_eq!(args.subject_id(), "p07");
    assert!(!SessionArgs::default().subject_id().is_empty());
}
