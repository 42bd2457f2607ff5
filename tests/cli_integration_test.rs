//! CLI integration tests.
//!
//! Tests cover:
//! - Settings from INI content (build_settings)
//! - `FIELD=VALUE` parsing and snapshot assembly
//! - Table rendering
//! - derive / replay / check-config with real files on disk

mod common;

use common::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tradecalc::adapters::file_config_adapter::FileConfigAdapter;
use tradecalc::cli;
use tradecalc::domain::error::CalcError;
use tradecalc::domain::field::FieldId;
use tradecalc::domain::format::FormatOptions;
use tradecalc::domain::settings::Settings;

fn same_code(actual: ExitCode, expected: ExitCode) -> bool {
    format!("{actual:?}") == format!("{expected:?}")
}

const VALID_INI: &str = r#"
[engine]
max_rounds = 20
tolerance = 1e-10

[display]
precision = 2
integer_tolerance = 1e-4

[form]
missing_threshold = 4
"#;

mod settings {
    use super::*;

    #[test]
    fn build_settings_reads_every_key() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let settings = cli::build_settings(&adapter).unwrap();

        assert_eq!(settings.max_rounds, 20);
        assert!((settings.tolerance - 1e-10).abs() < f64::EPSILON);
        assert_eq!(settings.format.precision, 2);
        assert!((settings.format.integer_tolerance - 1e-4).abs() < f64::EPSILON);
        assert_eq!(settings.missing_threshold, 4);
    }

    #[test]
    fn build_settings_uses_defaults() {
        let adapter = FileConfigAdapter::from_string("[engine]\n").unwrap();
        let settings = cli::build_settings(&adapter).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn build_settings_rejects_invalid_value() {
        let adapter = FileConfigAdapter::from_string("[engine]\nmax_rounds = 0\n").unwrap();
        let err = cli::build_settings(&adapter).unwrap_err();
        assert!(matches!(err, CalcError::ConfigInvalid { key, .. } if key == "max_rounds"));
    }

    #[test]
    fn configured_round_cap_reaches_engine() {
        let adapter = FileConfigAdapter::from_string("[engine]\nmax_rounds = 3\n").unwrap();
        let engine = cli::build_settings(&adapter).unwrap().engine();
        assert_eq!(engine.max_rounds(), 3);
    }
}

mod assignments {
    use super::*;

    #[test]
    fn parse_assignment_accepts_both_spellings() {
        assert_eq!(
            cli::parse_assignment("entryPrice=100").unwrap(),
            (FieldId::EntryPrice, Some(100.0))
        );
        assert_eq!(
            cli::parse_assignment("position_amount=1,500").unwrap(),
            (FieldId::PositionAmount, Some(1500.0))
        );
    }

    #[test]
    fn empty_value_is_unknown() {
        assert_eq!(
            cli::parse_assignment("quantity=").unwrap(),
            (FieldId::Quantity, None)
        );
    }

    #[test]
    fn missing_equals_sign_fails() {
        let err = cli::parse_assignment("entryPrice").unwrap_err();
        assert!(matches!(err, CalcError::UnknownField { .. }));
    }

    #[test]
    fn out_of_domain_value_fails() {
        let err = cli::parse_assignment("slPercent=120").unwrap_err();
        assert!(matches!(
            err,
            CalcError::InvalidInput { field: FieldId::SlPercent, .. }
        ));
        assert!(cli::parse_assignment("riskReward=-1.5").is_ok());
    }

    #[test]
    fn build_snapshot_later_assignment_wins() {
        let snapshot = cli::build_snapshot(&[
            "entryPrice=100".to_string(),
            "slPrice=90".to_string(),
            "entryPrice=110".to_string(),
        ])
        .unwrap();
        assert_eq!(snapshot.get(FieldId::EntryPrice), Some(110.0));
        assert_eq!(snapshot.get(FieldId::SlPrice), Some(90.0));
        assert_eq!(snapshot.known_count(), 2);
    }

    #[test]
    fn build_snapshot_unknown_field_fails() {
        let err = cli::build_snapshot(&["leverage=5".to_string()]).unwrap_err();
        assert!(matches!(err, CalcError::UnknownField { name } if name == "leverage"));
    }
}

mod rendering {
    use super::*;

    #[test]
    fn table_lists_every_field_in_order() {
        let s = snapshot(&[(FieldId::EntryPrice, 100.0), (FieldId::SlPercent, 12.5)]);
        let table = cli::render_table(&s, &FormatOptions::default());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), FieldId::COUNT);
        assert_eq!(lines[0], "Entry Price      100");
        assert_eq!(lines[1], "SL Price         -");
        assert_eq!(lines[2], "SL %             12.5");
        assert!(lines[9].starts_with("Profit Amount"));
    }
}

mod commands {
    use super::*;

    #[test]
    fn derive_succeeds() {
        let code = cli::run_derive(
            &["entryPrice=100".to_string(), "slPrice=90".to_string()],
            "slPrice",
            None,
        );
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn derive_with_config_file() {
        let file = write_temp_file(VALID_INI);
        let path = PathBuf::from(file.path());
        let code = cli::run_derive(&["riskAmount=100".to_string()], "riskAmount", Some(&path));
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn derive_unknown_edited_field_fails() {
        let code = cli::run_derive(&["entryPrice=100".to_string()], "leverage", None);
        assert!(same_code(code, ExitCode::from(3)));
    }

    #[test]
    fn derive_invalid_value_fails() {
        let code = cli::run_derive(&["entryPrice=-4".to_string()], "entryPrice", None);
        assert!(same_code(code, ExitCode::from(3)));
    }

    #[test]
    fn derive_missing_config_fails() {
        let path = PathBuf::from("/nonexistent/tradecalc.ini");
        let code = cli::run_derive(&[], "entryPrice", Some(&path));
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn replay_script_from_disk() {
        let script = write_temp_file(
            "field,value\nentryPrice,100\nslPercent,10\nriskAmount,50\ntargetPrice,125\n",
        );
        let code = cli::run_replay(&PathBuf::from(script.path()), None);
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn replay_with_rejected_rows_still_succeeds() {
        let script = write_temp_file("field,value\nslPercent,500\nentryPrice,10\n");
        let code = cli::run_replay(&PathBuf::from(script.path()), None);
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn replay_bad_script_fails() {
        let script = write_temp_file("field,value\nnotAField,1\n");
        let code = cli::run_replay(&PathBuf::from(script.path()), None);
        assert!(same_code(code, ExitCode::from(4)));
    }

    #[test]
    fn replay_missing_script_fails() {
        let code = cli::run_replay(&PathBuf::from("/nonexistent/edits.csv"), None);
        assert!(same_code(code, ExitCode::from(4)));
    }

    #[test]
    fn check_config_valid_and_invalid() {
        let good = write_temp_file(VALID_INI);
        let code = cli::run(cli::Cli {
            command: cli::Command::CheckConfig {
                config: PathBuf::from(good.path()),
            },
        });
        assert!(same_code(code, ExitCode::SUCCESS));

        let bad = write_temp_file("[display]\nprecision = 99\n");
        let code = cli::run(cli::Cli {
            command: cli::Command::CheckConfig {
                config: PathBuf::from(bad.path()),
            },
        });
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn fields_command_succeeds() {
        let code = cli::run(cli::Cli {
            command: cli::Command::Fields,
        });
        assert!(same_code(code, ExitCode::SUCCESS));
    }
}
