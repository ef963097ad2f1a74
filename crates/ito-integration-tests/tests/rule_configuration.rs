//! Rule tables and the rule manifest as seen by a whole run.

mod common;

use common::Fixture;
use ito_cli::RuleSettings;
use ito_core::{CheckStep, Issue};
use ito_rules::manifest::PrizeSpec;
use ito_rules::{RuleBook, RuleManifest, RulesError, MANIFEST_FILE};
use ito_validate::Validator;

#[test]
fn missing_table_is_configuration_missing() {
    let fx = Fixture::new();
    std::fs::remove_file(fx.rules_dir().join("event_trigger_keys.txt")).unwrap();

    let err = RuleBook::load_dir(fx.rules_dir()).unwrap_err();
    match err {
        RulesError::ConfigurationMissing { path } => {
            assert!(path.ends_with("event_trigger_keys.txt"));
        }
        other => panic!("expected ConfigurationMissing, got: {other}"),
    }
}

#[test]
fn manifest_registers_a_new_prize_type() {
    let fx = Fixture::new();
    fx.table("relic_values.txt", "amulet_01\n");
    fx.table("winprize_values.txt", "item\nrelic\n");

    let mut manifest = RuleManifest::default();
    manifest.event.prizes.push(prize_spec("relic"));
    let book = RuleBook::load(fx.rules_dir(), &manifest).unwrap();

    let ev = fx.file(
        "ev_01.ito",
        "[event]\nevent_winprize_1=\"relic\"\nevent_winnumber_1=\"amulet_02\"\n",
    );
    let result = Validator::new(book).validate(&ev).unwrap();
    let failure = result.failure.unwrap();
    assert_eq!(failure.step, CheckStep::Prizes);
    assert!(matches!(
        &failure.issues[..],
        [Issue::InvalidPrizeValue { prize_type, .. }] if prize_type == "relic"
    ));
}

#[test]
fn rules_yaml_in_rules_dir_is_picked_up() {
    let fx = Fixture::new();
    fx.table(
        MANIFEST_FILE,
        "mystery:\n  forced_marker: _force\n  trigger_keys: forced_keys.txt\n",
    );
    fx.table("forced_keys.txt", "event_force\n");

    fx.file("ev_01.ito", "[event]\nevent_name=\"x\n");
    let top = fx.file(
        "mystery.ito",
        "[mystery]\nevent_force=\"ev_01.ito\"\nevent_frc=\"ignored.ito\"\n",
    );

    let result = Validator::new(fx.book()).validate(&top).unwrap();
    let failure = result.failure.unwrap();
    // The new marker reached the event; the old one is an ordinary key now.
    assert!(failure.record.ends_with("ev_01.ito"));
    assert_eq!(failure.step, CheckStep::Quotes);
}

#[test]
fn explicit_config_overrides_rules_yaml() {
    let fx = Fixture::new();
    fx.table(MANIFEST_FILE, "mystery:\n  forced_marker: _force\n");
    let custom = fx.content.path().join("custom.yaml");
    std::fs::write(&custom, "mystery:\n  forced_marker: _go\n").unwrap();

    let settings = RuleSettings::resolve(Some(fx.rules_dir().to_path_buf()), Some(custom));
    assert_eq!(settings.manifest().unwrap().mystery.forced_marker, "_go");

    let settings = RuleSettings::resolve(Some(fx.rules_dir().to_path_buf()), None);
    assert_eq!(settings.manifest().unwrap().mystery.forced_marker, "_force");
}

#[test]
fn malformed_manifest_aborts_loading() {
    let fx = Fixture::new();
    fx.table(MANIFEST_FILE, "event:\n  prizes: {not: [a list\n");
    let err = RuleBook::load_dir(fx.rules_dir()).unwrap_err();
    assert!(matches!(err, RulesError::ManifestParse { .. }));
}

#[test]
fn summary_covers_registered_domains() {
    let fx = Fixture::new();
    let book = fx.book();
    let summary = book.summary();
    let item = summary
        .iter()
        .find(|(name, _)| name == "prize 'item' values")
        .unwrap();
    assert_eq!(item.1, 2);
}

fn prize_spec(prize_type: &str) -> PrizeSpec {
    PrizeSpec {
        prize_type: prize_type.to_string(),
        values: format!("{prize_type}_values.txt"),
    }
}
