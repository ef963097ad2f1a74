//! End-to-end validation of content graphs loaded from real rule tables.

mod common;

use common::{Fixture, BAT};
use ito_core::{CheckStep, Issue, RecordKind};
use ito_validate::{ValidateError, Validator};

fn mystery(fx: &Fixture, body: &str) -> std::path::PathBuf {
    fx.file("mystery.ito", &format!("[mystery]\n{body}"))
}

// ---------------------------------------------------------------------------
// Passing graphs
// ---------------------------------------------------------------------------

#[test]
fn full_chain_validates_with_one_event_and_one_enemy() {
    let fx = Fixture::new();
    fx.asset("title.png");
    fx.asset("gfx/ev.png");
    fx.asset("gfx/bat.png");
    fx.file("bat.ito", BAT);
    fx.file(
        "ev_01.ito",
        "[event]\n\
         event_image=\"mystery/gfx/ev.png\"\n\
         location=\"cave\"\n\
         event_winprize_1=\"trigger_enemy\"\n\
         event_winnumber_1=\"mystery/bat.ito\"\n\
         event_failprize_1=\"item\"\n\
         event_failnumber_1=\"shield_02\"\n",
    );
    let top = mystery(
        &fx,
        "mystery_image=\"gfx/title.png\"\nmystery_music=\"battle\"\nevent_frc=\"mystery/ev_01.ito\"\n",
    );

    let result = Validator::new(fx.book()).validate(&top).unwrap();
    assert!(result.ok, "errors: {:?}", result.errors);
    assert!(result.errors.is_empty());
    assert_eq!(result.events.len(), 1);
    assert_eq!(result.enemies.len(), 1);
}

#[test]
fn shared_enemy_is_validated_once() {
    let fx = Fixture::new();
    fx.asset("gfx/bat.png");
    fx.file("bat.ito", BAT);
    for name in ["ev_01.ito", "ev_02.ito"] {
        fx.file(
            name,
            "[event]\nevent_winprize_1=\"trigger_enemy\"\nevent_winnumber_1=\"mystery/bat.ito\"\n",
        );
    }
    let top = fx.file(
        "mystery.ito",
        "[mystery]\nevent_frc=\"mystery/ev_01.ito\"\nsecond_frc=\"ev_02.ito\"\n",
    );

    let result = Validator::new(fx.book()).validate(&top).unwrap();
    assert!(result.ok, "errors: {:?}", result.errors);
    assert_eq!(result.events.len(), 2);
    assert_eq!(result.enemies.len(), 1);
}

#[test]
fn event_cycle_through_fail_branch_terminates() {
    let fx = Fixture::new();
    fx.file(
        "ev_a.ito",
        "[event]\nevent_failprize_1=\"trigger_event\"\nevent_failnumber_1=\"mystery/ev_b.ito\"\n",
    );
    fx.file(
        "ev_b.ito",
        "[event]\nevent_winprize_2=\"trigger_event\"\nevent_winnumber_2=\"mystery/ev_a.ito\"\n",
    );
    let top = mystery(&fx, "event_frc=\"mystery/ev_a.ito\"\n");

    let result = Validator::new(fx.book()).validate(&top).unwrap();
    assert!(result.ok, "errors: {:?}", result.errors);
    assert_eq!(result.events.len(), 2);
}

#[test]
fn backslash_references_resolve() {
    let fx = Fixture::new();
    fx.asset("gfx/ev.png");
    let ev = fx.file("ev_01.ito", "[event]\nevent_image=\"mystery\\gfx\\ev.png\"\n");

    let result = Validator::new(fx.book()).validate(&ev).unwrap();
    assert!(result.ok, "errors: {:?}", result.errors);
}

#[test]
fn allowed_duplicate_keys_pass() {
    let fx = Fixture::new();
    let ev = fx.file(
        "ev_01.ito",
        "[event]\nevent_text=\"one\"\nevent_text=\"two\"\n",
    );
    let result = Validator::new(fx.book()).validate(&ev).unwrap();
    assert!(result.ok);
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[test]
fn duplicate_key_reports_exact_lines() {
    let fx = Fixture::new();
    let ev = fx.file(
        "ev_01.ito",
        "[event]\nlocation=\"cave\"\n\nevent_text=\"a\"\nlocation=\"forest\"\n",
    );

    let result = Validator::new(fx.book()).validate(&ev).unwrap();
    let failure = result.failure.unwrap();
    assert_eq!(failure.step, CheckStep::Duplicates);
    assert_eq!(
        failure.issues,
        vec![Issue::DuplicateKey {
            key: "location".to_string(),
            first_line: 2,
            second_line: 5,
        }]
    );
}

#[test]
fn failure_deep_in_the_graph_surfaces_that_record() {
    let fx = Fixture::new();
    fx.file(
        "bat.ito",
        "[enemy]\nweakness=\"water\"\nlocation=\"swamp\"\n",
    );
    fx.file(
        "ev_01.ito",
        "[event]\nevent_winprize_1=\"trigger_enemy\"\nevent_winnumber_1=\"mystery/bat.ito\"\n",
    );
    let top = mystery(&fx, "event_frc=\"mystery/ev_01.ito\"\n");

    let result = Validator::new(fx.book()).validate(&top).unwrap();
    assert!(!result.ok);
    let failure = result.failure.unwrap();
    assert_eq!(failure.kind, RecordKind::Enemy);
    assert_eq!(failure.step, CheckStep::KeyValues);
    // Both domain violations of the step are reported together.
    assert_eq!(failure.issues.len(), 2);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().all(|e| e.starts_with("bat.ito: ")));
}

#[test]
fn prize_domain_applies_only_to_its_prize_type() {
    let fx = Fixture::new();
    let ev = fx.file(
        "ev_01.ito",
        "[event]\n\
         event_winprize_1=\"curse_ex\"\n\
         event_winnumber_1=\"sword_01\"\n\
         event_winprize_2=\"item\"\n\
         event_winnumber_2=\"sword_01\"\n",
    );

    let result = Validator::new(fx.book()).validate(&ev).unwrap();
    let failure = result.failure.unwrap();
    assert_eq!(failure.step, CheckStep::Prizes);
    assert_eq!(
        failure.issues,
        vec![Issue::InvalidPrizeValue {
            key: "event_winnumber_1".to_string(),
            value: "sword_01".to_string(),
            prize_type: "curse_ex".to_string(),
        }]
    );
}

#[test]
fn restricted_trigger_target_is_rejected() {
    let fx = Fixture::new();
    fx.file("rat.ito", BAT);
    let ev = fx.file(
        "ev_01.ito",
        "[event]\nevent_winprize_1=\"trigger_enemy\"\nevent_winnumber_1=\"mystery/rat.ito\"\n",
    );

    let result = Validator::new(fx.book()).validate(&ev).unwrap();
    let failure = result.failure.unwrap();
    assert_eq!(failure.step, CheckStep::TriggerReferences);
    assert_eq!(
        failure.issues,
        vec![Issue::RestrictedFilename {
            key: "event_winnumber_1".to_string(),
            filename: "rat.ito".to_string(),
        }]
    );
}

#[test]
fn fixed_prefix_is_stripped_for_mystery_assets() {
    let fx = Fixture::new();
    fx.asset("gfx/title.png");
    let top = mystery(&fx, "mystery_image=\"gfx/title.png\"\n");

    // "gfx/" is the key's required root and is stripped, so the file must
    // sit at the content root.
    let result = Validator::new(fx.book()).validate(&top).unwrap();
    let failure = result.failure.unwrap();
    assert_eq!(failure.step, CheckStep::AssetReferences);
    assert!(matches!(
        &failure.issues[..],
        [Issue::FileNotFound { path, .. }] if path == "title.png"
    ));
}

#[test]
fn custom_subdir_changes_the_required_root() {
    let fx = Fixture::new();
    fx.asset("gfx/ev.png");
    let ev = fx.file("ev_01.ito", "[event]\nevent_image=\"mods/dark/gfx/ev.png\"\n");

    let default = Validator::new(fx.book()).validate(&ev).unwrap();
    assert!(!default.ok);

    let custom = Validator::new(fx.book())
        .with_mod_prefix(Some("mods\\dark\\"))
        .validate(&ev)
        .unwrap();
    assert!(custom.ok, "errors: {:?}", custom.errors);
}

#[test]
fn forced_event_in_a_legacy_encoding_is_a_record_failure() {
    let fx = Fixture::new();
    std::fs::write(
        fx.content.path().join("ev_01.ito"),
        b"[event]\nevent_name=\"Caf\xe9\"\n",
    )
    .unwrap();
    let top = mystery(&fx, "event_frc=\"mystery/ev_01.ito\"\n");

    let result = Validator::new(fx.book()).validate(&top).unwrap();
    assert!(!result.ok);
    let failure = result.failure.unwrap();
    assert!(failure.record.ends_with("mystery.ito"));
    assert_eq!(failure.step, CheckStep::ForcedEvents);
    assert_eq!(failure.issues.len(), 1);
    assert_eq!(failure.issues[0].code(), "unreadable_record");
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn trigger_pointing_at_a_directory_is_a_record_failure() {
    let fx = Fixture::new();
    std::fs::create_dir(fx.content.path().join("events")).unwrap();
    let ev = fx.file(
        "ev_01.ito",
        "[event]\nevent_winprize_1=\"trigger_event\"\nevent_winnumber_1=\"mystery/events\"\n",
    );

    let result = Validator::new(fx.book()).validate(&ev).unwrap();
    assert!(!result.ok);
    let failure = result.failure.unwrap();
    assert_eq!(failure.kind, RecordKind::Event);
    assert_eq!(failure.step, CheckStep::TriggerReferences);
    assert!(matches!(
        &failure.issues[..],
        [Issue::UnreadableRecord { key, path, .. }]
            if key == "event_winnumber_1" && path == "mystery/events"
    ));
    assert!(result.events.iter().any(|e| e.ends_with("ev_01.ito")));
}

#[test]
fn unrecognized_top_level_header_is_an_operational_error() {
    let fx = Fixture::new();
    let town = fx.file("town.ito", "\n[town]\n");
    let err = Validator::new(fx.book()).validate(&town).unwrap_err();
    assert!(matches!(err, ValidateError::UnrecognizedRecord { .. }));
}

#[test]
fn result_serializes_for_reports() {
    let fx = Fixture::new();
    let ev = fx.file("ev_01.ito", "[event]\nlocation=\"moon\"\n");

    let result = Validator::new(fx.book()).validate(&ev).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["failure"]["kind"], "event");
    assert_eq!(json["failure"]["step"], "key_values");
    assert_eq!(json["failure"]["issues"][0]["kind"], "invalid_value");
    assert_eq!(json["failure"]["issues"][0]["value"], "moon");
    assert_eq!(json["events"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// A ring of events, each triggering the next, always terminates
        /// and visits every member exactly once.
        #[test]
        fn event_rings_terminate(len in 1usize..8) {
            let fx = Fixture::new();
            for i in 0..len {
                let next = (i + 1) % len;
                fx.file(
                    &format!("ev_{i:02}.ito"),
                    &format!(
                        "[event]\nevent_winprize_1=\"trigger_event\"\nevent_winnumber_1=\"mystery/ev_{next:02}.ito\"\n"
                    ),
                );
            }
            let top = fx.file("mystery.ito", "[mystery]\nevent_frc=\"mystery/ev_00.ito\"\n");

            let result = Validator::new(fx.book()).validate(&top).unwrap();
            prop_assert!(result.ok);
            prop_assert_eq!(result.events.len(), len);
        }
    }
}
