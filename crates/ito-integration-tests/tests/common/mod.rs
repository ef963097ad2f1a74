//! Shared fixtures: a rules directory in the default layout and a content
//! tree, both in temporary directories.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ito_rules::{RuleBook, RuleManifest};

/// Table contents used by every test unless overridden.
const TABLES: &[(&str, &str)] = &[
    ("mystery_asset_keys.txt", "mystery_image,gfx\n"),
    ("mystery_trigger_keys.txt", "event_frc,True\n"),
    ("music_keys.txt", "mystery_music,True\n"),
    ("music_values.txt", "calm\nbattle\n"),
    ("event_asset_keys.txt", "event_image,True\n"),
    (
        "event_trigger_keys.txt",
        "event_winnumber_1,True\nevent_winnumber_2,True\nevent_failnumber_1,True\n",
    ),
    ("event_allowed_duplicate_keys.txt", "event_text\n"),
    (
        "winprize_keys.txt",
        "event_winprize_1\nevent_winprize_2\nevent_failprize_1\n",
    ),
    (
        "winprize_values.txt",
        "item\nitempool\ncurse_ex\ntrigger_event\ntrigger_enemy\n",
    ),
    ("location_keys.txt", "location\n"),
    ("location_values.txt", "forest\ncave\n"),
    ("item_values.txt", "sword_01\nshield_02\n"),
    ("curse_ex_values.txt", "curse_weak\n"),
    ("weakness_keys.txt", "weakness\n"),
    ("weakness_values.txt", "fire\nice\n"),
    ("enemy_asset_keys.txt", "enemy_image,True\n"),
];

/// A rules directory plus a content tree.
pub struct Fixture {
    pub rules: tempfile::TempDir,
    pub content: tempfile::TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let rules = tempfile::tempdir().unwrap();
        for file in RuleManifest::default().table_files() {
            std::fs::write(rules.path().join(file), "").unwrap();
        }
        for (file, text) in TABLES {
            std::fs::write(rules.path().join(file), text).unwrap();
        }
        Self {
            rules,
            content: tempfile::tempdir().unwrap(),
        }
    }

    /// Overwrite one rule table.
    pub fn table(&self, name: &str, text: &str) -> &Self {
        std::fs::write(self.rules.path().join(name), text).unwrap();
        self
    }

    /// Write a content file (creating parent directories).
    pub fn file(&self, name: &str, text: &str) -> PathBuf {
        let path = self.content.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, text).unwrap();
        path
    }

    /// Create an empty asset file.
    pub fn asset(&self, name: &str) -> PathBuf {
        self.file(name, "")
    }

    pub fn rules_dir(&self) -> &Path {
        self.rules.path()
    }

    pub fn book(&self) -> RuleBook {
        RuleBook::load_dir(self.rules.path()).unwrap()
    }
}

pub const BAT: &str = "[enemy]\n\
weakness=\"fire\"\n\
location=\"forest\"\n\
prize_name=\"sword_01\"\n\
enemy_image=\"mystery/gfx/bat.png\"\n";
