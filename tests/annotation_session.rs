// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use piimark::model::{PiiType, Record, Relevance};
use piimark::render::{render_html, HighlightPalette};
use piimark::session::{Editor, LifecycleWarning, Session};
use piimark::store::{read_batch, write_export};

static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("annotation_session")
        .join(name)
}

fn scratch_dir() -> PathBuf {
    let counter = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir()
        .join(format!("piimark-it-{}-{counter}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap_or_else(|err| panic!("create {dir:?}: {err}"));
    dir
}

fn open_fixture() -> Editor {
    let store = read_batch(fixture_path("batch.jsonl")).expect("read fixture batch");
    Editor::with_store(store)
}

fn session(editor: &mut Editor) -> &mut Session {
    editor.session_mut().expect("session is open")
}

#[test]
fn edit_refresh_navigate_and_export_round_trip() {
    let mut editor = open_fixture();
    let session = session(&mut editor);
    assert_eq!(session.len(), 2);

    let edited_context = "Maria Lopez, 34, works as a nurse in Trondheim.";
    session.set_context(edited_context);
    let removed = session.refresh_annotations();

    assert_eq!(removed, vec!["St. Olav Hospital".to_owned()]);
    let refreshed = session.active_record().clone();
    assert_eq!(refreshed.context(), edited_context);
    assert_eq!(
        refreshed.piis().keys().collect::<Vec<_>>(),
        vec!["Maria Lopez", "34", "nurse", "Trondheim"]
    );

    assert!(session.go_next());
    assert_eq!(session.active_record().id_label().as_deref(), Some("rec-2"));
    assert!(session.go_previous());
    assert_eq!(session.active_record(), &refreshed);
    assert_eq!(session.current_view(), refreshed);

    let lines = session.export_lines().expect("export lines");
    let out_dir = scratch_dir();
    let out_path = out_dir.join("annotated.jsonl");
    write_export(&out_path, &lines).expect("write export");

    let written = fs::read_to_string(&out_path).expect("read export");
    assert!(!written.ends_with('\n'));
    let first: Record = serde_json::from_str(written.lines().next().expect("line 1"))
        .expect("parse exported line 1");
    assert_eq!(first, refreshed);
    assert_eq!(first.extra().get("source").and_then(|value| value.as_str()), Some("intake-2024"));

    let reloaded = read_batch(&out_path).expect("reload export");
    assert_eq!(reloaded.records()[0], refreshed);
    assert_eq!(reloaded.records()[1].id_label().as_deref(), Some("rec-2"));

    let _ = fs::remove_dir_all(out_dir);
}

#[test]
fn added_annotations_survive_export_and_highlight() {
    let mut editor = open_fixture();
    let session = session(&mut editor);
    session.go_next();
    session
        .add_annotation("1200 kr", PiiType::Finance, Relevance::Low)
        .expect("add annotation");
    assert!(session.add_annotation("Oslo", PiiType::Location, Relevance::Low).is_err());

    let lines = session.export_lines().expect("export lines");
    let second: Record = serde_json::from_str(&lines[1]).expect("parse line 2");
    assert_eq!(
        second.piis().keys().collect::<Vec<_>>(),
        vec!["Jonas Berg", "Nordbank", "1200 kr"]
    );

    let html = render_html(second.context(), second.piis(), &HighlightPalette::default());
    assert_eq!(html.matches("<span").count(), 3);
    assert!(html.contains("background-color:#ffa726"));
}

#[test]
fn load_original_discards_every_change() {
    let mut editor = open_fixture();
    let pristine = editor.session().expect("session").store().pristine().to_vec();
    {
        let session = session(&mut editor);
        session.set_question("Changed?");
        session.refresh_annotations();
        session.go_next();
        session.set_context("gone");
        session.save_edits();
    }

    editor.load_original().expect("load original");

    let session = editor.session().expect("session");
    assert_eq!(session.active_index(), 0);
    assert_eq!(session.store().records(), pristine.as_slice());

    editor.close();
    assert_eq!(editor.load_original(), Err(LifecycleWarning::NoOriginal));
}
