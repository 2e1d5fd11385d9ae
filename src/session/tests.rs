// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Piimark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{Editor, LifecycleError, LifecycleWarning, Session};
use crate::model::{Annotation, PiiType, Record, Relevance};
use crate::ops::ValidationError;
use crate::store::{IndexError, RecordStore};

fn records() -> Vec<Record> {
    vec![
        Record::new("Dr. Ada Park treats patients in Oslo.", "Where does Ada work?")
            .with_id("r1")
            .with_annotation("Ada Park", PiiType::Name, Relevance::High)
            .with_annotation("Oslo", PiiType::Location, Relevance::Low),
        Record::new("Ben earns 90k at Initech.", "What does Ben earn?")
            .with_id("r2")
            .with_annotation("90k", PiiType::Finance, Relevance::High),
        Record::new("Cara is Norwegian.", "Nationality?")
            .with_annotation("Norwegian", PiiType::Nationality, Relevance::High),
    ]
}

#[fixture]
fn session() -> Session {
    Session::new(RecordStore::from_records(records()).expect("store"))
}

#[rstest]
fn starts_on_first_record(session: Session) {
    assert_eq!(session.active_index(), 0);
    assert_eq!(session.len(), 3);
    assert!(!session.can_go_previous());
    assert!(session.can_go_next());
}

#[rstest]
fn edits_stay_buffered_until_folded(mut session: Session) {
    session.set_context("Dr. Ada Park moved.");
    session.set_annotation_relevance("Ada Park", Relevance::Low);

    assert_eq!(session.active_record().context(), "Dr. Ada Park treats patients in Oslo.");
    let view = session.current_view();
    assert_eq!(view.context(), "Dr. Ada Park moved.");
    assert_eq!(view.piis()["Ada Park"].relevance(), Relevance::Low);

    session.save_edits();
    assert!(session.edits().is_empty());
    assert_eq!(session.active_record().context(), "Dr. Ada Park moved.");
    // Saving never prunes: "Oslo" is stale but kept.
    assert!(session.active_record().piis().contains_key("Oslo"));
}

#[rstest]
fn navigation_preserves_edits(mut session: Session) {
    session.set_context("Dr. Ada Park treats patients in Bergen.");
    assert!(session.go_next());
    assert_eq!(session.active_index(), 1);
    assert!(session.edits().is_empty());
    assert!(session.go_previous());

    assert_eq!(session.active_record().context(), "Dr. Ada Park treats patients in Bergen.");
    assert_eq!(session.current_view().context(), "Dr. Ada Park treats patients in Bergen.");
}

#[rstest]
fn navigation_is_disabled_at_the_edges(mut session: Session) {
    assert!(!session.go_previous());
    assert_eq!(session.active_index(), 0);

    session.go_to(3).expect("go to last");
    assert!(!session.can_go_next());
    session.set_question("changed");
    assert!(!session.go_next());
    assert_eq!(session.active_index(), 2);
    // A disabled move does not fold pending edits.
    assert_eq!(session.edits().question(), Some("changed"));
}

#[rstest]
#[case(0)]
#[case(4)]
#[case(usize::MAX)]
fn go_to_rejects_targets_out_of_range(mut session: Session, #[case] target: usize) {
    session.set_question("pending");
    let err = session.go_to(target).unwrap_err();
    assert_eq!(err, IndexError { index: target, len: 3 });
    assert_eq!(session.active_index(), 0);
    assert_eq!(session.edits().question(), Some("pending"));
}

#[rstest]
fn go_to_reconciles_before_moving(mut session: Session) {
    session.set_question("Where does Dr. Park work?");
    session.go_to(2).expect("go to");
    assert_eq!(session.active_index(), 1);
    assert_eq!(session.store().get(0).expect("record").question(), "Where does Dr. Park work?");
}

#[rstest]
fn go_to_current_record_still_folds(mut session: Session) {
    session.set_question("same record");
    session.go_to(1).expect("go to");
    assert!(session.edits().is_empty());
    assert_eq!(session.active_record().question(), "same record");
}

#[rstest]
fn refresh_prunes_against_edited_context(mut session: Session) {
    session.set_context("Dr. Ada Park retired.");
    session.set_annotation_type("Ada Park", PiiType::Health);

    let removed = session.refresh_annotations();

    assert_eq!(removed, vec!["Oslo".to_owned()]);
    let record = session.active_record();
    assert_eq!(record.context(), "Dr. Ada Park retired.");
    assert_eq!(record.piis().len(), 1);
    assert_eq!(record.piis()["Ada Park"], Annotation::new(PiiType::Health, Relevance::High));
}

#[rstest]
fn add_annotation_uses_edited_context(mut session: Session) {
    session.set_context("Dr. Ada Park treats patients in Oslo and Bergen.");
    let key = session
        .add_annotation(" Bergen ", PiiType::Location, Relevance::Low)
        .expect("add annotation");

    assert_eq!(key, "Bergen");
    let record = session.active_record();
    assert_eq!(record.context(), "Dr. Ada Park treats patients in Oslo and Bergen.");
    assert_eq!(
        record.piis().keys().collect::<Vec<_>>(),
        vec!["Ada Park", "Oslo", "Bergen"]
    );
    assert!(session.edits().is_empty());
}

#[rstest]
fn add_annotation_failure_changes_nothing(mut session: Session) {
    session.set_context("Dr. Ada Park left.");
    let before = session.clone();

    let err = session.add_annotation("Oslo", PiiType::Location, Relevance::High).unwrap_err();
    assert!(matches!(err, ValidationError::NotInContext { .. }));
    assert_eq!(session, before);

    let err = session.add_annotation("   ", PiiType::Location, Relevance::High).unwrap_err();
    assert_eq!(err, ValidationError::Empty);
    assert_eq!(session, before);
}

#[rstest]
fn cycle_and_toggle_write_to_buffer(mut session: Session) {
    assert_eq!(session.cycle_annotation_type("Oslo", true), Some(PiiType::Name));
    assert_eq!(session.cycle_annotation_type("Oslo", false), Some(PiiType::Location));
    assert_eq!(session.cycle_annotation_type("Oslo", false), Some(PiiType::Health));
    assert_eq!(session.toggle_annotation_relevance("Oslo"), Some(Relevance::High));
    assert_eq!(session.toggle_annotation_relevance("missing"), None);

    assert_eq!(session.active_record().piis()["Oslo"].pii_type(), PiiType::Location);
    assert_eq!(
        session.current_view().piis()["Oslo"],
        Annotation::new(PiiType::Health, Relevance::High)
    );
}

#[rstest]
fn export_folds_pending_edits(mut session: Session) {
    session.go_next();
    session.set_context("Ben earns 95k at Initech.");

    let lines = session.export_lines().expect("export");

    assert_eq!(lines.len(), 3);
    let exported: Record = serde_json::from_str(&lines[1]).expect("parse exported line");
    assert_eq!(exported.context(), "Ben earns 95k at Initech.");
    // Export reconciles but does not prune.
    assert!(exported.piis().contains_key("90k"));
}

#[rstest]
fn restore_original_undoes_everything(mut session: Session) {
    session.set_context("edited");
    session.refresh_annotations();
    session.go_next();
    session.add_annotation("Initech", PiiType::Occupation, Relevance::Low).expect("add");
    session.go_to(3).expect("go to");
    session.set_question("pending");

    session.restore_original();

    assert_eq!(session.active_index(), 0);
    assert!(session.edits().is_empty());
    let original = records();
    for (idx, record) in original.iter().enumerate() {
        assert_eq!(session.store().get(idx).expect("record"), record);
    }
    assert_eq!(session.store().pristine(), original.as_slice());
}

#[test]
fn editor_without_session_warns_on_load_original() {
    let mut editor = Editor::new();
    assert_eq!(editor.load_original(), Err(LifecycleWarning::NoOriginal));
    assert_eq!(
        LifecycleWarning::NoOriginal.to_string(),
        "No original data found to restore."
    );
    assert!(!editor.is_open());
}

#[test]
fn editor_requires_close_before_reopening() {
    let mut editor = Editor::new();
    editor.open(RecordStore::from_records(records()).expect("store")).expect("open");
    editor.session_mut().expect("session").go_next();

    let err = editor
        .open(RecordStore::from_records(vec![Record::new("x", "y")]).expect("store"))
        .unwrap_err();
    assert_eq!(err, LifecycleError::AlreadyOpen);
    assert_eq!(editor.session().expect("session").active_index(), 1);

    assert!(editor.close().is_some());
    assert!(editor.close().is_none());
    editor
        .open(RecordStore::from_records(vec![Record::new("x", "y")]).expect("store"))
        .expect("reopen");
    assert_eq!(editor.session().expect("session").len(), 1);
}

#[test]
fn editor_load_original_resets_session() {
    let mut editor = Editor::with_store(RecordStore::from_records(records()).expect("store"));
    {
        let session = editor.session_mut().expect("session");
        session.go_next();
        session.set_context("changed");
        session.save_edits();
    }

    editor.load_original().expect("load original");

    let session = editor.session().expect("session");
    assert_eq!(session.active_index(), 0);
    assert_eq!(session.store().records(), records().as_slice());
}
