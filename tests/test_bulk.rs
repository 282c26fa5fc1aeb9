//! Integration tests for bulk actions: confirmation thresholds, query-mode
//! targets, selection handling and undo recording.

mod common;

use chrono::{Duration, Utc};
use common::{FakeBackend, key, loaded_session, mutations};
use pretty_assertions::assert_eq;
use triagetui::api::{Action, ActionType, ApiError, BulkTarget};
use triagetui::controllers::{BulkOutcome, ConfirmSite};
use triagetui::store::Dialog;

#[test]
fn test_small_selection_runs_immediately() {
    let backend = FakeBackend::with_notifications(5);
    let mut session = loaded_session(&backend, 10);
    for n in 1..=3 {
        session.selection.select(&key(n));
    }

    let outcome = session
        .request_bulk(Action::Archive, ConfirmSite::Toolbar, &backend)
        .unwrap();

    let BulkOutcome::Done { affected, undo_id } = outcome else {
        panic!("expected the bulk action to run, got {:?}", outcome);
    };
    assert_eq!(affected, 3);
    assert!(undo_id.is_some());
    assert_eq!(mutations(&backend), vec!["bulk:archive:3".to_string()]);
    assert_eq!(session.notifications.page_keys(), vec![key(4), key(5)]);
    // Archive drops items from the inbox, so the selection goes too
    assert!(!session.selection.has_selection());
    assert_eq!(session.undo.history()[0].keys(), vec![key(1), key(2), key(3)]);
}

#[test]
fn test_shortcut_threshold_is_lower_than_toolbar() {
    let backend = FakeBackend::with_notifications(31);
    let mut session = loaded_session(&backend, 50);
    session.select_page();

    let outcome = session
        .request_bulk(Action::Star, ConfirmSite::Shortcut, &backend)
        .unwrap();

    assert_eq!(outcome, BulkOutcome::NeedsConfirmation { count: Some(31) });
    assert!(mutations(&backend).is_empty());
    assert!(matches!(
        session.ui.dialog,
        Some(Dialog::ConfirmBulk { count: Some(31), .. })
    ));

    session.ui.close_dialog();
    let outcome = session
        .request_bulk(Action::Star, ConfirmSite::Toolbar, &backend)
        .unwrap();
    assert!(matches!(outcome, BulkOutcome::Done { affected: 31, .. }));
}

#[test]
fn test_confirming_runs_the_held_action() {
    let backend = FakeBackend::with_notifications(31);
    let mut session = loaded_session(&backend, 50);
    session.select_page();
    session
        .request_bulk(Action::MarkRead, ConfirmSite::Shortcut, &backend)
        .unwrap();

    let outcome = session.confirm_bulk(&backend).unwrap();

    assert!(matches!(outcome, BulkOutcome::Done { affected: 31, .. }));
    assert!(session.ui.dialog.is_none());
    assert!(backend.stored(&key(31)).unwrap().is_read);
}

#[test]
fn test_confirm_without_dialog_is_an_error() {
    let backend = FakeBackend::with_notifications(1);
    let mut session = loaded_session(&backend, 10);

    assert!(session.confirm_bulk(&backend).is_err());
}

#[test]
fn test_select_all_always_confirms_and_skips_undo() {
    let backend = FakeBackend::with_notifications(3);
    let mut session = loaded_session(&backend, 10);
    session.select_all_matching();
    assert_eq!(
        session.bulk_target(),
        Some(BulkTarget::Query("in:inbox".to_string()))
    );

    let outcome = session
        .request_bulk(Action::Star, ConfirmSite::Toolbar, &backend)
        .unwrap();
    assert_eq!(outcome, BulkOutcome::NeedsConfirmation { count: Some(3) });
    assert!(mutations(&backend).is_empty());

    let outcome = session.confirm_bulk(&backend).unwrap();

    assert_eq!(
        outcome,
        BulkOutcome::Done {
            affected: 3,
            undo_id: None
        }
    );
    assert_eq!(mutations(&backend), vec!["bulk:star:query=in:inbox".to_string()]);
    assert!(session.undo.is_empty());
    assert_eq!(session.toasts.current().unwrap().message, "Updated 3 notifications");
}

#[test]
fn test_non_dismissive_bulk_keeps_selection() {
    let backend = FakeBackend::with_notifications(3);
    let mut session = loaded_session(&backend, 10);
    session.selection.select(&key(1));
    session.selection.select(&key(3));

    session.execute_bulk(Action::Star, &backend).unwrap();

    assert_eq!(session.selection.keys(), vec![key(1), key(3)]);
    assert!(session.notifications.get(&key(3)).unwrap().starred);
}

#[test]
fn test_bulk_emptying_last_page_steps_back() {
    let backend = FakeBackend::with_notifications(3);
    let mut session = loaded_session(&backend, 2);
    session.go_to_page(2, &backend).unwrap();
    session.select_page();

    session.execute_bulk(Action::Archive, &backend).unwrap();

    assert_eq!(session.pagination.page, 1);
    assert_eq!(session.notifications.page_keys(), vec![key(1), key(2)]);
}

#[test]
fn test_bulk_tag_by_name_creates_missing_tag() {
    let backend = FakeBackend::with_notifications(2);
    let mut session = loaded_session(&backend, 10);
    session.select_page();

    session
        .execute_bulk(
            Action::AssignTagByName {
                name: "later".into(),
            },
            &backend,
        )
        .unwrap();

    assert_eq!(
        mutations(&backend),
        vec!["create-tag:later".to_string(), "bulk:assign-tag:2".to_string()]
    );
    let tag_id = session.tags.find_by_name("later").unwrap().id.clone();
    let entry = &session.undo.history()[0];
    assert_eq!(entry.action_type, ActionType::AssignTag);
    assert_eq!(entry.metadata.as_ref().unwrap().tag_id, Some(tag_id));
}

#[test]
fn test_bulk_tag_by_name_reuses_existing_tag() {
    let backend = FakeBackend::with_notifications(2);
    backend.add_tag("t-9", "Later");
    let mut session = loaded_session(&backend, 10);
    session.refresh_tags(&backend).unwrap();
    session.select_page();

    session
        .execute_bulk(
            Action::AssignTagByName {
                name: "later".into(),
            },
            &backend,
        )
        .unwrap();

    assert_eq!(mutations(&backend), vec!["bulk:assign-tag:2".to_string()]);
}

#[test]
fn test_failed_bulk_reports_and_keeps_selection() {
    let backend = FakeBackend::with_notifications(2);
    let mut session = loaded_session(&backend, 10);
    session.select_page();
    backend.fail_next(ApiError::status(500, "bulk exploded"));

    let err = session.execute_bulk(Action::Archive, &backend).unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(session.selection.keys(), vec![key(1), key(2)]);
    assert_eq!(session.notifications.page_keys(), vec![key(1), key(2)]);
    assert_eq!(session.toasts.current().unwrap().message, "bulk exploded");
    assert!(session.undo.is_empty());
}

#[test]
fn test_bulk_unsnooze_takes_metadata_from_first_item_in_page_order() {
    let backend = FakeBackend::with_notifications(12);
    let soon = Utc::now() + Duration::days(1);
    let later = Utc::now() + Duration::days(2);
    {
        let mut state = backend.state.borrow_mut();
        state.notifications[1].snoozed_until = Some(soon);
        state.notifications[9].snoozed_until = Some(later);
    }
    let mut session = loaded_session(&backend, 20);
    session.select_view("snoozed", &backend).unwrap();
    assert_eq!(session.notifications.page_keys(), vec![key(2), key(10)]);
    session.selection.select(&key(10));
    session.selection.select(&key(2));

    session.execute_bulk(Action::Unsnooze, &backend).unwrap();

    let entry = &session.undo.history()[0];
    assert_eq!(entry.action_type, ActionType::Unsnooze);
    assert_eq!(entry.metadata.as_ref().unwrap().snoozed_until, Some(soon));
}

#[test]
fn test_bulk_without_selection_is_rejected() {
    let backend = FakeBackend::with_notifications(2);
    let mut session = loaded_session(&backend, 10);

    let err = session
        .request_bulk(Action::Archive, ConfirmSite::Toolbar, &backend)
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(mutations(&backend).is_empty());
}
