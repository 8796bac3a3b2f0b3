use std::sync::Arc;

use super::*;
use crate::{
    display::EMPTY_LINE_MARKER,
    error::GatewayError,
    gateway::Gateway,
    host::{PageEffect, RecordingHost},
    test_support::spawn_canned_server,
};
use shared::domain::PackSlug;

fn console(server_url: &str) -> (PackConsole, Arc<RecordingHost>) {
    let host = Arc::new(RecordingHost::new());
    let gateway = Gateway::new(server_url, host.clone()).expect("gateway");
    (
        PackConsole::new(gateway, host.clone(), PackSlug::new("ab12cd34")),
        host,
    )
}

#[test]
fn activation_selects_the_whole_original_value() {
    let mut field = EditableField::title("Hello");
    field.activate().expect("activate");

    let session = field.session().expect("session");
    assert_eq!(session.original_value(), "Hello");
    assert_eq!(session.control().value(), "Hello");
    assert_eq!(session.control().selection(), 0..5);
    assert!(session.control().is_focused());
    assert_eq!(session.control().kind(), ControlKind::TextInput);
    assert_eq!(session.replaced(), &FieldKind::Title.render("Hello"));
    assert!(field.display().is_none());
}

#[test]
fn cleared_control_falls_back_to_original_value() {
    let mut field = EditableField::title("Hello");
    field.activate().expect("activate");
    field.input("").expect("input");

    let update = field.begin_submit().expect("submit");
    assert_eq!(update, PackUpdate::Name("Hello".into()));
}

#[test]
fn whitespace_only_input_counts_as_empty() {
    let mut field = EditableField::description("Keep me");
    field.activate().expect("activate");
    field.input(" \n\t ").expect("input");

    assert_eq!(
        field.begin_submit().expect("submit"),
        PackUpdate::Description("Keep me".into())
    );
}

#[test]
fn committed_value_is_trimmed() {
    let mut field = EditableField::title("Old");
    field.activate().expect("activate");
    field.input("  New Title  ").expect("input");

    assert_eq!(
        field.begin_submit().expect("submit"),
        PackUpdate::Name("New Title".into())
    );
    field
        .finish_submit(SubmitOutcome::Committed)
        .expect("finish");
    assert_eq!(
        field.display().expect("display").text_content(),
        "New Title"
    );
}

#[test]
fn unchanged_value_is_still_submitted() {
    let mut field = EditableField::title("Same");
    field.activate().expect("activate");

    assert_eq!(
        field.begin_submit().expect("submit"),
        PackUpdate::Name("Same".into())
    );
    assert_eq!(field.phase(), FieldPhase::Submitting);
    assert!(!field.session().expect("session").control().is_focused());
}

#[test]
fn multi_line_description_round_trips_through_edit_cycles() {
    let mut field = EditableField::description("A\n\nB");
    assert_eq!(
        field.display().expect("display").visual_lines(),
        vec!["A", EMPTY_LINE_MARKER, "B"]
    );

    field.activate().expect("activate");
    assert_eq!(field.session().expect("session").control().value(), "A\n\nB");
    assert_eq!(field.session().expect("session").control().rows(), 3);

    field.begin_submit().expect("submit");
    field
        .finish_submit(SubmitOutcome::Committed)
        .expect("finish");
    assert_eq!(
        field.display().expect("display").visual_lines(),
        vec!["A", EMPTY_LINE_MARKER, "B"]
    );

    field.activate().expect("second activation");
    assert_eq!(
        field.session().expect("session").original_value(),
        "A\n\nB"
    );
}

#[test]
fn text_area_height_tracks_every_input() {
    let mut field = EditableField::description("one line");
    field.activate().expect("activate");
    assert_eq!(field.session().expect("session").control().rows(), 1);

    field.input("one\ntwo\nthree\nfour").expect("input");
    assert_eq!(field.session().expect("session").control().rows(), 4);

    field.input("short").expect("input");
    assert_eq!(field.session().expect("session").control().rows(), 1);
}

#[test]
fn gestures_out_of_order_are_rejected() {
    let mut field = EditableField::title("Hello");
    assert!(matches!(
        field.input("x"),
        Err(FieldError::NotEditing { field: "title" })
    ));
    assert!(matches!(
        field.begin_submit(),
        Err(FieldError::NotEditing { .. })
    ));
    assert!(matches!(
        field.finish_submit(SubmitOutcome::Committed),
        Err(FieldError::NotSubmitting { .. })
    ));

    field.activate().expect("activate");
    assert!(matches!(
        field.activate(),
        Err(FieldError::NotDisplayed { .. })
    ));
    assert_eq!(field.phase(), FieldPhase::Editing);
}

#[test]
fn failed_submit_discards_the_field() {
    let mut field = EditableField::title("Hello");
    field.activate().expect("activate");
    field.begin_submit().expect("submit");
    field.finish_submit(SubmitOutcome::Failed).expect("finish");

    assert_eq!(field.phase(), FieldPhase::Discarded);
    assert!(matches!(
        field.activate(),
        Err(FieldError::Discarded { .. })
    ));
}

#[tokio::test]
async fn successful_patch_rerenders_title_and_stays_editable() {
    let (server_url, seen) = spawn_canned_server(200, r#"{"status":"OK"}"#).await;
    let (console, host) = console(&server_url);

    let mut field = EditableField::title("Old Title");
    field.activate().expect("activate");
    field.input("New Title").expect("input");
    field.blur(&console).await.expect("blur");

    assert_eq!(
        field.display(),
        Some(&FieldKind::Title.render("New Title"))
    );
    assert!(host.effects().is_empty());
    assert_eq!(
        seen.lock().await[0].json(),
        serde_json::json!({ "name": "New Title" })
    );

    field.activate().expect("second activation");
    assert_eq!(
        field.session().expect("session").original_value(),
        "New Title"
    );
}

#[tokio::test]
async fn embedded_error_reloads_the_page() {
    let (server_url, _) = spawn_canned_server(200, r#"{"error":"name too long"}"#).await;
    let (console, host) = console(&server_url);

    let mut field = EditableField::title("Short");
    field.activate().expect("activate");
    field.input("A very long title").expect("input");
    let err = field.blur(&console).await.expect_err("must fail");

    assert!(matches!(
        err,
        FieldError::Submit {
            field: "title",
            source: GatewayError::Request { .. }
        }
    ));
    assert_eq!(field.phase(), FieldPhase::Discarded);
    assert_eq!(
        host.effects(),
        vec![
            PageEffect::Alerted("Update Failed: name too long".into()),
            PageEffect::Reloaded,
        ]
    );
}

#[tokio::test]
async fn description_sends_only_its_own_key() {
    let (server_url, seen) = spawn_canned_server(200, "{}").await;
    let (console, _) = console(&server_url);

    let mut field = EditableField::description("Old");
    field.activate().expect("activate");
    field.input("Line one\n\nLine three\n").expect("input");
    field.blur(&console).await.expect("blur");

    assert_eq!(
        seen.lock().await[0].json(),
        serde_json::json!({ "description": "Line one\n\nLine three" })
    );
    assert_eq!(
        field.display().expect("display").visual_lines(),
        vec!["Line one", EMPTY_LINE_MARKER, "Line three"]
    );
}
