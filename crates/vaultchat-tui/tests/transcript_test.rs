use chrono::{Duration, TimeZone, Utc};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

use vaultchat_core::{ChatMessage, MessageUpdate, ToolCall, ToolCallUpdate, ToolOutput, ToolStatus};
use vaultchat_tui::tui::context::RecordingContext;
use vaultchat_tui::tui::theme::Theme;
use vaultchat_tui::tui::trigger;
use vaultchat_tui::tui::view::{Action, Element, classes};
use vaultchat_tui::tui::widgets::{Suggestion, SuggestionKind};
use vaultchat_tui::{AutocompletePopup, MessageList, MessageRenderer};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_test_writer()
        .try_init();
}

fn references(renderer: &MessageRenderer) -> Vec<String> {
    renderer
        .element()
        .find_all_by_class(classes::REFERENCE)
        .into_iter()
        .map(Element::text_content)
        .collect()
}

#[test]
fn plain_text_reference_depends_on_store() {
    init_tracing();
    let message = ChatMessage::assistant("m1", "see pages/ark.md for details");

    let with_doc = RecordingContext::with_documents(["pages/ark.md"]);
    let renderer = MessageRenderer::new(message.clone(), with_doc.context.clone());
    assert_eq!(references(&renderer), vec!["pages/ark.md"]);

    let without_doc = RecordingContext::with_documents(Vec::<String>::new());
    let renderer = MessageRenderer::new(message, without_doc.context.clone());
    assert!(references(&renderer).is_empty());
    let content = renderer
        .element()
        .find_by_class(classes::MESSAGE_CONTENT)
        .map(Element::text_content);
    assert_eq!(content.as_deref(), Some("see pages/ark.md for details"));
}

#[test]
fn activating_references_opens_or_notifies() {
    init_tracing();
    let fixture = RecordingContext::with_documents(["pages/ark.md", "notes/todo.md"]);
    let message = ChatMessage::assistant("m1", "Open `notes/todo` or pages/ark.md");
    let mut list = MessageList::new(fixture.context.clone());
    list.render(&[message]);

    let actions: Vec<Action> = list
        .renderer("m1")
        .map(|r| r.element().actions().into_iter().cloned().collect())
        .unwrap_or_default();
    assert_eq!(actions.len(), 2);
    for action in &actions {
        assert!(list.activate("m1", action));
    }
    assert_eq!(fixture.navigator.opened(), vec!["notes/todo.md", "pages/ark.md"]);

    // The document disappears after rendering; activation now reports it
    fixture.store.remove("pages/ark.md");
    assert!(list.activate("m1", &actions[1]));
    assert_eq!(fixture.notifier.notices(), vec!["File not found: pages/ark.md"]);
}

#[test]
fn skill_tool_call_header() {
    init_tracing();
    let fixture = RecordingContext::with_documents(Vec::<String>::new());
    let args = "Summarize all meeting notes from last week into one page";
    let call = ToolCall::from_json("t1", "Skill", json!({"skill": "summarize", "args": args}))
        .with_status(ToolStatus::Running);
    let message = ChatMessage::assistant("m1", "").with_tool_calls(vec![call]);
    let renderer = MessageRenderer::new(message, fixture.context.clone());

    let header = renderer
        .element()
        .find_by_class(classes::TOOL_CALL_HEADER)
        .expect("tool call header");
    let text = |class: &str| header.find_by_class(class).map(Element::text_content);
    assert_eq!(text(classes::TOOL_CALL_NAME).as_deref(), Some("Skill: summarize"));
    let expected = format!("{}...", args.chars().take(40).collect::<String>());
    assert_eq!(text(classes::TOOL_CALL_DESC), Some(expected));
    assert_eq!(text(classes::TOOL_CALL_STATUS).as_deref(), Some("running..."));

    let lines = renderer.lines(&Theme::default());
    let rendered: Vec<String> = lines
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect();
    assert!(
        rendered
            .iter()
            .any(|line| line.starts_with("▸ Skill: summarize") && line.ends_with("running..."))
    );
    assert!(!rendered.iter().any(|line| line.starts_with("Input:")));
}

#[test]
fn tool_call_lifecycle_through_list() {
    init_tracing();
    let fixture = RecordingContext::with_documents(Vec::<String>::new());
    let start = Utc
        .with_ymd_and_hms(2025, 7, 29, 10, 0, 0)
        .single()
        .expect("valid timestamp");
    let call = ToolCall::from_json("t1", "mcp__obsidian__read_note", json!({"path": "pages/ark.md"}))
        .with_times(start, None);
    let message = ChatMessage::assistant("m1", "Reading").with_tool_calls(vec![call]);
    let mut list = MessageList::new(fixture.context.clone());
    list.render(&[message]);

    assert!(list.activate("m1", &Action::ToggleToolCall { id: "t1".into() }));
    list.update_tool_call("m1", "t1", ToolCallUpdate::status(ToolStatus::Running));
    list.update_tool_call(
        "m1",
        "t1",
        ToolCallUpdate::status(ToolStatus::Success)
            .with_output(ToolOutput::Text("# Ark".into()))
            .with_end_time(start + Duration::milliseconds(1500)),
    );

    let renderer = list.renderer("m1").expect("renderer");
    let inspector = renderer.inspector("t1").expect("inspector");
    assert!(inspector.is_expanded());
    let root = inspector.element();
    let text = |class: &str| root.find_by_class(class).map(Element::text_content);
    assert_eq!(text(classes::TOOL_CALL_NAME).as_deref(), Some("read note"));
    assert_eq!(text(classes::TOOL_CALL_DESC).as_deref(), Some("ark.md"));
    assert_eq!(text(classes::TOOL_CALL_STATUS).as_deref(), Some("✓"));
    assert_eq!(text(classes::TOOL_CALL_TIMING).as_deref(), Some("Duration: 1500ms"));

    // A full re-render of the message collapses it again
    list.update_message("m1", MessageUpdate::content("Done"));
    let inspector = list.renderer("m1").and_then(|r| r.inspector("t1"));
    assert_eq!(inspector.map(|i| i.is_expanded()), Some(false));
    assert_eq!(inspector.map(|i| i.tool_call().status), Some(ToolStatus::Success));
}

#[test]
fn streaming_append_and_unknown_ids() {
    init_tracing();
    let fixture = RecordingContext::with_documents(Vec::<String>::new());
    let mut list = MessageList::new(fixture.context.clone());
    list.render(&[
        ChatMessage::user("u1", "hi"),
        ChatMessage::assistant("a1", "").streaming(true),
    ]);

    list.append_to_message("a1", "Hel");
    list.append_to_message("a1", "lo");
    list.append_to_message("zzz", "ignored");

    let renderer = list.renderer("a1").expect("renderer");
    assert_eq!(renderer.message().content, "Hello");
    assert!(renderer.element().find_by_class(classes::STREAMING).is_some());
    assert!(list.renderer("zzz").is_none());
    assert_eq!(list.len(), 2);

    list.update_message("a1", MessageUpdate::streaming(false));
    let lines = list.lines(Rect::new(0, 0, 40, 20), &Theme::default());
    let last: String = lines
        .last()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .unwrap_or_default();
    assert_eq!(last, "Hello");
}

#[test]
fn command_autocomplete_flow() {
    init_tracing();
    let fixture = RecordingContext::with_documents(Vec::<String>::new());
    let chosen: Rc<RefCell<Option<Suggestion>>> = Rc::new(RefCell::new(None));
    let sink = chosen.clone();
    let mut popup = AutocompletePopup::new(
        fixture.context.clone(),
        Box::new(move |s: &Suggestion| *sink.borrow_mut() = Some(s.clone())),
    );
    let anchor = Rect::new(0, 22, 80, 2);

    let input = "/";
    let found = trigger::detect(input, input.len()).expect("command trigger");
    popup.show(anchor, found.kind, &found.query);
    let values: Vec<_> = popup.suggestions().iter().map(|s| s.value.as_str()).collect();
    assert_eq!(
        values,
        vec!["/help", "/clear", "/new", "/file", "/search", "/context"]
    );

    for expected in [1, 2, 3, 4, 5, 0, 1] {
        assert!(popup.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)));
        assert_eq!(popup.selected_index(), Some(expected));
    }

    let input = "/clear";
    let found = trigger::detect(input, input.len()).expect("command trigger");
    popup.show(anchor, found.kind, &found.query);
    assert_eq!(popup.suggestions().len(), 1);
    assert!(popup.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    assert!(!popup.is_visible());

    let suggestion = chosen.borrow().clone().expect("selection callback ran");
    let (completed, cursor) =
        trigger::complete(input, &found, input.len(), &suggestion).expect("completion fits input");
    assert_eq!(completed, "/clear ");
    assert_eq!(cursor, completed.len());
}

#[test]
fn file_autocomplete_flow() {
    init_tracing();
    let fixture = RecordingContext::with_documents(["pages/ark.md", "journals/2025-07-29.md", "index.md"]);
    let mut popup = AutocompletePopup::new(fixture.context.clone(), Box::new(|_: &Suggestion| {}));
    let anchor = Rect::new(0, 22, 80, 2);

    popup.show(anchor, SuggestionKind::File, "nothing-matches");
    assert!(!popup.is_visible());

    popup.show(anchor, SuggestionKind::File, "ARK");
    assert!(popup.is_visible());
    let suggestion = popup.selected().cloned().expect("selection");
    assert_eq!(suggestion.value, "pages/ark.md");
    assert_eq!(suggestion.label, "ark");
    assert_eq!(suggestion.description.as_deref(), Some("pages"));

    // Documents added after construction are visible on the next show
    fixture.store.insert("pages/arkive.md");
    popup.show(anchor, SuggestionKind::File, "ark");
    assert_eq!(popup.suggestions().len(), 2);

    let input = "Summarize @pages/ar please";
    let cursor = "Summarize @pages/ar".len();
    let found = trigger::detect(input, cursor).expect("file trigger");
    assert_eq!(found.kind, SuggestionKind::File);
    let (completed, _) =
        trigger::complete(input, &found, cursor, &suggestion).expect("completion fits input");
    assert_eq!(completed, "Summarize @pages/ark.md  please");
}
