use super::SearchPanel;
use crate::domain::models::NoticeLevel;
use crate::domain::models::PanelError;
use crate::domain::services::test_support::server_error;
use crate::domain::services::test_support::source;
use crate::domain::services::Notifier;

fn panel() -> SearchPanel {
    SearchPanel::new(Notifier::default(), 10, 0.2)
}

#[test]
fn it_builds_the_query() {
    let mut panel = panel();

    assert_eq!(panel.begin_search("  "), Err(PanelError::EmptyQuery));
    assert!(!panel.has_searched());

    let query = panel.begin_search(" rust ").unwrap();
    assert_eq!(query.q, "rust");
    assert_eq!(query.limit, 10);
    assert_eq!(query.threshold, 0.2);
    assert!(panel.is_searching());
    assert!(panel.has_searched());
}

#[test]
fn it_keeps_only_the_latest_results() {
    let mut panel = panel();
    panel.begin_search("first").unwrap();
    panel.begin_search("second").unwrap();

    assert!(panel
        .complete_search("first", Ok(vec![source("1", "first")]))
        .is_none());
    assert!(panel.results().is_empty());
    assert!(panel.is_searching());

    panel.complete_search("second", Ok(vec![source("2", "second")]));
    assert_eq!(panel.results()[0].id, "2");
    assert!(!panel.is_searching());
}

#[test]
fn it_reports_empty_and_failed_searches() {
    let mut panel = panel();
    panel.begin_search("nothing").unwrap();
    let notice = panel.complete_search("nothing", Ok(vec![])).unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);

    panel.begin_search("broken").unwrap();
    let notice = panel
        .complete_search("broken", Err(server_error("index offline")))
        .unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.text.contains("index offline"));
}

#[test]
fn it_opens_a_result() {
    let mut panel = panel();
    panel.begin_search("x").unwrap();
    panel.complete_search("x", Ok(vec![source("n1", "X notes")]));

    assert_eq!(panel.select_result(2), Err(PanelError::UnknownResult(2)));

    let draft = panel.select_result(1).unwrap();
    assert_eq!(draft.id.as_deref(), Some("n1"));
    assert_eq!(draft.title, "X notes");
    assert!(!panel.has_searched());
}
