#![allow(clippy::expect_used, reason = "Fine in tests")]
use lsbook_html::{PageLink, render_for};
use lsbook_summary::Summary;

const OUTLINE: &str = "\
# Intro
* [Welcome](README.md)
* [Guide](guide/README.md)
    * [Setup](guide/setup.md)
    * [Docs](https://example.com)
* Group
    * [Deep](guide/deep/page.md)
";

fn summary() -> Summary {
  Summary::parse(OUTLINE, "Summary").expect("outline parses")
}

#[test]
fn exactly_one_entry_is_active() {
  let summary = summary();
  let result = render_for(&summary, 2).expect("page exists");

  assert_eq!(result.title, "Setup");
  assert_eq!(result.level.to_string(), "1.2.1");
  assert_eq!(result.summary_html.matches("chapter active").count(), 1);
  assert!(result.summary_html.contains(
    "<li class=\"chapter active\" data-level=\"1.2.1\" \
     data-path=\"setup.html\"><a href=\"setup.html\"><b>1.2.1.</b> Setup</a>"
  ));
}

#[test]
fn links_are_relative_to_the_page_directory() {
  let summary = summary();
  let result = render_for(&summary, 2).expect("page exists");
  let html = &result.summary_html;

  assert!(html.contains("<li class=\"header\">Intro</li>"));
  assert!(html.contains("<a href=\"../index.html\"><b>1.1.</b> Welcome</a>"));
  assert!(html.contains("<a href=\"index.html\"><b>1.2.</b> Guide</a>"));
  assert!(html.contains("<a href=\"deep/page.html\"><b>1.3.1.</b> Deep</a>"));
  assert!(html.contains(
    "<a href=\"https://example.com\" target=\"_blank\"><b>1.2.2.</b> Docs</a>"
  ));
  assert!(html.contains("<span><b>1.3.</b> Group</span>"));
  assert_eq!(result.base_path, "..");
  assert_eq!(result.output_path.to_string_lossy(), "guide/setup.html");
}

#[test]
fn previous_and_next_follow_reading_order() {
  let summary = summary();
  let count = summary.navigation.len();
  assert_eq!(count, 4);

  let first = render_for(&summary, 0).expect("first");
  assert_eq!(first.prev, None);
  assert_eq!(first.next, Some(PageLink {
    title: "Guide".into(),
    href:  "guide/index.html".into(),
  }));
  assert_eq!(first.base_path, ".");

  let middle = render_for(&summary, 2).expect("middle");
  assert_eq!(middle.prev.map(|link| link.href).as_deref(), Some("index.html"));
  assert_eq!(middle.next.map(|link| link.href).as_deref(), Some("deep/page.html"));

  let last = render_for(&summary, count - 1).expect("last");
  assert_eq!(last.next, None);
  assert_eq!(last.prev.map(|link| link.href).as_deref(), Some("../setup.html"));
  assert_eq!(last.base_path, "../..");

  assert!(render_for(&summary, count).is_none());
}
