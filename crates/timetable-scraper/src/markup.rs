//! Selectors and text helpers over the portal's HTML.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

pub(crate) static TABLE_BODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody"));
pub(crate) static COLLAPSIBLE_HEADER: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"div[data-role="collapsible"]"#));
pub(crate) static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
pub(crate) static DATE_HEADING: LazyLock<Selector> =
    LazyLock::new(|| selector("h3.date-info-display"));
pub(crate) static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
pub(crate) static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
pub(crate) static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
pub(crate) static DRUPAL_SETTINGS: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"script[type="application/json"][data-drupal-selector="drupal-settings-json"]"#)
});

/// Concatenated text of every descendant text node.
pub(crate) fn text_of(node: ElementRef<'_>) -> String {
    node.text().collect()
}

/// Text of the element's first child, when that child is a text node.
pub(crate) fn leading_text(node: ElementRef<'_>) -> Option<&str> {
    node.children()
        .next()
        .and_then(|child| child.value().as_text())
        .map(|text| &**text)
}
