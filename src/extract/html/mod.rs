
use scraper::{Html, Node, Selector};
use std::sync::LazyLock;

static UNWANTED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "script, style, noscript, iframe, template, svg, nav, header, footer, aside, button, form, \
         .advertisement, .ads, .sidebar, .menu, .navigation, .comments, .share",
    )
    .expect("valid selector")
});

static MAIN_CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("main, article, .content, .main-content, #content, #main")
        .expect("valid selector")
});

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("valid selector"));

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table",
    "td", "th", "tr", "ul",
];

/// Extract the readable text of an HTML page.
///
/// The main content area is used when one exists, otherwise the body.
/// Scripts, styles and navigation chrome are removed. Block elements
/// start a new line; whitespace inside a line is collapsed.
#[inline]
pub fn extract_text(html: &str) -> String {
    let document = clean_content(Html::parse_document(html));

    let mut raw = String::new();
    for node in document.root_element().descendants() {
        match node.value() {
            // Line breaks come from block structure only
            Node::Text(text) => {
                raw.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            }
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => raw.push('\n'),
            _ => {}
        }
    }

    normalize_whitespace(&raw)
}

/// Page title from `<title>`, falling back to the first `<h1>`
#[inline]
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    [&*TITLE_SELECTOR, &*H1_SELECTOR]
        .into_iter()
        .filter_map(|selector| document.select(selector).next())
        .map(|element| collapse_spaces(&element.text().collect::<String>()))
        .find(|title| !title.is_empty())
}

fn clean_content(document: Html) -> Html {
    let scoped = document
        .select(&MAIN_CONTENT_SELECTOR)
        .next()
        .or_else(|| document.select(&BODY_SELECTOR).next())
        .map(|element| Html::parse_fragment(&element.html()));

    let mut cleaned = scoped.unwrap_or(document);
    remove_unwanted_elements(&mut cleaned, &UNWANTED_SELECTOR);
    cleaned
}

fn remove_unwanted_elements(document: &mut Html, unwanted_selector: &Selector) {
    // Collect ids first; detaching while selecting would alias the tree borrow
    let unwanted_node_ids: Vec<_> = document
        .select(unwanted_selector)
        .map(|element| element.id())
        .collect();

    for node_id in unwanted_node_ids {
        if let Some(mut node) = document.tree.get_mut(node_id) {
            node.detach();
        }
    }
}

/// Collapse runs of whitespace within lines and drop blank lines
#[inline]
pub fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(collapse_spaces)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_spaces(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}
