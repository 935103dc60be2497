//! Page composition.
//!
//! Turns a raw page into its final form: scope the page's own CSS, inline
//! every `:name;` placeholder with the component's markup, push all style
//! blocks into `<head>` and compact the result.
//!
//! Pages are expected to contain exactly one `</head>`. Style blocks are
//! inserted before every occurrence, so a page with two closing head tags gets
//! each block twice. A page without one gets none.

use crate::catalog::{Catalog, Component};
use crate::log::{LogEntry, LogScope, LogSink, Timed};
use crate::scope;

const HEAD_CLOSE: &str = "</head>";

pub fn compose(page: &str, catalog: &Catalog, log: &dyn LogSink) -> String {
    let scoped = scope::scope(page, log);
    compose_scoped(scoped.html, &scoped.css, catalog, log)
}

/// Composition after the page has been scoped.
pub(crate) fn compose_scoped(
    mut html: String,
    page_css: &str,
    catalog: &Catalog,
    log: &dyn LogSink,
) -> String {
    for component in catalog.iter() {
        html = html.replace(&placeholder(&component.name), &inline_markup(component));
        html = insert_style(&html, &component.css);
    }
    html = insert_style(&html, page_css);

    compact(&html, log)
}

/// The `:name;` token a page uses to reference a component.
pub fn placeholder(name: &str) -> String {
    format!(":{};", name)
}

fn inline_markup(component: &Component) -> String {
    format!(
        "<!-- Begin {token} -->{html} <!-- End {token} -->",
        token = component.token,
        html = component.html
    )
}

fn insert_style(html: &str, css: &str) -> String {
    html.replace(HEAD_CLOSE, &format!("<style>{}</style>\n{}", css, HEAD_CLOSE))
}

/// Drop every newline, then remove each pair of consecutive spaces in a
/// single left-to-right pass. Odd runs keep one space (`"a   b"` becomes
/// `"a b"`), even runs vanish entirely.
pub fn compact(html: &str, log: &dyn LogSink) -> String {
    let _timed = Timed::start(log, LogScope::HtmlFormat, "html_format");
    log.record(LogEntry::note(LogScope::HtmlFormat, "Formatted HTML"));
    html.replace('\n', "").replace("  ", "")
}
