//! CSS scoping.
//!
//! Pulls the embedded `<style>` block out of a document, then renames every
//! class and id it defines by appending a random suffix. The same suffix is
//! applied to the selectors in the CSS and to the matching `id="…"` /
//! `class="…"` attributes in the HTML, so documents scoped independently can
//! never collide even when they share names.
//!
//! Renaming is plain text substitution:
//! - `#name` is replaced anywhere in the CSS, values included.
//! - `.name` is replaced anywhere in the CSS, so `.name` also rewrites the
//!   prefix of `.name-other`.
//! - A `class` attribute containing the name as a whole word is replaced
//!   entirely, so `class="a b"` becomes `class="a-<suffix>"`.
//!
//! Scoping is not idempotent: scoping the output again appends a second suffix.

use lazy_static::lazy_static;
use rand::RngCore;
use regex::{NoExpand, Regex};

use crate::log::{LogEntry, LogScope, LogSink, Timed};
use crate::selector;

/// Literal marker checked before any extraction happens. Attributed tags such
/// as `<style media="x">` do not contain it, so documents using only those are
/// treated as having no CSS.
const STYLE_MARKER: &str = "<style>";

lazy_static! {
    static ref STYLE_BLOCK: Regex = Regex::new(r"<style[^>]*>([\s\S]*?)</style>").unwrap();
}

/// Output of [`scope`]: the document with style blocks removed, and the
/// rewritten CSS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoped {
    pub html: String,
    pub css: String,
}

/// 256 random bits, hex encoded (64 characters).
pub fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Scope a document with a freshly generated suffix.
pub fn scope(html: &str, log: &dyn LogSink) -> Scoped {
    scope_with_suffix(html, &random_token(), log)
}

/// Scope a document with the given suffix.
pub fn scope_with_suffix(html: &str, suffix: &str, log: &dyn LogSink) -> Scoped {
    let _timed = Timed::start(log, LogScope::CssFormat, "css_format");

    if !html.contains(STYLE_MARKER) {
        log.record(
            LogEntry::note(LogScope::CssFormat, "Exiting due to no CSS element found.")
                .with_hints("basic_check"),
        );
        return unscoped(html);
    }

    let mut css = match STYLE_BLOCK.captures(html).and_then(|cap| cap.get(1)) {
        Some(m) => m.as_str().to_string(),
        None => {
            log.record(
                LogEntry::note(LogScope::CssFormat, "Exiting due to no CSS element found.")
                    .with_hints("regex"),
            );
            return unscoped(html);
        }
    };

    let selectors = selector::extract(&css);

    // Every block is removed, but only the first one's CSS survives.
    let mut html = STYLE_BLOCK.replace_all(html, "").into_owned();

    for id in &selectors.id_names {
        html = html.replace(
            &format!("id=\"{}\"", id),
            &format!("id=\"{}-{}\"", id, suffix),
        );
        css = css.replace(&format!("#{}", id), &format!("#{}-{}", id, suffix));
    }
    log.record(LogEntry::child(LogScope::CssFormat, "Finished replacing CSS ID"));

    for class in &selectors.class_names {
        let pattern = format!(r#"class="([^"]*\b{}\b[^"]*)""#, regex::escape(class));
        if let Ok(attr) = Regex::new(&pattern) {
            let replacement = format!("class=\"{}-{}\"", class, suffix);
            html = attr.replace_all(&html, NoExpand(&replacement)).into_owned();
        }
        css = css.replace(&format!(".{}", class), &format!(".{}-{}", class, suffix));
    }
    log.record(LogEntry::child(
        LogScope::CssFormat,
        "Finished replacing CSS Class",
    ));

    log.record(LogEntry::note(
        LogScope::CssFormat,
        format!("Success formatting for id '{}'", suffix),
    ));

    Scoped { html, css }
}

fn unscoped(html: &str) -> Scoped {
    Scoped {
        html: html.to_string(),
        css: String::new(),
    }
}
