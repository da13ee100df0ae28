//! Canonical text layout for prior-article blocks and the current-event block.
//!
//! Labels and line order are fixed (see `constants::serializer`); absent
//! values render as [`MISSING_PLACEHOLDER`] so serialization never fails.

use std::borrow::Cow;

use crate::constants::serializer::*;
use crate::data::{Event, RelatedTopics, Timestamp};
use crate::window::Window;

/// Render `window` (oldest first) followed by exactly one block for `current`.
pub fn serialize(window: &Window<'_>, current: &Event) -> String {
    let mut out = String::with_capacity(estimated_len(window, current));
    for prior in window.iter() {
        push_prior_block(&mut out, prior);
    }
    push_current_block(&mut out, current);
    out
}

/// Render one prior-article block, including its trailing delimiter.
pub fn push_prior_block(out: &mut String, prior: &Event) {
    let article = &prior.article;
    let lines: [(&str, Cow<'_, str>); 6] = [
        (PREV_DATE, Cow::Owned(render_timestamp(&prior.published_at))),
        (PREV_CONTENT, render_text(article.body.as_deref())),
        (PREV_TITLE, render_text(article.title.as_deref())),
        (PREV_TYPE, render_text(article.article_type.as_deref())),
        (PREV_PUBLICATION, render_text(article.publication.as_deref())),
        (PREV_AUTHOR, render_text(article.author.as_deref())),
    ];
    for (label, value) in lines {
        out.push('\n');
        out.push_str(label);
        out.push_str(&value);
    }
    out.push_str(BLOCK_DELIMITER);
}

/// Render the current-event block (no trailing newline).
pub fn push_current_block(out: &mut String, current: &Event) {
    let article = &current.article;
    let prices = current.prices;
    let lines: [(&str, Cow<'_, str>); 12] = [
        (CUR_SYMBOL, render_text(current.entity_id.as_deref())),
        (CUR_DATE, Cow::Owned(render_timestamp(&current.published_at))),
        (CUR_RELATED, render_topics(current.related_topics.as_ref())),
        (CUR_CONTENT, render_text(article.body.as_deref())),
        (CUR_TITLE, render_text(article.title.as_deref())),
        (CUR_TYPE, render_text(article.article_type.as_deref())),
        (CUR_PUBLICATION, render_text(article.publication.as_deref())),
        (CUR_AUTHOR, render_text(article.author.as_deref())),
        (CUR_PRICE_96H, render_number(prices.before_96h)),
        (CUR_PRICE_48H, render_number(prices.before_48h)),
        (CUR_PRICE_24H, render_number(prices.before_24h)),
        (CUR_PRICE_RELEASE, render_number(prices.at_release)),
    ];
    for (position, (label, value)) in lines.into_iter().enumerate() {
        if position > 0 {
            out.push('\n');
        }
        out.push_str(label);
        out.push_str(&value);
    }
}

fn render_text(value: Option<&str>) -> Cow<'_, str> {
    Cow::Borrowed(value.unwrap_or(MISSING_PLACEHOLDER))
}

fn render_timestamp(value: &Timestamp) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn render_topics(value: Option<&RelatedTopics>) -> Cow<'_, str> {
    match value {
        None => Cow::Borrowed(MISSING_PLACEHOLDER),
        Some(RelatedTopics::Text(text)) => Cow::Borrowed(text),
        Some(RelatedTopics::List(items)) => Cow::Owned(items.join(TOPIC_LIST_SEPARATOR)),
    }
}

/// Finite values keep a decimal point (`100.0`); non-finite ones render lowercase.
fn render_number(value: Option<f64>) -> Cow<'static, str> {
    match value {
        None => Cow::Borrowed(MISSING_PLACEHOLDER),
        Some(v) if v.is_nan() => Cow::Borrowed("nan"),
        Some(v) if v.is_infinite() => Cow::Borrowed(if v > 0.0 { "inf" } else { "-inf" }),
        Some(v) => Cow::Owned(format!("{v:?}")),
    }
}

fn estimated_len(window: &Window<'_>, current: &Event) -> usize {
    let body_len = |event: &Event| event.article.body.as_ref().map_or(0, String::len);
    // Labels and short fields fit comfortably in 256 bytes per block.
    window.iter().map(|prior| body_len(prior) + 256).sum::<usize>() + body_len(current) + 512
}
