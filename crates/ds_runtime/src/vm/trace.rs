//! Execution trace and detail rendering.
//!
//! Traced rolls and name loads are recorded by source span. Rendering replaces each
//! outermost span in the matched source with `value[entries]`, where the entries list
//! the outer span first and every nested span after it, as `text=value[=breakdown]`.
use ahash::RandomState;
use ds_syntax::Span;
use indexmap::IndexMap;

use crate::Value;
use crate::value::fast_hasher;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    breakdown: Option<String>,
}

#[derive(Debug)]
pub(crate) struct TraceLog {
    entries: IndexMap<Span, Entry, RandomState>,
}

impl Default for TraceLog {
    fn default() -> Self {
        Self {
            entries: IndexMap::with_hasher(fast_hasher()),
        }
    }
}

impl TraceLog {
    /// A span evaluated more than once (loops) keeps its last value.
    pub(crate) fn record(&mut self, span: Span, value: &Value, breakdown: Option<String>) {
        self.entries.insert(
            span,
            Entry {
                value: value.to_string(),
                breakdown,
            },
        );
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the detail string for `src`. Spans that do not fit `src` are skipped.
    pub(crate) fn render(&self, src: &str) -> String {
        let mut spans: Vec<(&Span, &Entry)> = self
            .entries
            .iter()
            .filter(|(s, _)| s.start < s.end && src.get(s.start..s.end).is_some())
            .collect();
        spans.sort_by(|(a, _), (b, _)| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut out = String::with_capacity(src.len() * 2);
        let mut cursor = 0;
        let mut i = 0;
        while i < spans.len() {
            let (top, entry) = spans[i];
            let mut j = i + 1;
            while j < spans.len() && top.contains(*spans[j].0) {
                j += 1;
            }
            if top.start < cursor {
                // overlaps an earlier outer span without nesting in it
                i = j;
                continue;
            }
            out.push_str(src.get(cursor..top.start).unwrap_or(""));
            out.push_str(&entry.value);
            out.push('[');
            for (n, (span, e)) in spans[i..j].iter().enumerate() {
                if n > 0 {
                    out.push(',');
                }
                out.push_str(span.text(src));
                out.push('=');
                out.push_str(&e.value);
                if let Some(b) = &e.breakdown {
                    out.push('=');
                    out.push_str(b);
                }
            }
            out.push(']');
            cursor = top.end;
            i = j;
        }
        out.push_str(src.get(cursor..).unwrap_or(""));
        out
    }
}
