//! Line-level unified diff for proposed edits.
//!
//! The walk is a bounded-lookahead heuristic, not a minimal edit script. The
//! output explains an edit to a reviewer and to the model; the stored
//! `new_content` is what actually gets written.

use std::fmt::Write;

/// Lines of unchanged context around each hunk.
const CONTEXT_LINES: usize = 3;

/// Lines probed on each side for a resynchronization point.
const LOOKAHEAD: usize = 5;

/// One-for-one steps taken before a hunk is closed.
const MAX_RESYNC_ATTEMPTS: usize = 10;

struct Hunk<'a> {
    orig_start: usize,
    orig_count: usize,
    new_start: usize,
    new_count: usize,
    lines: Vec<(char, &'a str)>,
}

/// Renders a unified diff of `original` against `modified`.
///
/// Identical inputs produce only the two header lines.
#[must_use]
pub fn unified_diff(path: &str, original: &str, modified: &str) -> String {
    let orig: Vec<&str> = original.split('\n').collect();
    let modi: Vec<&str> = modified.split('\n').collect();

    let mut out = format!("--- a/{path}\n+++ b/{path}");
    for hunk in hunks(&orig, &modi) {
        let _ = write!(
            out,
            "\n@@ -{},{} +{},{} @@",
            hunk.orig_start, hunk.orig_count, hunk.new_start, hunk.new_count
        );
        for (tag, line) in hunk.lines {
            let _ = write!(out, "\n{tag}{line}");
        }
    }
    out
}

fn hunks<'a>(orig: &[&'a str], modi: &[&'a str]) -> Vec<Hunk<'a>> {
    let mut hunks = Vec::new();
    let (mut i, mut j) = (0, 0);
    // First original line not yet shown by a previous hunk.
    let mut shown_until = 0;

    while i < orig.len() || j < modi.len() {
        if i < orig.len() && j < modi.len() && orig[i] == modi[j] {
            i += 1;
            j += 1;
            continue;
        }

        let (change_i, change_j) = (i, j);
        let (deleted, added) = resync(orig, modi, &mut i, &mut j);

        let before = change_i.saturating_sub(CONTEXT_LINES).max(shown_until);
        let leading = change_i - before;
        let trailing = (0..CONTEXT_LINES)
            .take_while(|&k| {
                i + k < orig.len() && j + k < modi.len() && orig[i + k] == modi[j + k]
            })
            .count();
        shown_until = i + trailing;

        let mut lines = Vec::with_capacity(leading + deleted.len() + added.len() + trailing);
        lines.extend(orig[before..change_i].iter().map(|l| (' ', *l)));
        lines.extend(deleted.iter().map(|l| ('-', *l)));
        lines.extend(added.iter().map(|l| ('+', *l)));
        lines.extend(orig[i..i + trailing].iter().map(|l| (' ', *l)));

        let orig_count = leading + deleted.len() + trailing;
        let new_count = leading + added.len() + trailing;
        hunks.push(Hunk {
            orig_start: hunk_start(before, orig_count),
            orig_count,
            new_start: hunk_start(change_j - leading, new_count),
            new_count,
            lines,
        });
    }

    hunks
}

/// Consumes a changed region starting at a mismatch.
///
/// Returns the deleted and added lines. The cursors are left at the
/// resynchronization point, or wherever the attempt budget ran out.
fn resync<'a>(
    orig: &[&'a str],
    modi: &[&'a str],
    i: &mut usize,
    j: &mut usize,
) -> (Vec<&'a str>, Vec<&'a str>) {
    let mut deleted = Vec::new();
    let mut added = Vec::new();
    let mut attempts = MAX_RESYNC_ATTEMPTS;

    while attempts > 0 && (*i < orig.len() || *j < modi.len()) {
        if *i < orig.len() && *j < modi.len() {
            let sync = sync_offsets().find(|&(a, b)| {
                *i + a < orig.len() && *j + b < modi.len() && orig[*i + a] == modi[*j + b]
            });

            if let Some((a, b)) = sync {
                deleted.extend_from_slice(&orig[*i..*i + a]);
                added.extend_from_slice(&modi[*j..*j + b]);
                *i += a;
                *j += b;
                break;
            }

            deleted.push(orig[*i]);
            added.push(modi[*j]);
            *i += 1;
            *j += 1;
            attempts -= 1;
        } else if *i < orig.len() {
            deleted.extend_from_slice(&orig[*i..]);
            *i = orig.len();
        } else {
            added.extend_from_slice(&modi[*j..]);
            *j = modi.len();
        }
    }

    (deleted, added)
}

/// Candidate `(original, modified)` skips, smallest total skip first.
fn sync_offsets() -> impl Iterator<Item = (usize, usize)> {
    (0..2 * LOOKAHEAD - 1).flat_map(|total| {
        (0..=total)
            .map(move |a| (a, total - a))
            .filter(|&(a, b)| a < LOOKAHEAD && b < LOOKAHEAD)
    })
}

/// 1-based start line; an empty range points at the line before it.
fn hunk_start(first_index: usize, count: usize) -> usize {
    if count == 0 { first_index } else { first_index + 1 }
}

/// Added and removed line counts of a rendered diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    /// Lines prefixed with `+`.
    pub added: usize,
    /// Lines prefixed with `-`.
    pub removed: usize,
}

impl DiffStats {
    /// Counts changed lines, ignoring the file headers.
    #[must_use]
    pub fn from_diff(diff: &str) -> Self {
        let mut stats = Self::default();
        for line in diff.lines().skip_while(|l| !l.starts_with("@@")) {
            if line.starts_with('+') {
                stats.added += 1;
            } else if line.starts_with('-') {
                stats.removed += 1;
            }
        }
        stats
    }

    /// Whether the diff changes anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}
