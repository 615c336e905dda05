// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Soft-wrapping of transcript text for the viewport.

use unicode_width::UnicodeWidthChar;

/// Split `text` into visual lines of at most `width` display columns.
///
/// `'\n'` always starts a new line.  Lines are broken at the last space that
/// fits; a word longer than the width is broken mid-word.  Wide characters
/// count as two columns.  `width == 0` disables soft-wrapping.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw in text.split('\n') {
        if width == 0 {
            out.push(raw.to_string());
            continue;
        }
        wrap_line(raw, width, &mut out);
    }
    out
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    let mut cur = String::new();
    let mut cols = 0usize;
    // Byte offset in `cur` just after the last space, and the columns before it.
    let mut last_space: Option<(usize, usize)> = None;

    for ch in line.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(1);
        if cols + w > width && !cur.is_empty() {
            if let Some((byte, space_cols)) = last_space.filter(|_| ch != ' ') {
                let rest = cur.split_off(byte);
                let head = cur.trim_end();
                if !head.is_empty() {
                    out.push(head.to_string());
                }
                cols -= space_cols;
                cur = rest;
            }
            // The carried-over word may still leave no room for `ch`.
            if cols + w > width && !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
                cols = 0;
            }
            last_space = None;
            if ch == ' ' && cur.is_empty() {
                continue;
            }
        }
        cur.push(ch);
        cols += w;
        if ch == ' ' {
            last_space = Some((cur.len(), cols));
        }
    }
    out.push(cur);
}
