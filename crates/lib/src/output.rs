use std::io::{self, Write};
use std::sync::LazyLock;

use crossterm::terminal;
use itertools::Itertools;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

mod redmine;
pub use redmine::{render_rows, render_statuses, DefaultJournal, IssueColumn, JournalRender, Row};

/// Terminal width used when it can't be queried.
pub const DEFAULT_COLUMNS: usize = 80;

/// Width that description and note text is wrapped to.
pub const WRAP_WIDTH: usize = 79;

pub static COLUMNS: LazyLock<usize> = LazyLock::new(|| {
    // use a static width when testing is enabled
    if cfg!(any(test, feature = "test")) {
        DEFAULT_COLUMNS
    } else {
        columns(terminal::size())
    }
});

/// Determine the row width from a terminal size query.
fn columns(size: io::Result<(u16, u16)>) -> usize {
    match size {
        Ok((cols, _rows)) if cols > 0 => cols.into(),
        Ok(_) => DEFAULT_COLUMNS,
        Err(e) => {
            debug!("failed querying terminal size, using {DEFAULT_COLUMNS} columns: {e}");
            DEFAULT_COLUMNS
        }
    }
}

/// Render an item for output to the terminal.
pub trait Render {
    fn render<W: Write>(&self, f: &mut W, width: usize) -> io::Result<()>;
}

/// Implement std::fmt::Display trait for given types using the Render trait.
#[macro_export]
macro_rules! impl_render_display {
    ($($type:ty),+) => {$(
        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                let mut buf = vec![];
                $crate::output::Render::render(self, &mut buf, $crate::output::WRAP_WIDTH)
                    .map_err(|_| std::fmt::Error)?;
                let s = String::from_utf8(buf).map_err(|_| std::fmt::Error)?;
                s.fmt(f)
            }
        }
    )+};
}

/// Truncate a string to the requested display width, padding it with trailing spaces
/// if it's shorter.
///
/// Truncation happens on grapheme boundaries so wide characters that would straddle the
/// limit are dropped and replaced by padding.
pub(crate) fn fit(data: &str, width: usize) -> String {
    let mut fitted = String::with_capacity(width);
    let mut used = 0;
    for grapheme in data.graphemes(true) {
        let w = grapheme.width();
        if used + w > width {
            break;
        }
        fitted.push_str(grapheme);
        used += w;
    }
    fitted.push_str(&" ".repeat(width - used));
    fitted
}

/// Wrapping options shared by all free text, only breaking lines at ASCII spaces.
pub(crate) fn wrap_options<'a>(width: usize) -> textwrap::Options<'a> {
    textwrap::Options::new(width)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit)
}

/// Wrap free text into lines of at most the given display width.
///
/// All whitespace runs are collapsed to single spaces before wrapping so the text flows
/// as one paragraph. Words only get split when they're wider than the line.
pub(crate) fn wrap_flowed(data: &str, width: usize) -> Vec<String> {
    let data = data.split_whitespace().join(" ");
    if data.is_empty() {
        return vec![];
    }

    textwrap::wrap(&data, wrap_options(width))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_strings() {
        for (data, width, expected) in [
            ("", 0, ""),
            ("", 3, "   "),
            ("abc", 0, ""),
            ("abc", 2, "ab"),
            ("abc", 3, "abc"),
            ("abc", 5, "abc  "),
            // wide characters
            ("日本語", 4, "日本"),
            ("日本語", 5, "日本 "),
            // combining marks stay attached
            ("e\u{301}tude", 2, "e\u{301}t"),
        ] {
            let fitted = fit(data, width);
            assert_eq!(fitted, expected, "{data:?} at width {width}");
            assert_eq!(fitted.width(), width);
        }
    }

    #[test]
    fn terminal_columns() {
        assert_eq!(columns(Ok((120, 40))), 120);
        assert_eq!(columns(Ok((0, 0))), DEFAULT_COLUMNS);
        let err = io::Error::new(io::ErrorKind::Unsupported, "not a terminal");
        assert_eq!(columns(Err(err)), DEFAULT_COLUMNS);
        assert_eq!(*COLUMNS, DEFAULT_COLUMNS);
    }

    #[test]
    fn wrap_empty() {
        assert!(wrap_flowed("", WRAP_WIDTH).is_empty());
        assert!(wrap_flowed(" \n\t ", WRAP_WIDTH).is_empty());
    }

    #[test]
    fn wrap_preserves_words() {
        let data = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod\n\
            tempor incididunt ut labore et dolore magna aliqua.  Ut enim ad minim veniam,\n\n\
            quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo \
            consequat. Duis aute irure dolor in reprehenderit in voluptate velit-esse \
            cillum dolore eu fugiat nulla pariatur.";
        let lines = wrap_flowed(data, WRAP_WIDTH);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width() <= WRAP_WIDTH, "line too long: {line:?}");
        }

        let expected: Vec<_> = data.split_whitespace().collect();
        let joined = lines.join(" ");
        let rejoined: Vec<_> = joined.split_whitespace().collect();
        assert_eq!(rejoined, expected);
    }

    #[test]
    fn wrap_long_words() {
        let word = "x".repeat(100);
        let lines = wrap_flowed(&format!("short {word} tail"), WRAP_WIDTH);
        assert_eq!(lines[0], "short");
        assert_eq!(lines[1], "x".repeat(79));
        assert_eq!(lines[2], format!("{} tail", "x".repeat(21)));
    }
}
