//! Box-drawing primitives for the wireframe.
//!
//! Widths are counted in chars. Text that does not fit is cut with `…`
//! rather than pushing the right border out.

/// Character set for one box style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Border {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
    pub tee_left: char,
    pub tee_right: char,
}

pub const SINGLE: Border = Border {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
    tee_left: '├',
    tee_right: '┤',
};

pub const DOUBLE: Border = Border {
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    horizontal: '═',
    vertical: '║',
    tee_left: '╠',
    tee_right: '╣',
};

pub const ROUNDED: Border = Border {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    ..SINGLE
};

pub const HEAVY: Border = Border {
    top_left: '┏',
    top_right: '┓',
    bottom_left: '┗',
    bottom_right: '┛',
    horizontal: '━',
    vertical: '┃',
    tee_left: '┣',
    tee_right: '┫',
};

/// One line inside a box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    Text(String),
    Center(String),
    Right(String),
    Rule,
    Blank,
}

impl Row {
    pub fn text(s: impl Into<String>) -> Self {
        Row::Text(s.into())
    }

    pub fn center(s: impl Into<String>) -> Self {
        Row::Center(s.into())
    }

    pub fn right(s: impl Into<String>) -> Self {
        Row::Right(s.into())
    }
}

pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Usable text width of a box: two border chars plus one space each side.
pub fn interior_width(outer: usize) -> usize {
    outer.saturating_sub(4)
}

pub fn truncate(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if text_len(text) <= max_len {
        return text.to_owned();
    }
    if max_len == 1 {
        return "…".to_owned();
    }
    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// Truncates then left-aligns `text` in exactly `width` chars.
pub fn pad_right(text: &str, width: usize) -> String {
    pad_with(text, width, ' ')
}

pub fn pad_with(text: &str, width: usize, fill: char) -> String {
    let mut out = truncate(text, width);
    let len = text_len(&out);
    out.extend(std::iter::repeat_n(fill, width - len));
    out
}

pub fn pad_center(text: &str, width: usize) -> String {
    let out = truncate(text, width);
    let gap = width - text_len(&out);
    let left = gap / 2;
    format!("{}{}{}", " ".repeat(left), out, " ".repeat(gap - left))
}

pub fn pad_left(text: &str, width: usize) -> String {
    let out = truncate(text, width);
    format!("{}{}", " ".repeat(width - text_len(&out)), out)
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if line.is_empty() { word.len() } else { text_len(&line) + 1 + word.len() };
            if needed > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.extend(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

/// Draws a box `outer` chars wide. A title is set into the top border.
pub fn draw_box(title: Option<&str>, rows: &[Row], outer: usize, border: &Border) -> Vec<String> {
    let outer = outer.max(6);
    let inner = interior_width(outer);
    let h = border.horizontal;
    let mut lines = Vec::with_capacity(rows.len() + 2);

    let top = match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => {
            let title = truncate(title, outer - 6);
            let fill = outer - 5 - text_len(&title);
            format!(
                "{}{h} {title} {}{}",
                border.top_left,
                h.to_string().repeat(fill),
                border.top_right
            )
        }
        None => format!(
            "{}{}{}",
            border.top_left,
            h.to_string().repeat(outer - 2),
            border.top_right
        ),
    };
    lines.push(top);

    for row in rows {
        let body = match row {
            Row::Text(s) => pad_right(s, inner),
            Row::Center(s) => pad_center(s, inner),
            Row::Right(s) => pad_left(s, inner),
            Row::Blank => " ".repeat(inner),
            Row::Rule => {
                lines.push(format!(
                    "{}{}{}",
                    border.tee_left,
                    h.to_string().repeat(outer - 2),
                    border.tee_right
                ));
                continue;
            }
        };
        lines.push(format!("{v} {body} {v}", v = border.vertical));
    }

    lines.push(format!(
        "{}{}{}",
        border.bottom_left,
        h.to_string().repeat(outer - 2),
        border.bottom_right
    ));
    lines
}

/// A horizontal rule with centered text, `width` chars long.
pub fn labeled_rule(label: &str, width: usize) -> String {
    let label = truncate(label.trim(), width.saturating_sub(4));
    if label.is_empty() {
        return "─".repeat(width);
    }
    let fill = width.saturating_sub(text_len(&label) + 2);
    let left = fill / 2;
    format!("{} {label} {}", "─".repeat(left), "─".repeat(fill - left))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("主要按鈕", 3), "主要…");
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("abcd", 1), "…");
        assert_eq!(truncate("abcd", 0), "");
    }

    #[test]
    fn pad_never_overflows() {
        assert_eq!(pad_right("a very long label", 6), "a ver…");
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_center("ab", 5), " ab  ");
        assert_eq!(pad_left("ab", 4), "  ab");
    }

    #[test]
    fn box_lines_have_equal_width() {
        let rows = vec![
            Row::text("short"),
            Row::Rule,
            Row::center("a label that is certainly far too long for the box"),
            Row::Blank,
        ];
        let lines = draw_box(Some("Title"), &rows, 20, &SINGLE);
        assert_eq!(lines.len(), rows.len() + 2);
        for line in &lines {
            assert_eq!(text_len(line), 20, "{line}");
        }
        assert!(lines[0].starts_with("┌─ Title "));
        assert_eq!(interior_width(20), 16);
    }

    #[test]
    fn wrap_splits_words_and_long_tokens() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 4).is_empty());
    }

    #[test]
    fn labeled_rule_is_fixed_width() {
        assert_eq!(text_len(&labeled_rule("Section", 20)), 20);
        assert_eq!(labeled_rule("", 4), "────");
    }
}
