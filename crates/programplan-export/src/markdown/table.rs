use std::fmt::Write as _;

use plan_canvas::model::Node;
use plan_canvas::palette::{self, Locale};

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn headers(locale: Locale) -> [&'static str; 6] {
    match locale {
        Locale::Zh => ["#", "名稱", "類型", "屬性", "顏色", "描述"],
        Locale::En => ["#", "Name", "Type", "Attribute", "Color", "Description"],
    }
}

/// Markdown table with one row per node, in the given order.
pub fn component_table(ordered: &[&Node], locale: Locale) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| {} |", headers(locale).join(" | "));
    out.push_str("|---|---|---|---|---|---|\n");

    for (i, node) in ordered.iter().enumerate() {
        let data = &node.data;
        let kind = palette::type_display_name(data, locale).unwrap_or_else(|| "-".to_string());
        let attribute = data
            .attribute
            .map(|a| palette::attribute_display_name(a, locale))
            .unwrap_or("-");
        let color = palette::resolve_color(data.color.as_deref());
        let description = data
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(cell)
            .unwrap_or_else(|| "-".to_string());

        let _ = writeln!(
            out,
            "| {} | **{}** | {} | {} | {} | {} |",
            i + 1,
            cell(node.display_label()),
            cell(&kind),
            attribute,
            color,
            description
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_canvas::model::{NodeAttribute, Position};

    #[test]
    fn login_button_row() {
        let mut node = Node::new("1", "Login", Position::default());
        node.data.toolbox_id = Some("btn_pri".into());
        let table = component_table(&[&node], Locale::Zh);
        let rows: Vec<_> = table.lines().collect();
        assert_eq!(rows[0], "| # | 名稱 | 類型 | 屬性 | 顏色 | 描述 |");
        assert_eq!(rows[2], "| 1 | **Login** | 主要按鈕 (Primary) | - | slate | - |");
    }

    #[test]
    fn english_row_with_attribute_and_pipes() {
        let mut node = Node::new("x", "A|B", Position::default());
        node.data.attribute = Some(NodeAttribute::Backend);
        node.data.color = Some("rose".into());
        node.data.description = Some("line one\nline two".into());
        let table = component_table(&[&node], Locale::En);
        assert!(table.contains("| 1 | **A\\|B** | - | Backend | rose | line one line two |"));
    }
}
