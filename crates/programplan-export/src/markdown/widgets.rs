//! ASCII sketches of individual nodes.
//!
//! Each palette id maps to a pure function producing the node's lines.
//! Lookup goes palette id, then generic `uiType`, then the fallback box.

use std::collections::HashMap;

use plan_canvas::model::{DEFAULT_LABEL, Node};

use super::ascii::{
    DOUBLE, ROUNDED, Row, SINGLE, draw_box, interior_width, labeled_rule, pad_right, pad_with,
    truncate, wrap,
};

/// Per-render settings handed to every widget.
#[derive(Clone, Copy, Debug)]
pub struct WidgetContext {
    /// Nominal outer width of a node sketch.
    pub width: usize,
}

impl WidgetContext {
    fn interior(&self) -> usize {
        interior_width(self.width)
    }
}

pub type WidgetFn = fn(&Node, &WidgetContext) -> Vec<String>;

/// Dispatch table from palette id (or `uiType`) to sketch function.
#[derive(Clone)]
pub struct WidgetRegistry {
    renderers: HashMap<&'static str, WidgetFn>,
    fallback: WidgetFn,
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        let mut registry = Self::empty(fallback_box);
        registry
            .register("container", window)
            .register("card", card)
            .register("divider", divider)
            .register("navbar", navbar)
            .register("sidebar", sidebar)
            .register("tabs", tabs)
            .register("breadcrumb", breadcrumb)
            .register("btn_pri", primary_button)
            .register("btn_sec", secondary_button)
            .register("action", action_button)
            .register("inp_text", text_input)
            .register("inp_search", text_input)
            .register("select", select)
            .register("checkbox", checkbox)
            .register("switch", switch)
            .register("radio", radio)
            .register("slider", slider)
            .register("img", image)
            .register("avatar", avatar)
            .register("table", table)
            .register("list", list)
            .register("tag", tag)
            .register("badge", badge)
            .register("modal", modal)
            .register("alert", alert)
            .register("toast", toast)
            // Generic families for nodes without a palette id.
            .register("Container", window)
            .register("Card", card)
            .register("Button", primary_button)
            .register("Input", text_input)
            .register("Image", image);
        registry
    }
}

impl WidgetRegistry {
    pub fn empty(fallback: WidgetFn) -> Self {
        Self {
            renderers: HashMap::new(),
            fallback,
        }
    }

    pub fn register(&mut self, key: &'static str, renderer: WidgetFn) -> &mut Self {
        self.renderers.insert(key, renderer);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.renderers.contains_key(key)
    }

    fn resolve(&self, node: &Node) -> WidgetFn {
        node.toolbox_id()
            .and_then(|id| self.renderers.get(id))
            .or_else(|| {
                node.data
                    .ui_type
                    .and_then(|t| self.renderers.get(t.key()))
            })
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn render(&self, node: &Node, ctx: &WidgetContext) -> Vec<String> {
        (self.resolve(node))(node, ctx)
    }
}

fn label(node: &Node) -> &str {
    node.display_label()
}

fn description(node: &Node) -> Option<&str> {
    node.data
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
}

/// Label plus wrapped description in a plain box.
pub fn fallback_box(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let mut rows = vec![Row::center(label(node))];
    if let Some(desc) = description(node) {
        rows.push(Row::Rule);
        rows.extend(wrap(desc, ctx.interior()).into_iter().map(Row::Text));
    }
    draw_box(None, &rows, ctx.width, &SINGLE)
}

fn window(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let mut rows = vec![Row::Blank];
    if let Some(desc) = description(node) {
        rows.extend(wrap(desc, ctx.interior()).into_iter().map(Row::Text));
    }
    rows.push(Row::Blank);
    draw_box(Some(label(node)), &rows, ctx.width, &ROUNDED)
}

fn card(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let mut rows = vec![
        Row::text("▒".repeat(ctx.interior())),
        Row::Rule,
        Row::text(label(node)),
    ];
    match description(node) {
        Some(desc) => rows.extend(wrap(desc, ctx.interior()).into_iter().map(Row::Text)),
        None => rows.push(Row::text("····")),
    }
    draw_box(None, &rows, ctx.width, &ROUNDED)
}

fn divider(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let text = if node.data.label.trim().is_empty() { "" } else { label(node) };
    vec![labeled_rule(text, ctx.width)]
}

fn navbar(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let rows = [Row::text("[Logo]  Home  Products  Pricing")];
    draw_box(Some(label(node)), &rows, ctx.width, &SINGLE)
}

fn sidebar(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let title = match label(node) {
        DEFAULT_LABEL => "Dashboard",
        other => other,
    };
    let mut rows: Vec<Row> = (1..=4).map(|i| Row::text(format!("▸ Item {i}"))).collect();
    rows.insert(0, Row::Blank);
    draw_box(Some(title), &rows, ctx.width / 2 + 4, &SINGLE)
}

fn tabs(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let rows = [
        Row::text("[ Tab 1 ]  Tab 2   Tab 3"),
        Row::Rule,
        Row::Blank,
        Row::center(format!("{} Content", label(node))),
        Row::Blank,
    ];
    draw_box(None, &rows, ctx.width, &SINGLE)
}

fn breadcrumb(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    vec![truncate(&format!("Home > Products > {}", label(node)), ctx.width)]
}

fn button(node: &Node, ctx: &WidgetContext, open: &str, close: &str) -> Vec<String> {
    vec![format!("{open} {} {close}", truncate(label(node), ctx.interior()))]
}

fn primary_button(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    button(node, ctx, "[", "]")
}

fn secondary_button(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    button(node, ctx, "(", ")")
}

fn action_button(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    button(node, ctx, "<", ">")
}

fn text_input(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let text = label(node);
    let is_search =
        node.toolbox_id() == Some("inp_search") || text.to_lowercase().contains("search");
    let icon = if is_search { '⌕' } else { '✎' };
    let field = ctx.width.saturating_sub(6);
    vec![format!("[ {icon} {} ]", pad_with(text, field, '_'))]
}

fn select(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let text = if node.data.label.trim().is_empty() { "Select..." } else { label(node) };
    vec![format!("[ {} ▾ ]", pad_right(text, ctx.width.saturating_sub(6)))]
}

fn toggle_line(glyph: &str, node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let room = ctx.width.saturating_sub(glyph.chars().count() + 1);
    vec![format!("{glyph} {}", truncate(label(node), room))]
}

fn checkbox(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    toggle_line("[x]", node, ctx)
}

fn radio(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    toggle_line("(•)", node, ctx)
}

fn switch(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    toggle_line("(●━━)", node, ctx)
}

fn slider(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let track = ctx.interior().max(8);
    let knob = track / 3;
    let bar: String = (0..track)
        .map(|i| if i == knob { '●' } else { '─' })
        .collect();
    vec![truncate(label(node), ctx.width), format!("├{bar}┤")]
}

fn image(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let rows = [
        Row::center("╲   ╱"),
        Row::center("IMG"),
        Row::center("╱   ╲"),
        Row::Rule,
        Row::center(label(node)),
    ];
    draw_box(None, &rows, ctx.width, &SINGLE)
}

fn avatar(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    toggle_line("( ◕ )", node, ctx)
}

fn table(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let cell = ctx.interior().saturating_sub(6) / 3;
    let grid = |a: &str, b: &str, c: &str| {
        Row::text(format!(
            "{} │ {} │ {}",
            pad_right(a, cell),
            pad_right(b, cell),
            pad_right(c, cell)
        ))
    };
    let mut rows = vec![grid("Col 1", "Col 2", "Col 3"), Row::Rule];
    for i in 1..=3 {
        rows.push(grid(&format!("Row {i}"), "Data", "Data"));
    }
    draw_box(Some(label(node)), &rows, ctx.width, &SINGLE)
}

fn list(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let rows: Vec<Row> = (1..=3).map(|i| Row::text(format!("• Item {i}"))).collect();
    draw_box(Some(label(node)), &rows, ctx.width, &SINGLE)
}

fn tag(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    vec![format!("‹ {} ›", truncate(label(node), ctx.interior()))]
}

fn badge(node: &Node, _ctx: &WidgetContext) -> Vec<String> {
    let text = label(node);
    let count = if text.chars().count() > 2 { "1" } else { text };
    vec![format!("◖{count}◗")]
}

fn modal(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let mut rows = vec![Row::Blank];
    if let Some(desc) = description(node) {
        rows.extend(wrap(desc, ctx.interior()).into_iter().map(Row::Center));
    }
    rows.push(Row::Blank);
    rows.push(Row::Rule);
    rows.push(Row::right("[ Cancel ]  [ OK ]"));
    draw_box(Some(label(node)), &rows, ctx.width, &DOUBLE)
}

fn alert(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let mut rows = vec![Row::text(format!("⚠ {}", label(node)))];
    if let Some(desc) = description(node) {
        rows.extend(wrap(desc, ctx.interior()).into_iter().map(Row::Text));
    }
    draw_box(None, &rows, ctx.width, &SINGLE)
}

fn toast(node: &Node, ctx: &WidgetContext) -> Vec<String> {
    let rows = [Row::text(format!("✓ {}", label(node)))];
    draw_box(None, &rows, ctx.width, &ROUNDED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::ascii::text_len;
    use plan_canvas::model::Position;
    use plan_canvas::palette::UiType;

    const CTX: WidgetContext = WidgetContext { width: 40 };

    fn node(toolbox: Option<&str>, label: &str) -> Node {
        let mut node = Node::new("n", label, Position::default());
        node.data.toolbox_id = toolbox.map(str::to_string);
        node
    }

    #[test]
    fn primary_button_sketch() {
        let lines = WidgetRegistry::default().render(&node(Some("btn_pri"), "Login"), &CTX);
        assert_eq!(lines, vec!["[ Login ]"]);
    }

    #[test]
    fn every_palette_sketch_stays_within_width() {
        let registry = WidgetRegistry::default();
        let long = "An extremely long label that would never fit inside any box";
        for item in plan_canvas::palette::PALETTE {
            let mut n = node(Some(item.id), long);
            n.data.description = Some(long.repeat(3));
            for line in registry.render(&n, &CTX) {
                assert!(text_len(&line) <= CTX.width, "{}: {line}", item.id);
            }
        }
    }

    #[test]
    fn palette_id_beats_ui_type() {
        let registry = WidgetRegistry::default();
        let mut n = node(Some("navbar"), "Top");
        n.data.ui_type = Some(UiType::Button);
        assert!(registry.render(&n, &CTX)[1].contains("[Logo]"));

        n.data.toolbox_id = None;
        assert_eq!(registry.render(&n, &CTX), vec!["[ Top ]"]);
    }

    #[test]
    fn unknown_kind_uses_fallback() {
        let registry = WidgetRegistry::default();
        let mut n = node(Some("React"), "Frontend");
        n.data.description = Some("SPA shell".into());
        let lines = registry.render(&n, &CTX);
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("Frontend"));
        assert!(lines[3].contains("SPA shell"));
        assert!(lines.iter().all(|l| text_len(l) == 40));
    }

    #[test]
    fn sidebar_defaults_title_and_search_icon() {
        let registry = WidgetRegistry::default();
        let side = registry.render(&node(Some("sidebar"), ""), &CTX);
        assert!(side[0].contains("Dashboard"));

        let search = registry.render(&node(Some("inp_text"), "Search users"), &CTX);
        assert!(search[0].starts_with("[ ⌕ Search users"));
    }

    #[test]
    fn badge_collapses_long_labels() {
        let registry = WidgetRegistry::default();
        assert_eq!(registry.render(&node(Some("badge"), "99"), &CTX), vec!["◖99◗"]);
        assert_eq!(registry.render(&node(Some("badge"), "New!"), &CTX), vec!["◖1◗"]);
    }
}
