use std::collections::HashSet;

use plan_canvas::model::Node;

use super::ascii::{HEAVY, Row, draw_box, text_len};
use super::layout::Hierarchy;
use super::widgets::{WidgetContext, WidgetRegistry};

/// Lays out the whole wireframe: one framed group per root, then orphans.
pub struct Wireframe<'r, 'a> {
    pub widgets: &'r WidgetRegistry,
    pub hierarchy: &'r Hierarchy<'a>,
    pub ctx: WidgetContext,
    pub indent: usize,
    pub orphan_heading: &'r str,
}

impl<'a> Wireframe<'_, 'a> {
    pub fn render(&self) -> String {
        let mut blocks: Vec<Vec<String>> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();

        for root in self.hierarchy.roots.iter().copied() {
            blocks.push(self.group(root, &mut visited));
        }
        // Pure cycles have no root; start them at their first node in reading order.
        loop {
            let next = self.hierarchy.unreached(&visited).next();
            match next {
                Some(head) => blocks.push(self.group(head, &mut visited)),
                None => break,
            }
        }

        if !self.hierarchy.orphans.is_empty() {
            let mut section = vec![format!("── {} ──", self.orphan_heading)];
            for orphan in &self.hierarchy.orphans {
                section.push(String::new());
                section.extend(self.widgets.render(orphan, &self.ctx));
            }
            blocks.push(section);
        }

        blocks
            .into_iter()
            .map(|block| block.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn group(&self, head: &'a Node, visited: &mut HashSet<&'a str>) -> Vec<String> {
        let mut content = Vec::new();
        visited.insert(head.id.as_str());
        self.subtree(head, 0, visited, &mut content);

        let inner = content
            .iter()
            .map(|l| text_len(l))
            .max()
            .unwrap_or(0)
            .max(self.ctx.width);
        let mut rows = vec![Row::Blank];
        rows.extend(content.into_iter().map(Row::Text));
        rows.push(Row::Blank);
        draw_box(Some(head.display_label()), &rows, inner + 4, &HEAVY)
    }

    fn subtree(
        &self,
        node: &'a Node,
        depth: usize,
        visited: &mut HashSet<&'a str>,
        out: &mut Vec<String>,
    ) {
        let pad = " ".repeat(depth * self.indent);
        for line in self.widgets.render(node, &self.ctx) {
            out.push(format!("{pad}{line}"));
        }

        let stem = " ".repeat(depth * self.indent + 2);
        for child in self.hierarchy.children(node) {
            match child.label {
                Some(label) => out.push(format!("{stem}│ {label}")),
                None => out.push(format!("{stem}│")),
            }
            if visited.insert(child.node.id.as_str()) {
                out.push(format!("{stem}▼"));
                self.subtree(child.node, depth + 1, visited, out);
            } else {
                out.push(format!("{stem}└─▶ ↺ {}", child.node.display_label()));
            }
        }
    }
}
