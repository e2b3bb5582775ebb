//! # Markdown Export
//!
//! Turns a graph into a single markdown document: an ASCII wireframe laid
//! out from the edge hierarchy, a component table, a Mermaid flow diagram
//! with a readable connection list, and a statistics footer.

pub mod ascii;
pub mod layout;
pub mod mermaid;
pub mod table;
pub mod widgets;
pub mod wireframe;

use chrono::{DateTime, Utc};
use plan_canvas::model::GraphState;
use plan_canvas::palette::Locale;

use crate::json::file_name;
use crate::options::ExportOptions;
use layout::{Hierarchy, reading_order};
use widgets::{WidgetContext, WidgetRegistry};
use wireframe::Wireframe;

/// A generated markdown file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub file_name: String,
    pub contents: String,
    pub node_count: usize,
    pub edge_count: usize,
}

impl MarkdownDocument {
    pub const MIME: &'static str = "text/markdown;charset=utf-8";
}

struct Headings {
    untitled: &'static str,
    exported: &'static str,
    wireframe: &'static str,
    standalone: &'static str,
    components: &'static str,
    flow: &'static str,
    connections: &'static str,
}

const ZH: Headings = Headings {
    untitled: "未命名專案",
    exported: "匯出時間",
    wireframe: "線框圖",
    standalone: "獨立元件",
    components: "元件清單",
    flow: "流程圖",
    connections: "連線",
};

const EN: Headings = Headings {
    untitled: "Untitled Project",
    exported: "Exported",
    wireframe: "Wireframe",
    standalone: "Standalone",
    components: "Components",
    flow: "Flow",
    connections: "Connections",
};

fn headings(locale: Locale) -> &'static Headings {
    match locale {
        Locale::Zh => &ZH,
        Locale::En => &EN,
    }
}

fn footer(locale: Locale, nodes: usize, edges: usize) -> String {
    match locale {
        Locale::Zh => format!("**統計**：共 {nodes} 個元件，{edges} 條連線"),
        Locale::En => format!("**Stats**: {nodes} components, {edges} connections"),
    }
}

pub struct MarkdownExporter {
    options: ExportOptions,
    widgets: WidgetRegistry,
}

impl MarkdownExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            widgets: WidgetRegistry::default(),
        }
    }

    /// Additional or replacement node sketches.
    pub fn widgets_mut(&mut self) -> &mut WidgetRegistry {
        &mut self.widgets
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Returns `None` for a graph without nodes; there is nothing to export.
    pub fn export(&self, graph: &GraphState, project_name: &str) -> Option<MarkdownDocument> {
        self.export_at(graph, project_name, Utc::now())
    }

    pub fn export_at(
        &self,
        graph: &GraphState,
        project_name: &str,
        now: DateTime<Utc>,
    ) -> Option<MarkdownDocument> {
        if graph.nodes.is_empty() {
            tracing::debug!("Skipping markdown export of an empty graph");
            return None;
        }

        let opts = &self.options;
        let text = headings(opts.locale);
        let ordered = reading_order(&graph.nodes, opts.row_threshold);
        let hierarchy = Hierarchy::build(&ordered, &graph.edges);

        let wireframe = Wireframe {
            widgets: &self.widgets,
            hierarchy: &hierarchy,
            ctx: WidgetContext {
                width: opts.box_width,
            },
            indent: opts.indent,
            orphan_heading: text.standalone,
        }
        .render();

        let title = match project_name.trim() {
            "" => text.untitled,
            name => name,
        };

        let mut doc = String::new();
        doc.push_str(&format!("# {title}\n\n"));
        doc.push_str(&format!(
            "> {}: {} UTC\n\n",
            text.exported,
            now.format("%Y-%m-%d %H:%M")
        ));
        doc.push_str(&format!("## {}\n\n```text\n{wireframe}\n```\n\n", text.wireframe));
        doc.push_str(&format!(
            "## {}\n\n{}\n",
            text.components,
            table::component_table(&ordered, opts.locale)
        ));

        if !graph.edges.is_empty() {
            doc.push_str(&format!("## {}\n\n", text.flow));
            if let Some(diagram) = mermaid::flow_diagram(&ordered, &graph.edges) {
                doc.push_str(&format!("```mermaid\n{diagram}```\n\n"));
            }
            doc.push_str(&format!("### {}\n\n", text.connections));
            for line in mermaid::connection_list(&ordered, &graph.edges) {
                doc.push_str(&line);
                doc.push('\n');
            }
            doc.push('\n');
        }

        doc.push_str("---\n\n");
        doc.push_str(&footer(opts.locale, graph.nodes.len(), graph.edges.len()));
        doc.push('\n');

        tracing::info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            roots = hierarchy.roots.len(),
            orphans = hierarchy.orphans.len(),
            "Generated markdown export"
        );

        Some(MarkdownDocument {
            file_name: file_name(&opts.file_base, now, "md"),
            contents: doc,
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
        })
    }
}
