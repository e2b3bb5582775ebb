//! # Palette
//!
//! The toolbox that nodes are dragged from, plus the display names used by
//! exports. Display strings are resolved against an explicit [`Locale`]
//! passed by the caller.

use serde::{Deserialize, Serialize};

use crate::model::{Node, NodeAttribute, NodeData};

/// Display language for generated documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Zh,
    En,
}

/// Generic visual family of a UI node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiType {
    Container,
    Button,
    Input,
    Image,
    Card,
}

impl UiType {
    pub fn key(self) -> &'static str {
        match self {
            UiType::Container => "Container",
            UiType::Button => "Button",
            UiType::Input => "Input",
            UiType::Image => "Image",
            UiType::Card => "Card",
        }
    }

    pub fn display_name(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (UiType::Container, Locale::Zh) => "容器 (Container)",
            (UiType::Button, Locale::Zh) => "按鈕 (Button)",
            (UiType::Input, Locale::Zh) => "輸入框 (Input)",
            (UiType::Image, Locale::Zh) => "圖片 (Image)",
            (UiType::Card, Locale::Zh) => "卡片 (Card)",
            (_, Locale::En) => self.key(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteKind {
    Ui,
    Tech,
}

/// One draggable toolbox entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteItem {
    pub id: &'static str,
    pub group: &'static str,
    pub kind: PaletteKind,
    pub ui_type: Option<UiType>,
    pub name_en: &'static str,
    pub name_zh: &'static str,
    /// Short English tag shown next to the Chinese name.
    pub tag: &'static str,
}

impl PaletteItem {
    pub fn display_name(&self, locale: Locale) -> String {
        match locale {
            Locale::Zh if self.name_zh == self.tag => self.name_zh.to_string(),
            Locale::Zh => format!("{} ({})", self.name_zh, self.tag),
            Locale::En => self.name_en.to_string(),
        }
    }
}

const fn ui(
    id: &'static str,
    group: &'static str,
    ui_type: UiType,
    name_en: &'static str,
    name_zh: &'static str,
    tag: &'static str,
) -> PaletteItem {
    PaletteItem {
        id,
        group,
        kind: PaletteKind::Ui,
        ui_type: Some(ui_type),
        name_en,
        name_zh,
        tag,
    }
}

const fn tech(id: &'static str, group: &'static str) -> PaletteItem {
    PaletteItem {
        id,
        group,
        kind: PaletteKind::Tech,
        ui_type: None,
        name_en: id,
        name_zh: id,
        tag: id,
    }
}

const fn workflow(id: &'static str, name_zh: &'static str) -> PaletteItem {
    PaletteItem {
        name_zh,
        ..tech(id, "workflow")
    }
}

pub static PALETTE: &[PaletteItem] = &[
    ui("container", "layout", UiType::Container, "Container", "容器框架", "Container"),
    ui("card", "layout", UiType::Card, "Card", "資訊卡片", "Card"),
    ui("divider", "layout", UiType::Container, "Divider", "分隔線", "Divider"),
    ui("navbar", "ui_nav", UiType::Container, "Navbar", "導航欄", "Navbar"),
    ui("sidebar", "ui_nav", UiType::Container, "Sidebar", "側邊欄", "Sidebar"),
    ui("tabs", "ui_nav", UiType::Button, "Tabs", "分頁標籤", "Tabs"),
    ui("breadcrumb", "ui_nav", UiType::Button, "Breadcrumb", "麵包屑", "Breadcrumb"),
    ui("btn_pri", "buttons", UiType::Button, "Primary Button", "主要按鈕", "Primary"),
    ui("btn_sec", "buttons", UiType::Button, "Secondary Button", "次要按鈕", "Secondary"),
    ui("action", "buttons", UiType::Button, "Action", "動作", "Action"),
    ui("inp_text", "inputs", UiType::Input, "Text Input", "文字輸入框", "Input"),
    ui("inp_search", "inputs", UiType::Input, "Search Bar", "搜尋欄", "Search"),
    ui("select", "inputs", UiType::Input, "Select", "下拉選單", "Select"),
    ui("checkbox", "inputs", UiType::Button, "Checkbox", "核取方塊", "Checkbox"),
    ui("switch", "inputs", UiType::Button, "Switch", "開關", "Switch"),
    ui("radio", "inputs", UiType::Button, "Radio", "單選按鈕", "Radio"),
    ui("slider", "inputs", UiType::Input, "Slider", "滑桿", "Slider"),
    ui("img", "display", UiType::Image, "Image Placeholder", "圖片佔位符", "Image"),
    ui("table", "display", UiType::Container, "Table", "表格", "Table"),
    ui("list", "display", UiType::Container, "List", "列表", "List"),
    ui("avatar", "display", UiType::Image, "Avatar", "頭像", "Avatar"),
    ui("tag", "display", UiType::Button, "Tag", "標籤", "Tag"),
    ui("badge", "display", UiType::Button, "Badge", "數字標記", "Badge"),
    ui("modal", "feedback", UiType::Container, "Modal", "對話視窗", "Modal"),
    ui("alert", "feedback", UiType::Container, "Alert", "警告框", "Alert"),
    ui("toast", "feedback", UiType::Button, "Toast", "提示訊息", "Toast"),
    workflow("Trigger", "觸發器"),
    workflow("Logic", "邏輯"),
    workflow("Action", "動作"),
    tech("React", "frontend"),
    tech("Vue", "frontend"),
    tech("Next.js", "frontend"),
    tech("Tailwind CSS", "frontend"),
    tech("Htmx", "frontend"),
    tech("Angular", "frontend"),
    tech("Svelte", "frontend"),
    tech("Node.js", "backend"),
    tech("Python", "backend"),
    tech("Go", "backend"),
    tech("Java", "backend"),
    tech("PHP", "backend"),
    tech("Stripe", "backend"),
    tech("PostgreSQL", "database"),
    tech("MySQL", "database"),
    tech("MongoDB", "database"),
    tech("Supabase", "database"),
    tech("Firebase", "database"),
    tech("Redis", "database"),
    tech("OAuth 2.0", "security"),
    tech("JWT", "security"),
    tech("SSL/HTTPS", "security"),
    tech("WAF", "security"),
    tech("Jest", "quality"),
    tech("Cypress", "quality"),
    tech("SonarQube", "quality"),
    tech("k6", "quality"),
];

/// Looks up a palette item by its toolbox id.
pub fn find(id: &str) -> Option<&'static PaletteItem> {
    PALETTE.iter().find(|item| item.id == id)
}

/// Items belonging to one toolbox group, in palette order.
pub fn group(name: &str) -> impl Iterator<Item = &'static PaletteItem> + '_ {
    PALETTE.iter().filter(move |item| item.group == name)
}

/// Resolved type name for a node: palette entry first, then generic `uiType`.
///
/// Unknown toolbox ids are shown verbatim.
pub fn type_display_name(data: &NodeData, locale: Locale) -> Option<String> {
    if let Some(id) = data.toolbox_id.as_deref() {
        return Some(match find(id) {
            Some(item) => item.display_name(locale),
            None => id.to_string(),
        });
    }
    data.ui_type
        .map(|ui_type| ui_type.display_name(locale).to_string())
}

pub fn attribute_display_name(attribute: NodeAttribute, locale: Locale) -> &'static str {
    match (attribute, locale) {
        (NodeAttribute::MainPage, Locale::Zh) => "主頁面",
        (NodeAttribute::SubPage, Locale::Zh) => "子頁面",
        (NodeAttribute::Modal, Locale::Zh) => "彈窗",
        (NodeAttribute::Alert, Locale::Zh) => "警告與提示",
        (NodeAttribute::Component, Locale::Zh) => "獨立元件",
        (NodeAttribute::Trigger, Locale::Zh) => "觸發事件",
        (NodeAttribute::Logic, Locale::Zh) => "邏輯處理",
        (NodeAttribute::Backend, Locale::Zh) => "後端服務",
        (NodeAttribute::Database, Locale::Zh) => "資料庫",
        (NodeAttribute::MainPage, Locale::En) => "Main Page",
        (NodeAttribute::SubPage, Locale::En) => "Sub Page",
        (NodeAttribute::Modal, Locale::En) => "Modal",
        (NodeAttribute::Alert, Locale::En) => "Alert",
        (NodeAttribute::Component, Locale::En) => "Component",
        (NodeAttribute::Trigger, Locale::En) => "Trigger",
        (NodeAttribute::Logic, Locale::En) => "Logic",
        (NodeAttribute::Backend, Locale::En) => "Backend",
        (NodeAttribute::Database, Locale::En) => "Database",
    }
}

/// Node color ids. The first entry is the default.
pub static COLORS: &[(&str, &str, &str)] = &[
    ("slate", "灰色", "Gray"),
    ("blue", "藍色", "Blue"),
    ("emerald", "綠色", "Green"),
    ("amber", "橙色", "Orange"),
    ("rose", "紅色", "Red"),
    ("purple", "紫色", "Purple"),
    ("cyan", "青色", "Cyan"),
];

pub const DEFAULT_COLOR: &str = "slate";

/// Returns the color id of a node, falling back to `slate` for unknown ids.
pub fn resolve_color(color: Option<&str>) -> &'static str {
    color
        .and_then(|c| COLORS.iter().find(|(id, _, _)| *id == c))
        .map(|(id, _, _)| *id)
        .unwrap_or(DEFAULT_COLOR)
}

/// A one-click style bundle from the properties panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StylePreset {
    pub id: &'static str,
    pub color: &'static str,
    pub variant: &'static str,
    pub name_zh: &'static str,
    pub name_en: &'static str,
}

pub static STYLE_PRESETS: &[StylePreset] = &[
    StylePreset { id: "default", color: "slate", variant: "default", name_zh: "預設", name_en: "Default" },
    StylePreset { id: "primary", color: "blue", variant: "filled", name_zh: "強調", name_en: "Primary" },
    StylePreset { id: "success", color: "emerald", variant: "filled", name_zh: "成功", name_en: "Success" },
    StylePreset { id: "warning", color: "amber", variant: "filled", name_zh: "警告", name_en: "Warning" },
    StylePreset { id: "error", color: "rose", variant: "filled", name_zh: "錯誤", name_en: "Error" },
    StylePreset { id: "disabled", color: "slate", variant: "disabled", name_zh: "禁用", name_en: "Disabled" },
];

impl StylePreset {
    pub fn find(id: &str) -> Option<&'static StylePreset> {
        STYLE_PRESETS.iter().find(|p| p.id == id)
    }

    /// Sets color, variant and preset id on the node together.
    pub fn apply(&self, node: &mut Node) {
        node.data.color = Some(self.color.to_string());
        node.data.variant = Some(self.variant.to_string());
        node.data.style_preset = Some(self.id.to_string());
    }
}
