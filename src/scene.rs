//! Value-type scene produced by each render pass.
//!
//! A render never patches the previous scene; it builds a new one and the
//! old one is dropped. Hosts either paint the scene directly or serialize it
//! with [`Scene::to_svg`].

use std::fmt::Write;

use crate::layout::grid::{GridGeometry, SidebarRow};
use crate::layout::scroll::AdjustHint;
use crate::layout::{num, ArrowGeometry, BarGeometry, BarStyle, LabelPlacement, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModeOption {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

/// Controls drawn left of the upper header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SideHeader {
    /// Translated caption of the "Today" button, when enabled.
    pub today_button: Option<String>,
    /// Translated placeholder of the view-mode select.
    pub mode_label: String,
    /// Empty when the select is disabled.
    pub view_modes: Vec<ViewModeOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sidebar {
    pub width: f32,
    pub rows: Vec<SidebarRow>,
    pub visible: bool,
    pub offset: f32,
}

/// Pointer-following highlights.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Highlighters {
    pub column: Option<Rect>,
    pub row: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub view_mode: String,
    pub width: f32,
    pub height: f32,
    pub upper_header_height: f32,
    pub lower_header_height: f32,
    pub grid: GridGeometry,
    pub bars: Vec<BarGeometry>,
    pub arrows: Vec<ArrowGeometry>,
    pub side_header: SideHeader,
    pub sidebar: Option<Sidebar>,
    pub highlighters: Highlighters,
    pub adjust: AdjustHint,
    /// Header cell whose upper label is under the scroll position.
    pub current_upper: Option<usize>,
}

impl Scene {
    pub fn bar(&self, id: &str) -> Option<&BarGeometry> {
        self.bars.iter().find(|b| b.task_id == id)
    }

    pub fn bar_at(&self, x: f32, y: f32) -> Option<&BarGeometry> {
        self.bars.iter().rev().find(|b| b.rect.contains(x, y))
    }

    pub fn sidebar_row_at(&self, x: f32, y: f32) -> Option<&SidebarRow> {
        let sidebar = self.sidebar.as_ref().filter(|s| s.visible)?;
        let local_x = x - sidebar.offset;
        sidebar.rows.iter().find(|r| r.rect.contains(local_x, y))
    }

    /// Standalone SVG document with an embedded stylesheet.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" class="gantt" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(self.width),
            h = num(self.height),
        );
        let _ = writeln!(svg, "<style>{}</style>", STYLESHEET);
        svg.push_str(HATCH_DEFS);
        let _ = writeln!(
            svg,
            r#"<rect class="grid-background" x="0" y="0" width="{}" height="{}"/>"#,
            num(self.grid.width),
            num(self.grid.height)
        );
        self.write_grid(&mut svg);
        self.write_header(&mut svg);
        self.write_arrows(&mut svg);
        self.write_bars(&mut svg);
        if let Some(x) = self.grid.today_x {
            let _ = writeln!(
                svg,
                r##"<rect class="current-time" x="{}" y="0" width="1" height="{}" fill="#000000"/>"##,
                num(x),
                num(self.grid.height)
            );
        }
        self.write_sidebar(&mut svg);
        svg.push_str("</svg>\n");
        svg
    }

    fn write_grid(&self, svg: &mut String) {
        let grid = &self.grid;
        svg.push_str("<g class=\"grid\">\n");
        for row in &grid.rows {
            let _ = writeln!(svg, r#"<rect class="grid-row" {}/>"#, rect_attrs(row));
        }
        for y in &grid.row_lines {
            let _ = writeln!(
                svg,
                r#"<line class="row-line" x1="0" y1="{y}" x2="{w}" y2="{y}"/>"#,
                y = num(*y),
                w = num(grid.width)
            );
        }
        for band in &grid.holidays {
            let class = if band.label.is_some() {
                "holiday-highlight"
            } else {
                "holiday"
            };
            let label = band
                .label
                .as_deref()
                .map(|l| format!(r#" label="{}" date="{}""#, escape(l), band.date.format("%Y-%m-%d")))
                .unwrap_or_default();
            let _ = writeln!(
                svg,
                r#"<rect class="{class}" {} style="fill: {};"{label}/>"#,
                rect_attrs(&band.rect),
                escape(&band.color)
            );
        }
        if let Some(rect) = &grid.date_highlight {
            let _ = writeln!(svg, r#"<rect class="date-range-highlight" {}/>"#, rect_attrs(rect));
        }
        for rect in [self.highlighters.column, self.highlighters.row].iter().flatten() {
            let _ = writeln!(svg, r#"<rect class="pointer-highlight" {}/>"#, rect_attrs(rect));
        }
        for tick in &grid.ticks {
            let class = if tick.thick { "tick thick" } else { "tick" };
            let _ = writeln!(
                svg,
                r#"<path class="{class}" d="M {} {} v {}"/>"#,
                num(tick.x),
                num(grid.header_height),
                num(grid.height - grid.header_height)
            );
        }
        svg.push_str("</g>\n");
    }

    fn write_header(&self, svg: &mut String) {
        let grid = &self.grid;
        svg.push_str("<g class=\"grid-header\">\n");
        let _ = writeln!(
            svg,
            r#"<rect class="header-background" x="0" y="0" width="{}" height="{}"/>"#,
            num(grid.width),
            num(grid.header_height)
        );
        for (i, cell) in grid.header.iter().enumerate() {
            if !cell.lower_text.is_empty() {
                let current = if grid.today_cell == Some(i) {
                    " current-date-highlight"
                } else {
                    ""
                };
                let _ = writeln!(
                    svg,
                    r#"<text class="lower-text date_{}{current}" x="{}" y="{}">{}</text>"#,
                    escape(&cell.key),
                    num(cell.x),
                    num(cell.lower_y),
                    escape(&cell.lower_text)
                );
            }
            if !cell.upper_text.is_empty() {
                let current = if self.current_upper == Some(i) {
                    " current-upper"
                } else {
                    ""
                };
                let _ = writeln!(
                    svg,
                    r#"<text class="upper-text{current}" x="{}" y="{}">{}</text>"#,
                    num(cell.x),
                    num(cell.upper_y),
                    escape(&cell.upper_text)
                );
            }
        }
        svg.push_str("</g>\n");
    }

    fn write_arrows(&self, svg: &mut String) {
        svg.push_str("<g class=\"arrow\">\n");
        for arrow in &self.arrows {
            let _ = writeln!(
                svg,
                r#"<path d="{}" data-from="{}" data-to="{}"/>"#,
                arrow.path_data(),
                escape(&arrow.from_id),
                escape(&arrow.to_id)
            );
        }
        svg.push_str("</g>\n");
    }

    fn write_bars(&self, svg: &mut String) {
        svg.push_str("<g class=\"bar\">\n");
        for bar in &self.bars {
            let class = match &bar.custom_class {
                Some(custom) => format!("bar-wrapper {}", escape(custom)),
                None => "bar-wrapper".to_string(),
            };
            let _ = writeln!(svg, r#"<g class="{class}" data-id="{}">"#, escape(&bar.task_id));
            let r = &bar.rect;
            let fill = match &bar.style {
                BarStyle::Regular {
                    corner_radius,
                    color,
                } => {
                    let style = color
                        .as_deref()
                        .map(|c| format!(r#" style="fill: {};""#, escape(c)))
                        .unwrap_or_default();
                    format!(r#" rx="{0}" ry="{0}"{style}"#, num(*corner_radius))
                }
                BarStyle::Hatched => r#" style="fill: url(#diagonalHatch);""#.to_string(),
            };
            let _ = writeln!(
                svg,
                r#"<rect class="bar" {}{fill}><animate attributeName="width" from="0" to="{w}" dur="0.4s" begin="0.1s" calcMode="spline" values="0;{w}" keyTimes="0; 1" keySplines="0 0 .58 1"/></rect>"#,
                rect_attrs(r),
                w = num(r.width)
            );
            if bar.progress > 0.0 {
                let _ = writeln!(
                    svg,
                    r#"<rect class="bar-progress" x="{}" y="{}" width="{}" height="{}"/>"#,
                    num(r.x),
                    num(r.y),
                    num(bar.progress_width()),
                    num(r.height)
                );
            }
            if let Some(thumb) = &bar.thumbnail {
                let id = escape(&bar.task_id);
                let _ = writeln!(
                    svg,
                    r##"<defs><rect id="rect_{id}" class="img_mask" x="{x}" y="{y}" width="{s}" height="{s}" rx="15"/><clipPath id="clip_{id}"><use href="#rect_{id}"/></clipPath></defs><image class="bar-img" x="{x}" y="{y}" width="{s}" height="{s}" href="{}" clip-path="url(#clip_{id})"/>"##,
                    escape(&thumb.href),
                    x = num(thumb.x),
                    y = num(thumb.y),
                    s = num(thumb.size),
                );
            }
            let label_class = match bar.label.placement {
                LabelPlacement::Outside => Some("bar-label big"),
                LabelPlacement::Hidden => None,
                LabelPlacement::Pending | LabelPlacement::Inside => Some("bar-label"),
            };
            if let Some(label_class) = label_class {
                let _ = writeln!(
                    svg,
                    r#"<text class="{label_class}" x="{}" y="{}">{}</text>"#,
                    num(bar.label.x),
                    num(bar.label.y),
                    escape(&bar.label.text)
                );
            }
            svg.push_str("</g>\n");
        }
        svg.push_str("</g>\n");
    }

    fn write_sidebar(&self, svg: &mut String) {
        let Some(sidebar) = &self.sidebar else {
            return;
        };
        let opacity = if sidebar.visible { 1 } else { 0 };
        let _ = writeln!(
            svg,
            r#"<g class="sidebar" opacity="{opacity}" transform="translate({}, 0)">"#,
            num(sidebar.offset)
        );
        let _ = writeln!(
            svg,
            r#"<rect class="sidebar-background" x="0" y="0" width="{}" height="{}"/>"#,
            num(sidebar.width),
            num(self.height)
        );
        for row in &sidebar.rows {
            let _ = writeln!(
                svg,
                r#"<g class="gantt-sidebar-row" data-group="{}"><rect {}/><text x="{}" y="{}">{}</text></g>"#,
                escape(&row.group_key),
                rect_attrs(&row.rect),
                num(row.rect.x + 10.0),
                num(row.rect.mid_y()),
                escape(&row.label)
            );
        }
        svg.push_str("</g>\n");
    }
}

const HATCH_DEFS: &str = r#"<defs><pattern id="diagonalHatch" patternUnits="userSpaceOnUse" width="4" height="4"><path d="M-1,1 l2,-2 M0,4 l4,-4 M3,5 l2,-2" style="stroke:currentColor; stroke-width:0.3"/></pattern></defs>
"#;

const STYLESHEET: &str = "\
.gantt { font-family: sans-serif; font-size: 12px; color: #9ca3af; }
.grid-background { fill: none; }
.grid-row { fill: #ffffff; }
.row-line { stroke: #ebeff2; }
.tick { stroke: #e0e0e0; stroke-width: 0.4; }
.tick.thick { stroke-width: 0.8; }
.header-background { fill: #ffffff; }
.upper-text { fill: #171717; font-size: 14px; font-weight: 500; dominant-baseline: middle; }
.lower-text { fill: #404040; font-size: 12px; dominant-baseline: hanging; }
.current-upper { font-weight: 700; }
.current-date-highlight { fill: #ffffff; font-weight: 700; }
.date-range-highlight { fill: #dcfce7; opacity: 0.6; }
.pointer-highlight { fill: #f3f4f6; opacity: 0.5; }
.arrow path { fill: none; stroke: #9ca3af; stroke-width: 1.4; }
.bar { fill: #e5e7eb; stroke: #d1d5db; stroke-width: 0; }
.bar-progress { fill: #a3a3ff; opacity: 0.6; pointer-events: none; }
.bar-label { fill: #171717; dominant-baseline: central; font-size: 12px; }
.bar-label.big { fill: #404040; }
.sidebar-background { fill: #ffffff; }
.gantt-sidebar-row rect { fill: #ffffff; stroke: #f3f4f6; }
.gantt-sidebar-row text { fill: #171717; dominant-baseline: central; }
";

fn rect_attrs(r: &Rect) -> String {
    format!(
        r#"x="{}" y="{}" width="{}" height="{}""#,
        num(r.x),
        num(r.y),
        num(r.width),
        num(r.height)
    )
}

/// Escape text for XML content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
