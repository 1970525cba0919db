//! JSON style scripts
//!
//! A script is a list of operations:
//!
//! ```json
//! [
//!   { "op": "set", "range": "A1:IV65536", "style": { "font_name": "Serif" } },
//!   { "op": "apply", "range": "K101:U201", "style": { "italic": true } },
//!   { "op": "border", "range": "B2:D4", "borders": { "top": "thick", "inner_h": "thin" } }
//! ]
//! ```
//!
//! `set` replaces the styles of the range with the sheet default plus the
//! given elements, `apply` merges only the given elements.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use gridstyle::{ApplyReport, Border, BorderLineStyle, BorderLocation, CellRange, Color, SheetStyles, Style};
use gridstyle_core::{HorizontalAlignment, NumberFormat, VerticalAlignment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ScriptOp {
    Set { range: String, style: StyleSpec },
    Apply { range: String, style: StyleSpec },
    Border { range: String, borders: BorderSpec },
}

/// Style elements as they appear in scripts and JSON output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Hex RGB, e.g. "FF0000"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_h: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_v: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap_text: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<String>,
}

/// Border line names per location, for the `border` operation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BorderSpec {
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
    pub inner_h: Option<String>,
    pub inner_v: Option<String>,
    pub diagonal: Option<String>,
    pub rev_diagonal: Option<String>,
}

const LINE_NAMES: [(&str, BorderLineStyle); 14] = [
    ("none", BorderLineStyle::None),
    ("thin", BorderLineStyle::Thin),
    ("medium", BorderLineStyle::Medium),
    ("dashed", BorderLineStyle::Dashed),
    ("dotted", BorderLineStyle::Dotted),
    ("thick", BorderLineStyle::Thick),
    ("double", BorderLineStyle::Double),
    ("hair", BorderLineStyle::Hair),
    ("medium_dash", BorderLineStyle::MediumDash),
    ("dash_dot", BorderLineStyle::DashDot),
    ("medium_dash_dot", BorderLineStyle::MediumDashDot),
    ("dash_dot_dot", BorderLineStyle::DashDotDot),
    ("medium_dash_dot_dot", BorderLineStyle::MediumDashDotDot),
    ("slanted_dash_dot", BorderLineStyle::SlantedDashDot),
];

const ALIGN_H_NAMES: [(&str, HorizontalAlignment); 8] = [
    ("general", HorizontalAlignment::General),
    ("left", HorizontalAlignment::Left),
    ("right", HorizontalAlignment::Right),
    ("center", HorizontalAlignment::Center),
    ("fill", HorizontalAlignment::Fill),
    ("justify", HorizontalAlignment::Justify),
    ("center_across_selection", HorizontalAlignment::CenterAcrossSelection),
    ("distributed", HorizontalAlignment::Distributed),
];

const ALIGN_V_NAMES: [(&str, VerticalAlignment); 5] = [
    ("top", VerticalAlignment::Top),
    ("bottom", VerticalAlignment::Bottom),
    ("center", VerticalAlignment::Center),
    ("justify", VerticalAlignment::Justify),
    ("distributed", VerticalAlignment::Distributed),
];

fn lookup<T: Copy>(table: &[(&str, T)], name: &str, what: &str) -> Result<T> {
    table
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, value)| value)
        .ok_or_else(|| anyhow!("unknown {what} '{name}'"))
}

fn name_of<T: PartialEq>(table: &[(&'static str, T)], value: &T) -> Option<String> {
    table
        .iter()
        .find(|(_, v)| v == value)
        .map(|(n, _)| n.to_string())
}

fn parse_border(name: &str) -> Result<Border> {
    Ok(Border::new(lookup(&LINE_NAMES, name, "border line")?, Color::Auto))
}

fn parse_color(hex: &str) -> Result<Color> {
    Color::from_hex(hex).ok_or_else(|| anyhow!("invalid color '{hex}'"))
}

impl StyleSpec {
    /// Layer the set fields onto `base`
    pub fn apply_to(&self, base: Style) -> Result<Style> {
        let mut style = base;
        if let Some(v) = self.bold {
            style.set_bold(v);
        }
        if let Some(v) = self.italic {
            style.set_italic(v);
        }
        if let Some(v) = self.strike {
            style.set_strike(v);
        }
        if let Some(v) = &self.font_name {
            style.set_font_name(v.as_str());
        }
        if let Some(v) = self.font_size {
            if !(v > 0.0 && v.is_finite()) {
                bail!("invalid font size {v}");
            }
            style.set_font_size(v);
        }
        if let Some(v) = &self.font_color {
            style.set_font_color(parse_color(v)?);
        }
        if let Some(v) = &self.back_color {
            style.set_back_color(parse_color(v)?);
        }
        if let Some(v) = self.pattern {
            style.set_pattern(v);
        }
        if let Some(v) = &self.align_h {
            style.set_align_h(lookup(&ALIGN_H_NAMES, v, "horizontal alignment")?);
        }
        if let Some(v) = &self.align_v {
            style.set_align_v(lookup(&ALIGN_V_NAMES, v, "vertical alignment")?);
        }
        if let Some(v) = self.indent {
            style.set_indent(v);
        }
        if let Some(v) = self.rotation {
            style.set_rotation(v);
        }
        if let Some(v) = self.wrap_text {
            style.set_wrap_text(v);
        }
        if let Some(v) = self.locked {
            style.set_locked(v);
        }
        if let Some(v) = self.hidden {
            style.set_hidden(v);
        }
        if let Some(v) = &self.format {
            style.set_format(NumberFormat::from_string(v));
        }
        for (name, loc) in [
            (&self.border_top, BorderLocation::Top),
            (&self.border_bottom, BorderLocation::Bottom),
            (&self.border_left, BorderLocation::Left),
            (&self.border_right, BorderLocation::Right),
        ] {
            if let Some(name) = name {
                style.set_border(loc, parse_border(name)?);
            }
        }
        Ok(style)
    }

    /// The elements of `style` that differ from `default`
    pub fn diff(style: &Style, default: &Style) -> StyleSpec {
        fn changed<T: PartialEq>(a: Option<T>, b: Option<T>) -> Option<T> {
            if a != b {
                a
            } else {
                None
            }
        }
        let border = |loc: BorderLocation| {
            changed(style.border(loc), default.border(loc))
                .and_then(|b| name_of(&LINE_NAMES, &b.line))
        };
        StyleSpec {
            bold: changed(style.font_bold(), default.font_bold()),
            italic: changed(style.font_italic(), default.font_italic()),
            strike: changed(style.font_strike(), default.font_strike()),
            font_name: changed(style.font_name(), default.font_name()).map(|n| n.to_string()),
            font_size: changed(style.font_size(), default.font_size()).map(|s| s.points()),
            font_color: changed(style.font_color(), default.font_color()).map(|c| c.to_hex()),
            back_color: changed(style.back_color(), default.back_color()).map(|c| c.to_hex()),
            pattern: changed(style.pattern(), default.pattern()),
            align_h: changed(style.align_h(), default.align_h())
                .and_then(|a| name_of(&ALIGN_H_NAMES, &a)),
            align_v: changed(style.align_v(), default.align_v())
                .and_then(|a| name_of(&ALIGN_V_NAMES, &a)),
            indent: changed(style.indent(), default.indent()),
            rotation: changed(style.rotation(), default.rotation()),
            wrap_text: changed(style.wrap_text(), default.wrap_text()),
            locked: changed(style.contents_locked(), default.contents_locked()),
            hidden: changed(style.contents_hidden(), default.contents_hidden()),
            format: changed(style.format(), default.format()).map(|f| f.format_string().to_string()),
            border_top: border(BorderLocation::Top),
            border_bottom: border(BorderLocation::Bottom),
            border_left: border(BorderLocation::Left),
            border_right: border(BorderLocation::Right),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == StyleSpec::default()
    }
}

impl BorderSpec {
    fn to_borders(&self) -> Result<[Option<Border>; 8]> {
        let mut borders = [None; 8];
        for (name, loc) in [
            (&self.top, BorderLocation::Top),
            (&self.bottom, BorderLocation::Bottom),
            (&self.left, BorderLocation::Left),
            (&self.right, BorderLocation::Right),
            (&self.rev_diagonal, BorderLocation::RevDiagonal),
            (&self.diagonal, BorderLocation::Diagonal),
            (&self.inner_h, BorderLocation::Horizontal),
            (&self.inner_v, BorderLocation::Vertical),
        ] {
            if let Some(name) = name {
                borders[loc as usize] = Some(parse_border(name)?);
            }
        }
        Ok(borders)
    }
}

pub fn load(path: &Path) -> Result<Vec<ScriptOp>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    parse(&text).with_context(|| format!("Invalid script '{}'", path.display()))
}

pub fn parse(text: &str) -> Result<Vec<ScriptOp>> {
    Ok(serde_json::from_str(text)?)
}

/// Parse an A1 range and check it lies inside the sheet
pub fn sheet_range(sheet: &SheetStyles, text: &str) -> Result<CellRange> {
    let range = CellRange::parse(text).with_context(|| format!("Invalid range '{text}'"))?;
    if !sheet.extent().contains_range(&range) {
        bail!("range {range} is outside the {}x{} sheet", sheet.cols(), sheet.rows());
    }
    Ok(range)
}

/// Run every operation against `sheet`
pub fn run(sheet: &mut SheetStyles, ops: &[ScriptOp]) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();
    for (i, op) in ops.iter().enumerate() {
        let step = match op {
            ScriptOp::Set { range, style } => {
                let range = sheet_range(sheet, range)?;
                let style = style.apply_to(sheet.default_style().to_style())?;
                sheet.apply_style_to_range(&range, style)
            }
            ScriptOp::Apply { range, style } => {
                let range = sheet_range(sheet, range)?;
                let partial = style.apply_to(Style::new())?;
                sheet.apply_partial_style_to_range(&range, &partial)
            }
            ScriptOp::Border { range, borders } => {
                let range = sheet_range(sheet, range)?;
                sheet.apply_border(&range, &borders.to_borders()?)
            }
        };
        tracing::debug!(op = i, blocks = step.changed.len(), "op applied");
        report.absorb(step);
    }
    Ok(report)
}
