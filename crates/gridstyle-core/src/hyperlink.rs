//! Hyperlinks attached to cell styles

/// Where a hyperlink points
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HyperlinkTarget {
    /// Web address
    Url(String),
    /// Mail address
    Email(String),
    /// Reference inside the workbook (e.g. "Sheet2!A1")
    Reference(String),
    /// File outside the workbook
    External(String),
}

/// A hyperlink with an optional tooltip
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hyperlink {
    pub target: HyperlinkTarget,
    pub tip: Option<String>,
}

impl Hyperlink {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            target: HyperlinkTarget::Url(url.into()),
            tip: None,
        }
    }

    pub fn reference(reference: impl Into<String>) -> Self {
        Self {
            target: HyperlinkTarget::Reference(reference.into()),
            tip: None,
        }
    }

    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    /// The raw target text
    pub fn target_text(&self) -> &str {
        match &self.target {
            HyperlinkTarget::Url(s)
            | HyperlinkTarget::Email(s)
            | HyperlinkTarget::Reference(s)
            | HyperlinkTarget::External(s) => s,
        }
    }
}
