//! Conditional styles
//!
//! A [`StyleConditions`] list is carried by a cell style; each [`Condition`]
//! pairs a test with an overlay style that is merged on top of the cell's
//! own style when the test holds.

use crate::style::Style;

/// Test performed by a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CondOp {
    Between,
    NotBetween,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    /// Expression evaluating to a boolean
    Custom,
    ContainsStr,
    NotContainsStr,
    BeginsWithStr,
    NotBeginsWithStr,
    EndsWithStr,
    NotEndsWithStr,
    ContainsErr,
    NotContainsErr,
    ContainsBlanks,
    NotContainsBlanks,
}

impl CondOp {
    /// Number of expressions the test needs
    pub fn operands(self) -> usize {
        match self {
            CondOp::Between | CondOp::NotBetween => 2,
            CondOp::ContainsErr
            | CondOp::NotContainsErr
            | CondOp::ContainsBlanks
            | CondOp::NotContainsBlanks => 0,
            _ => 1,
        }
    }
}

/// One conditional rule
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub op: CondOp,
    /// Expression text, `op.operands()` entries
    pub exprs: Vec<String>,
    /// Style merged over the cell style when the test holds
    pub overlay: Style,
}

impl Condition {
    pub fn new(op: CondOp, overlay: Style) -> Self {
        Self {
            op,
            exprs: Vec::new(),
            overlay,
        }
    }

    pub fn with_expr(mut self, expr: impl Into<String>) -> Self {
        self.exprs.push(expr.into());
        self
    }

    pub fn is_valid(&self) -> bool {
        self.exprs.len() == self.op.operands()
    }
}

/// Ordered list of conditions; the first one that holds wins
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleConditions {
    conditions: Vec<Condition>,
}

impl StyleConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition. Invalid conditions are dropped and `false` returned.
    pub fn insert(&mut self, cond: Condition) -> bool {
        if !cond.is_valid() {
            log::warn!(
                "dropping {:?} condition with {} expression(s)",
                cond.op,
                cond.exprs.len()
            );
            return false;
        }
        self.conditions.push(cond);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Condition> {
        (index < self.conditions.len()).then(|| self.conditions.remove(index))
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The style shown when condition `index` holds: `base` with that
    /// condition's overlay merged on top.
    pub fn overlay_on(&self, base: &Style, index: usize) -> Option<Style> {
        let cond = self.conditions.get(index)?;
        let mut merged = base.clone();
        merged.merge(&cond.overlay);
        Some(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_counts() {
        assert_eq!(CondOp::Between.operands(), 2);
        assert_eq!(CondOp::Custom.operands(), 1);
        assert_eq!(CondOp::ContainsBlanks.operands(), 0);
    }

    #[test]
    fn test_insert_rejects_wrong_arity() {
        let mut conds = StyleConditions::new();
        assert!(!conds.insert(Condition::new(CondOp::Between, Style::new()).with_expr("1")));
        assert!(conds.insert(
            Condition::new(CondOp::GreaterThan, Style::new().with_bold(true)).with_expr("10")
        ));
        assert_eq!(conds.len(), 1);
    }

    #[test]
    fn test_overlay() {
        let mut conds = StyleConditions::new();
        conds.insert(Condition::new(CondOp::ContainsErr, Style::new().with_italic(true)));
        let base = Style::new().with_bold(true);
        let shown = conds.overlay_on(&base, 0).unwrap();
        assert_eq!(shown.font_bold(), Some(true));
        assert_eq!(shown.font_italic(), Some(true));
        assert!(conds.overlay_on(&base, 1).is_none());
    }
}
