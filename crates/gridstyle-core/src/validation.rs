//! Data validation and input messages attached to cell styles
//!
//! A validation restricts what may be entered in the cells whose style
//! carries it. Expressions are kept as text; evaluating them is up to the
//! caller.

/// What kind of value a validation accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationKind {
    #[default]
    Any,
    WholeNumber,
    Decimal,
    /// One of the values listed by the first expression
    List,
    Date,
    Time,
    TextLength,
    /// The first expression must evaluate to true
    Custom,
}

/// Comparison applied to the value for the numeric kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationOperator {
    #[default]
    Between,
    NotBetween,
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

impl ValidationOperator {
    /// Number of expressions the operator compares against
    pub fn operands(self) -> usize {
        match self {
            ValidationOperator::Between | ValidationOperator::NotBetween => 2,
            _ => 1,
        }
    }
}

/// What happens when a value fails validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationErrorStyle {
    /// Reject the value
    #[default]
    Stop,
    /// Warn, allow override
    Warning,
    /// Inform only
    Info,
}

/// Data validation rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Validation {
    pub kind: ValidationKind,
    pub op: ValidationOperator,
    pub exprs: [Option<String>; 2],
    pub allow_blank: bool,
    pub use_dropdown: bool,
    pub error_style: ValidationErrorStyle,
    pub title: Option<String>,
    pub message: Option<String>,
}

impl Validation {
    pub fn new(kind: ValidationKind) -> Self {
        Self {
            kind,
            op: ValidationOperator::default(),
            exprs: [None, None],
            allow_blank: true,
            use_dropdown: true,
            error_style: ValidationErrorStyle::default(),
            title: None,
            message: None,
        }
    }

    /// A dropdown of the values in `source`
    pub fn list(source: impl Into<String>) -> Self {
        Self::new(ValidationKind::List).with_exprs(Some(source.into()), None)
    }

    /// A comparison of the value against one or two expressions
    pub fn compare(
        kind: ValidationKind,
        op: ValidationOperator,
        expr0: impl Into<String>,
        expr1: Option<String>,
    ) -> Self {
        let mut validation = Self::new(kind).with_exprs(Some(expr0.into()), expr1);
        validation.op = op;
        validation
    }

    pub fn with_exprs(mut self, expr0: Option<String>, expr1: Option<String>) -> Self {
        self.exprs = [expr0, expr1];
        self
    }

    pub fn with_allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = allow;
        self
    }

    pub fn with_error(
        mut self,
        style: ValidationErrorStyle,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.error_style = style;
        self.title = Some(title.into());
        self.message = Some(message.into());
        self
    }

    /// Whether every expression the rule needs is present
    pub fn is_complete(&self) -> bool {
        let needed = match self.kind {
            ValidationKind::Any => 0,
            ValidationKind::List | ValidationKind::Custom => 1,
            _ => self.op.operands(),
        };
        self.exprs.iter().take(needed).all(Option::is_some)
    }
}

/// Prompt shown when a cell is selected
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InputMessage {
    pub title: Option<String>,
    pub message: String,
}

impl InputMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: None,
            message: message.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
