//! Rule AST for entry and exit conditions.
//!
//! - `Operand`: what can be compared (price fields, constants, frame columns)
//! - `Rule`: comparisons, crossings and conjunction

use crate::domain::frame::Column;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Open,
    High,
    Low,
    Close,
    Volume,
    Constant(f64),
    Column(Column),
    /// The operand's value one row earlier (NaN at row 0).
    Previous(Box<Operand>),
}

impl Operand {
    pub fn previous(self) -> Operand {
        Operand::Previous(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    CrossAbove { left: Operand, right: Operand },
    CrossBelow { left: Operand, right: Operand },
    Above { left: Operand, right: Operand },
    Below { left: Operand, right: Operand },
    AtMost { left: Operand, right: Operand },
    And(Vec<Rule>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Open => f.write_str("open"),
            Operand::High => f.write_str("high"),
            Operand::Low => f.write_str("low"),
            Operand::Close => f.write_str("close"),
            Operand::Volume => f.write_str("volume"),
            Operand::Constant(v) => write!(f, "{}", v),
            Operand::Column(c) => write!(f, "{}", c),
            Operand::Previous(inner) => write!(f, "{}[-1]", inner),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::CrossAbove { left, right } => write!(f, "CROSS_ABOVE({}, {})", left, right),
            Rule::CrossBelow { left, right } => write!(f, "CROSS_BELOW({}, {})", left, right),
            Rule::Above { left, right } => write!(f, "{} > {}", left, right),
            Rule::Below { left, right } => write!(f, "{} < {}", left, right),
            Rule::AtMost { left, right } => write!(f, "{} <= {}", left, right),
            Rule::And(rules) => {
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    write!(f, "{}", rule)?;
                }
                Ok(())
            }
        }
    }
}
