use crate::span::Span;
use std::collections::HashSet;

/// A boolean expression. Every variant is pure: evaluating it never mutates
/// anything and depends only on the supplied input map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Bus(String),
    Literal(bool),
    Not(Box<Expr>),
    Or(Vec<Expr>),
    And(Vec<Expr>),
    Xor(Vec<Expr>),
}

impl Expr {
    /// Evaluates the expression given a mapping from input bus name to value.
    /// Bus names are resolved by the caller from the mux-selected `INPUTS`
    /// members, so a missing key can't occur by construction.
    pub fn eval(&self, inputs: &std::collections::HashMap<&str, bool>) -> bool {
        match self {
            Expr::Bus(name) => *inputs
                .get(name.as_str())
                .unwrap_or_else(|| panic!("unbound bus {name} during evaluation")),
            Expr::Literal(v) => *v,
            Expr::Not(inner) => !inner.eval(inputs),
            Expr::Or(children) => children.iter().fold(false, |acc, c| acc | c.eval(inputs)),
            Expr::And(children) => children.iter().fold(true, |acc, c| acc & c.eval(inputs)),
            Expr::Xor(children) => children.iter().fold(false, |acc, c| acc ^ c.eval(inputs)),
        }
    }

    /// The set of distinct bus names this expression references.
    pub fn bus_ids(&self) -> HashSet<&str> {
        let mut out = HashSet::new();
        self.collect_bus_ids(&mut out);
        out
    }

    fn collect_bus_ids<'a>(&'a self, out: &mut HashSet<&'a str>) {
        match self {
            Expr::Bus(name) => {
                out.insert(name.as_str());
            }
            Expr::Literal(_) => {}
            Expr::Not(inner) => inner.collect_bus_ids(out),
            Expr::Or(children) | Expr::And(children) | Expr::Xor(children) => {
                for c in children {
                    c.collect_bus_ids(out);
                }
            }
        }
    }
}

/// Sync/async flag on an assignment. Default is `Async` when the keyword is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Sync,
    Async,
}

impl SyncMode {
    /// `asyncs[lut]` expects `true` for async (the default).
    pub fn is_async(self) -> bool {
        matches!(self, SyncMode::Async)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub expr: Expr,
    pub mode: SyncMode,
    pub outputs: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusSwitch {
    pub bus_a: String,
    pub bus_b: String,
    /// `true` for `<->` (connect), `false` for `</>` (disconnect).
    pub connected: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assignment(Assignment),
    BusSwitch(BusSwitch),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Assignment(a) => a.span,
            Statement::BusSwitch(b) => b.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceDefinition {
    pub name: String,
    pub statements: Vec<Statement>,
}

/// A rectangular grid of slice-name rows, in source (top-to-bottom) declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub slices: Vec<SliceDefinition>,
    pub invocation: Invocation,
}
