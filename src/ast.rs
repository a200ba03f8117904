use serde::Serialize;

/// An AST node: a kind plus the half-open byte span it covers in the
/// source it was parsed from. Nodes own their children exclusively.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub start: usize,
    pub end: usize,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(start: usize, end: usize, kind: ExprKind) -> Self {
        Self { start, end, kind }
    }

    /// Immediate child nodes, in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Int(_)
            | ExprKind::Long(_)
            | ExprKind::Real(_)
            | ExprKind::Float(_)
            | ExprKind::Bool(_)
            | ExprKind::StringLit(_)
            | ExprKind::Null
            | ExprKind::Property { .. }
            | ExprKind::Variable(_)
            | ExprKind::BeanRef { .. }
            | ExprKind::Identifier(_) => Vec::new(),
            ExprKind::Unary(_, operand) => vec![operand],
            ExprKind::Binary(lhs, _, rhs) => vec![lhs, rhs],
            ExprKind::IncDec { target, .. } => vec![target],
            ExprKind::Assign { target, value } => vec![target, value],
            ExprKind::Ternary { cond, if_true, if_false } => vec![cond, if_true, if_false],
            ExprKind::Elvis { value, default } => vec![value, default],
            ExprKind::Method { args, .. } | ExprKind::Function { args, .. } => {
                args.iter().collect()
            }
            ExprKind::Indexer(index) => vec![index],
            ExprKind::Projection { body, .. } | ExprKind::Selection { body, .. } => vec![body],
            ExprKind::InlineList(items) => items.iter().collect(),
            ExprKind::InlineMap(entries) => entries
                .iter()
                .flat_map(|(k, v)| [k, v])
                .collect(),
            ExprKind::QualifiedId(segments) => segments.iter().collect(),
            ExprKind::TypeRef { type_name, .. } => vec![type_name],
            ExprKind::Constructor { type_name, args } => {
                let mut children = vec![type_name.as_ref()];
                children.extend(args.iter());
                children
            }
            ExprKind::ArrayConstructor { type_name, dims, initializer } => {
                let mut children = vec![type_name.as_ref()];
                children.extend(dims.iter().flatten());
                if let Some(items) = initializer {
                    children.extend(items.iter());
                }
                children
            }
            ExprKind::Compound(pieces) => pieces.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Int(i32),
    Long(i64),
    Real(f64),
    Float(f32),
    Bool(bool),
    StringLit(String),
    Null,
    Unary(UnaryOp, Box<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    IncDec { op: IncDecOp, postfix: bool, target: Box<Expr> },
    Assign { target: Box<Expr>, value: Box<Expr> },
    Ternary { cond: Box<Expr>, if_true: Box<Expr>, if_false: Box<Expr> },
    Elvis { value: Box<Expr>, default: Box<Expr> },
    Property { name: String, safe: bool },
    Method { name: String, args: Vec<Expr>, safe: bool },
    Variable(String),
    Function { name: String, args: Vec<Expr> },
    BeanRef { name: String, factory: bool },
    Indexer(Box<Expr>),
    Projection { body: Box<Expr>, safe: bool },
    Selection { mode: SelectionKind, body: Box<Expr>, safe: bool },
    InlineList(Vec<Expr>),
    InlineMap(Vec<(Expr, Expr)>),
    /// One segment of a qualified identifier.
    Identifier(String),
    QualifiedId(Vec<Expr>),
    TypeRef { type_name: Box<Expr>, dims: usize },
    Constructor { type_name: Box<Expr>, args: Vec<Expr> },
    ArrayConstructor {
        type_name: Box<Expr>,
        /// One entry per `[...]` group; None for an omitted size as in `new int[3][]`.
        dims: Vec<Option<Expr>>,
        initializer: Option<Vec<Expr>>,
    },
    /// A dotted/indexed navigation chain with more than one piece.
    Compound(Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IncDecOp {
    Inc,
    Dec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    And,
    Or,
    InstanceOf,
    Matches,
    Between,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionKind {
    All,
    First,
    Last,
}
