//! Abstract representation of the emitted module.

use swc_ecma_ast::Ident;

/// The compiled component module, ready for printing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledModule {
    /// Statements hoisted above the factory (imports), verbatim.
    pub module_statements: Vec<String>,
    /// Property names destructured from `props`.
    pub params: Vec<String>,
    /// The factory body before the node locals, in script order.
    pub statements: Vec<BodyItem>,
    /// One local per node, in index order.
    pub locals: Vec<String>,
    /// `create`, `mount`, `update`, `detach`, in that order.
    pub methods: Vec<Method>,
}

/// One entry of the factory body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyItem {
    /// A script statement, printed exactly as written.
    Verbatim(String),
    /// A generated statement, such as a property default.
    Stmt(Stmt),
}

/// A method of the returned lifecycle object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: &'static str,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

impl Method {
    pub fn new(name: &'static str, params: Vec<String>, body: Vec<Stmt>) -> Self {
        Self { name, params, body }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Expr(Expr),
    If { test: Expr, consequent: Vec<Stmt> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    Str(String),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    In {
        key: Box<Expr>,
        object: Box<Expr>,
    },
    StrictEq {
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Source text inserted as written, e.g. a listener handler.
    Raw(String),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn member(self, property: impl Into<String>) -> Self {
        Expr::Member {
            object: Box::new(self),
            property: property.into(),
        }
    }

    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(self),
            args,
        }
    }

    pub fn assign(self, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(self),
            value: Box::new(value),
        }
    }

    /// `self in object`
    pub fn is_in(self, object: Expr) -> Self {
        Expr::In {
            key: Box::new(self),
            object: Box::new(object),
        }
    }

    /// `self === right`
    pub fn strict_eq(self, right: Expr) -> Self {
        Expr::StrictEq {
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    pub fn into_stmt(self) -> Stmt {
        Stmt::Expr(self)
    }
}

/// Returns true if `name` can be used as a plain identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    Ident::is_valid_start(first) && chars.all(Ident::is_valid_continue) && !is_reserved_word(name)
}

fn is_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "break"
            | "case"
            | "catch"
            | "class"
            | "const"
            | "continue"
            | "debugger"
            | "default"
            | "delete"
            | "do"
            | "else"
            | "enum"
            | "export"
            | "extends"
            | "false"
            | "finally"
            | "for"
            | "function"
            | "if"
            | "import"
            | "in"
            | "instanceof"
            | "new"
            | "null"
            | "return"
            | "super"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "var"
            | "void"
            | "while"
            | "with"
            | "yield"
            | "let"
            | "static"
            | "await"
    )
}
