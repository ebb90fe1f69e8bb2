#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

pub mod dump;

pub mod span {
    use serde::Serialize;

    /// Byte offsets `[start, end)` into the source buffer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
    pub struct Span {
        pub start: u32,
        pub end: u32,
    }
}

pub mod ast {
    use super::span::Span;
    use serde::Serialize;

    /// Root of a parsed program: either a declaration sequence or a single expression.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Program {
        Decs(Vec<Dec>),
        Expr(Expr),
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Ident {
        pub text: String,
        pub span: Span,
    }

    impl Ident {
        pub fn new(text: impl Into<String>, span: Span) -> Self {
            Self {
                text: text.into(),
                span,
            }
        }
    }

    // ======= declarations =======

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Dec {
        /// `type id = ty`
        Type { name: Ident, ty: TypeDef },
        /// `class id [extends id] { fields }` (declaration-level class form)
        Class {
            name: Ident,
            parent: Option<Ident>,
            fields: Vec<ClassField>,
        },
        Var(VarDec),
        Function(FnDec),
        Primitive(PrimDec),
        /// `import "path"`
        Import { path: String, span: Span },
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct VarDec {
        pub name: Ident,
        pub ty: Option<Ident>,
        pub init: Expr,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FnDec {
        pub name: Ident,
        pub params: TypeFields,
        pub ret: Option<Ident>,
        pub body: Expr,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct PrimDec {
        pub name: Ident,
        pub params: TypeFields,
        pub ret: Option<Ident>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum ClassField {
        Attr(VarDec),
        Method(MethodDec),
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct MethodDec {
        pub name: Ident,
        pub params: TypeFields,
        pub ret: Option<Ident>,
        pub body: Expr,
    }

    // ======= types =======

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum TypeDef {
        Alias(Ident),
        Record(TypeFields),
        Array(Ident),
        /// `class [extends id] { fields }`
        Class {
            parent: Option<Ident>,
            fields: Vec<ClassField>,
        },
    }

    /// Parallel `name : type-id` lists. Both vectors always have the same length.
    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    pub struct TypeFields {
        names: Vec<Ident>,
        types: Vec<Ident>,
    }

    impl TypeFields {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push(&mut self, name: Ident, ty: Ident) {
            self.names.push(name);
            self.types.push(ty);
        }

        pub fn names(&self) -> &[Ident] {
            &self.names
        }

        pub fn types(&self) -> &[Ident] {
            &self.types
        }

        pub fn len(&self) -> usize {
            self.names.len()
        }

        pub fn is_empty(&self) -> bool {
            self.names.is_empty()
        }

        pub fn iter(&self) -> impl Iterator<Item = (&Ident, &Ident)> {
            self.names.iter().zip(self.types.iter())
        }
    }

    // ======= expressions =======

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Expr {
        Nil,
        Int(i64),
        Str(String),
        /// Unary minus.
        Neg(Box<Expr>),
        /// `ty [len] of init`
        ArrayCreate {
            ty: Ident,
            len: Box<Expr>,
            init: Box<Expr>,
        },
        RecordCreate(RecordCreate),
        /// `new ty`
        New(Ident),
        Call {
            name: Ident,
            args: Vec<Expr>,
        },
        MethodCall {
            object: Lvalue,
            method: Ident,
            args: Vec<Expr>,
        },
        /// `( e1; e2; ... )`, possibly empty.
        Seq(Vec<Expr>),
        Assign {
            target: Lvalue,
            value: Box<Expr>,
        },
        If {
            cond: Box<Expr>,
            then_: Box<Expr>,
            else_: Option<Box<Expr>>,
        },
        While {
            cond: Box<Expr>,
            body: Box<Expr>,
        },
        For {
            var: Ident,
            from: Box<Expr>,
            to: Box<Expr>,
            body: Box<Expr>,
        },
        Break,
        Let {
            decs: Vec<Dec>,
            body: Vec<Expr>,
        },
        Lvalue(Lvalue),
        /// Operator applications in source order, before precedence shaping.
        Chain(BinaryChain),
        /// A single operator application, produced by precedence shaping.
        Binary {
            op: BinOp,
            lhs: Box<Expr>,
            rhs: Box<Expr>,
        },
    }

    /// `ty { f1 = e1, f2 = e2 }`. Field names and values are kept in lockstep.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct RecordCreate {
        pub ty: Ident,
        fields: Vec<Ident>,
        values: Vec<Expr>,
    }

    impl RecordCreate {
        pub fn new(ty: Ident) -> Self {
            Self {
                ty,
                fields: Vec::new(),
                values: Vec::new(),
            }
        }

        pub fn push(&mut self, field: Ident, value: Expr) {
            self.fields.push(field);
            self.values.push(value);
        }

        pub fn fields(&self) -> &[Ident] {
            &self.fields
        }

        pub fn values(&self) -> &[Expr] {
            &self.values
        }

        pub fn iter(&self) -> impl Iterator<Item = (&Ident, &Expr)> {
            self.fields.iter().zip(self.values.iter())
        }

        pub fn into_parts(self) -> (Ident, Vec<Ident>, Vec<Expr>) {
            (self.ty, self.fields, self.values)
        }
    }

    /// `left op1 right1 op2 right2 ...`; `ops` and `rights` always have the same length.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct BinaryChain {
        pub left: Box<Expr>,
        ops: Vec<BinOp>,
        rights: Vec<Expr>,
    }

    impl BinaryChain {
        pub fn new(left: Expr) -> Self {
            Self {
                left: Box::new(left),
                ops: Vec::new(),
                rights: Vec::new(),
            }
        }

        pub fn push(&mut self, op: BinOp, right: Expr) {
            self.ops.push(op);
            self.rights.push(right);
        }

        pub fn ops(&self) -> &[BinOp] {
            &self.ops
        }

        pub fn rights(&self) -> &[Expr] {
            &self.rights
        }

        pub fn is_empty(&self) -> bool {
            self.ops.is_empty()
        }

        pub fn into_parts(self) -> (Expr, Vec<(BinOp, Expr)>) {
            let pairs = self.ops.into_iter().zip(self.rights).collect();
            (*self.left, pairs)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum BinOp {
        Mul,
        Div,
        Add,
        Sub,
        Eq,
        Ne,
        Lt,
        Le,
        Gt,
        Ge,
        And,
        Or,
    }

    impl BinOp {
        pub fn symbol(self) -> &'static str {
            match self {
                BinOp::Mul => "*",
                BinOp::Div => "/",
                BinOp::Add => "+",
                BinOp::Sub => "-",
                BinOp::Eq => "=",
                BinOp::Ne => "<>",
                BinOp::Lt => "<",
                BinOp::Le => "<=",
                BinOp::Gt => ">",
                BinOp::Ge => ">=",
                BinOp::And => "&",
                BinOp::Or => "|",
            }
        }
    }

    impl std::fmt::Display for BinOp {
        fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str(self.symbol())
        }
    }

    /// A storage location: `a`, `a[i][j]`, `a.b[k].c`.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Lvalue {
        pub elems: Vec<Elem>,
    }

    /// One dot-separated segment of an lvalue path.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Elem {
        pub name: Ident,
        pub indices: Vec<Expr>,
    }

    impl Lvalue {
        pub fn head(&self) -> Option<&Ident> {
            self.elems.first().map(|e| &e.name)
        }

        /// Dotted path with index brackets elided, e.g. `a.b.c`.
        pub fn path(&self) -> String {
            self.elems
                .iter()
                .map(|e| e.name.text.as_str())
                .collect::<Vec<_>>()
                .join(".")
        }
    }
}
