//! Depth-indented textual dump of the AST, used for debugging and test fixtures.
//!
//! Every node prints as `Name(` followed by its children one level deeper and a
//! closing `)`. Nodes without children print as `Name()`, and nodes carrying a
//! single scalar print it inline, e.g. `IntExpr(42)` or `Id(x)`. An absent
//! optional child prints as the empty leaf of the node it would have been.

use crate::ast::{
    BinaryChain, ClassField, Dec, Elem, Expr, FnDec, Ident, Lvalue, MethodDec, PrimDec, Program,
    RecordCreate, TypeDef, TypeFields, VarDec,
};

const INDENT: &str = "  ";

#[derive(Default)]
pub struct Dumper {
    out: String,
    depth: usize,
}

impl Dumper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn leaf(&mut self, name: &str) {
        self.line(&format!("{name}()"));
    }

    fn scalar(&mut self, name: &str, value: impl std::fmt::Display) {
        self.line(&format!("{name}({value})"));
    }

    /// Opens `name(`, lets `children` write one level deeper, then closes it.
    /// Collapses to `name()` when nothing was written.
    fn node(&mut self, name: &str, children: impl FnOnce(&mut Self)) {
        let before = self.out.len();
        self.line(&format!("{name}("));
        let opened = self.out.len();
        self.depth += 1;
        children(self);
        self.depth -= 1;
        if self.out.len() == opened {
            self.out.truncate(before);
            self.leaf(name);
        } else {
            self.line(")");
        }
    }

    fn id(&mut self, id: &Ident) {
        self.scalar("Id", &id.text);
    }

    fn type_id(&mut self, ty: Option<&Ident>) {
        match ty {
            Some(ty) => self.scalar("TypeId", &ty.text),
            None => self.leaf("TypeId"),
        }
    }

    pub fn program(&mut self, program: &Program) {
        match program {
            Program::Decs(decs) => self.decs(decs),
            Program::Expr(e) => self.expr(e),
        }
    }

    fn decs(&mut self, decs: &[Dec]) {
        self.node("Decs", |d| {
            for dec in decs {
                d.dec(dec);
            }
        });
    }

    pub fn dec(&mut self, dec: &Dec) {
        match dec {
            Dec::Type { name, ty } => self.node("TypeDec", |d| {
                d.id(name);
                d.type_def(ty);
            }),
            Dec::Class {
                name,
                parent,
                fields,
            } => self.node("ClassDef", |d| {
                d.id(name);
                d.type_id(parent.as_ref());
                d.class_fields(fields);
            }),
            Dec::Var(v) => self.var_dec(v),
            Dec::Function(f) => self.fn_dec(f),
            Dec::Primitive(p) => self.prim_dec(p),
            Dec::Import { path, .. } => self.scalar("ImportDec", format!("{path:?}")),
        }
    }

    fn var_dec(&mut self, v: &VarDec) {
        self.node("VarDec", |d| {
            d.id(&v.name);
            d.type_id(v.ty.as_ref());
            d.expr(&v.init);
        });
    }

    fn fn_dec(&mut self, f: &FnDec) {
        self.node("FnDec", |d| {
            d.id(&f.name);
            d.type_fields(&f.params);
            d.type_id(f.ret.as_ref());
            d.expr(&f.body);
        });
    }

    fn prim_dec(&mut self, p: &PrimDec) {
        self.node("PrimDec", |d| {
            d.id(&p.name);
            d.type_fields(&p.params);
            d.type_id(p.ret.as_ref());
        });
    }

    fn method_dec(&mut self, m: &MethodDec) {
        self.node("MethodDec", |d| {
            d.id(&m.name);
            d.type_fields(&m.params);
            d.type_id(m.ret.as_ref());
            d.expr(&m.body);
        });
    }

    fn class_fields(&mut self, fields: &[ClassField]) {
        self.node("ClassFields", |d| {
            for field in fields {
                match field {
                    ClassField::Attr(v) => d.node("AttrDec", |d| d.var_dec(v)),
                    ClassField::Method(m) => d.method_dec(m),
                }
            }
        });
    }

    fn type_fields(&mut self, fields: &TypeFields) {
        self.node("TypeFields", |d| {
            for (name, ty) in fields.iter() {
                d.node("Field", |d| {
                    d.id(name);
                    d.type_id(Some(ty));
                });
            }
        });
    }

    pub fn type_def(&mut self, ty: &TypeDef) {
        match ty {
            TypeDef::Alias(alias) => self.node("TypeAlias", |d| d.type_id(Some(alias))),
            TypeDef::Record(fields) => self.node("RecordDef", |d| d.type_fields(fields)),
            TypeDef::Array(elem) => self.node("ArrayDef", |d| d.type_id(Some(elem))),
            TypeDef::Class { parent, fields } => self.node("ClassTypeDef", |d| {
                d.type_id(parent.as_ref());
                d.class_fields(fields);
            }),
        }
    }

    fn exprs(&mut self, name: &str, exprs: &[Expr]) {
        self.node(name, |d| {
            for e in exprs {
                d.expr(e);
            }
        });
    }

    fn opt_expr(&mut self, e: Option<&Expr>) {
        match e {
            Some(e) => self.expr(e),
            None => self.leaf("Expr"),
        }
    }

    pub fn expr(&mut self, e: &Expr) {
        match e {
            Expr::Nil => self.leaf("NilExpr"),
            Expr::Int(n) => self.scalar("IntExpr", n),
            Expr::Str(s) => self.scalar("StrExpr", format!("{s:?}")),
            Expr::Neg(inner) => self.node("UnaryExpr", |d| {
                d.scalar("Op", "-");
                d.expr(inner);
            }),
            Expr::ArrayCreate { ty, len, init } => self.node("ArrayCreate", |d| {
                d.type_id(Some(ty));
                d.expr(len);
                d.expr(init);
            }),
            Expr::RecordCreate(rc) => self.record_create(rc),
            Expr::New(ty) => self.node("ObjectNew", |d| d.type_id(Some(ty))),
            Expr::Call { name, args } => self.node("FnCall", |d| {
                d.id(name);
                d.exprs("Args", args);
            }),
            Expr::MethodCall {
                object,
                method,
                args,
            } => self.node("MethodCall", |d| {
                d.lvalue(object);
                d.id(method);
                d.exprs("Args", args);
            }),
            Expr::Seq(exprs) => self.exprs("Exprs", exprs),
            Expr::Assign { target, value } => self.node("AssignExpr", |d| {
                d.lvalue(target);
                d.expr(value);
            }),
            Expr::If { cond, then_, else_ } => self.node("IfExpr", |d| {
                d.expr(cond);
                d.expr(then_);
                d.opt_expr(else_.as_deref());
            }),
            Expr::While { cond, body } => self.node("WhileExpr", |d| {
                d.expr(cond);
                d.expr(body);
            }),
            Expr::For {
                var,
                from,
                to,
                body,
            } => self.node("ForExpr", |d| {
                d.id(var);
                d.expr(from);
                d.expr(to);
                d.expr(body);
            }),
            Expr::Break => self.leaf("BreakExpr"),
            Expr::Let { decs, body } => self.node("LetExpr", |d| {
                d.decs(decs);
                d.exprs("Exprs", body);
            }),
            Expr::Lvalue(lv) => self.lvalue(lv),
            Expr::Chain(chain) => self.chain(chain),
            Expr::Binary { op, lhs, rhs } => self.node("BinaryExpr", |d| {
                d.scalar("Op", op);
                d.expr(lhs);
                d.expr(rhs);
            }),
        }
    }

    fn record_create(&mut self, rc: &RecordCreate) {
        self.node("RecordCreate", |d| {
            d.type_id(Some(&rc.ty));
            for (field, value) in rc.iter() {
                d.node("Field", |d| {
                    d.id(field);
                    d.expr(value);
                });
            }
        });
    }

    fn chain(&mut self, chain: &BinaryChain) {
        self.node("Expr", |d| {
            d.expr(&chain.left);
            for (op, right) in chain.ops().iter().zip(chain.rights()) {
                d.scalar("Op", op);
                d.expr(right);
            }
        });
    }

    fn lvalue(&mut self, lv: &Lvalue) {
        self.node("Lvar", |d| {
            for elem in &lv.elems {
                d.elem(elem);
            }
        });
    }

    fn elem(&mut self, elem: &Elem) {
        self.node("Elem", |d| {
            d.id(&elem.name);
            for idx in &elem.indices {
                d.expr(idx);
            }
        });
    }
}

impl Program {
    pub fn dump(&self) -> String {
        let mut d = Dumper::new();
        d.program(self);
        d.finish()
    }
}

impl Expr {
    pub fn dump(&self) -> String {
        let mut d = Dumper::new();
        d.expr(self);
        d.finish()
    }
}

impl Dec {
    pub fn dump(&self) -> String {
        let mut d = Dumper::new();
        d.dec(self);
        d.finish()
    }
}
