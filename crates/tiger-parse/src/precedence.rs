//! Operator precedence and the pass that applies it.
//!
//! The parser records binary operators as flat chains in source order. This
//! module regroups each chain into nested [`Expr::Binary`] nodes using the
//! table below. Comparisons do not associate; every other operator is
//! left-associative.

use crate::error::ShapeError;
use std::iter::Peekable;
use std::vec::IntoIter;
use tiger_ast::ast::{
    BinOp, BinaryChain, ClassField, Dec, Elem, Expr, FnDec, Lvalue, MethodDec, Program,
    RecordCreate, TypeDef, VarDec,
};

pub const PRECEDENCE: &[(BinOp, u8)] = &[
    (BinOp::Mul, 8),
    (BinOp::Div, 8),
    (BinOp::Add, 4),
    (BinOp::Sub, 4),
    (BinOp::Ge, 2),
    (BinOp::Le, 2),
    (BinOp::Eq, 2),
    (BinOp::Ne, 2),
    (BinOp::Gt, 2),
    (BinOp::Lt, 2),
    (BinOp::And, 1),
    (BinOp::Or, 0),
];

pub fn precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Mul | BinOp::Div => 8,
        BinOp::Add | BinOp::Sub => 4,
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 2,
        BinOp::And => 1,
        BinOp::Or => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    None,
}

pub fn associativity(op: BinOp) -> Assoc {
    match op {
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => Assoc::None,
        _ => Assoc::Left,
    }
}

pub fn shape_program(program: Program) -> Result<Program, ShapeError> {
    Ok(match program {
        Program::Decs(decs) => Program::Decs(shape_decs(decs)?),
        Program::Expr(e) => Program::Expr(shape_expr(e)?),
    })
}

/// Rewrites every chain under `expr` into precedence-grouped binary nodes.
pub fn shape_expr(expr: Expr) -> Result<Expr, ShapeError> {
    let shaped = match expr {
        Expr::Nil | Expr::Int(_) | Expr::Str(_) | Expr::New(_) | Expr::Break => expr,
        Expr::Neg(inner) => Expr::Neg(shape_box(inner)?),
        Expr::ArrayCreate { ty, len, init } => Expr::ArrayCreate {
            ty,
            len: shape_box(len)?,
            init: shape_box(init)?,
        },
        Expr::RecordCreate(record) => {
            let (ty, fields, values) = record.into_parts();
            let mut shaped = RecordCreate::new(ty);
            for (field, value) in fields.into_iter().zip(values) {
                shaped.push(field, shape_expr(value)?);
            }
            Expr::RecordCreate(shaped)
        }
        Expr::Call { name, args } => Expr::Call {
            name,
            args: shape_all(args)?,
        },
        Expr::MethodCall {
            object,
            method,
            args,
        } => Expr::MethodCall {
            object: shape_lvalue(object)?,
            method,
            args: shape_all(args)?,
        },
        Expr::Seq(exprs) => Expr::Seq(shape_all(exprs)?),
        Expr::Assign { target, value } => Expr::Assign {
            target: shape_lvalue(target)?,
            value: shape_box(value)?,
        },
        Expr::If { cond, then_, else_ } => Expr::If {
            cond: shape_box(cond)?,
            then_: shape_box(then_)?,
            else_: else_.map(shape_box).transpose()?,
        },
        Expr::While { cond, body } => Expr::While {
            cond: shape_box(cond)?,
            body: shape_box(body)?,
        },
        Expr::For {
            var,
            from,
            to,
            body,
        } => Expr::For {
            var,
            from: shape_box(from)?,
            to: shape_box(to)?,
            body: shape_box(body)?,
        },
        Expr::Let { decs, body } => Expr::Let {
            decs: shape_decs(decs)?,
            body: shape_all(body)?,
        },
        Expr::Lvalue(lv) => Expr::Lvalue(shape_lvalue(lv)?),
        Expr::Chain(chain) => shape_chain(chain)?,
        Expr::Binary { op, lhs, rhs } => Expr::Binary {
            op,
            lhs: shape_box(lhs)?,
            rhs: shape_box(rhs)?,
        },
    };
    Ok(shaped)
}

fn shape_box(e: Box<Expr>) -> Result<Box<Expr>, ShapeError> {
    Ok(Box::new(shape_expr(*e)?))
}

fn shape_all(exprs: Vec<Expr>) -> Result<Vec<Expr>, ShapeError> {
    exprs.into_iter().map(shape_expr).collect()
}

fn shape_lvalue(lv: Lvalue) -> Result<Lvalue, ShapeError> {
    let elems = lv
        .elems
        .into_iter()
        .map(|elem| {
            Ok(Elem {
                name: elem.name,
                indices: shape_all(elem.indices)?,
            })
        })
        .collect::<Result<_, ShapeError>>()?;
    Ok(Lvalue { elems })
}

fn shape_decs(decs: Vec<Dec>) -> Result<Vec<Dec>, ShapeError> {
    decs.into_iter().map(shape_dec).collect()
}

fn shape_dec(dec: Dec) -> Result<Dec, ShapeError> {
    Ok(match dec {
        Dec::Type { name, ty } => Dec::Type {
            name,
            ty: shape_type_def(ty)?,
        },
        Dec::Class {
            name,
            parent,
            fields,
        } => Dec::Class {
            name,
            parent,
            fields: shape_class_fields(fields)?,
        },
        Dec::Var(v) => Dec::Var(shape_var_dec(v)?),
        Dec::Function(f) => Dec::Function(FnDec {
            body: shape_expr(f.body)?,
            ..f
        }),
        Dec::Primitive(_) | Dec::Import { .. } => dec,
    })
}

fn shape_var_dec(v: VarDec) -> Result<VarDec, ShapeError> {
    Ok(VarDec {
        init: shape_expr(v.init)?,
        ..v
    })
}

fn shape_type_def(ty: TypeDef) -> Result<TypeDef, ShapeError> {
    Ok(match ty {
        TypeDef::Class { parent, fields } => TypeDef::Class {
            parent,
            fields: shape_class_fields(fields)?,
        },
        other => other,
    })
}

fn shape_class_fields(fields: Vec<ClassField>) -> Result<Vec<ClassField>, ShapeError> {
    fields
        .into_iter()
        .map(|field| {
            Ok(match field {
                ClassField::Attr(v) => ClassField::Attr(shape_var_dec(v)?),
                ClassField::Method(m) => ClassField::Method(MethodDec {
                    body: shape_expr(m.body)?,
                    ..m
                }),
            })
        })
        .collect()
}

// ======= chains =======

fn shape_chain(chain: BinaryChain) -> Result<Expr, ShapeError> {
    let (left, pairs) = chain.into_parts();
    let mut flat = Vec::new();
    for (op, right) in pairs {
        flatten(op, right, &mut flat);
    }

    let first = shape_expr(left)?;
    let rest = flat
        .into_iter()
        .map(|(op, e)| Ok((op, shape_expr(e)?)))
        .collect::<Result<Vec<_>, ShapeError>>()?;

    climb(&mut rest.into_iter().peekable(), first, 0)
}

/// Appends `op operand` to `flat`, unrolling right-nested chains so that every
/// operator of the surface expression lands in source order.
fn flatten(op: BinOp, operand: Expr, flat: &mut Vec<(BinOp, Expr)>) {
    match operand {
        Expr::Chain(inner) => {
            let (left, pairs) = inner.into_parts();
            flatten(op, left, flat);
            for (op, right) in pairs {
                flatten(op, right, flat);
            }
        }
        other => flat.push((op, other)),
    }
}

fn climb(
    rest: &mut Peekable<IntoIter<(BinOp, Expr)>>,
    mut lhs: Expr,
    min_prec: u8,
) -> Result<Expr, ShapeError> {
    let mut last: Option<BinOp> = None;
    while let Some(&(op, _)) = rest.peek() {
        let prec = precedence(op);
        if prec < min_prec {
            break;
        }
        if let Some(prev) = last {
            if associativity(prev) == Assoc::None && precedence(prev) == prec {
                return Err(ShapeError::NonAssociative {
                    first: prev,
                    second: op,
                });
            }
        }
        let Some((op, mut rhs)) = rest.next() else {
            break;
        };
        while let Some(&(next, _)) = rest.peek() {
            if precedence(next) > prec {
                rhs = climb(rest, rhs, prec + 1)?;
            } else {
                break;
            }
        }
        lhs = Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };
        last = Some(op);
    }
    Ok(lhs)
}
