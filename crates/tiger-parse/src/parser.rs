use crate::error::ParseError;
use crate::token::{Tag, Tok};
use anyhow::Result;
use tiger_ast::ast::{
    BinaryChain, ClassField, Dec, Elem, Expr, FnDec, Ident, Lvalue, MethodDec, PrimDec, Program,
    RecordCreate, TypeDef, TypeFields, VarDec,
};

/// Nesting limit used by [`Parser::new`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested expressions. Every operator on the right of a
    /// chain counts as one level, so `1+1+...+1` nests once per `+`.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Tokenizes and parses `src`. `Ok(None)` means the source held no tokens
/// besides comments and line breaks.
pub fn parse_str(_file: &str, src: &str) -> Result<Option<Program>> {
    parse_str_with(src, ParseOptions::default())
}

pub fn parse_str_with(src: &str, opts: ParseOptions) -> Result<Option<Program>> {
    let tokens = crate::tokenize(src)?;
    let program = Parser::with_options(tokens, opts).parse()?;
    Ok(program)
}

pub struct Parser {
    toks: Vec<Tok>,
    pos: usize,
    depth: usize,
    opts: ParseOptions,
}

type PResult<T> = std::result::Result<T, ParseError>;

impl Parser {
    pub fn new(tokens: Vec<Tok>) -> Self {
        Self::with_options(tokens, ParseOptions::default())
    }

    /// Comments and line breaks are dropped here, once, before parsing starts.
    pub fn with_options(tokens: Vec<Tok>, opts: ParseOptions) -> Self {
        let toks: Vec<Tok> = tokens.into_iter().filter(|t| !t.tag.is_trivia()).collect();
        Self {
            toks,
            pos: 0,
            depth: 0,
            opts,
        }
    }

    /// Parses the whole token sequence into one root node.
    pub fn parse(mut self) -> PResult<Option<Program>> {
        tracing::debug!(tokens = self.toks.len(), "parsing program");
        let program = self.parse_program()?;
        if let Some(tok) = self.current() {
            if tok.tag == Tag::Invalid {
                return Err(self.unexpected("end of program"));
            }
            return Err(ParseError::TrailingInput {
                found: tok.tag,
                index: self.pos,
            });
        }
        tracing::debug!(consumed = self.pos, "parsed program");
        Ok(program)
    }

    // ======= cursor primitives =======

    fn current(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn peek_next(&self) -> Option<&Tok> {
        self.toks.get(self.pos + 1)
    }

    fn tag_at(&self, offset: usize) -> Option<Tag> {
        self.toks.get(self.pos + offset).map(|t| t.tag)
    }

    fn cur_tag(&self) -> Option<Tag> {
        self.current().map(|t| t.tag)
    }

    fn at(&self, tag: Tag) -> bool {
        self.cur_tag() == Some(tag)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn accept(&mut self, tag: Tag) -> bool {
        if self.at(tag) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tag: Tag) -> PResult<Tok> {
        match self.current() {
            Some(tok) if tok.tag == tag => {
                let tok = tok.clone();
                self.pos += 1;
                Ok(tok)
            }
            Some(Tok {
                tag: Tag::Invalid,
                error: Some(e),
                ..
            }) => Err(ParseError::Lex(e.clone())),
            Some(tok) => Err(ParseError::Expected {
                expected: tag,
                found: tok.tag,
                index: self.pos,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: tag.name().to_string(),
                index: self.pos,
            }),
        }
    }

    /// Error for a token that cannot start `context`.
    fn unexpected(&self, context: &'static str) -> ParseError {
        match self.current() {
            Some(Tok {
                tag: Tag::Invalid,
                error: Some(e),
                ..
            }) => ParseError::Lex(e.clone()),
            Some(tok) => ParseError::Unexpected {
                found: tok.tag,
                context,
                index: self.pos,
            },
            None => ParseError::UnexpectedEof {
                expected: context.to_string(),
                index: self.pos,
            },
        }
    }

    fn parse_ident(&mut self) -> PResult<Ident> {
        let tok = self.expect(Tag::Ident)?;
        Ok(Ident::new(tok.text, tok.span))
    }

    /// `[: type-id]`
    fn parse_type_annotation(&mut self) -> PResult<Option<Ident>> {
        if self.accept(Tag::Colon) {
            Ok(Some(self.parse_ident()?))
        } else {
            Ok(None)
        }
    }

    // ======= program / declarations =======

    fn parse_program(&mut self) -> PResult<Option<Program>> {
        let Some(tag) = self.cur_tag() else {
            return Ok(None);
        };
        if tag.starts_dec() {
            Ok(Some(Program::Decs(self.parse_decs()?)))
        } else {
            Ok(Some(Program::Expr(self.parse_expr()?)))
        }
    }

    fn parse_decs(&mut self) -> PResult<Vec<Dec>> {
        let mut decs = Vec::new();
        while self.cur_tag().is_some_and(Tag::starts_dec) {
            decs.push(self.parse_dec()?);
        }
        Ok(decs)
    }

    fn parse_dec(&mut self) -> PResult<Dec> {
        tracing::trace!(at = self.pos, tag = ?self.cur_tag(), "declaration");
        match self.cur_tag() {
            Some(Tag::Type) => self.parse_type_dec(),
            Some(Tag::Class) => self.parse_class_dec(),
            Some(Tag::Function) => Ok(Dec::Function(self.parse_fn_dec()?)),
            Some(Tag::Primitive) => Ok(Dec::Primitive(self.parse_prim_dec()?)),
            Some(Tag::Import) => self.parse_import_dec(),
            Some(Tag::Var) => Ok(Dec::Var(self.parse_var_dec()?)),
            _ => Err(self.unexpected("declaration")),
        }
    }

    /// `type id = ty`
    fn parse_type_dec(&mut self) -> PResult<Dec> {
        self.expect(Tag::Type)?;
        let name = self.parse_ident()?;
        self.expect(Tag::Eq)?;
        let ty = self.parse_type_def()?;
        Ok(Dec::Type { name, ty })
    }

    /// `class id [extends id] ( fields )`, also accepted with braces.
    fn parse_class_dec(&mut self) -> PResult<Dec> {
        self.expect(Tag::Class)?;
        let name = self.parse_ident()?;
        let parent = if self.accept(Tag::Extends) {
            Some(self.parse_ident()?)
        } else {
            None
        };
        let close = if self.accept(Tag::LParen) {
            Tag::RParen
        } else if self.accept(Tag::LBrace) {
            Tag::RBrace
        } else {
            return Err(self.unexpected("class body"));
        };
        let fields = self.parse_class_fields()?;
        self.expect(close)?;
        Ok(Dec::Class {
            name,
            parent,
            fields,
        })
    }

    /// `function id ( type-fields ) [: type-id] = expr`
    fn parse_fn_dec(&mut self) -> PResult<FnDec> {
        self.expect(Tag::Function)?;
        let name = self.parse_ident()?;
        self.expect(Tag::LParen)?;
        let params = self.parse_type_fields()?;
        self.expect(Tag::RParen)?;
        let ret = self.parse_type_annotation()?;
        self.expect(Tag::Eq)?;
        let body = self.parse_expr()?;
        Ok(FnDec {
            name,
            params,
            ret,
            body,
        })
    }

    /// `primitive id ( type-fields ) [: type-id]`
    fn parse_prim_dec(&mut self) -> PResult<PrimDec> {
        self.expect(Tag::Primitive)?;
        let name = self.parse_ident()?;
        self.expect(Tag::LParen)?;
        let params = self.parse_type_fields()?;
        self.expect(Tag::RParen)?;
        let ret = self.parse_type_annotation()?;
        Ok(PrimDec { name, params, ret })
    }

    fn parse_import_dec(&mut self) -> PResult<Dec> {
        self.expect(Tag::Import)?;
        let tok = self.expect(Tag::Str)?;
        Ok(Dec::Import {
            path: tok.text,
            span: tok.span,
        })
    }

    /// `var id [: type-id] := expr`
    fn parse_var_dec(&mut self) -> PResult<VarDec> {
        self.expect(Tag::Var)?;
        let name = self.parse_ident()?;
        let ty = self.parse_type_annotation()?;
        self.expect(Tag::Assign)?;
        let init = self.parse_expr()?;
        Ok(VarDec { name, ty, init })
    }

    fn parse_class_fields(&mut self) -> PResult<Vec<ClassField>> {
        let mut fields = Vec::new();
        loop {
            match self.cur_tag() {
                Some(Tag::Var) => fields.push(ClassField::Attr(self.parse_var_dec()?)),
                Some(Tag::Method) => fields.push(ClassField::Method(self.parse_method_dec()?)),
                _ => break,
            }
        }
        Ok(fields)
    }

    /// `method id ( type-fields ) [: type-id] = expr`
    fn parse_method_dec(&mut self) -> PResult<MethodDec> {
        self.expect(Tag::Method)?;
        let name = self.parse_ident()?;
        self.expect(Tag::LParen)?;
        let params = self.parse_type_fields()?;
        self.expect(Tag::RParen)?;
        let ret = self.parse_type_annotation()?;
        self.expect(Tag::Eq)?;
        let body = self.parse_expr()?;
        Ok(MethodDec {
            name,
            params,
            ret,
            body,
        })
    }

    // ======= types =======

    fn parse_type_def(&mut self) -> PResult<TypeDef> {
        match self.cur_tag() {
            Some(Tag::LBrace) => {
                self.advance();
                let fields = self.parse_type_fields()?;
                self.expect(Tag::RBrace)?;
                Ok(TypeDef::Record(fields))
            }
            Some(Tag::Array) => {
                self.advance();
                self.expect(Tag::Of)?;
                Ok(TypeDef::Array(self.parse_ident()?))
            }
            Some(Tag::Class) => {
                self.advance();
                let parent = if self.accept(Tag::Extends) {
                    Some(self.parse_ident()?)
                } else {
                    None
                };
                self.expect(Tag::LBrace)?;
                let fields = self.parse_class_fields()?;
                self.expect(Tag::RBrace)?;
                Ok(TypeDef::Class { parent, fields })
            }
            Some(Tag::Ident) => Ok(TypeDef::Alias(self.parse_ident()?)),
            _ => Err(self.unexpected("type definition")),
        }
    }

    /// `id : type-id (, id : type-id)*`, or nothing when no identifier leads.
    fn parse_type_fields(&mut self) -> PResult<TypeFields> {
        let mut fields = TypeFields::new();
        if !self.at(Tag::Ident) {
            return Ok(fields);
        }
        loop {
            let name = self.parse_ident()?;
            self.expect(Tag::Colon)?;
            let ty = self.parse_ident()?;
            fields.push(name, ty);
            if !self.accept(Tag::Comma) {
                break;
            }
        }
        Ok(fields)
    }

    // ======= expressions =======
    //
    // A chain is `primary (op expr)*`. The right operand is a full recursive
    // parse, so operators nest to the right in source order and no precedence
    // is applied here. `precedence::shape_expr` regroups chains afterwards.

    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        if self.depth >= self.opts.max_depth {
            return Err(ParseError::DepthLimit {
                limit: self.opts.max_depth,
                index: self.pos,
            });
        }
        self.depth += 1;
        let result = self.parse_chain();
        self.depth -= 1;
        result
    }

    fn parse_chain(&mut self) -> PResult<Expr> {
        let left = self.parse_primary()?;
        let mut chain = BinaryChain::new(left);
        while let Some(op) = self.cur_tag().and_then(Tag::binop) {
            self.advance();
            let right = self.parse_expr()?;
            chain.push(op, right);
        }
        if chain.is_empty() {
            Ok(*chain.left)
        } else {
            Ok(Expr::Chain(chain))
        }
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        match self.cur_tag() {
            Some(Tag::Nil) => {
                self.advance();
                Ok(Expr::Nil)
            }
            Some(Tag::Num) => {
                let index = self.pos;
                let tok = self.expect(Tag::Num)?;
                tok.text
                    .parse::<i64>()
                    .map(Expr::Int)
                    .map_err(|_| ParseError::IntOutOfRange {
                        text: tok.text,
                        index,
                    })
            }
            Some(Tag::Str) => {
                let tok = self.expect(Tag::Str)?;
                Ok(Expr::Str(tok.text))
            }
            Some(Tag::New) => {
                self.advance();
                Ok(Expr::New(self.parse_ident()?))
            }
            Some(Tag::Minus) => {
                self.advance();
                let inner = self.parse_expr()?;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(Tag::LParen) => {
                self.advance();
                let exprs = self.parse_exprs(Tag::RParen)?;
                self.expect(Tag::RParen)?;
                Ok(Expr::Seq(exprs))
            }
            Some(Tag::If) => self.parse_if(),
            Some(Tag::While) => self.parse_while(),
            Some(Tag::For) => self.parse_for(),
            Some(Tag::Break) => {
                self.advance();
                Ok(Expr::Break)
            }
            Some(Tag::Let) => self.parse_let(),
            Some(Tag::Ident) => self.parse_ident_led(),
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `expr (; expr)*`, possibly empty. Stops before `close` without consuming it.
    fn parse_exprs(&mut self, close: Tag) -> PResult<Vec<Expr>> {
        let mut exprs = Vec::new();
        if self.at(close) {
            return Ok(exprs);
        }
        loop {
            exprs.push(self.parse_expr()?);
            if !self.accept(Tag::Semi) {
                break;
            }
        }
        Ok(exprs)
    }

    /// `( expr (, expr)* )`, possibly empty.
    fn parse_args(&mut self) -> PResult<Vec<Expr>> {
        self.expect(Tag::LParen)?;
        let mut args = Vec::new();
        if !self.at(Tag::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.accept(Tag::Comma) {
                    break;
                }
            }
        }
        self.expect(Tag::RParen)?;
        Ok(args)
    }

    fn parse_if(&mut self) -> PResult<Expr> {
        self.expect(Tag::If)?;
        let cond = Box::new(self.parse_expr()?);
        self.expect(Tag::Then)?;
        let then_ = Box::new(self.parse_expr()?);
        let else_ = if self.accept(Tag::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        Ok(Expr::If { cond, then_, else_ })
    }

    fn parse_while(&mut self) -> PResult<Expr> {
        self.expect(Tag::While)?;
        let cond = Box::new(self.parse_expr()?);
        self.expect(Tag::Do)?;
        let body = Box::new(self.parse_expr()?);
        Ok(Expr::While { cond, body })
    }

    /// `for id := expr to expr do expr`
    fn parse_for(&mut self) -> PResult<Expr> {
        self.expect(Tag::For)?;
        let var = self.parse_ident()?;
        self.expect(Tag::Assign)?;
        let from = Box::new(self.parse_expr()?);
        self.expect(Tag::To)?;
        let to = Box::new(self.parse_expr()?);
        self.expect(Tag::Do)?;
        let body = Box::new(self.parse_expr()?);
        Ok(Expr::For {
            var,
            from,
            to,
            body,
        })
    }

    /// `let decs in exprs end`
    fn parse_let(&mut self) -> PResult<Expr> {
        self.expect(Tag::Let)?;
        let decs = self.parse_decs()?;
        self.expect(Tag::In)?;
        let body = self.parse_exprs(Tag::End)?;
        self.expect(Tag::End)?;
        Ok(Expr::Let { decs, body })
    }

    // ======= identifier-led forms =======

    /// The token after the identifier picks the production:
    /// `{` record creation, `[` array creation or indexing, `(` call,
    /// anything else an lvalue path.
    fn parse_ident_led(&mut self) -> PResult<Expr> {
        let next = self.peek_next().map(|t| t.tag);
        tracing::trace!(at = self.pos, next = ?next, "identifier-led expression");
        match next {
            Some(Tag::LBrace) => self.parse_record_create(),
            Some(Tag::LBracket) => self.parse_array_or_index(),
            Some(Tag::LParen) => {
                let name = self.parse_ident()?;
                let args = self.parse_args()?;
                Ok(Expr::Call { name, args })
            }
            _ => {
                let name = self.parse_ident()?;
                let lvalue = self.parse_lvalue_from(Elem {
                    name,
                    indices: Vec::new(),
                })?;
                self.finish_lvalue(lvalue)
            }
        }
    }

    /// `ty { field = expr (, field = expr)* }`
    fn parse_record_create(&mut self) -> PResult<Expr> {
        let ty = self.parse_ident()?;
        self.expect(Tag::LBrace)?;
        let mut record = RecordCreate::new(ty);
        if !self.at(Tag::RBrace) {
            loop {
                let field = self.parse_ident()?;
                self.expect(Tag::Eq)?;
                let value = self.parse_expr()?;
                record.push(field, value);
                if !self.accept(Tag::Comma) {
                    break;
                }
            }
        }
        self.expect(Tag::RBrace)?;
        Ok(Expr::RecordCreate(record))
    }

    /// `id [ expr ]` is either `ty [len] of init` or the first index of an
    /// lvalue. The bracket is parsed first and `of` decides.
    fn parse_array_or_index(&mut self) -> PResult<Expr> {
        let name = self.parse_ident()?;
        self.expect(Tag::LBracket)?;
        let first = self.parse_expr()?;
        self.expect(Tag::RBracket)?;
        if self.accept(Tag::Of) {
            let init = self.parse_expr()?;
            return Ok(Expr::ArrayCreate {
                ty: name,
                len: Box::new(first),
                init: Box::new(init),
            });
        }
        let lvalue = self.parse_lvalue_from(Elem {
            name,
            indices: vec![first],
        })?;
        self.finish_lvalue(lvalue)
    }

    /// `. id (` ahead: a method call, not another path segment.
    fn at_method_call(&self) -> bool {
        self.at(Tag::Dot) && self.tag_at(1) == Some(Tag::Ident) && self.tag_at(2) == Some(Tag::LParen)
    }

    /// Continues a path whose first segment name is already consumed:
    /// more `[index]` on the current segment, then `.name` segments.
    fn parse_lvalue_from(&mut self, mut elem: Elem) -> PResult<Lvalue> {
        let mut elems = Vec::new();
        loop {
            while self.accept(Tag::LBracket) {
                elem.indices.push(self.parse_expr()?);
                self.expect(Tag::RBracket)?;
            }
            elems.push(elem);
            if !self.at(Tag::Dot) || self.at_method_call() {
                break;
            }
            self.advance();
            elem = Elem {
                name: self.parse_ident()?,
                indices: Vec::new(),
            };
        }
        Ok(Lvalue { elems })
    }

    /// An lvalue followed by `.method(args)`, `:= expr`, or nothing.
    fn finish_lvalue(&mut self, lvalue: Lvalue) -> PResult<Expr> {
        if self.at_method_call() {
            self.advance();
            let method = self.parse_ident()?;
            let args = self.parse_args()?;
            return Ok(Expr::MethodCall {
                object: lvalue,
                method,
                args,
            });
        }
        if self.accept(Tag::Assign) {
            let value = self.parse_expr()?;
            return Ok(Expr::Assign {
                target: lvalue,
                value: Box::new(value),
            });
        }
        Ok(Expr::Lvalue(lvalue))
    }
}
