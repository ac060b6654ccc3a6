//! Object literal evaluation.
//!
//! Creation sources are plain object literals (`obj = {...}`, `var obj =
//! {...}` or `({...})`). They are parsed with oxc and folded into a [`Value`]
//! tree; functions are kept as their exact source text.

use oxc_allocator::Allocator;
use oxc_ast::ast::{ArrayExpressionElement, Expression, ObjectPropertyKind, PropertyKind, Statement};
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};

use crate::value::Value;
use crate::validate::{CompilerError, ERR_NOT_AN_OBJECT, ERR_NOT_A_FUNCTION, ERR_PARSE, ERR_UNSUPPORTED_VALUE};

/// Evaluates a creation source into an object [`Value`]. An empty source is an
/// empty object.
pub fn evaluate_object(src: &str) -> Result<Value, CompilerError> {
    if src.trim().is_empty() {
        return Ok(Value::empty_object());
    }

    match evaluate_program(src) {
        Ok(value) => Ok(value),
        // A bare `{...}` parses as a block statement; retry it as an expression.
        Err(first) => match evaluate_program(&format!("({})", src.trim().trim_end_matches(';'))) {
            Ok(value) => Ok(value),
            // The retry found the object, so its error is the precise one.
            Err(retry) if retry.code != ERR_PARSE && retry.code != ERR_NOT_AN_OBJECT => Err(retry),
            Err(_) => Err(first),
        },
    }
}

/// Checks that `src` is a single function expression and returns its text.
pub fn evaluate_function(src: &str) -> Result<String, CompilerError> {
    let wrapped = format!("({})", src.trim());
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &wrapped, SourceType::default()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(CompilerError::upstream(ERR_PARSE, "method", err));
    }

    let expr = ret.program.body.iter().find_map(|stmt| match stmt {
        Statement::ExpressionStatement(s) => Some(unwrap_parens(&s.expression)),
        _ => None,
    });

    match expr {
        Some(func @ (Expression::FunctionExpression(_) | Expression::ArrowFunctionExpression(_))) => {
            Ok(slice(&wrapped, func.span()).to_string())
        }
        _ => Err(CompilerError::with_details(
            ERR_NOT_A_FUNCTION,
            "The source should be a JS function(...params){}",
            Some("method"),
            vec![],
        )),
    }
}

/// Counts references to the global `document` inside a function source.
pub fn document_references(fn_src: &str) -> usize {
    struct DocumentRefs(usize);

    impl<'a> Visit<'a> for DocumentRefs {
        fn visit_identifier_reference(&mut self, ident: &oxc_ast::ast::IdentifierReference<'a>) {
            if ident.name.as_str() == "document" {
                self.0 += 1;
            }
        }
    }

    let wrapped = format!("({})", fn_src);
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, &wrapped, SourceType::default()).parse();
    if !ret.errors.is_empty() {
        return 0;
    }
    let mut refs = DocumentRefs(0);
    refs.visit_program(&ret.program);
    refs.0
}

// ═══════════════════════════════════════════════════════════════════════════════
// INTERNAL IMPLEMENTATION
// ═══════════════════════════════════════════════════════════════════════════════

fn evaluate_program(src: &str) -> Result<Value, CompilerError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, src, SourceType::default()).parse();
    if let Some(err) = ret.errors.first() {
        return Err(CompilerError::upstream(ERR_PARSE, "script", err));
    }

    let root = ret.program.body.iter().find_map(|stmt| match stmt {
        Statement::ExpressionStatement(s) => Some(creation_root(&s.expression)),
        Statement::VariableDeclaration(decl) => decl
            .declarations
            .first()
            .and_then(|d| d.init.as_ref())
            .map(creation_root),
        _ => None,
    });

    match root {
        Some(expr @ Expression::ObjectExpression(_)) => Evaluator { src }.value(expr),
        _ => Err(CompilerError::with_details(
            ERR_NOT_AN_OBJECT,
            "No object literal found in the creation source",
            Some("script"),
            vec!["Write the creation as `obj = { ... }`".to_string()],
        )),
    }
}

/// `obj = {...}` and `({...})` both resolve to the object literal itself.
fn creation_root<'b, 'a>(expr: &'b Expression<'a>) -> &'b Expression<'a> {
    match unwrap_parens(expr) {
        Expression::AssignmentExpression(assign) => creation_root(&assign.right),
        other => other,
    }
}

fn unwrap_parens<'b, 'a>(expr: &'b Expression<'a>) -> &'b Expression<'a> {
    match expr {
        Expression::ParenthesizedExpression(p) => unwrap_parens(&p.expression),
        other => other,
    }
}

fn slice(src: &str, span: Span) -> &str {
    &src[span.start as usize..span.end as usize]
}

struct Evaluator<'s> {
    src: &'s str,
}

impl Evaluator<'_> {
    fn unsupported(&self, span: Span, what: &str) -> CompilerError {
        CompilerError::with_details(
            ERR_UNSUPPORTED_VALUE,
            &format!("Unsupported {} `{}`", what, slice(self.src, span)),
            Some("script"),
            vec!["Only literals, arrays, objects and functions can be compiled".to_string()],
        )
    }

    fn value(&self, expr: &Expression<'_>) -> Result<Value, CompilerError> {
        match expr {
            Expression::NullLiteral(_) => Ok(Value::Null),
            Expression::BooleanLiteral(b) => Ok(Value::Bool(b.value)),
            Expression::NumericLiteral(n) => Ok(Value::Number(n.value)),
            Expression::StringLiteral(s) => Ok(Value::String(s.value.to_string())),
            Expression::TemplateLiteral(t) if t.expressions.is_empty() => {
                let cooked = t
                    .quasis
                    .first()
                    .and_then(|q| q.value.cooked.as_ref())
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                Ok(Value::String(cooked))
            }
            Expression::Identifier(id) if id.name.as_str() == "Infinity" => {
                Ok(Value::Number(f64::INFINITY))
            }
            Expression::Identifier(id) if id.name.as_str() == "NaN" => Ok(Value::Number(f64::NAN)),
            Expression::UnaryExpression(u) if matches!(u.operator.as_str(), "-" | "+") => {
                match self.value(&u.argument)? {
                    Value::Number(n) if u.operator.as_str() == "-" => Ok(Value::Number(-n)),
                    Value::Number(n) => Ok(Value::Number(n)),
                    _ => Err(self.unsupported(u.span, "expression")),
                }
            }
            Expression::FunctionExpression(_) | Expression::ArrowFunctionExpression(_) => {
                Ok(Value::Function(slice(self.src, expr.span()).to_string()))
            }
            Expression::ParenthesizedExpression(p) => self.value(&p.expression),
            Expression::ArrayExpression(arr) => {
                let mut items = Vec::with_capacity(arr.elements.len());
                for element in &arr.elements {
                    match element {
                        ArrayExpressionElement::SpreadElement(s) => {
                            return Err(self.unsupported(s.span, "spread element"));
                        }
                        ArrayExpressionElement::Elision(_) => items.push(Value::Null),
                        other => match other.as_expression() {
                            Some(e) => items.push(self.value(e)?),
                            None => return Err(self.unsupported(arr.span, "array element")),
                        },
                    }
                }
                Ok(Value::Array(items))
            }
            Expression::ObjectExpression(obj) => {
                let mut fields = Value::empty_object();
                for prop in &obj.properties {
                    let p = match prop {
                        ObjectPropertyKind::ObjectProperty(p) => p,
                        ObjectPropertyKind::SpreadProperty(s) => {
                            return Err(self.unsupported(s.span, "spread property"));
                        }
                    };
                    if p.computed || p.kind != PropertyKind::Init {
                        return Err(self.unsupported(p.span, "property"));
                    }
                    let Some(key) = p.key.static_name() else {
                        return Err(self.unsupported(p.key.span(), "property key"));
                    };
                    let value = if p.method {
                        self.method_shorthand(&p.value)?
                    } else {
                        self.value(&p.value)?
                    };
                    fields.set(&key, value);
                }
                Ok(fields)
            }
            other => Err(self.unsupported(other.span(), "expression")),
        }
    }

    /// `foo(a) {...}` becomes `function(a) {...}`.
    fn method_shorthand(&self, expr: &Expression<'_>) -> Result<Value, CompilerError> {
        let Expression::FunctionExpression(func) = expr else {
            return Err(self.unsupported(expr.span(), "method"));
        };
        let prefix = match (func.r#async, func.generator) {
            (true, true) => "async function*",
            (true, false) => "async function",
            (false, true) => "function*",
            (false, false) => "function",
        };
        let rest = Span::new(func.params.span.start, func.span.end);
        Ok(Value::Function(format!("{}{}", prefix, slice(self.src, rest))))
    }
}
