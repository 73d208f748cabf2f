use crate::ast::{BinaryOp, Node, UnaryOp};
use crate::error::PseudoError;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::scope::{Frames, ScopeId};
use crate::value::Value;

/// Lex, parse and evaluate one source string.
///
/// Returns `(console_output, shell_output)`: the shell output is the final
/// value rendered as text, the console output the newline-joined side
/// channel of printed lines. On any error both strings carry the formatted
/// error message.
pub fn evaluate(source: &str) -> (String, String) {
    let mut lexer = Lexer::new(source);
    let tokens = match lexer.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            let message = error.message(&Frames::new());
            return (message.clone(), message);
        }
    };

    let mut parser = Parser::new(tokens);
    let root = match parser.parse() {
        Ok(root) => root,
        Err(error) => {
            let message = error.message(&Frames::new());
            return (message.clone(), message);
        }
    };

    let mut interpreter = Interpreter::new();
    let globals = interpreter.globals();
    match interpreter.visit(&root, globals) {
        Ok(value) => (interpreter.console_output(), value.to_string()),
        Err(error) => {
            let message = error.message(interpreter.frames());
            (message.clone(), message)
        }
    }
}

/// Tree-walking evaluator. Owns the frame arena for one evaluation and the
/// console side channel.
pub struct Interpreter {
    frames: Frames,
    globals: ScopeId,
    printed: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut frames = Frames::new();
        let globals = frames.push("<pseudo>", None, None, None);
        frames.bind(globals, "TRUE", Value::number(1.0));
        frames.bind(globals, "FALSE", Value::number(0.0));
        frames.bind(globals, "PI", Value::number(std::f64::consts::PI));
        Self {
            frames,
            globals,
            printed: Vec::new(),
        }
    }

    pub fn globals(&self) -> ScopeId {
        self.globals
    }

    pub fn frames(&self) -> &Frames {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut Frames {
        &mut self.frames
    }

    /// Side-channel print lines accumulated during evaluation.
    pub fn console_output(&self) -> String {
        self.printed.join("\n")
    }

    pub fn visit(&mut self, node: &Node, scope: ScopeId) -> Result<Value, PseudoError> {
        match node {
            Node::Number { value, span } => {
                Ok(Value::number(*value).with_span(*span).with_scope(scope))
            }
            Node::Str { value, span } => {
                Ok(Value::string(value.clone()).with_span(*span).with_scope(scope))
            }
            Node::List { elements, span } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.visit(element, scope)?);
                }
                Ok(Value::list(items).with_span(*span).with_scope(scope))
            }
            Node::VarAccess { name, span } => {
                let value = self.frames.lookup(scope, name).ok_or_else(|| {
                    PseudoError::runtime(*span, format!("{name} is not defined"), Some(scope))
                })?;
                Ok(value.copy().with_span(*span).with_scope(scope))
            }
            Node::VarAssign { name, value, .. } => {
                let value = self.visit(value, scope)?;
                self.frames.bind(scope, name, value.clone());
                Ok(value)
            }
            Node::Binary {
                left,
                op,
                right,
                span,
            } => {
                let left = self.visit(left, scope)?;
                let right = self.visit(right, scope)?;
                let result = match op {
                    BinaryOp::Add => left.add(&right),
                    BinaryOp::Subtract => left.sub(&right),
                    BinaryOp::Multiply => left.mul(&right),
                    BinaryOp::Divide => left.div(&right),
                    BinaryOp::Power => left.pow(&right),
                    BinaryOp::Equal => left.equals(&right),
                    BinaryOp::Less => left.less_than(&right),
                    BinaryOp::LessEqual => left.less_than_or_equal(&right),
                    BinaryOp::Greater => left.greater_than(&right),
                    BinaryOp::GreaterEqual => left.greater_than_or_equal(&right),
                    BinaryOp::And => left.and(&right),
                    BinaryOp::Or => left.or(&right),
                }?;
                Ok(result.with_span(*span))
            }
            Node::Unary { op, operand, span } => {
                let operand = self.visit(operand, scope)?;
                let result = match op {
                    UnaryOp::Negate => operand.mul(&Value::number(-1.0)),
                    UnaryOp::Not => operand.not(),
                }?;
                Ok(result.with_span(*span))
            }
            // The remaining node kinds are data-only extension points; the
            // grammar never produces them, so reaching one here is a fault in
            // the interpreter itself, not a user error.
            node => panic!("internal error: no evaluator for {} nodes", node.kind()),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
