use crate::ast::Node;
use crate::error::{PseudoError, Span};
use crate::interpreter::Interpreter;
use crate::scope::ScopeId;
use std::fmt;

/// The closed set of runtime value payloads.
#[derive(Debug, Clone)]
pub enum ValueKind {
    Number(f64),
    Str(String),
    List(Vec<Value>),
    Function(Function),
}

/// A runtime value: a payload plus diagnostic associations. Span and scope
/// are attached after construction; `copy` deliberately drops both so the
/// caller reattaches them at the use site.
#[derive(Debug, Clone)]
pub struct Value {
    pub kind: ValueKind,
    pub span: Option<Span>,
    pub scope: Option<ScopeId>,
}

impl Value {
    pub fn number(value: f64) -> Self {
        Self {
            kind: ValueKind::Number(value),
            span: None,
            scope: None,
        }
    }

    pub fn string(value: String) -> Self {
        Self {
            kind: ValueKind::Str(value),
            span: None,
            scope: None,
        }
    }

    pub fn list(elements: Vec<Value>) -> Self {
        Self {
            kind: ValueKind::List(elements),
            span: None,
            scope: None,
        }
    }

    pub fn function(function: Function) -> Self {
        Self {
            kind: ValueKind::Function(function),
            span: None,
            scope: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_scope(mut self, scope: ScopeId) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Payload-only duplicate.
    pub fn copy(&self) -> Value {
        Value {
            kind: self.kind.clone(),
            span: None,
            scope: None,
        }
    }

    pub fn is_true(&self) -> bool {
        match &self.kind {
            ValueKind::Number(n) => *n != 0.0,
            ValueKind::Str(s) => !s.is_empty(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Number(_) => "number",
            ValueKind::Str(_) => "string",
            ValueKind::List(_) => "list",
            ValueKind::Function(_) => "function",
        }
    }

    /// New value produced by an operation on `self`; it inherits the
    /// receiver's scope association.
    fn derived(&self, kind: ValueKind) -> Value {
        Value {
            kind,
            span: None,
            scope: self.scope,
        }
    }

    fn bool_number(&self, condition: bool) -> Value {
        self.derived(ValueKind::Number(if condition { 1.0 } else { 0.0 }))
    }

    /// The uniform outcome for every operator/operand combination no variant
    /// supports, positioned at the receiver's own span.
    fn illegal_operation(&self) -> PseudoError {
        PseudoError::runtime(
            self.span.unwrap_or_default(),
            "Illegal operation".to_string(),
            self.scope,
        )
    }

    fn runtime_error(&self, span: Option<Span>, details: String) -> PseudoError {
        PseudoError::runtime(span.unwrap_or_default(), details, self.scope)
    }

    /// Validate an index operand for element removal/reads: an integer in
    /// `[-len, len)`, with negative indices counting from the back.
    fn list_index(&self, index: f64, len: usize, operand: &Value) -> Result<usize, PseudoError> {
        if index.fract() != 0.0 {
            return Err(self.runtime_error(
                operand.span,
                "right operand should be an integer".to_string(),
            ));
        }
        let index = index as i64;
        let len = len as i64;
        if index < -len || index >= len {
            return Err(self.runtime_error(operand.span, "index out of bounds".to_string()));
        }
        Ok(if index < 0 { (index + len) as usize } else { index as usize })
    }

    pub fn add(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(self.derived(ValueKind::Number(l + r)))
            }
            (ValueKind::Str(l), ValueKind::Str(r)) => {
                Ok(self.derived(ValueKind::Str(format!("{l}{r}"))))
            }
            (ValueKind::List(items), _) => {
                let mut items = items.clone();
                items.push(other.clone());
                Ok(self.derived(ValueKind::List(items)))
            }
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn sub(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(self.derived(ValueKind::Number(l - r)))
            }
            (ValueKind::List(items), ValueKind::Number(index)) => {
                let at = self.list_index(*index, items.len(), other)?;
                let mut items = items.clone();
                items.remove(at);
                Ok(self.derived(ValueKind::List(items)))
            }
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn mul(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(self.derived(ValueKind::Number(l * r)))
            }
            (ValueKind::Str(s), ValueKind::Number(count)) => {
                if *count < 0.0 {
                    return Err(self.runtime_error(
                        other.span,
                        "Multiplied string by negative value".to_string(),
                    ));
                }
                Ok(self.derived(ValueKind::Str(s.repeat(*count as usize))))
            }
            (ValueKind::List(l), ValueKind::List(r)) => {
                let mut items = l.clone();
                items.extend(r.iter().cloned());
                Ok(self.derived(ValueKind::List(items)))
            }
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn div(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => {
                if *r == 0.0 {
                    return Err(
                        self.runtime_error(other.span, "Division by zero".to_string())
                    );
                }
                Ok(self.derived(ValueKind::Number(l / r)))
            }
            _ => Err(self.illegal_operation()),
        }
    }

    /// Exponentiation for numbers; an indexed element read for lists. The
    /// element comes back as itself, its own span and scope untouched.
    pub fn pow(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(self.derived(ValueKind::Number(l.powf(*r))))
            }
            (ValueKind::List(items), ValueKind::Number(index)) => {
                let at = self.list_index(*index, items.len(), other)?;
                Ok(items[at].clone())
            }
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn equals(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => Ok(self.bool_number(l == r)),
            _ => Err(self.illegal_operation()),
        }
    }

    /// Ordering for numbers; element insertion for lists, where the right
    /// operand is a two-element `[index, value]` list.
    pub fn less_than(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => Ok(self.bool_number(l < r)),
            (ValueKind::List(items), ValueKind::List(pair)) => {
                self.insert_element(items, pair, other)
            }
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn greater_than(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => Ok(self.bool_number(l > r)),
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn less_than_or_equal(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => Ok(self.bool_number(l <= r)),
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn greater_than_or_equal(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => Ok(self.bool_number(l >= r)),
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn and(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(self.bool_number(*l != 0.0 && *r != 0.0))
            }
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn or(&self, other: &Value) -> Result<Value, PseudoError> {
        match (&self.kind, &other.kind) {
            (ValueKind::Number(l), ValueKind::Number(r)) => {
                Ok(self.bool_number(*l != 0.0 || *r != 0.0))
            }
            _ => Err(self.illegal_operation()),
        }
    }

    pub fn not(&self) -> Result<Value, PseudoError> {
        match &self.kind {
            ValueKind::Number(v) => Ok(self.bool_number(*v == 0.0)),
            _ => Err(self.illegal_operation()),
        }
    }

    fn insert_element(
        &self,
        items: &[Value],
        pair: &[Value],
        operand: &Value,
    ) -> Result<Value, PseudoError> {
        if pair.len() != 2 {
            return Err(self.runtime_error(
                operand.span,
                "list on the right should be of size 2 where index 0 is the position and 1 is the element"
                    .to_string(),
            ));
        }

        let index = match &pair[0].kind {
            ValueKind::Number(n) if n.fract() == 0.0 => *n as i64,
            _ => {
                return Err(self.runtime_error(
                    operand.span,
                    "element at index 0 of list on the right should be an integer".to_string(),
                ));
            }
        };

        // Insertion bounds include the append position at `len`
        let len = items.len() as i64;
        if index < -len || index > len {
            return Err(self.runtime_error(operand.span, "index out of bounds".to_string()));
        }
        let at = if index < 0 { (index + len) as usize } else { index as usize };

        let mut items = items.to_vec();
        items.insert(at, pair[1].clone());
        Ok(self.derived(ValueKind::List(items)))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ValueKind::Number(n) => write!(f, "{}", n),
            ValueKind::Str(s) => write!(f, "{}", s),
            ValueKind::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ValueKind::Function(function) => write!(f, "<function {}>", function.name),
        }
    }
}

/// A user function: parameter names, a body to evaluate on call, and the
/// frame it was defined in.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Box<Node>,
    /// Definition-time frame; calls chain both parent links to it.
    pub scope: ScopeId,
    /// Definition span, used for arity errors and as the call entry point.
    pub span: Span,
}

impl Function {
    pub fn new(
        name: Option<String>,
        params: Vec<String>,
        body: Node,
        scope: ScopeId,
        span: Span,
    ) -> Self {
        Self {
            name: name.unwrap_or_else(|| "<anonymous>".to_string()),
            params,
            body: Box::new(body),
            scope,
            span,
        }
    }

    /// Call the function with exactly one argument per parameter, evaluating
    /// the body in a fresh frame chained to the definition frame.
    pub fn execute(
        &self,
        args: Vec<Value>,
        interpreter: &mut Interpreter,
    ) -> Result<Option<Value>, PseudoError> {
        if args.len() != self.params.len() {
            return Err(PseudoError::runtime(
                self.span,
                format!(
                    "{} arguments were passed into {}. Expected {}",
                    args.len(),
                    self.name,
                    self.params.len()
                ),
                Some(self.scope),
            ));
        }

        let frame = interpreter.frames_mut().push(
            &self.name,
            Some(self.scope),
            Some(self.span.start),
            Some(self.scope),
        );
        for (param, mut arg) in self.params.iter().zip(args) {
            arg.scope = Some(frame);
            interpreter.frames_mut().bind(frame, param, arg);
        }

        interpreter.visit(&self.body, frame)?;
        interpreter.frames_mut().release(frame);

        // Until return statements are wired into the dispatcher, a call that
        // runs to completion yields no value.
        Ok(None)
    }
}
