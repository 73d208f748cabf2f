use crate::ast::{BinaryOp, Node, UnaryOp};
use crate::error::{PseudoError, Span};
use crate::lexer::{Token, TokenType};

/// Recursive-descent parser. Precedence is encoded in the rule ladder,
/// tightest binding first: atom, power, factor, term, expr.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

type ParseRule = fn(&mut Parser) -> Result<Node, PseudoError>;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parse one complete expression; anything left over is a syntax error.
    pub fn parse(&mut self) -> Result<Node, PseudoError> {
        let expr = self.expr()?;

        if self.peek().token_type != TokenType::Eof {
            return Err(PseudoError::invalid_syntax(
                self.peek().span,
                "Expected '+', '-', '*', '/' or '^'".to_string(),
            ));
        }

        Ok(expr)
    }

    fn expr(&mut self) -> Result<Node, PseudoError> {
        // Two-token lookahead: an identifier directly followed by '=' is an
        // assignment whose value is the whole expression after it.
        if self.peek().token_type == TokenType::Identifier
            && self.peek_next().token_type == TokenType::Equals
        {
            let name = self.advance().clone();
            self.advance(); // consume '='
            let value = self.expr()?;
            let span = Span::new(name.span.start, value.span().end);
            return Ok(Node::VarAssign {
                name: name.lexeme,
                value: Box::new(value),
                span,
            });
        }

        self.binary_operators(Self::term, &[TokenType::Plus, TokenType::Minus], Self::term)
    }

    fn term(&mut self) -> Result<Node, PseudoError> {
        self.binary_operators(
            Self::factor,
            &[TokenType::Multiply, TokenType::Divide],
            Self::factor,
        )
    }

    fn factor(&mut self) -> Result<Node, PseudoError> {
        match self.peek().token_type {
            // Prefix '+' changes nothing
            TokenType::Plus => {
                self.advance();
                self.factor()
            }
            TokenType::Minus => {
                let op = self.advance().clone();
                let operand = self.factor()?;
                let span = Span::new(op.span.start, operand.span().end);
                Ok(Node::Unary {
                    op: UnaryOp::Negate,
                    operand: Box::new(operand),
                    span,
                })
            }
            _ => self.power(),
        }
    }

    /// `^` binds right: the right operand goes back through `factor` so a
    /// sign may follow the operator.
    fn power(&mut self) -> Result<Node, PseudoError> {
        self.binary_operators(Self::atom, &[TokenType::Power], Self::factor)
    }

    fn atom(&mut self) -> Result<Node, PseudoError> {
        let token = self.peek().clone();

        match token.token_type {
            TokenType::Number => {
                self.advance();
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    PseudoError::invalid_syntax(token.span, "Invalid number".to_string())
                })?;
                Ok(Node::Number {
                    value,
                    span: token.span,
                })
            }
            TokenType::Identifier => {
                self.advance();
                Ok(Node::VarAccess {
                    name: token.lexeme,
                    span: token.span,
                })
            }
            TokenType::LeftParen => {
                self.advance();
                let expr = self.expr()?;
                if self.peek().token_type == TokenType::RightParen {
                    self.advance();
                    Ok(expr)
                } else {
                    Err(PseudoError::invalid_syntax(
                        self.peek().span,
                        "missing ')'".to_string(),
                    ))
                }
            }
            _ => Err(PseudoError::invalid_syntax(
                token.span,
                "Expected a number, identifier, '+', '-' or '('".to_string(),
            )),
        }
    }

    /// Left-fold a run of binary operators: one operand via `base`, then for
    /// every operator in `ops` another operand via `rhs`.
    fn binary_operators(
        &mut self,
        base: ParseRule,
        ops: &[TokenType],
        rhs: ParseRule,
    ) -> Result<Node, PseudoError> {
        let mut left = base(self)?;

        while ops.contains(&self.peek().token_type) {
            let op_token = self.advance().clone();
            let op = match op_token.token_type {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Subtract,
                TokenType::Multiply => BinaryOp::Multiply,
                TokenType::Divide => BinaryOp::Divide,
                TokenType::Power => BinaryOp::Power,
                _ => unreachable!(),
            };
            let right = rhs(self)?;
            let span = Span::new(left.span().start, right.span().end);
            left = Node::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + 1).min(last)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }
}
