use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::scope::Frames;

/// Run a script source, printing the result or a rendered diagnostic.
pub fn run(source: &str, filename: Option<&str>) {
    // Lexical analysis
    let mut lexer = Lexer::new(source);
    let tokens = match lexer.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, filename, &Frames::new());
            return;
        }
    };

    // Parsing
    let mut parser = Parser::new(tokens);
    let root = match parser.parse() {
        Ok(root) => root,
        Err(error) => {
            error.report(source, filename, &Frames::new());
            return;
        }
    };

    // Evaluation
    let mut interpreter = Interpreter::new();
    let globals = interpreter.globals();
    match interpreter.visit(&root, globals) {
        Ok(value) => println!("{}", value),
        Err(error) => error.report(source, filename, interpreter.frames()),
    }
}
