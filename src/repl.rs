use crate::ast::Node;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::scope::Frames;
use std::io::{self, Write};

/// Interactive prompt. One interpreter lives for the whole session, so
/// bindings persist between lines.
pub fn start() {
    println!("Pseudo Interpreter v0.1.0");
    println!("Type 'exit' or press Ctrl+C to quit");
    println!();

    let mut interpreter = Interpreter::new();

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }

                run_line(line, &mut interpreter);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_line(source: &str, interpreter: &mut Interpreter) {
    let mut lexer = Lexer::new(source);
    let tokens = match lexer.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, None, &Frames::new());
            return;
        }
    };

    let mut parser = Parser::new(tokens);
    let root = match parser.parse() {
        Ok(root) => root,
        Err(error) => {
            error.report(source, None, &Frames::new());
            return;
        }
    };

    // Don't echo the value of a bare assignment
    let echo = !matches!(root, Node::VarAssign { .. });

    let globals = interpreter.globals();
    match interpreter.visit(&root, globals) {
        Ok(value) => {
            if echo {
                println!("{}", value);
            }
        }
        Err(error) => error.report(source, None, interpreter.frames()),
    }
}
