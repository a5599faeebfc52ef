use std::{fs::read_to_string, process};

use clap::Parser;

use minic::{
    ast::ast::Ast,
    cli::cli::{Cli, DumpFormat, OutputLevel},
    display_error,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    scoper::scoper::check_scopes,
};

fn main() {
    let cli = Cli::parse();
    let output = cli.output_level();

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            if output < OutputLevel::Silent {
                eprintln!("Failed to read {}: {}", cli.file.display(), error);
            }
            process::exit(1);
        }
    };

    let filename = cli.file.display().to_string();

    match run(&source, output) {
        Ok(ast) => {
            if let Some(DumpFormat::Graphviz) = cli.dump {
                println!("{}", ast.to_graphviz());
            }
            if output <= OutputLevel::Verbose {
                println!("Front end finished: {} nodes.", ast.len());
            }
        }
        Err(error) => {
            if output < OutputLevel::Silent {
                display_error(&error, &filename, &source);
            }
            process::exit(1);
        }
    }
}

fn run(source: &str, output: OutputLevel) -> Result<Ast, Error> {
    let tokens = tokenize(source)?;

    if output <= OutputLevel::Debug {
        for token in &tokens {
            token.debug();
        }
        println!("Total tokens: {}", tokens.len());
    }

    let mut ast = parse(tokens, output)?;
    check_scopes(&mut ast, output)?;
    Ok(ast)
}
