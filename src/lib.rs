#![allow(clippy::module_inception)]

use crate::errors::errors::Error;

pub mod ast;
pub mod cli;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod scoper;

/// A point in the source file. Lines and columns are both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Returns the text of the given 1-based source line, without its newline.
pub fn get_source_line(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source
        .split('\n')
        .nth(line as usize - 1)
        .map(|text| text.trim_end_matches('\r'))
}

pub fn display_error(error: &Error, filename: &str, source: &str) {
    /*
        Error: Redeclaration (redeclaration of "x")
        -> test.mc:3:5
           |
         3 | int x = 2;
           | ----^
    */

    let prefix = if error.is_internal() {
        "Compiler bug"
    } else {
        "Error"
    };

    println!("{}: {} ({})", prefix, error.get_error_name(), error);

    let position = match error.get_position() {
        Some(position) => position,
        None => {
            println!("-> {}", filename);
            return;
        }
    };

    let line_text = match get_source_line(source, position.line) {
        Some(line_text) => line_text,
        None => {
            println!("-> {}", filename);
            return;
        }
    };

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    println!("-> {}:{}:{}", filename, position.line, position.column);
    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = (position.column as usize)
        .saturating_sub(removed_whitespace)
        .max(1);

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_source_line() {
        let source = "int x = 1;\nint y = 2;\n\nint z = 3;\n";
        assert_eq!(super::get_source_line(source, 1), Some("int x = 1;"));
        assert_eq!(super::get_source_line(source, 2), Some("int y = 2;"));
        assert_eq!(super::get_source_line(source, 3), Some(""));
        assert_eq!(super::get_source_line(source, 4), Some("int z = 3;"));
        assert_eq!(super::get_source_line(source, 0), None);
        assert_eq!(super::get_source_line(source, 40), None);
    }

    #[test]
    fn test_remove_starting_whitespace() {
        let (text, removed) = super::remove_starting_whitespace("    int x = 1;");
        assert_eq!(text, "int x = 1;");
        assert_eq!(removed, 4);

        let (text, removed) = super::remove_starting_whitespace("int x = 1;");
        assert_eq!(text, "int x = 1;");
        assert_eq!(removed, 0);
    }
}
