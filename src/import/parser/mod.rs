use chumsky::{error::Simple, prelude::end, Parser as _};

mod amount;
mod date;
#[cfg(test)]
mod testutils;

pub use amount::amount;
pub use date::date;

/// Run a parser over the full content of a CSV cell. Trailing content is an error.
pub fn parse_cell<T>(
    parser: impl chumsky::Parser<char, T, Error = Simple<char>>,
    content: &str,
) -> Result<T, Vec<Simple<char>>> {
    parser.then_ignore(end()).parse(content)
}
