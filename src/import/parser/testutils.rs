use chumsky::{
    error::Simple,
    prelude::{end, just},
    Parser as _,
};

#[track_caller]
pub fn test_parser<T>(
    input: &str,
    parser: impl chumsky::Parser<char, T, Error = Simple<char>>,
    expected: T,
    rest: &str,
) where
    T: std::fmt::Debug + Eq + PartialEq,
{
    let parser = parser.then_ignore(just(rest)).then_ignore(end());
    let parsed = parser.parse(input).unwrap();
    assert_eq!(expected, parsed);
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::import::parser::amount;

    #[test]
    fn success_without_rest() {
        test_parser("12.50", amount(), Decimal::new(1250, 2), "");
    }

    #[test]
    fn success_with_rest() {
        test_parser("12.50 PLN", amount(), Decimal::new(1250, 2), " PLN");
    }

    #[test]
    #[should_panic]
    fn parser_does_not_match() {
        test_parser("PLN", amount(), Decimal::new(1250, 2), "");
    }

    #[test]
    #[should_panic]
    fn expected_rest_but_has_no_rest() {
        test_parser("12.50", amount(), Decimal::new(1250, 2), " PLN");
    }

    #[test]
    #[should_panic]
    fn expected_no_rest_but_has_rest() {
        test_parser("12.50 PLN", amount(), Decimal::new(1250, 2), "");
    }
}
