use chumsky::{error::Simple, prelude::one_of, Parser as _};
use rust_decimal::Decimal;

/// Matches the magnitude of a ZenMoney amount.
///
/// Both `.` and `,` work as decimal separator, and a space, no-break space or apostrophe
/// as thousands separator, so `1 250,50` and `1250.50` are the same amount. A leading sign
/// is accepted and dropped. The scale of the input is kept: `1250.00` has two fractional digits.
pub fn amount() -> impl chumsky::Parser<char, Decimal, Error = Simple<char>> {
    let digit = || one_of("0123456789");
    let sign = one_of("+-").or_not();
    let thousands_group = one_of(" \u{a0}'").ignore_then(digit().repeated().exactly(3));
    let integer_part = digit()
        .repeated()
        .at_least(1)
        .then(thousands_group.repeated())
        .map(|(mut digits, groups)| {
            digits.extend(groups.into_iter().flatten());
            digits
        });
    let fractional_part = one_of(".,")
        .ignore_then(digit().repeated().at_least(1))
        .or_not();
    sign.ignore_then(integer_part)
        .then(fractional_part)
        .try_map(|(integer_part, fractional_part), span| {
            let mut number: String = integer_part.into_iter().collect();
            if let Some(fractional_part) = fractional_part {
                number.push('.');
                number.extend(fractional_part);
            }
            Decimal::from_str_exact(&number).map_err(|_| Simple::custom(span, "Amount out of range"))
        })
        .labelled("amount")
}
