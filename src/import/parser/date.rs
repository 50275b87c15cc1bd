use std::{ops::Range, str::FromStr};

use chrono::NaiveDate;
use chumsky::{
    error::Simple,
    prelude::{just, one_of},
    Parser as _,
};

/// Matches an ISO date like `2025-12-14`.
pub fn date() -> impl chumsky::Parser<char, NaiveDate, Error = Simple<char>> {
    let digit = || one_of("0123456789");
    let separator = just('-');
    let year = digit().repeated().exactly(4).try_map(parse_number::<i32>);
    let month_or_day = || digit().repeated().exactly(2).try_map(parse_number::<u32>);
    year.then_ignore(separator)
        .then(month_or_day())
        .then_ignore(separator)
        .then(month_or_day())
        .try_map(|((year, month), day), span| {
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| Simple::custom(span, "Invalid date"))
        })
        .labelled("date")
}

fn parse_number<N: FromStr>(content: Vec<char>, span: Range<usize>) -> Result<N, Simple<char>> {
    content
        .into_iter()
        .collect::<String>()
        .parse()
        .map_err(|_err| Simple::custom(span, "Failed to parse number"))
}
