//! Inline expressions used to list actual data nodes compactly.
//!
//! `ds${0..1}.t_order_${0..2}` expands to the cartesian product of its groups,
//! left to right: `ds0.t_order_0, ds0.t_order_1, ..., ds1.t_order_2`.
//! Groups are ranges (`${0..3}`), lists (`${['a', 'b']}`) or single values (`${x}`).
//! `$->{...}` is accepted as an alternative spelling of `${...}`.
//! Top-level commas separate independent expressions.

use super::error::Error;

/// Most values a single group may produce.
pub const MAX_GROUP_VALUES: usize = 10_000;

/// Most values a whole expression may expand to.
pub const MAX_VALUES: usize = 100_000;

#[derive(Debug)]
enum Part {
    Literal(String),
    Choice(Vec<String>),
}

/// Expand an inline expression into every value it describes.
pub fn expand(expression: &str) -> Result<Vec<String>, Error> {
    let mut values = vec![];

    for segment in split_top_level(expression)? {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(Error::inline(expression, "empty segment"));
        }

        let mut expanded = vec![String::new()];
        for part in parts(segment, expression)? {
            expanded = match part {
                Part::Literal(literal) => expanded
                    .into_iter()
                    .map(|mut prefix| {
                        prefix.push_str(&literal);
                        prefix
                    })
                    .collect(),
                Part::Choice(choices) => {
                    let total = expanded
                        .len()
                        .checked_mul(choices.len())
                        .and_then(|count| count.checked_add(values.len()))
                        .filter(|&count| count <= MAX_VALUES);
                    if total.is_none() {
                        return Err(Error::inline(
                            expression,
                            format!("expands to more than {} values", MAX_VALUES),
                        ));
                    }

                    expanded
                        .iter()
                        .flat_map(|prefix| {
                            choices.iter().map(move |choice| format!("{prefix}{choice}"))
                        })
                        .collect()
                }
            };
        }

        values.extend(expanded);
    }

    Ok(values)
}

/// Split on commas that aren't inside a `{...}` group.
fn split_top_level(expression: &str) -> Result<Vec<&str>, Error> {
    let mut segments = vec![];
    let mut depth = 0usize;
    let mut start = 0;

    for (pos, c) in expression.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::inline(expression, "unbalanced \"}\""))?
            }
            ',' if depth == 0 => {
                segments.push(&expression[start..pos]);
                start = pos + 1;
            }
            _ => (),
        }
    }

    if depth != 0 {
        return Err(Error::inline(expression, "unclosed \"{\""));
    }

    segments.push(&expression[start..]);
    Ok(segments)
}

/// Find the next group opener, returning its position and length.
fn find_open(s: &str) -> Option<(usize, usize)> {
    let plain = s.find("${").map(|pos| (pos, 2));
    let arrow = s.find("$->{").map(|pos| (pos, 4));

    match (plain, arrow) {
        (Some(plain), Some(arrow)) => Some(if plain.0 < arrow.0 { plain } else { arrow }),
        (plain, arrow) => plain.or(arrow),
    }
}

fn parts(segment: &str, expression: &str) -> Result<Vec<Part>, Error> {
    let mut parts = vec![];
    let mut rest = segment;

    while let Some((start, len)) = find_open(rest) {
        if start > 0 {
            parts.push(Part::Literal(rest[..start].to_owned()));
        }

        let body_start = start + len;
        let end = rest[body_start..]
            .find('}')
            .map(|end| end + body_start)
            .ok_or_else(|| Error::inline(expression, "unclosed group"))?;

        parts.push(Part::Choice(choices(&rest[body_start..end], expression)?));
        rest = &rest[end + 1..];
    }

    if !rest.is_empty() {
        parts.push(Part::Literal(rest.to_owned()));
    }

    Ok(parts)
}

fn choices(body: &str, expression: &str) -> Result<Vec<String>, Error> {
    let body = body.trim();

    if let Some(list) = body.strip_prefix('[').and_then(|b| b.strip_suffix(']')) {
        let values = list
            .split(',')
            .map(|value| unquote(value.trim()).to_owned())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>();

        if values.is_empty() {
            return Err(Error::inline(expression, "empty list"));
        }

        if values.len() > MAX_GROUP_VALUES {
            return Err(too_many(expression));
        }

        return Ok(values);
    }

    if let Some((start, end)) = body.split_once("..") {
        let start: i64 = start
            .trim()
            .parse()
            .map_err(|_| Error::inline(expression, format!("bad range start \"{}\"", start)))?;
        let end: i64 = end
            .trim()
            .parse()
            .map_err(|_| Error::inline(expression, format!("bad range end \"{}\"", end)))?;

        if start > end {
            return Err(Error::inline(
                expression,
                format!("range {}..{} is empty", start, end),
            ));
        }

        if (end as i128 - start as i128) >= MAX_GROUP_VALUES as i128 {
            return Err(too_many(expression));
        }

        return Ok((start..=end).map(|n| n.to_string()).collect());
    }

    let value = unquote(body);
    if value.is_empty() {
        Err(Error::inline(expression, "empty group"))
    } else {
        Ok(vec![value.to_owned()])
    }
}

fn too_many(expression: &str) -> Error {
    Error::inline(
        expression,
        format!("group has more than {} values", MAX_GROUP_VALUES),
    )
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }

    value
}
