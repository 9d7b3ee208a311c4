//! Backtracking parser combinators.
//!
//! A parser either produces a value, leaving the stream advanced past what it
//! consumed, or returns `None` with the stream back where it started. Every
//! combinator here takes a [`Checkpoint`] before running its sub-parsers and
//! rewinds to it on failure, so a failed branch never leaks consumption into
//! the next one.

use crate::cursor::{Checkpoint, TokenStream};

pub trait Parser<S: ?Sized, O> {
    fn parse(&self, stream: &mut S) -> Option<O>;
}

impl<S: ?Sized, O, F> Parser<S, O> for F
where
    F: Fn(&mut S) -> Option<O>,
{
    fn parse(&self, stream: &mut S) -> Option<O> {
        self(stream)
    }
}

fn fail<S: TokenStream, O>(stream: &mut S, checkpoint: Checkpoint) -> Option<O> {
    let rewound = stream.rewind_to(checkpoint);
    debug_assert!(rewound, "checkpoint is ahead of the stream");
    None
}

/// Runs every parser in order and collects their results.
pub fn sequence<S, O, P>(parsers: Vec<P>) -> impl Parser<S, Vec<O>>
where
    S: TokenStream,
    P: Parser<S, O>,
{
    move |stream: &mut S| -> Option<Vec<O>> {
        let start = stream.mark();
        let mut results = Vec::with_capacity(parsers.len());
        for parser in &parsers {
            match parser.parse(stream) {
                Some(result) => results.push(result),
                None => return fail(stream, start),
            }
        }
        Some(results)
    }
}

/// Two parsers of different output types in sequence.
pub fn pair<S, A, B, P, Q>(first: P, second: Q) -> impl Parser<S, (A, B)>
where
    S: TokenStream,
    P: Parser<S, A>,
    Q: Parser<S, B>,
{
    move |stream: &mut S| -> Option<(A, B)> {
        let start = stream.mark();
        let Some(a) = first.parse(stream) else {
            return fail(stream, start);
        };
        let Some(b) = second.parse(stream) else {
            return fail(stream, start);
        };
        Some((a, b))
    }
}

/// Ordered choice: the first alternative that succeeds wins.
pub fn alternative<S, O, P>(parsers: Vec<P>) -> impl Parser<S, O>
where
    S: TokenStream,
    P: Parser<S, O>,
{
    move |stream: &mut S| -> Option<O> {
        let start = stream.mark();
        for parser in &parsers {
            if let Some(result) = parser.parse(stream) {
                return Some(result);
            }
            if !stream.rewind_to(start) {
                return None;
            }
        }
        None
    }
}

/// Zero or more repetitions. Only fails if a failed attempt cannot be undone.
pub fn many<S, O, P>(parser: P) -> impl Parser<S, Vec<O>>
where
    S: TokenStream,
    P: Parser<S, O>,
{
    move |stream: &mut S| -> Option<Vec<O>> {
        let mut results = Vec::new();
        loop {
            let checkpoint = stream.mark();
            let Some(result) = parser.parse(stream) else {
                if !stream.rewind_to(checkpoint) {
                    return None;
                }
                return Some(results);
            };
            results.push(result);
            // A parser that succeeds without consuming would repeat forever.
            if stream.mark() == checkpoint {
                return Some(results);
            }
        }
    }
}

pub fn many1<S, O, P>(parser: P) -> impl Parser<S, Vec<O>>
where
    S: TokenStream,
    P: Parser<S, O> + Clone,
{
    let repeated = pair::<S, _, _, _, _>(parser.clone(), many::<S, _, _>(parser));
    map::<S, _, _, _, _>(repeated, |(first, rest): (O, Vec<O>)| {
        let mut results = Vec::with_capacity(rest.len() + 1);
        results.push(first);
        results.extend(rest);
        results
    })
}

/// One or more `item`s separated by `separator`, keeping only the items.
///
/// An empty list is a failure: at least one item must parse.
pub fn sep_by<S, X, O, Sep, P>(separator: Sep, item: P) -> impl Parser<S, Vec<O>>
where
    S: TokenStream,
    Sep: Parser<S, X>,
    P: Parser<S, O>,
{
    move |stream: &mut S| -> Option<Vec<O>> {
        let start = stream.mark();
        let Some(first) = item.parse(stream) else {
            return fail(stream, start);
        };
        let mut items = vec![first];
        loop {
            let checkpoint = stream.mark();
            let next = separator
                .parse(stream)
                .and_then(|_| item.parse(stream));
            match next {
                Some(next) => items.push(next),
                None => {
                    if !stream.rewind_to(checkpoint) {
                        return None;
                    }
                    return Some(items);
                }
            }
        }
    }
}

pub fn map<S, A, B, P, F>(parser: P, f: F) -> impl Parser<S, B>
where
    S: TokenStream,
    P: Parser<S, A>,
    F: Fn(A) -> B,
{
    move |stream: &mut S| -> Option<B> { parser.parse(stream).map(&f) }
}

pub fn eof<S: TokenStream>(stream: &mut S) -> Option<()> {
    if stream.has_next() {
        None
    } else {
        Some(())
    }
}

/// Consumes the next token if `predicate` accepts it.
pub fn satisfy<S, F>(predicate: F) -> impl Parser<S, S::Item> + Clone
where
    S: TokenStream,
    F: Fn(&S::Item) -> bool + Clone,
{
    move |stream: &mut S| -> Option<S::Item> {
        let accepted = stream.peek().map_or(false, |token| predicate(token));
        if accepted {
            stream.pop()
        } else {
            None
        }
    }
}

/// Consumes the next token if it equals `expected`.
pub fn literal<S>(expected: S::Item) -> impl Parser<S, S::Item> + Clone
where
    S: TokenStream,
    S::Item: PartialEq,
{
    satisfy::<S, _>(move |token: &S::Item| *token == expected)
}
