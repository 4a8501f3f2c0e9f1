//! Combinator parser for DHDL source text. Builds the AST in `crate::ast`
//! directly off the input; source positions come from `nom_locate` rather
//! than a separate re-scan, so every statement's `Span` falls out of parsing
//! for free.

use crate::ast::{Assignment, BusSwitch, Expr, Invocation, Program, SliceDefinition, Statement, SyncMode};
use crate::error::CompileError;
use crate::span::Span;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{map, opt, recognize, verify};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;
use nom_locate::LocatedSpan;

/// Parser input: source text plus the line/column `nom_locate` tracks as it advances.
type Input<'a> = LocatedSpan<&'a str>;
type PResult<'a, O> = IResult<Input<'a>, O>;

/// The diagnostic `Span` for the current input position.
fn loc(i: Input) -> Span {
    Span::from_located(i)
}

/// The matched text, as a plain `&str` borrowed from the original source.
fn frag<'a>(i: Input<'a>) -> &'a str {
    *i.fragment()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_ident_cont(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_bus_cont(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Runs `inner` after discarding any leading whitespace.
fn tok<'a, O>(mut inner: impl FnMut(Input<'a>) -> PResult<'a, O>) -> impl FnMut(Input<'a>) -> PResult<'a, O> {
    move |input: Input<'a>| preceded(multispace0, |i| inner(i))(input)
}

fn ident(input: Input) -> PResult<&str> {
    tok(map(
        recognize(pair(take_while1(is_ident_start), take_while(is_ident_cont))),
        frag,
    ))(input)
}

fn bus_name(input: Input) -> PResult<&str> {
    tok(map(
        recognize(pair(take_while1(is_ident_start), take_while(is_bus_cont))),
        frag,
    ))(input)
}

/// Matches a whole keyword (not a prefix of a longer identifier).
fn keyword<'a>(word: &'static str) -> impl FnMut(Input<'a>) -> PResult<'a, &'a str> {
    move |input: Input<'a>| {
        tok(verify(
            map(recognize(pair(take_while1(is_ident_start), take_while(is_ident_cont))), frag),
            move |matched: &&str| *matched == word,
        ))(input)
    }
}

fn symbol<'a>(sym: &'static str) -> impl FnMut(Input<'a>) -> PResult<'a, Input<'a>> {
    move |input: Input<'a>| tok(tag(sym))(input)
}

fn bus_ref(input: Input) -> PResult<Expr> {
    map(bus_name, |name: &str| Expr::Bus(name.to_string()))(input)
}

fn literal(input: Input) -> PResult<Expr> {
    alt((
        map(tok(char('0')), |_| Expr::Literal(false)),
        map(tok(char('1')), |_| Expr::Literal(true)),
    ))(input)
}

fn atom(input: Input) -> PResult<Expr> {
    alt((
        literal,
        bus_ref,
        delimited(symbol("("), expr, symbol(")")),
    ))(input)
}

fn unary(input: Input) -> PResult<Expr> {
    map(pair(opt(symbol("!")), atom), |(bang, inner)| {
        if bang.is_some() {
            Expr::Not(Box::new(inner))
        } else {
            inner
        }
    })(input)
}

fn or_expr(input: Input) -> PResult<Expr> {
    map(separated_list1(symbol("|"), unary), |mut terms| {
        if terms.len() == 1 {
            terms.pop().unwrap()
        } else {
            Expr::Or(terms)
        }
    })(input)
}

fn xor_expr(input: Input) -> PResult<Expr> {
    map(separated_list1(symbol("^"), or_expr), |mut terms| {
        if terms.len() == 1 {
            terms.pop().unwrap()
        } else {
            Expr::Xor(terms)
        }
    })(input)
}

fn and_expr(input: Input) -> PResult<Expr> {
    map(separated_list1(symbol("&"), xor_expr), |mut terms| {
        if terms.len() == 1 {
            terms.pop().unwrap()
        } else {
            Expr::And(terms)
        }
    })(input)
}

/// `expr := and_expr` — AND binds loosest, NOT binds tightest.
fn expr(input: Input) -> PResult<Expr> {
    and_expr(input)
}

fn sync_mode(input: Input) -> PResult<SyncMode> {
    map(
        opt(alt((
            map(keyword("sync"), |_| SyncMode::Sync),
            map(keyword("async"), |_| SyncMode::Async),
        ))),
        |m| m.unwrap_or(SyncMode::Async),
    )(input)
}

fn assignment(input: Input) -> PResult<Statement> {
    let start = loc(input);
    let (input, e) = expr(input)?;
    let (input, mode) = sync_mode(input)?;
    let (input, outputs) = many1(preceded(symbol("->"), bus_name))(input)?;
    Ok((
        input,
        Statement::Assignment(Assignment {
            expr: e,
            mode,
            outputs: outputs.into_iter().map(str::to_string).collect(),
            span: start,
        }),
    ))
}

fn bus_switch(input: Input) -> PResult<Statement> {
    let start = loc(input);
    let (input, a) = bus_name(input)?;
    let (input, connected) = alt((
        map(symbol("<->"), |_| true),
        map(symbol("</>"), |_| false),
    ))(input)?;
    let (input, b) = bus_name(input)?;
    Ok((
        input,
        Statement::BusSwitch(BusSwitch {
            bus_a: a.to_string(),
            bus_b: b.to_string(),
            connected,
            span: start,
        }),
    ))
}

fn statement(input: Input) -> PResult<Statement> {
    alt((assignment, bus_switch))(input)
}

fn slice_def(input: Input) -> PResult<SliceDefinition> {
    let (input, _) = keyword("slice")(input)?;
    let (input, name) = ident(input)?;
    let (input, _) = symbol("{")(input)?;
    let (input, statements) = many0(terminated(opt(statement), symbol(";")))(input)?;
    let (input, _) = symbol("}")(input)?;
    Ok((
        input,
        SliceDefinition {
            name: name.to_string(),
            statements: statements.into_iter().flatten().collect(),
        },
    ))
}

fn invoc_row(input: Input) -> PResult<Vec<String>> {
    map(many1(ident), |names| names.into_iter().map(str::to_string).collect())(input)
}

fn invocation(input: Input) -> PResult<Invocation> {
    map(separated_list1(symbol(","), invoc_row), |rows| Invocation { rows })(input)
}

fn program(input: Input) -> PResult<Program> {
    let (input, slices) = many0(slice_def)(input)?;
    let (input, invocation) = invocation(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, Program { slices, invocation }))
}

/// Parses a complete DHDL source file into a `Program`.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    let input = Input::new(source);
    match program(input) {
        Ok((rest, prog)) => {
            let remaining = frag(rest);
            if remaining.trim().is_empty() {
                Ok(prog)
            } else {
                Err(CompileError::parse(
                    loc(rest),
                    format!("unexpected trailing input: {:?}", &remaining[..remaining.len().min(20)]),
                ))
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(CompileError::parse(loc(e.input), "malformed source"))
        }
        Err(nom::Err::Incomplete(_)) => Err(CompileError::parse(
            Span::new(1, 1),
            "unexpected end of input",
        )),
    }
}
