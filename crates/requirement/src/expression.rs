//! Infix → postfix conversion and stack evaluation of `&&` / `||` expressions.
//!
//! `&&` and `||` have **equal precedence** and associate left, so
//! `"A || B && C"` is `(A || B) && C`. Parentheses group. Every operand is
//! handed to a caller-supplied leaf compiler, which lets the same evaluator
//! serve any grammar.

use crate::{CompileError, Requirement};

/// Combinator token for AND.
pub const AND: &str = "&&";

/// Combinator token for OR.
pub const OR: &str = "||";

/// A lexical token of a combinator expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// Anything between operators and parentheses, trimmed.
    Operand(&'a str),
    And,
    Or,
    Open,
    Close,
}

/// Whether `text` needs the combinator path.
pub fn is_compound(text: &str) -> bool {
    text.contains(AND) || text.contains(OR)
}

/// Splits `text` into operands, operators and parentheses.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        let (token, width) = if rest.starts_with(AND) {
            (Token::And, AND.len())
        } else if rest.starts_with(OR) {
            (Token::Or, OR.len())
        } else if rest.starts_with('(') {
            (Token::Open, 1)
        } else if rest.starts_with(')') {
            (Token::Close, 1)
        } else {
            // Advance by a whole character to stay on a UTF-8 boundary.
            i += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        };

        push_operand(&mut tokens, &text[start..i]);
        tokens.push(token);
        i += width;
        start = i;
    }
    push_operand(&mut tokens, &text[start..]);

    tokens
}

fn push_operand<'a>(tokens: &mut Vec<Token<'a>>, raw: &'a str) {
    let operand = raw.trim();
    if !operand.is_empty() {
        tokens.push(Token::Operand(operand));
    }
}

/// Reorders tokens into postfix (shunting-yard).
///
/// # Errors
///
/// `Malformed` on unbalanced parentheses.
pub fn to_postfix<'a>(
    tokens: &[Token<'a>],
    expression: &str,
) -> Result<Vec<Token<'a>>, CompileError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token<'a>> = Vec::new();

    for &token in tokens {
        match token {
            Token::Operand(_) => output.push(token),
            Token::Open => operators.push(token),
            Token::Close => loop {
                match operators.pop() {
                    Some(Token::Open) => break,
                    Some(op) => output.push(op),
                    None => return Err(CompileError::malformed(expression, "unmatched `)`")),
                }
            },
            Token::And | Token::Or => {
                while let Some(&top) = operators.last() {
                    if top == Token::Open {
                        break;
                    }
                    output.push(top);
                    operators.pop();
                }
                operators.push(token);
            }
        }
    }

    while let Some(op) = operators.pop() {
        if op == Token::Open {
            return Err(CompileError::malformed(expression, "unmatched `(`"));
        }
        output.push(op);
    }

    Ok(output)
}

/// Evaluates a postfix token stream on an explicit requirement stack.
///
/// Each operand is compiled with `leaf` and pushed; each operator pops two
/// requirements and pushes their combination.
///
/// # Errors
///
/// Whatever `leaf` returns, or `Malformed` if an operator lacks operands or the
/// stack does not end with exactly one requirement.
pub fn evaluate_postfix<E, F>(
    postfix: &[Token<'_>],
    expression: &str,
    mut leaf: F,
) -> Result<Requirement, E>
where
    E: From<CompileError>,
    F: FnMut(&str) -> Result<Requirement, E>,
{
    let mut stack: Vec<Requirement> = Vec::with_capacity(postfix.len());

    for token in postfix {
        match *token {
            Token::Operand(text) => stack.push(leaf(text)?),
            Token::And | Token::Or => {
                let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                    return Err(CompileError::malformed(expression, "operator without operands").into());
                };
                stack.push(if *token == Token::And {
                    lhs.and(&rhs)
                } else {
                    lhs.or(&rhs)
                });
            }
            Token::Open | Token::Close => {
                return Err(CompileError::malformed(expression, "parenthesis in postfix").into());
            }
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(requirement), true) => Ok(requirement),
        (None, _) => Err(CompileError::malformed(expression, "empty expression").into()),
        (Some(_), false) => Err(CompileError::malformed(expression, "missing operator").into()),
    }
}

/// Tokenizes, converts and evaluates `text` in one go.
pub fn compile_compound<E, F>(text: &str, leaf: F) -> Result<Requirement, E>
where
    E: From<CompileError>,
    F: FnMut(&str) -> Result<Requirement, E>,
{
    let tokens = tokenize(text);
    let postfix = to_postfix(&tokens, text)?;
    evaluate_postfix(&postfix, text, leaf)
}
