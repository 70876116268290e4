//! Inline arithmetic: `2 * (3 + 4) =` followed by Tab appends ` 14`.
//!
//! The evaluator only knows numbers, the arithmetic operators, parentheses and
//! a fixed table of math functions and constants. Anything else is an error.

use std::f64::consts;

use super::error::EvalError;

/// The expression of a line that asks for evaluation: the trimmed line ends with
/// `=` and the text before the first `=` is not blank.
pub fn pending_expression(line: &str) -> Option<&str> {
    if !line.trim_end().ends_with('=') {
        return None;
    }
    let (expr, _) = line.split_once('=')?;
    let expr = expr.trim();
    (!expr.is_empty()).then_some(expr)
}

pub fn evaluate(expr: &str) -> Result<f64, EvalError> {
    let tokens = lex(expr)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if let Some(tok) = parser.peek() {
        return Err(EvalError::UnexpectedToken(tok.to_string()));
    }
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::Domain)
    }
}

/// Integral values print without a decimal point, everything else with four decimals.
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 {
        // `+ 0.0` folds negative zero into zero.
        format!("{:.0}", value + 0.0)
    } else {
        format!("{value:.4}")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Op(&'static str),
    LParen,
    RParen,
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Num(n) => write!(f, "{n}"),
            Token::Ident(name) => f.write_str(name),
            Token::Op(op) => f.write_str(op),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Comma => f.write_str(","),
        }
    }
}

fn lex(src: &str) -> Result<Vec<Token>, EvalError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                if i < chars.len() && matches!(chars[i], 'e' | 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && matches!(chars[j], '+' | '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| EvalError::UnexpectedToken(text.clone()))?;
                tokens.push(Token::Num(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Op("**"));
                i += 2;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                tokens.push(Token::Op("//"));
                i += 2;
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(Token::Op(match ch {
                    '+' => "+",
                    '-' => "-",
                    '*' => "*",
                    '/' => "/",
                    '%' => "%",
                    _ => "^",
                }));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            other => return Err(EvalError::UnexpectedChar(other)),
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat_op(&mut self, ops: &[&'static str]) -> Option<&'static str> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(op) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn expect(&mut self, want: Token) -> Result<(), EvalError> {
        match self.next() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(EvalError::UnexpectedToken(tok.to_string())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.term()?;
        while let Some(op) = self.eat_op(&["+", "-"]) {
            let rhs = self.term()?;
            acc = if op == "+" { acc + rhs } else { acc - rhs };
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<f64, EvalError> {
        let mut acc = self.unary()?;
        while let Some(op) = self.eat_op(&["*", "/", "//", "%"]) {
            let rhs = self.unary()?;
            acc = match op {
                "*" => acc * rhs,
                _ if rhs == 0.0 => return Err(EvalError::DivisionByZero),
                "/" => acc / rhs,
                "//" => (acc / rhs).floor(),
                _ => acc - rhs * (acc / rhs).floor(),
            };
        }
        Ok(acc)
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        match self.eat_op(&["+", "-"]) {
            Some("-") => Ok(-self.unary()?),
            Some(_) => self.unary(),
            None => self.power(),
        }
    }

    // Exponentiation binds tighter than a leading sign and is right-associative.
    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.atom()?;
        if self.eat_op(&["**", "^"]).is_some() {
            let exp = self.unary()?;
            return checked(base.powf(exp));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<f64, EvalError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let args = self.args()?;
                    call(&name, &args)
                } else {
                    constant(&name)
                }
            }
            Some(tok) => Err(EvalError::UnexpectedToken(tok.to_string())),
            None => Err(EvalError::UnexpectedEnd),
        }
    }

    fn args(&mut self) -> Result<Vec<f64>, EvalError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(tok) => return Err(EvalError::UnexpectedToken(tok.to_string())),
                None => return Err(EvalError::UnexpectedEnd),
            }
        }
    }
}

fn constant(name: &str) -> Result<f64, EvalError> {
    match name {
        "pi" => Ok(consts::PI),
        "e" => Ok(consts::E),
        "tau" => Ok(consts::TAU),
        "inf" => Ok(f64::INFINITY),
        _ => Err(EvalError::UnknownName(name.to_string())),
    }
}

fn checked(value: f64) -> Result<f64, EvalError> {
    if value.is_nan() {
        Err(EvalError::Domain)
    } else {
        Ok(value)
    }
}

fn arity(name: &str, expected: &'static str, got: usize) -> EvalError {
    EvalError::Arity {
        name: name.to_string(),
        expected,
        got,
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64, EvalError> {
    let one = |f: fn(f64) -> f64| match args {
        [x] => checked(f(*x)),
        _ => Err(arity(name, "1", args.len())),
    };
    let two = |f: fn(f64, f64) -> f64| match args {
        [x, y] => checked(f(*x, *y)),
        _ => Err(arity(name, "2", args.len())),
    };
    match name {
        "sqrt" => match args {
            [x] if *x < 0.0 => Err(EvalError::Domain),
            _ => one(f64::sqrt),
        },
        "exp" => one(f64::exp),
        "log" => match args {
            [x] if *x <= 0.0 => Err(EvalError::Domain),
            [x] => Ok(x.ln()),
            [x, base] if *x <= 0.0 || *base <= 0.0 || *base == 1.0 => Err(EvalError::Domain),
            [x, base] => Ok(x.ln() / base.ln()),
            _ => Err(arity(name, "1 or 2", args.len())),
        },
        "log10" | "log2" => match args {
            [x] if *x <= 0.0 => Err(EvalError::Domain),
            _ if name == "log10" => one(f64::log10),
            _ => one(f64::log2),
        },
        "sin" => one(f64::sin),
        "cos" => one(f64::cos),
        "tan" => one(f64::tan),
        "asin" => one(f64::asin),
        "acos" => one(f64::acos),
        "atan" => one(f64::atan),
        "atan2" => two(f64::atan2),
        "sinh" => one(f64::sinh),
        "cosh" => one(f64::cosh),
        "tanh" => one(f64::tanh),
        "floor" => one(f64::floor),
        "ceil" => one(f64::ceil),
        "trunc" => one(f64::trunc),
        "fabs" => one(f64::abs),
        "pow" => two(f64::powf),
        "hypot" => two(f64::hypot),
        "degrees" => one(f64::to_degrees),
        "radians" => one(f64::to_radians),
        "fmod" => match args {
            [_, y] if *y == 0.0 => Err(EvalError::Domain),
            _ => two(|x, y| x % y),
        },
        "factorial" => match args {
            [x] if *x < 0.0 || x.fract() != 0.0 || *x > 170.0 => Err(EvalError::Domain),
            [x] => Ok((1..=*x as u64).fold(1.0, |acc, k| acc * k as f64)),
            _ => Err(arity(name, "1", args.len())),
        },
        _ => Err(EvalError::UnknownName(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str) -> String {
        format_result(evaluate(src).unwrap())
    }

    #[test]
    fn large_integers_print_exactly() {
        assert_eq!(eval("2 ** 60"), "1152921504606846976");
        assert_eq!(eval("-(10 ** 16)"), "-10000000000000000");
        assert_eq!(eval("1 / 4"), "0.2500");
        assert_eq!(eval("0 * -1"), "0");
    }

    #[test]
    fn detects_pending_expression() {
        assert_eq!(pending_expression("2+3="), Some("2+3"));
        assert_eq!(pending_expression("  4 * 5 =  "), Some("4 * 5"));
        assert_eq!(pending_expression("="), None);
        assert_eq!(pending_expression("x = 3"), None);
        assert_eq!(pending_expression("plain text"), None);
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval("2 + 3 * 4"), "14");
        assert_eq!(eval("(2 + 3) * 4"), "20");
        assert_eq!(eval("2 ** 3 ** 2"), "512");
        assert_eq!(eval("-2 ^ 2"), "-4");
        assert_eq!(eval("2 ^ -1"), "0.5000");
        assert_eq!(eval("10 - 4 - 3"), "3");
    }

    #[test]
    fn floor_division_and_modulo_follow_the_floor() {
        assert_eq!(eval("7 // 2"), "3");
        assert_eq!(eval("-7 // 2"), "-4");
        assert_eq!(eval("-7 % 3"), "2");
        assert_eq!(eval("7 / 2"), "3.5000");
    }

    #[test]
    fn functions_and_constants() {
        assert_eq!(eval("sqrt(16)"), "4");
        assert_eq!(eval("log(8, 2)"), "3");
        assert_eq!(eval("factorial(5)"), "120");
        assert_eq!(eval("pi"), "3.1416");
        assert_eq!(eval("hypot(3, 4)"), "5");
        assert_eq!(eval("1.5e2"), "150");
    }

    #[test]
    fn rejects_everything_else() {
        assert_eq!(evaluate("1 / 0"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("sqrt(-1)"), Err(EvalError::Domain));
        assert_eq!(evaluate("inf"), Err(EvalError::Domain));
        assert_eq!(evaluate("open(1)"), Err(EvalError::UnknownName("open".into())));
        assert_eq!(evaluate("x + 1"), Err(EvalError::UnknownName("x".into())));
        assert_eq!(evaluate("1 +"), Err(EvalError::UnexpectedEnd));
        assert_eq!(evaluate("2 $ 3"), Err(EvalError::UnexpectedChar('$')));
        assert!(matches!(evaluate("sqrt(1, 2)"), Err(EvalError::Arity { .. })));
        assert!(matches!(evaluate("(1 + 2"), Err(EvalError::UnexpectedEnd)));
    }
}
