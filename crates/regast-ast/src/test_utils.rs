//! Test utilities: a tiny pattern builder standing in for the parser.
//!
//! Supports literals, `.`, `[a-z]`, `[^a]`, `[]`, `^`, `$`, `|`, `(...)`,
//! `(?:...)`, `(?=...)`, `(?!...)`, `(?<=...)`, `(?<!...)`, `(?>...)`,
//! `(?(n)yes|no)`, `\n` back references, `\g<n>` calls and the quantifiers
//! `* + ? {n} {n,} {n,m}` with an optional lazy `?`.

use std::iter::Peekable;
use std::str::Chars;

use regast_core::CodePointSet;

use crate::{AstOptions, NodeId, PositionKind, RegexAst, Result};

/// Build without analysis.
pub fn build(pattern: &str) -> RegexAst {
    build_with(pattern, AstOptions::new()).expect("pattern within default limits")
}

pub fn build_with(pattern: &str, options: AstOptions) -> Result<RegexAst> {
    let mut builder = Builder {
        ast: RegexAst::new(options),
        chars: pattern.chars().peekable(),
        next_group: 1,
    };
    let root = builder.ast.create_capture_group(0)?;
    builder.alternatives(root)?;
    assert!(
        builder.chars.next().is_none(),
        "unbalanced `)` in test pattern {pattern:?}"
    );
    builder.ast.set_root(root);
    Ok(builder.ast)
}

/// Build and run the properties pass.
pub fn analyzed(pattern: &str) -> RegexAst {
    let mut ast = build(pattern);
    ast.calc_properties();
    ast
}

pub fn analyzed_with(pattern: &str, options: AstOptions) -> RegexAst {
    let mut ast = build_with(pattern, options).expect("pattern within limits");
    ast.calc_properties();
    ast
}

/// Term of the root's first alternative at `index`.
pub fn root_term(ast: &RegexAst, index: usize) -> NodeId {
    let seq = ast.group(ast.root()).alternatives()[0];
    ast.sequence(seq).terms()[index]
}

/// Body group of a look-around or atomic group.
pub fn body(ast: &RegexAst, subtree_root: NodeId) -> NodeId {
    ast.subtree_root(subtree_root).body().expect("body set")
}

/// Pre-order list of every node below `id` (sentinels excluded).
pub fn descendants(ast: &RegexAst, id: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![id];
    while let Some(id) = stack.pop() {
        out.push(id);
        stack.extend(ast.children(id).into_iter().rev());
    }
    out
}

struct Builder<'a> {
    ast: RegexAst,
    chars: Peekable<Chars<'a>>,
    next_group: u32,
}

impl Builder<'_> {
    fn eat(&mut self, c: char) -> bool {
        self.chars.next_if_eq(&c).is_some()
    }

    fn expect(&mut self, c: char) {
        assert!(self.eat(c), "expected `{c}` in test pattern");
    }

    fn alternatives(&mut self, group: NodeId) -> Result<()> {
        loop {
            let seq = self.ast.add_sequence(group)?;
            self.sequence(seq)?;
            if !self.eat('|') {
                return Ok(());
            }
        }
    }

    fn sequence(&mut self, seq: NodeId) -> Result<()> {
        while let Some(&c) = self.chars.peek() {
            if c == '|' || c == ')' {
                break;
            }
            let term = self.term()?;
            self.quantifier(term)?;
            self.ast.add_term(seq, term)?;
        }
        Ok(())
    }

    fn term(&mut self) -> Result<NodeId> {
        let c = self.chars.next().expect("term");
        match c {
            '(' => self.group(),
            '[' => {
                let set = self.class();
                self.ast.create_character_class(set)
            }
            '.' => self.ast.create_character_class(CodePointSet::full()),
            '^' => self.ast.create_position_assertion(PositionKind::Caret),
            '$' => self.ast.create_position_assertion(PositionKind::Dollar),
            '\\' => self.escape(),
            c => self.ast.create_character_class_from_char(c),
        }
    }

    fn group(&mut self) -> Result<NodeId> {
        if !self.eat('?') {
            let n = self.next_group;
            self.next_group += 1;
            let group = self.ast.create_capture_group(n)?;
            return self.close(group);
        }
        match self.chars.next().expect("group kind") {
            ':' => {
                let group = self.ast.create_group()?;
                self.close(group)
            }
            '=' => {
                let look = self.ast.create_look_ahead(false)?;
                self.subtree(look)
            }
            '!' => {
                let look = self.ast.create_look_ahead(true)?;
                self.subtree(look)
            }
            '>' => {
                let atomic = self.ast.create_atomic_group()?;
                self.subtree(atomic)
            }
            '<' => {
                let negated = match self.chars.next() {
                    Some('=') => false,
                    Some('!') => true,
                    other => panic!("unsupported group `(?<{other:?}`"),
                };
                let look = self.ast.create_look_behind(negated)?;
                self.subtree(look)
            }
            '(' => {
                let n = self.number();
                self.expect(')');
                let group = self.ast.create_conditional_back_reference_group(n)?;
                self.alternatives(group)?;
                if self.ast.group(group).size() == 1 {
                    self.ast.add_sequence(group)?;
                }
                self.expect(')');
                Ok(group)
            }
            other => panic!("unsupported group `(?{other}`"),
        }
    }

    fn close(&mut self, group: NodeId) -> Result<NodeId> {
        self.alternatives(group)?;
        self.expect(')');
        Ok(group)
    }

    fn subtree(&mut self, root: NodeId) -> Result<NodeId> {
        let body = self.ast.create_group()?;
        self.close(body)?;
        self.ast.set_body(root, body);
        Ok(root)
    }

    fn class(&mut self) -> CodePointSet {
        let negated = self.eat('^');
        let mut ranges = Vec::new();
        loop {
            let c = self.chars.next().expect("unterminated class");
            if c == ']' {
                break;
            }
            let hi = if self.eat('-') {
                self.chars.next().expect("range end")
            } else {
                c
            };
            ranges.push((c as u32, hi as u32));
        }
        let set = CodePointSet::from_ranges(ranges);
        if negated { set.complement() } else { set }
    }

    fn escape(&mut self) -> Result<NodeId> {
        match self.chars.peek() {
            Some(c) if c.is_ascii_digit() => {
                let n = self.number();
                self.ast.create_back_reference(&[n], false)
            }
            Some('g') => {
                self.chars.next();
                self.expect('<');
                let n = self.number();
                self.expect('>');
                self.ast.create_subexpression_call(n)
            }
            _ => {
                let c = self.chars.next().expect("escaped char");
                self.ast.create_character_class_from_char(c)
            }
        }
    }

    fn number(&mut self) -> u32 {
        let mut n = None;
        while let Some(d) = self.chars.peek().and_then(|c| c.to_digit(10)) {
            self.chars.next();
            n = Some(n.unwrap_or(0) * 10 + d);
        }
        n.expect("number")
    }

    fn quantifier(&mut self, term: NodeId) -> Result<()> {
        let (min, max) = match self.chars.peek() {
            Some('*') => (0, None),
            Some('+') => (1, None),
            Some('?') => (0, Some(1)),
            Some('{') => {
                self.chars.next();
                let min = self.number();
                let max = if self.eat(',') {
                    if self.chars.peek() == Some(&'}') {
                        None
                    } else {
                        Some(self.number())
                    }
                } else {
                    Some(min)
                };
                self.expect('}');
                let greedy = !self.eat('?');
                let quantifier = self.ast.create_quantifier(min, max, greedy)?;
                self.ast.set_quantifier(term, quantifier);
                return Ok(());
            }
            _ => return Ok(()),
        };
        self.chars.next();
        let greedy = !self.eat('?');
        let quantifier = self.ast.create_quantifier(min, max, greedy)?;
        self.ast.set_quantifier(term, quantifier);
        Ok(())
    }
}
