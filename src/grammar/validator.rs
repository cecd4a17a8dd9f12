//! Recursive-descent recognizer for the formula grammar
//!
//! ```text
//! <prop> ::= T | F | <atom> | ~<prop> | <prop> & <prop> | <prop> | <prop>
//!          | <prop> -> <prop> | <prop> <-> <prop> | ( <prop> )
//! <atom> ::= [a-z][a-z0-9_]*
//! ```
//!
//! Binding strength from tightest to loosest: parentheses, `~`, `&`, `|`,
//! `->`, `<->`. The recognizer only decides membership; no tree is kept.

use super::error::GrammarError;
use super::lexer::{Lexer, Spanned, Token};
use itertools::Itertools;

/// Maximum parenthesis nesting; `~` chains are consumed iteratively and are not limited
pub const MAX_DEPTH: usize = 512;

const OPERAND: &str = "a variable, T, F, '~' or '('";

/// Summary of a formula that passed the grammar check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedFormula {
    atoms: Vec<String>,
}

impl CheckedFormula {
    /// Distinct variables in order of first appearance
    pub fn atoms(&self) -> &[String] {
        &self.atoms
    }
}

/// Check `text` against the grammar
pub fn validate(text: &str) -> Result<CheckedFormula, GrammarError> {
    let tokens = Lexer::tokenize(text)?;
    if tokens.is_empty() {
        return Err(GrammarError::Empty);
    }

    let mut recognizer = Recognizer::new(&tokens);
    recognizer.equivalence()?;

    if let Some(extra) = recognizer.peek() {
        return Err(unexpected(extra, "an operator or end of formula"));
    }

    Ok(CheckedFormula {
        atoms: recognizer.atoms.into_iter().unique().map(String::from).collect(),
    })
}

/// Whether `text` is a well-formed formula
pub fn is_well_formed(text: &str) -> bool {
    validate(text).is_ok()
}

fn unexpected(found: &Spanned<'_>, expected: &'static str) -> GrammarError {
    GrammarError::UnexpectedToken {
        found: found.token.to_string(),
        offset: found.offset,
        expected,
    }
}

struct Recognizer<'t, 'a> {
    tokens: &'t [Spanned<'a>],
    pos: usize,
    depth: usize,
    atoms: Vec<&'a str>,
}

impl<'t, 'a> Recognizer<'t, 'a> {
    fn new(tokens: &'t [Spanned<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            atoms: Vec::new(),
        }
    }

    fn peek(&self) -> Option<&'t Spanned<'a>> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: Token<'a>) -> bool {
        if self.peek().map(|s| s.token) == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> Result<(), GrammarError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(GrammarError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn equivalence(&mut self) -> Result<(), GrammarError> {
        self.implication()?;
        while self.eat(Token::Iff) {
            self.implication()?;
        }
        Ok(())
    }

    fn implication(&mut self) -> Result<(), GrammarError> {
        self.disjunction()?;
        while self.eat(Token::Implies) {
            self.disjunction()?;
        }
        Ok(())
    }

    fn disjunction(&mut self) -> Result<(), GrammarError> {
        self.conjunction()?;
        while self.eat(Token::Or) {
            self.conjunction()?;
        }
        Ok(())
    }

    fn conjunction(&mut self) -> Result<(), GrammarError> {
        self.negation()?;
        while self.eat(Token::And) {
            self.negation()?;
        }
        Ok(())
    }

    fn negation(&mut self) -> Result<(), GrammarError> {
        while self.eat(Token::Not) {}
        self.primary()
    }

    fn primary(&mut self) -> Result<(), GrammarError> {
        let Some(current) = self.peek() else {
            return Err(GrammarError::UnexpectedEnd { expected: OPERAND });
        };

        match current.token {
            Token::True | Token::False => {
                self.pos += 1;
                Ok(())
            }
            Token::Atom(name) => {
                self.atoms.push(name);
                self.pos += 1;
                Ok(())
            }
            Token::LParen => {
                self.pos += 1;
                self.descend()?;
                self.equivalence()?;
                self.depth -= 1;
                match self.peek() {
                    Some(close) if close.token == Token::RParen => {
                        self.pos += 1;
                        Ok(())
                    }
                    Some(other) => Err(unexpected(other, "')' or an operator")),
                    None => Err(GrammarError::UnclosedParen { offset: current.offset }),
                }
            }
            _ => Err(unexpected(current, OPERAND)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_accepts_grammar_productions() {
        for formula in [
            "T",
            "F",
            "a",
            "x_1",
            "a9_b",
            "~a",
            "~~a",
            "a & b",
            "a | b",
            "a -> b",
            "a <-> b",
            "(a)",
            "((a))",
            "~(a & b) <-> (~a | ~b)",
            "(a & b | ~c) -> d <-> e",
            "a & ~a",
            "~(a -> b|c) <-> ~c&d",
            "zazavavindrano & zazavavindrano -> ((~ swim_warm -> red) & (blue | ~ red))",
            "a->b->c",
            "T & F | T",
        ] {
            assert!(is_well_formed(formula), "rejected {formula:?}");
        }
    }

    #[test]
    fn test_rejects_uppercase_variables() {
        assert!(!is_well_formed("A"));
        assert!(!is_well_formed("a & B"));
        assert!(!is_well_formed("True"));
        assert!(!is_well_formed("aB"));
    }

    #[test]
    fn test_rejects_bare_hyphen() {
        assert!(!is_well_formed("a - b"));
        assert!(!is_well_formed("-a"));
        assert!(!is_well_formed("a -"));
        assert!(!is_well_formed("a < - > b"));
    }

    #[test]
    fn test_rejects_adjacent_operands() {
        assert!(!is_well_formed("a b"));
        assert!(!is_well_formed("T a"));
        assert!(!is_well_formed("a (b)"));
        assert!(!is_well_formed("(a)(b)"));
        assert!(!is_well_formed("a ~b"));
    }

    #[test]
    fn test_rejects_structural_errors() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("   "));
        assert!(!is_well_formed("a &"));
        assert!(!is_well_formed("& a"));
        assert!(!is_well_formed("a & | b"));
        assert!(!is_well_formed("()"));
        assert!(!is_well_formed("(a"));
        assert!(!is_well_formed("a)"));
        assert!(!is_well_formed("~"));
        assert!(!is_well_formed("1a"));
    }

    #[test]
    fn test_error_positions() {
        assert_eq!(validate("   "), Err(GrammarError::Empty));
        assert_eq!(
            validate("a b"),
            Err(GrammarError::UnexpectedToken {
                found: "b".to_string(),
                offset: 2,
                expected: "an operator or end of formula",
            })
        );
        assert_eq!(validate("(a & b"), Err(GrammarError::UnclosedParen { offset: 0 }));
        assert_eq!(validate("a &"), Err(GrammarError::UnexpectedEnd { expected: OPERAND }));
        assert_eq!(validate("x & Y").unwrap_err().offset(), Some(4));
    }

    #[test]
    fn test_atoms_in_first_appearance_order() {
        let checked = validate("b & (a | b) -> ~c <-> a").unwrap();
        assert_eq!(checked.atoms(), ["b", "a", "c"]);
        assert!(validate("T | F").unwrap().atoms().is_empty());
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}a{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(validate(&deep), Err(GrammarError::TooDeep { limit: MAX_DEPTH }));

        let at_limit = format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(is_well_formed(&at_limit));

        let shallow = format!("{}a{}", "(".repeat(16), ")".repeat(16));
        assert!(is_well_formed(&shallow));
    }

    #[test]
    fn test_negation_chains_are_unbounded() {
        let negations = format!("{}a", "~".repeat(MAX_DEPTH + 88));
        assert_eq!(validate(&negations).map(|c| c.atoms().to_vec()), Ok(vec!["a".to_string()]));

        let mixed = format!("~{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(is_well_formed(&mixed));

        let negated_parens = format!("{}a{}", "~(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(is_well_formed(&negated_parens));

        let too_deep = format!("{}a{}", "~(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(validate(&too_deep), Err(GrammarError::TooDeep { limit: MAX_DEPTH }));
    }

    fn formula_strategy() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            Just("T".to_string()),
            Just("F".to_string()),
            "[a-z][a-z0-9_]{0,6}",
        ];
        leaf.prop_recursive(6, 48, 2, |inner| {
            prop_oneof![
                inner.clone().prop_map(|p| format!("~{p}")),
                inner.clone().prop_map(|p| format!("( {p} )")),
                (inner.clone(), prop::sample::select(vec!["&", "|", "->", "<->"]), inner)
                    .prop_map(|(l, op, r)| format!("({l}) {op} ({r})")),
            ]
        })
    }

    proptest! {
        #[test]
        fn proptest_generated_formulas_are_well_formed(formula in formula_strategy()) {
            prop_assert!(is_well_formed(&formula), "rejected {}", formula);
        }

        #[test]
        fn proptest_whitespace_removal_preserves_acceptance(formula in formula_strategy()) {
            let compact: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
            prop_assert!(is_well_formed(&compact), "rejected {}", compact);
        }
    }
}
