// src/noyau/expr.rs
//
// AST restreint : littéraux, noms de l’espace fermé, opérateurs fixes,
// appels de fonctions connues. Pas d’affectation, pas de séquence.

use std::fmt;

use super::nombre::Number;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(Number),
    Name(String), // pi, e, ANS (résolu à l’évaluation)

    Neg(Box<Expr>),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),

    Call(String, Vec<Expr>),
}

/// Opérateurs binaires associatifs à gauche (chaînes `a + b - c * d`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpGauche {
    Add,
    Sub,
    Mul,
    Div,
}

impl OpGauche {
    fn symbole(self) -> &'static str {
        match self {
            OpGauche::Add => "+",
            OpGauche::Sub => "-",
            OpGauche::Mul => "*",
            OpGauche::Div => "/",
        }
    }
}

impl Expr {
    /// Déplie l’épine gauche sans récursion :
    /// `((a + b) * c)` => `(a, [(Add, b), (Mul, c)])`.
    /// La tête n’est jamais un opérateur associatif à gauche.
    pub fn chaine_gauche(&self) -> (&Expr, Vec<(OpGauche, &Expr)>) {
        let mut suite = Vec::new();
        let mut cur = self;
        loop {
            let (op, a, b) = match cur {
                Expr::Add(a, b) => (OpGauche::Add, a, b),
                Expr::Sub(a, b) => (OpGauche::Sub, a, b),
                Expr::Mul(a, b) => (OpGauche::Mul, a, b),
                Expr::Div(a, b) => (OpGauche::Div, a, b),
                _ => break,
            };
            suite.push((op, b.as_ref()));
            cur = a.as_ref();
        }
        suite.reverse();
        (cur, suite)
    }

    /// Vrai si l’expression lit ANS (le résultat dépend alors de l’historique).
    pub fn uses_ans(&self) -> bool {
        use Expr::*;
        let (tete, suite) = self.chaine_gauche();
        if suite.iter().any(|(_, b)| b.uses_ans()) {
            return true;
        }
        match tete {
            Num(_) => false,
            Name(n) => n == "ANS",
            Neg(x) => x.uses_ans(),
            Pow(a, b) => a.uses_ans() || b.uses_ans(),
            Call(_, args) => args.iter().any(Expr::uses_ans),
            Add(..) | Sub(..) | Mul(..) | Div(..) => false,
        }
    }
}

/// Forme entièrement parenthésée (journaux / tests de priorité).
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        let (tete, suite) = self.chaine_gauche();
        for _ in &suite {
            write!(f, "(")?;
        }
        match tete {
            Num(Number::Int(n)) => write!(f, "{n}")?,
            Num(Number::Float(x)) => write!(f, "{x:?}")?,
            Name(n) => write!(f, "{n}")?,
            Neg(x) => write!(f, "(-{x})")?,
            Pow(a, b) => write!(f, "({a} ** {b})")?,
            Call(name, args) => {
                write!(f, "{name}(")?;
                for (k, a) in args.iter().enumerate() {
                    if k > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")?;
            }
            Add(..) | Sub(..) | Mul(..) | Div(..) => {}
        }
        for (op, b) in suite {
            write!(f, " {} {b})", op.symbole())?;
        }
        Ok(())
    }
}
