// src/noyau/jetons.rs

use num_bigint::BigInt;

use super::erreur::EvalError;
use super::nombre::Number;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(Number),

    // Fonctions + constantes (pi, e, ANS, sin, log…)
    // NOTE: la construction RPN décidera si c’est un appel (suivi de '(') ou un nom.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Pow, // **

    LPar,
    RPar,
    Comma,
}

/// Tokenize une expression DÉJÀ normalisée.
/// Supporte:
/// - entiers (ex: 12) -> Num(Int)
/// - réels (ex: 1.5, .5, 5., 2e3, 1.2E-4) -> Num(Float)
/// - opérateurs + - * / **
/// - parenthèses ( ) et virgule d’arguments
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (sensibles à la casse : ANS, nCr)
pub fn tokenize(s: &str) -> Result<Vec<Tok>, EvalError> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '(' => {
                out.push(Tok::LPar);
                i += 1;
                continue;
            }
            ')' => {
                out.push(Tok::RPar);
                i += 1;
                continue;
            }
            ',' => {
                out.push(Tok::Comma);
                i += 1;
                continue;
            }
            '+' => {
                out.push(Tok::Plus);
                i += 1;
                continue;
            }
            '-' => {
                out.push(Tok::Minus);
                i += 1;
                continue;
            }
            '*' => {
                // ** = puissance
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    out.push(Tok::Pow);
                    i += 2;
                } else {
                    out.push(Tok::Star);
                    i += 1;
                }
                continue;
            }
            '/' => {
                out.push(Tok::Slash);
                i += 1;
                continue;
            }
            _ => {}
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            out.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }

        // Nombre : chiffres [. chiffres] [e [+-] chiffres]
        if c.is_ascii_digit() || c == '.' {
            let (tok, fin) = lire_nombre(&chars, i)?;
            out.push(tok);
            i = fin;
            continue;
        }

        return Err(EvalError::syntax(format!("caractere inesperado: '{c}'")));
    }

    Ok(out)
}

fn lire_nombre(chars: &[char], start: usize) -> Result<(Tok, usize), EvalError> {
    let chiffres = |mut j: usize| {
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        j
    };

    let mut i = chiffres(start);
    let entier_present = i > start;
    let mut reel = false;

    if i < chars.len() && chars[i] == '.' {
        reel = true;
        let debut_frac = i + 1;
        i = chiffres(debut_frac);
        if !entier_present && i == debut_frac {
            return Err(EvalError::syntax("ponto decimal isolado"));
        }
    }

    // Exposant seulement s’il est suivi de chiffres : "2e" reste "2" puis ident "e".
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        let fin = chiffres(j);
        if fin > j {
            reel = true;
            i = fin;
        }
    }

    let texte: String = chars[start..i].iter().collect();
    let tok = if reel {
        let x: f64 = texte
            .parse()
            .map_err(|_| EvalError::syntax(format!("número inválido: {texte}")))?;
        if !x.is_finite() {
            return Err(EvalError::arithmetic(format!("número grande demais: {texte}")));
        }
        Tok::Num(Number::Float(x))
    } else {
        let n = BigInt::parse_bytes(texte.as_bytes(), 10)
            .ok_or_else(|| EvalError::syntax(format!("número inválido: {texte}")))?;
        Tok::Num(Number::Int(n))
    };
    Ok((tok, i))
}

/// Format utilitaire (journaux) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    for t in tokens {
        let s = match t {
            Tok::Num(Number::Int(n)) => n.to_string(),
            Tok::Num(Number::Float(x)) => format!("{x:?}"),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Pow => "**".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Comma => ",".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
