// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix), en validant la forme
// - Puis reconstruire Expr
//
// Règles:
// - Ident(name) suivi de '(' => appel de fonction (arité comptée aux virgules)
// - Ident(name) seul => nom (constante / ANS), résolu à l’évaluation
// - Moins unaire => opérateur Neg (préfixe) : plus fort que * /, plus faible que **
//   (-2**2 = -4 ; 2*-3 = -6 ; 2**-1 = 0.5)
// - Plus unaire => ignoré
// - ** associatif à droite

use super::erreur::EvalError;
use super::expr::Expr;
use super::jetons::Tok;
use super::nombre::Number;

/// Garde-fou : imbrication maximale (parenthèses, appels, moins unaires, `**`).
/// Les chaînes `a + b - c * d` ne comptent pas : elles sont évaluées en boucle.
pub const MAX_PROFONDEUR: usize = 256;

/// Nombre maximal de nœuds d’un arbre (la libération reste récursive).
pub const MAX_NOEUDS: usize = 4096;

#[derive(Clone, Debug, PartialEq)]
pub enum Rpn {
    Num(Number),
    Name(String),
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Call(String, usize),
}

/// Éléments de la pile d’opérateurs.
#[derive(Clone, Debug)]
enum Pile {
    Op(Rpn),
    LPar { appel: bool },
    Func(String),
}

fn precedence(op: &Rpn) -> u8 {
    match op {
        Rpn::Add | Rpn::Sub => 1,
        Rpn::Mul | Rpn::Div => 2,
        Rpn::Neg => 3,
        Rpn::Pow => 4,
        _ => 0,
    }
}

fn is_right_associative(op: &Rpn) -> bool {
    matches!(op, Rpn::Pow)
}

fn binaire(t: &Tok) -> Option<Rpn> {
    match t {
        Tok::Plus => Some(Rpn::Add),
        Tok::Minus => Some(Rpn::Sub),
        Tok::Star => Some(Rpn::Mul),
        Tok::Slash => Some(Rpn::Div),
        Tok::Pow => Some(Rpn::Pow),
        _ => None,
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("log"), LPar, Num(8), Comma, Num(2), RPar]
///   rpn:    [Num(8), Num(2), Call("log", 2)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Rpn>, EvalError> {
    let mut out: Vec<Rpn> = Vec::new();
    let mut ops: Vec<Pile> = Vec::new();

    // Virgules vues dans chaque parenthèse d’appel ouverte.
    let mut virgules: Vec<usize> = Vec::new();
    let mut profondeur: usize = 0;

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire et les juxtapositions (2pi, 2(3)).
    let mut prev_was_value = false;

    for (k, tok) in tokens.iter().enumerate() {
        match tok {
            Tok::Num(n) => {
                if prev_was_value {
                    return Err(EvalError::syntax("número inesperado"));
                }
                out.push(Rpn::Num(n.clone()));
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if prev_was_value {
                    return Err(EvalError::syntax(format!("nome inesperado: {name}")));
                }
                if matches!(tokens.get(k + 1), Some(Tok::LPar)) {
                    // fonction : reste sur la pile jusqu’à sa parenthèse fermante
                    ops.push(Pile::Func(name.clone()));
                    prev_was_value = false;
                } else {
                    out.push(Rpn::Name(name.clone()));
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                if prev_was_value {
                    return Err(EvalError::syntax("parêntese inesperado"));
                }
                profondeur += 1;
                if profondeur > MAX_PROFONDEUR {
                    return Err(EvalError::syntax("expressão aninhada demais"));
                }
                let appel = matches!(ops.last(), Some(Pile::Func(_)));
                if appel {
                    virgules.push(0);
                }
                ops.push(Pile::LPar { appel });
                prev_was_value = false;
            }

            Tok::Comma => {
                if !prev_was_value {
                    return Err(EvalError::syntax("argumento vazio"));
                }
                depile_jusqu_a_parenthese(&mut ops, &mut out);
                match ops.last() {
                    Some(Pile::LPar { appel: true }) => {
                        if let Some(v) = virgules.last_mut() {
                            *v += 1;
                        }
                    }
                    _ => return Err(EvalError::syntax("vírgula fora de uma chamada")),
                }
                prev_was_value = false;
            }

            Tok::RPar => {
                depile_jusqu_a_parenthese(&mut ops, &mut out);
                let appel = match ops.pop() {
                    Some(Pile::LPar { appel }) => appel,
                    _ => return Err(EvalError::syntax("parêntese de fechamento sem abertura")),
                };
                profondeur = profondeur.saturating_sub(1);

                if appel {
                    let n_virgules = virgules.pop().unwrap_or(0);
                    let arite = match (prev_was_value, n_virgules) {
                        (true, v) => v + 1,
                        (false, 0) => 0, // f()
                        (false, _) => return Err(EvalError::syntax("argumento vazio")),
                    };
                    match ops.pop() {
                        Some(Pile::Func(name)) => out.push(Rpn::Call(name, arite)),
                        _ => return Err(EvalError::syntax("chamada de função mal formada")),
                    }
                } else if !prev_was_value {
                    return Err(EvalError::syntax("parênteses vazios"));
                }

                prev_was_value = true;
            }

            Tok::Plus | Tok::Minus if !prev_was_value => {
                // unaire : Neg préfixe, le plus unaire est neutre
                if matches!(tok, Tok::Minus) {
                    ops.push(Pile::Op(Rpn::Neg));
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Pow => {
                if !prev_was_value {
                    return Err(EvalError::syntax(format!(
                        "operador inesperado: {}",
                        operateur_txt(tok)
                    )));
                }
                let Some(op) = binaire(tok) else {
                    return Err(EvalError::syntax("operador desconhecido"));
                };

                // dépile tant que la précédence/associativité l’exige
                // (jamais à travers '(' ni une fonction en attente)
                while let Some(Pile::Op(top)) = ops.last() {
                    let p_top = precedence(top);
                    let p_op = precedence(&op);
                    let doit_pop = if is_right_associative(&op) {
                        p_top > p_op
                    } else {
                        p_top >= p_op
                    };
                    if !doit_pop {
                        break;
                    }
                    if let Some(Pile::Op(o)) = ops.pop() {
                        out.push(o);
                    }
                }

                ops.push(Pile::Op(op));
                prev_was_value = false;
            }
        }
    }

    if !tokens.is_empty() && !prev_was_value {
        return Err(EvalError::syntax("expressão incompleta"));
    }

    // vide la pile ops
    while let Some(top) = ops.pop() {
        match top {
            Pile::Op(o) => out.push(o),
            Pile::LPar { .. } => return Err(EvalError::syntax("parênteses não fechados")),
            Pile::Func(name) => {
                return Err(EvalError::syntax(format!("chamada de {name} incompleta")))
            }
        }
    }

    Ok(out)
}

fn depile_jusqu_a_parenthese(ops: &mut Vec<Pile>, out: &mut Vec<Rpn>) {
    while let Some(Pile::Op(_)) = ops.last() {
        if let Some(Pile::Op(o)) = ops.pop() {
            out.push(o);
        }
    }
}

fn operateur_txt(t: &Tok) -> &'static str {
    match t {
        Tok::Plus => "+",
        Tok::Minus => "-",
        Tok::Star => "*",
        Tok::Slash => "/",
        Tok::Pow => "**",
        _ => "?",
    }
}

/// Construit une Expr à partir d’une RPN.
/// Chaque entrée de pile porte (profondeur d’imbrication, nombre de nœuds).
pub fn from_rpn(rpn: &[Rpn]) -> Result<Expr, EvalError> {
    let mut st: Vec<(Expr, usize)> = Vec::new();
    let mut noeuds: usize = 0;
    let invalide = || EvalError::syntax("expressão inválida");

    for item in rpn.iter().cloned() {
        noeuds += 1;
        if noeuds > MAX_NOEUDS {
            return Err(EvalError::arithmetic(format!(
                "expressão grande demais (máximo {MAX_NOEUDS} elementos)"
            )));
        }

        let (e, h) = match item {
            Rpn::Num(n) => (Expr::Num(n), 1),
            Rpn::Name(name) => (Expr::Name(name), 1),

            Rpn::Neg => {
                let (x, h) = st.pop().ok_or_else(invalide)?;
                (Expr::Neg(Box::new(x)), h + 1)
            }

            Rpn::Add | Rpn::Sub | Rpn::Mul | Rpn::Div | Rpn::Pow => {
                let (b, hb) = st.pop().ok_or_else(invalide)?;
                let (a, ha) = st.pop().ok_or_else(invalide)?;
                let (a, b) = (Box::new(a), Box::new(b));
                match item {
                    // épine gauche dépliée en boucle : seul l’opérande droit s’enfonce
                    Rpn::Add => (Expr::Add(a, b), ha.max(hb + 1)),
                    Rpn::Sub => (Expr::Sub(a, b), ha.max(hb + 1)),
                    Rpn::Mul => (Expr::Mul(a, b), ha.max(hb + 1)),
                    Rpn::Div => (Expr::Div(a, b), ha.max(hb + 1)),
                    _ => (Expr::Pow(a, b), ha.max(hb) + 1),
                }
            }

            Rpn::Call(name, arite) => {
                if st.len() < arite {
                    return Err(invalide());
                }
                let pris = st.split_off(st.len() - arite);
                let h = pris.iter().map(|(_, h)| *h).max().unwrap_or(0) + 1;
                let args = pris.into_iter().map(|(e, _)| e).collect();
                (Expr::Call(name, args), h)
            }
        };

        if h > MAX_PROFONDEUR {
            return Err(EvalError::syntax("expressão aninhada demais"));
        }
        st.push((e, h));
    }

    match (st.pop(), st.is_empty()) {
        (Some((e, _)), true) => Ok(e),
        _ => Err(invalide()),
    }
}

/// tokens -> AST (validation syntaxique complète).
pub fn parse(tokens: &[Tok]) -> Result<Expr, EvalError> {
    from_rpn(&to_rpn(tokens)?)
}
