//! Noyau — évaluation (pipeline réel)
//!
//! normalize -> tokenize -> RPN -> Expr -> évaluation dans l’espace fermé
//!
//! L’état (mode + ANS) appartient à l’instance : aucune variable globale,
//! plusieurs moteurs restent indépendants.

use std::sync::{Arc, Mutex};

use tracing::debug;

use super::erreur::EvalError;
use super::expr::{Expr, OpGauche};
use super::fonctions::{constante, fonction};
use super::jetons::{format_tokens, tokenize};
use super::nombre::{fini, Number};
use super::normalise::normalize;
use super::rpn::parse;
use super::trig::EvaluationMode;

#[derive(Clone, Debug, Default)]
pub struct Engine {
    mode: EvaluationMode,
    last_result: Number,
}

impl Engine {
    pub fn new(mode: EvaluationMode) -> Self {
        Self {
            mode,
            last_result: Number::default(),
        }
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Transition pure : ANS n’est pas recalculé.
    pub fn set_mode(&mut self, mode: EvaluationMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> EvaluationMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Valeur liée à `ANS`.
    pub fn last_result(&self) -> &Number {
        &self.last_result
    }

    /// API publique : évalue une expression saisie par l’utilisateur.
    ///
    /// - Entrée vide / blanche => Ok(None), ANS inchangé
    /// - Succès => Ok(Some(valeur)), ANS = valeur
    /// - Échec => Err(..), ANS inchangé
    pub fn evaluate(&mut self, expr: &str) -> Result<Option<Number>, EvalError> {
        let s = expr.trim();
        if s.is_empty() {
            return Ok(None);
        }

        let resultat = evaluer_texte(s, self.mode, &self.last_result);
        match &resultat {
            Ok(v) => {
                debug!(expr = s, mode = ?self.mode, valeur = ?v, "évaluation réussie");
                self.last_result = v.clone();
            }
            Err(e) => {
                debug!(expr = s, mode = ?self.mode, kind = e.kind(), erreur = %e, "évaluation refusée");
            }
        }
        resultat.map(Some)
    }
}

/// Pipeline sans état : ne touche pas au moteur.
fn evaluer_texte(s: &str, mode: EvaluationMode, ans: &Number) -> Result<Number, EvalError> {
    let normalise = normalize(s);
    let jetons = tokenize(&normalise)?;
    let expr = parse(&jetons)?;
    debug!(
        jetons = %format_tokens(&jetons),
        arbre = %expr,
        ans = expr.uses_ans(),
        "expression analysée"
    );
    match evaluer_expr(&expr, mode, ans)? {
        Number::Float(x) => fini(x),
        n => Ok(n),
    }
}

fn evaluer_expr(expr: &Expr, mode: EvaluationMode, ans: &Number) -> Result<Number, EvalError> {
    use Expr::*;

    let ev = |e: &Expr| evaluer_expr(e, mode, ans);

    match expr {
        Num(n) => Ok(n.clone()),

        Name(nom) => constante(nom, ans).ok_or_else(|| {
            if fonction(nom).is_some() {
                EvalError::UnknownName(format!("{nom} é uma função, use {nom}(...)"))
            } else {
                EvalError::UnknownName(nom.clone())
            }
        }),

        Neg(x) => Ok(ev(x)?.neg()),

        // chaîne associative à gauche : pliée en boucle, sans récursion sur l’épine
        Add(..) | Sub(..) | Mul(..) | Div(..) => {
            let (tete, suite) = expr.chaine_gauche();
            suite.into_iter().try_fold(ev(tete)?, |acc, (op, b)| {
                let b = ev(b)?;
                match op {
                    OpGauche::Add => acc.add(b),
                    OpGauche::Sub => acc.sub(b),
                    OpGauche::Mul => acc.mul(b),
                    OpGauche::Div => acc.div(b),
                }
            })
        }
        Pow(a, b) => ev(a)?.pow(ev(b)?),

        Call(nom, args) => {
            let Some(f) = fonction(nom) else {
                return Err(if constante(nom, ans).is_some() {
                    EvalError::UnknownName(format!("{nom} não é uma função"))
                } else {
                    EvalError::UnknownName(nom.clone())
                });
            };
            let valeurs = args.iter().map(ev).collect::<Result<Vec<_>, _>>()?;
            f.appeler(&valeurs, mode)
        }
    }
}

/// Moteur partagé entre fils : chaque évaluation est atomique vis-à-vis d’ANS.
#[derive(Clone, Debug, Default)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn verrou(&self) -> std::sync::MutexGuard<'_, Engine> {
        // un panic d’un autre fil ne laisse pas l’état à moitié écrit (affectation unique)
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn evaluate(&self, expr: &str) -> Result<Option<Number>, EvalError> {
        self.verrou().evaluate(expr)
    }

    pub fn set_mode(&self, mode: EvaluationMode) {
        self.verrou().set_mode(mode);
    }

    pub fn mode(&self) -> EvaluationMode {
        self.verrou().mode()
    }

    pub fn last_result(&self) -> Number {
        self.verrou().last_result().clone()
    }
}
