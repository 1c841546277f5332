// src/noyau/fonctions.rs
//
// Espace de noms FERMÉ (sensible à la casse)
// ------------------------------------------
// - constantes : pi, e, ANS
// - fonctions  : table statique (nom, arité min/max, implémentation)
//
// Rien d’autre n’est atteignable depuis une expression.

use num_bigint::BigInt;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

use super::erreur::EvalError;
use super::nombre::{fini, Number};
use super::trig::{inv_trig, trig, EvaluationMode, InvTrigFn, TrigFn};

/// Borne de fact/comb/perm (au-delà : calcul refusé, pas de gel).
pub const MAX_COMBINATOIRE: u64 = 10_000;

type Impl = fn(&[Number], EvaluationMode) -> Result<Number, EvalError>;

pub struct Fonction {
    pub nom: &'static str,
    pub arite_min: usize,
    pub arite_max: usize,
    appliquer: Impl,
}

impl Fonction {
    pub fn appeler(&self, args: &[Number], mode: EvaluationMode) -> Result<Number, EvalError> {
        if args.len() < self.arite_min || args.len() > self.arite_max {
            let attendu = if self.arite_min == self.arite_max {
                format!("{}", self.arite_min)
            } else {
                format!("{} a {}", self.arite_min, self.arite_max)
            };
            return Err(EvalError::syntax(format!(
                "{} espera {attendu} argumento(s), recebeu {}",
                self.nom,
                args.len()
            )));
        }
        (self.appliquer)(args, mode)
    }
}

const fn f(nom: &'static str, arite_min: usize, arite_max: usize, appliquer: Impl) -> Fonction {
    Fonction {
        nom,
        arite_min,
        arite_max,
        appliquer,
    }
}

static FONCTIONS: &[Fonction] = &[
    f("abs", 1, 1, abs),
    f("floor", 1, 1, floor),
    f("ceil", 1, 1, ceil),
    f("round", 1, 2, round),
    f("sqrt", 1, 1, sqrt),
    f("exp", 1, 1, exp),
    f("ln", 1, 1, ln),
    f("log", 1, 2, log),
    f("pow", 2, 2, pow),
    f("fact", 1, 1, fact),
    f("factorial", 1, 1, fact),
    f("nCr", 2, 2, comb),
    f("comb", 2, 2, comb),
    f("nPr", 2, 2, perm),
    f("perm", 2, 2, perm),
    f("rad", 1, 1, rad),
    f("deg", 1, 1, deg),
    f("sin", 1, 1, sin),
    f("cos", 1, 1, cos),
    f("tan", 1, 1, tan),
    f("asin", 1, 1, asin),
    f("acos", 1, 1, acos),
    f("atan", 1, 1, atan),
];

/// Recherche d’une fonction par nom exact.
pub fn fonction(nom: &str) -> Option<&'static Fonction> {
    FONCTIONS.iter().find(|f| f.nom == nom)
}

/// Noms de fonctions connus (lecture vocale, retour arrière par jeton).
pub fn noms_fonctions() -> impl Iterator<Item = &'static str> {
    FONCTIONS.iter().map(|f| f.nom)
}

/// Constante nommée ; ANS est lié au dernier résultat au moment de l’évaluation.
pub fn constante(nom: &str, ans: &Number) -> Option<Number> {
    match nom {
        "pi" => Some(Number::Float(std::f64::consts::PI)),
        "e" => Some(Number::Float(std::f64::consts::E)),
        "ANS" => Some(ans.clone()),
        _ => None,
    }
}

/* ------------------------ Implémentations ------------------------ */

fn un(args: &[Number]) -> Result<f64, EvalError> {
    args[0].to_f64()
}

fn entier_depuis(x: f64) -> Result<Number, EvalError> {
    BigInt::from_f64(x)
        .map(Number::Int)
        .ok_or_else(|| EvalError::arithmetic("valor não representável como inteiro"))
}

fn abs(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    Ok(match &args[0] {
        Number::Int(n) => Number::Int(n.abs()),
        Number::Float(x) => Number::Float(x.abs()),
    })
}

fn floor(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    match &args[0] {
        Number::Int(n) => Ok(Number::Int(n.clone())),
        Number::Float(x) => entier_depuis(x.floor()),
    }
}

fn ceil(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    match &args[0] {
        Number::Int(n) => Ok(Number::Int(n.clone())),
        Number::Float(x) => entier_depuis(x.ceil()),
    }
}

/// round(x) -> entier (arrondi au pair) ; round(x, n) -> n décimales.
fn round(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    let Some(n) = args.get(1) else {
        return match &args[0] {
            Number::Int(v) => Ok(Number::Int(v.clone())),
            Number::Float(x) => entier_depuis(x.round_ties_even()),
        };
    };

    let decimales = match n {
        Number::Int(d) => d
            .to_i32()
            .ok_or_else(|| EvalError::domain("número de casas decimais inválido"))?,
        Number::Float(_) => {
            return Err(EvalError::domain("round: casas decimais devem ser inteiras"))
        }
    };

    match &args[0] {
        Number::Int(v) if decimales >= 0 => Ok(Number::Int(v.clone())),
        x => {
            let x = x.to_f64()?;
            let echelle = 10f64.powi(decimales);
            if !echelle.is_finite() || echelle == 0.0 {
                return fini(x);
            }
            let r = (x * echelle).round_ties_even() / echelle;
            if r.is_finite() {
                fini(r)
            } else {
                fini(x)
            }
        }
    }
}

fn sqrt(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    let x = un(args)?;
    if x < 0.0 {
        return Err(EvalError::domain("raiz quadrada de número negativo"));
    }
    fini(x.sqrt())
}

fn exp(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    fini(un(args)?.exp())
}

fn ln(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    let x = un(args)?;
    if x <= 0.0 {
        return Err(EvalError::domain("logaritmo de número não positivo"));
    }
    fini(x.ln())
}

/// log(x, base=10)
fn log(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    let x = un(args)?;
    if x <= 0.0 {
        return Err(EvalError::domain("logaritmo de número não positivo"));
    }
    let Some(base) = args.get(1) else {
        return fini(x.log10());
    };

    let b = base.to_f64()?;
    if b <= 0.0 {
        return Err(EvalError::domain("base de logaritmo não positiva"));
    }
    if b == 1.0 {
        return Err(EvalError::arithmetic("logaritmo na base 1 (divisão por zero)"));
    }
    if b == 10.0 {
        return fini(x.log10());
    }
    fini(x.ln() / b.ln())
}

fn pow(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    args[0].clone().pow(args[1].clone())
}

fn borne(n: &BigInt, fonction: &str) -> Result<u64, EvalError> {
    match n.to_u64() {
        Some(v) if v <= MAX_COMBINATOIRE => Ok(v),
        _ => Err(EvalError::arithmetic(format!(
            "{fonction}: argumento grande demais (máximo {MAX_COMBINATOIRE})"
        ))),
    }
}

/// Produit des entiers de `de` à `a` inclus.
fn produit(de: u64, a: u64) -> BigInt {
    (de..=a).fold(BigInt::one(), |acc, k| acc * k)
}

fn fact(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    let n = borne(&args[0].to_natural("fact")?, "fact")?;
    Ok(Number::Int(produit(1, n)))
}

fn comb(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    let n = borne(&args[0].to_natural("comb")?, "comb")?;
    let r = borne(&args[1].to_natural("comb")?, "comb")?;
    if r > n {
        return Ok(Number::Int(BigInt::zero()));
    }
    // symétrie : C(n, r) = C(n, n-r), on garde le plus petit
    let k = r.min(n - r);

    let mut acc = BigInt::one();
    for i in 0..k {
        // acc = C(n, i+1), division exacte à chaque pas
        acc = acc * (n - i) / (i + 1);
    }
    Ok(Number::Int(acc))
}

fn perm(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    let n = borne(&args[0].to_natural("perm")?, "perm")?;
    let r = borne(&args[1].to_natural("perm")?, "perm")?;
    if r > n {
        return Ok(Number::Int(BigInt::zero()));
    }
    Ok(Number::Int(produit(n - r + 1, n)))
}

fn rad(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    fini(un(args)?.to_radians())
}

fn deg(args: &[Number], _: EvaluationMode) -> Result<Number, EvalError> {
    fini(un(args)?.to_degrees())
}

fn sin(args: &[Number], mode: EvaluationMode) -> Result<Number, EvalError> {
    fini(trig(TrigFn::Sin, un(args)?, mode)?)
}

fn cos(args: &[Number], mode: EvaluationMode) -> Result<Number, EvalError> {
    fini(trig(TrigFn::Cos, un(args)?, mode)?)
}

fn tan(args: &[Number], mode: EvaluationMode) -> Result<Number, EvalError> {
    fini(trig(TrigFn::Tan, un(args)?, mode)?)
}

fn asin(args: &[Number], mode: EvaluationMode) -> Result<Number, EvalError> {
    fini(inv_trig(InvTrigFn::Asin, un(args)?, mode)?)
}

fn acos(args: &[Number], mode: EvaluationMode) -> Result<Number, EvalError> {
    fini(inv_trig(InvTrigFn::Acos, un(args)?, mode)?)
}

fn atan(args: &[Number], mode: EvaluationMode) -> Result<Number, EvalError> {
    fini(inv_trig(InvTrigFn::Atan, un(args)?, mode)?)
}
