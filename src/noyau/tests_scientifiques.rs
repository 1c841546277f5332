//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur, bits)
//! - toute erreur laisse ANS intact

use std::time::{Duration, Instant};

use super::fonctions::MAX_COMBINATOIRE;
use super::format::format_display;
use super::rpn::{MAX_NOEUDS, MAX_PROFONDEUR};
use super::{Engine, EvalError, EvaluationMode, Number};

const EPS: f64 = 1e-9;

fn moteur(mode: EvaluationMode) -> Engine {
    Engine::new(mode)
}

fn affiche(e: &mut Engine, expr: &str) -> String {
    match e.evaluate(expr) {
        Ok(Some(v)) => format_display(&v),
        Ok(None) => panic!("expr={expr:?} : entrée vide inattendue"),
        Err(err) => panic!("expr={expr:?} err={err}"),
    }
}

fn reel(e: &mut Engine, expr: &str) -> f64 {
    match e.evaluate(expr) {
        Ok(Some(v)) => v.to_f64().unwrap_or_else(|err| panic!("expr={expr:?} err={err}")),
        other => panic!("expr={expr:?} : {other:?}"),
    }
}

fn erreur(e: &mut Engine, expr: &str) -> EvalError {
    let avant = e.last_result().clone();
    let err = match e.evaluate(expr) {
        Err(err) => err,
        Ok(v) => panic!("expr={expr:?} devrait échouer, obtenu {v:?}"),
    };
    assert_eq!(e.last_result(), &avant, "ANS modifié par l’échec de {expr:?}");
    err
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Invariants trig (degrés) ------------------------ */

#[test]
fn sci_tan_indefinie_aux_quarts_impairs() {
    let mut e = moteur(EvaluationMode::Degrees);
    for angle in ["90", "270", "-90", "450", "90+360"] {
        assert!(
            matches!(erreur(&mut e, &format!("tan({angle})")), EvalError::Domain(_)),
            "tan({angle})"
        );
    }
}

#[test]
fn sci_identites_symetrie() {
    let mut e = moteur(EvaluationMode::Degrees);
    for x in ["17", "30", "45", "60", "123.5"] {
        let s = reel(&mut e, &format!("sin({x})"));
        let sn = reel(&mut e, &format!("sin(-{x})"));
        assert!((s + sn).abs() < EPS, "sin(-x) = -sin(x) pour {x}");

        let c = reel(&mut e, &format!("cos({x})"));
        let cn = reel(&mut e, &format!("cos(-{x})"));
        assert!((c - cn).abs() < EPS, "cos(-x) = cos(x) pour {x}");

        let un = reel(&mut e, &format!("sin({x})^2 + cos({x})^2"));
        assert!((un - 1.0).abs() < EPS, "sin²+cos² pour {x}");
    }
}

#[test]
fn sci_periodicite_degres() {
    let mut e = moteur(EvaluationMode::Degrees);
    for x in ["30", "45", "10"] {
        let a = reel(&mut e, &format!("sin({x})"));
        let b = reel(&mut e, &format!("sin({x}+360)"));
        assert!((a - b).abs() < EPS);

        let t = reel(&mut e, &format!("tan({x})"));
        let t2 = reel(&mut e, &format!("tan({x}+180)"));
        assert!((t - t2).abs() < 1e-7);
    }
    assert_eq!(affiche(&mut e, "sin(180)"), "0");
    assert_eq!(affiche(&mut e, "cos(720)"), "1");
}

#[test]
fn sci_radians_et_degres_concordent() {
    let mut d = moteur(EvaluationMode::Degrees);
    let mut r = moteur(EvaluationMode::Radians);
    for x in ["15", "75", "200"] {
        let vd = reel(&mut d, &format!("sin({x})"));
        let vr = reel(&mut r, &format!("sin(rad({x}))"));
        assert!((vd - vr).abs() < EPS, "x={x}");
    }
    assert!((reel(&mut d, "asin(0.5)") - 30.0).abs() < EPS);
    assert!((reel(&mut r, "deg(asin(0.5))") - 30.0).abs() < EPS);
}

/* ------------------------ Cohérence numérique ------------------------ */

#[test]
fn sci_entiers_exacts() {
    let mut e = moteur(EvaluationMode::Degrees);
    assert_eq!(affiche(&mut e, "2**64"), "18446744073709551616");
    assert_eq!(affiche(&mut e, "fact(30)"), "265252859812191058636308480000000");
    assert_eq!(affiche(&mut e, "nCr(60, 30)"), "118264581564861424");
    assert_eq!(affiche(&mut e, "nPr(10, 3)"), "720");
    assert_eq!(affiche(&mut e, "(1/2 + 1/4) - 3/4"), "0");
    assert_eq!(affiche(&mut e, "sqrt(16)"), "4");
}

#[test]
fn sci_division_produit_toujours_reel() {
    let mut e = moteur(EvaluationMode::Degrees);
    let v = e.evaluate("6/3").unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(v, Some(Number::Float(2.0)));
    assert_eq!(affiche(&mut e, "6/3"), "2");
    assert_eq!(affiche(&mut e, "1/3"), "0.333333333333");
}

#[test]
fn sci_erreurs_laissent_ans() {
    let mut e = moteur(EvaluationMode::Degrees);
    assert_eq!(affiche(&mut e, "41+1"), "42");
    assert!(matches!(erreur(&mut e, "1/0"), EvalError::Arithmetic(_)));
    assert!(matches!(erreur(&mut e, "sqrt(-1)"), EvalError::Domain(_)));
    assert!(matches!(erreur(&mut e, "foo(2)"), EvalError::UnknownName(_)));
    assert!(matches!(erreur(&mut e, "2+*3"), EvalError::Syntax(_)));
    assert!(matches!(erreur(&mut e, "10.0**400"), EvalError::Arithmetic(_)));
    assert_eq!(affiche(&mut e, "ANS"), "42");
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_bornee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(200);
    let mut e = moteur(EvaluationMode::Radians);

    // juste sous la borne : accepté
    let n = MAX_PROFONDEUR / 2;
    let expr = format!("{}1{}", "abs(".repeat(n), ")".repeat(n));
    assert_eq!(affiche(&mut e, &expr), "1");
    budget(t0, max);

    // au-delà : refusé proprement, pas de débordement de pile
    let n = MAX_PROFONDEUR * 4;
    let expr = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    assert!(matches!(erreur(&mut e, &expr), EvalError::Syntax(_)));
    budget(t0, max);
}

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);
    let mut e = moteur(EvaluationMode::Degrees);

    // chaînes plates bien plus longues que la borne d’imbrication : acceptées
    let expr = vec!["1/2"; 600].join(" + ");
    assert_eq!(affiche(&mut e, &expr), "300");
    budget(t0, max);

    let expr = vec!["1"; MAX_PROFONDEUR * 4].join("+");
    assert_eq!(affiche(&mut e, &expr), (MAX_PROFONDEUR * 4).to_string());
    let n = MAX_PROFONDEUR + 10;
    let produit = vec!["2"; n].join(" * ") + " - 1";
    let attendu = affiche(&mut e, &format!("2**{n} - 1"));
    assert_eq!(affiche(&mut e, &produit), attendu);
    budget(t0, max);

    // au-delà du nombre de nœuds : trop grand, ANS gardé
    let expr = vec!["1"; MAX_NOEUDS].join("+");
    assert!(matches!(erreur(&mut e, &expr), EvalError::Arithmetic(_)));
    budget(t0, max);
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);
    let mut e = moteur(EvaluationMode::Degrees);

    let big = "9".repeat(100);
    let attendu = format!("1{}", "0".repeat(100));
    assert_eq!(affiche(&mut e, &format!("{big} + 1")), attendu);
    budget(t0, max);

    // exposants démesurés refusés sans calcul
    assert!(matches!(erreur(&mut e, "2**10000000"), EvalError::Arithmetic(_)));
    assert!(matches!(erreur(&mut e, "9**9**9"), EvalError::Arithmetic(_)));
    budget(t0, max);

    let trop = format!("fact({})", MAX_COMBINATOIRE + 1);
    assert!(matches!(erreur(&mut e, &trop), EvalError::Arithmetic(_)));
    budget(t0, max);
}
