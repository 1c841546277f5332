//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - toute erreur est typée, aucune ne panique
//! - invariant clé : un échec ne touche jamais ANS

use std::time::{Duration, Instant};

use super::format::format_display;
use super::{Engine, EvalError, EvaluationMode, SharedEngine};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}", rng.pick(1000)),
        3 => format!("{}.{}", rng.pick(100), rng.pick(100)),
        4 => format!("-{}", rng.pick(50)),
        _ => format!("{}e{}", 1 + rng.pick(9), rng.pick(5)),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 | 1 | 2 => gen_nombre(rng),
        3 => "pi".to_string(),
        4 => "e".to_string(),
        _ => "ANS".to_string(),
    }
}

const UNAIRES: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sqrt", "ln", "log", "exp", "abs", "floor",
    "ceil", "round", "fact",
];

const SYMBOLES: &[&str] = &["+", "-", "×", "÷", "^", "*", "/", "(", ")", ",", "π", "√"];

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(10) {
        0 => gen_atom(rng),
        1 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({}*{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("({}/{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("({})^{}", gen_expr(rng, depth - 1), rng.pick(4)),
        6 => format!("-{}", gen_expr(rng, depth - 1)),
        7 => {
            let f = UNAIRES[rng.pick(UNAIRES.len() as u32) as usize];
            format!("{f}({})", gen_expr(rng, depth - 1))
        }
        8 => format!("nCr({}, {})", rng.pick(30), rng.pick(30)),
        _ => format!("log({}, {})", gen_expr(rng, depth - 1), gen_atom(rng)),
    }
}

/// Bruit : suite arbitraire de symboles du clavier (majoritairement invalide).
fn gen_bruit(rng: &mut Rng) -> String {
    let n = 1 + rng.pick(12) as usize;
    (0..n)
        .map(|_| {
            if rng.coin() {
                SYMBOLES[rng.pick(SYMBOLES.len() as u32) as usize].to_string()
            } else {
                gen_atom(rng)
            }
        })
        .collect()
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_ans() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng_a = Rng::new(0xC0FFEE_u64);
    let mut rng_b = Rng::new(0xC0FFEE_u64);
    let mut a = Engine::new(EvaluationMode::Degrees);
    let mut b = Engine::new(EvaluationMode::Degrees);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let expr = gen_expr(&mut rng_a, 4);
        assert_eq!(expr, gen_expr(&mut rng_b, 4));

        let avant = a.last_result().clone();
        let ra = a.evaluate(&expr);
        let rb = b.evaluate(&expr);
        assert_eq!(
            ra.as_ref().map(|v| v.as_ref().map(format_display)),
            rb.as_ref().map(|v| v.as_ref().map(format_display)),
            "expr={expr:?}"
        );

        match ra {
            Ok(_) => seen_ok += 1,
            Err(_) => {
                assert_eq!(a.last_result(), &avant, "ANS modifié: expr={expr:?}");
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_bruit_clavier_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut e = Engine::new(EvaluationMode::Radians);
    let mut syntaxe = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_bruit(&mut rng);
        let avant = e.last_result().clone();
        match e.evaluate(&expr) {
            Ok(Some(v)) => assert_eq!(e.last_result(), &v),
            Ok(None) => assert_eq!(e.last_result(), &avant),
            Err(err) => {
                assert_eq!(e.last_result(), &avant, "expr={expr:?}");
                assert!(!err.to_string().is_empty());
                if matches!(err, EvalError::Syntax(_)) {
                    syntaxe += 1;
                }
            }
        }
    }

    assert!(syntaxe > 0, "le bruit devrait produire des erreurs de syntaxe");
}

#[test]
fn fuzz_safe_moteur_partage_concurrent() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let partage = SharedEngine::new(Engine::new(EvaluationMode::Degrees));
    let fils: Vec<_> = (0..4u64)
        .map(|k| {
            let moteur = partage.clone();
            std::thread::spawn(move || {
                let mut rng = Rng::new(0x5EED + k);
                for _ in 0..50 {
                    let expr = gen_expr(&mut rng, 3);
                    // résultat quelconque : seule compte l’absence de panique
                    let _ = moteur.evaluate(&expr);
                }
            })
        })
        .collect();

    for f in fils {
        assert!(f.join().is_ok());
    }
    budget(t0, max);

    // l’état reste utilisable
    let v = partage
        .evaluate("1+1")
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(v.as_ref().map(format_display), Some("2".to_string()));
}
