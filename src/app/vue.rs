// src/app/vue.rs
//
// Vue (UI egui)
// -------------
// Objectifs :
// - Clavier : Enter évalue, Backspace annonce « apagar » (quand le champ est focus)
// - Caractères tapés annoncés (chiffres au débit rapide), x/X tapés => ×
// - Gros boutons, focus redonné après clic (focus_entree)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use calculatrice_accessible::reglages::{
    DEBIT_MAX, DEBIT_MIN, MULTIPLICATEUR_MAX, MULTIPLICATEUR_MIN,
};

use super::etat::AppCalc;

/// Pavé : (libellé, jeton envoyé à `press`).
const PAVE: [[(&str, &str); 4]; 9] = [
    [("sin", "sin("), ("cos", "cos("), ("tan", "tan("), ("π", "π")],
    [("asin", "asin("), ("acos", "acos("), ("atan", "atan("), ("^", "^")],
    [("ln", "ln("), ("log", "log("), ("exp", "exp("), ("√", "sqrt(")],
    [("nCr", "nCr("), ("nPr", "nPr("), ("!", "fact("), ("ANS", "ANS")],
    [("7", "7"), ("8", "8"), ("9", "9"), ("÷", "÷")],
    [("4", "4"), ("5", "5"), ("6", "6"), ("×", "×")],
    [("1", "1"), ("2", "2"), ("3", "3"), ("-", "-")],
    [("0", "0"), (".", "."), ("(", "("), (")", ")")],
    [("C", "C"), ("⌫", "⌫"), ("=", "="), ("+", "+")],
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.ui_entree(ui);

                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&self.resultat).size(18.0));
                    ui.weak(format!("ANS = {}", self.ans()));
                });
                ui.add_space(6.0);

                self.ui_barre(ui);

                ui.add_space(6.0);
                self.ui_voix(ui);

                ui.add_space(8.0);
                self.ui_pave(ui);

                ui.add_space(8.0);
                self.ui_historique(ui);

                ui.add_space(6.0);
                ui.weak("Atalhos: Enter=Igual | Backspace=Apagar | Esc=C | F9=Graus/Radianos");
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        // IMPORTANT : id stable + focus contrôlé
        let id = ui.make_persistent_id("entree_edit");

        // x / X => × : retirés avant que le champ ne les insère
        if ui.memory(|m| m.has_focus(id)) {
            let remplacees: Vec<char> = ui.input_mut(|i| {
                let mut pris = Vec::new();
                i.events.retain(|e| match e {
                    egui::Event::Text(t) if t.chars().all(|c| matches!(c, 'x' | 'X')) => {
                        pris.extend(t.chars());
                        false
                    }
                    _ => true,
                });
                pris
            });
            for c in remplacees {
                self.touche_remplacee(c);
            }
        }

        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .font(egui::TextStyle::Heading)
                .hint_text("Ex: 2×3, sin(30), nCr(5, 2)")
                .id(id),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter rend le focus dans un champ mono-ligne
        if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.press("=");
            return;
        }

        if !resp.has_focus() {
            return;
        }

        // caractères tapés : déjà insérés par le champ, on les annonce
        let tapes: Vec<char> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Text(t) => Some(t.chars().collect::<Vec<_>>()),
                    _ => None,
                })
                .flatten()
                .collect()
        });
        for c in tapes {
            self.touche_clavier(c);
        }

        // --- Clavier : Backspace : le champ efface, on annonce ---
        if ui.input(|i| i.key_pressed(egui::Key::Backspace)) {
            self.annoncer_touche("⌫");
            self.focus_entree = true;
        }
    }

    fn ui_barre(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            if ui.button(self.libelle_mode()).clicked() {
                self.basculer_mode();
                self.focus_entree = true;
            }
            if ui.button("Ler expressão").clicked() {
                self.lire_expression();
                self.focus_entree = true;
            }
            if ui.button("Limpar (C)").clicked() {
                self.press("C");
            }
            if ui.button("Apagar (⌫)").clicked() {
                self.press("⌫");
            }

            let mut bip = self.bip_actif();
            if ui.checkbox(&mut bip, "Beep").changed() {
                self.set_bip(bip);
            }
        });
    }

    fn ui_voix(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Voz e velocidade")
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Velocidade da fala:");
                    let mut d = self.debit;
                    let resp = ui.add(egui::Slider::new(&mut d, DEBIT_MIN..=DEBIT_MAX).suffix(" wpm"));
                    if resp.changed() {
                        self.set_debit(d);
                    }
                });

                ui.horizontal(|ui| {
                    ui.checkbox(&mut self.chiffres_rapides, "Acelerar leitura de dígitos");
                    ui.label("Multiplicador:");
                    ui.add(
                        egui::Slider::new(
                            &mut self.multiplicateur,
                            MULTIPLICATEUR_MIN..=MULTIPLICATEUR_MAX,
                        )
                        .fixed_decimals(1)
                        .suffix("x"),
                    );
                });

                if ui.button("Testar voz").clicked() {
                    self.tester_voz();
                }
            });
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_calculatrice")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for rangee in PAVE {
                    for (libelle, jeton) in rangee {
                        let resp = ui.add_sized([96.0, 34.0], egui::Button::new(libelle));
                        if resp.clicked() {
                            self.press(jeton);
                        }
                    }
                    ui.end_row();
                }
            });
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Histórico")
            .default_open(true)
            .show(ui, |ui| {
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        if self.historique.is_empty() {
                            ui.weak("(vazio)");
                        }
                        for ligne in &self.historique {
                            ui.monospace(ligne.to_string());
                        }
                    });
            });
    }
}
