//! Signal sonore : un « bip » sans charge utile, indépendant de la parole.

use std::io::Write;

/// Collaborateur sonore : déclenché, rien d’autre.
pub trait AudioCue {
    fn trigger(&mut self);
}

/// Cloche du terminal (BEL) ; les erreurs d’écriture sont ignorées.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalBell;

impl AudioCue for TerminalBell {
    fn trigger(&mut self) {
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }
}

/// Porte booléenne devant un signal.
pub struct CueGate<C> {
    cue: C,
    enabled: bool,
}

impl<C: AudioCue> CueGate<C> {
    pub fn new(cue: C, enabled: bool) -> Self {
        Self { cue, enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn trigger(&mut self) {
        if self.enabled {
            self.cue.trigger();
        }
    }
}

impl<C: AudioCue + ?Sized> AudioCue for Box<C> {
    fn trigger(&mut self) {
        (**self).trigger();
    }
}
