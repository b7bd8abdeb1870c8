//=========================================================================
// Effect Manager
//=========================================================================
//
// Holds the visual effects a state owns. Effects are updated and rendered
// alongside their state and are told when the graphics context goes away
// so they can rebuild their resources.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::Lifecycle;

//=== Effect Trait ========================================================

/// A visual effect owned by a state.
pub trait Effect: Send {
    /// Advances the effect. Returns `false` once it has expired.
    fn update(&mut self, delta: f32) -> bool;

    fn render(&mut self, _delta: f32) {}

    fn on_lost_context(&mut self) {}

    fn on_new_context(&mut self) {}

    fn on_resize(&mut self, _width: u32, _height: u32) {}
}

//=== EffectManager =======================================================

/// Owns a state's effects and forwards lifecycle events to them.
#[derive(Default)]
pub struct EffectManager {
    effects: Vec<Box<dyn Effect>>,
    paused: bool,
}

impl EffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<E>(&mut self, effect: E)
    where
        E: Effect + 'static,
    {
        self.effects.push(Box::new(effect));
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl Lifecycle for EffectManager {
    fn on_pause(&mut self) {
        self.paused = true;
    }

    fn on_resume(&mut self) {
        self.paused = false;
    }

    fn on_lost_context(&mut self) {
        for effect in &mut self.effects {
            effect.on_lost_context();
        }
    }

    fn on_new_context(&mut self) {
        for effect in &mut self.effects {
            effect.on_new_context();
        }
    }

    fn on_render(&mut self, delta: f32) {
        for effect in &mut self.effects {
            effect.render(delta);
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        for effect in &mut self.effects {
            effect.on_resize(width, height);
        }
    }

    fn on_update(&mut self, delta: f32) {
        if self.paused {
            return;
        }

        // Expired effects are dropped in place
        self.effects.retain_mut(|effect| effect.update(delta));
    }

    fn remove_all(&mut self) {
        self.effects.clear();
    }
}

//=== Tests ===============================================================
