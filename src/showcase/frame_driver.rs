use crate::errors::Result;
use crate::renderer::RenderSurface;
use crate::showcase::state::SceneState;
use crate::utils::Clock;

/// Per-frame work: clock read, mixer advance, matrix update, render.
#[derive(Debug, Default)]
pub struct FrameDriver {
    clock: Clock,
}

impl FrameDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame against `surface`. Render faults are returned to the
    /// caller.
    pub fn frame<R>(&mut self, state: &mut SceneState, surface: &mut R) -> Result<()>
    where
        R: RenderSurface + ?Sized,
    {
        let dt = self.clock.delta_seconds();
        Self::advance(dt, state);
        state.scene.update();
        surface.render(&state.scene, state.camera)
    }

    /// Advances every mixer by `dt` times its instance's playback rate.
    /// Before the model has loaded there are no mixers and nothing happens.
    pub fn advance(dt: f32, state: &mut SceneState) {
        let Some(flock) = state.flock.as_mut() else {
            return;
        };
        for member in &mut flock.members {
            member.mixer.update(dt * member.playback_rate, &mut state.scene);
        }
    }
}
