/// What the frame loop does after `get_current_texture` fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost/outdated swapchain was reconfigured; the next frame may render.
    Reconfigured,
    /// Timeout or other transient failure; drop this frame only.
    SkipFrame,
    /// Out of memory. The runtime exits.
    Fatal,
}
