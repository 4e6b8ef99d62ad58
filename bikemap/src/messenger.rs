/// Channel the map uses to tell the host that its visual state changed and must be redrawn.
pub trait Messenger: Send + Sync {
    /// Requests a redraw of the map.
    fn request_redraw(&self);
}

