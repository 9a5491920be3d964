//! Background Slot
//!
//! Holds the optional full-screen image drawn behind the scene.
//!
//! # Architecture
//!
//! Image decoding happens outside the viewer. A caller asks for a new image
//! with [`BackgroundSlot::request`], receives a [`LoadTicket`], and later hands
//! the outcome back through [`BackgroundSlot::complete`]. Every request bumps
//! the slot generation, so a load that finishes after a newer request is
//! recognised as stale and dropped. A ticket is consumed by its first
//! completion; any further delivery on it is dropped as well.

use crate::errors::Result;

/// Decoded background image, ready for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundLayer {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Receipt for one background request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub url: String,
}

#[derive(Debug, Default)]
pub struct BackgroundSlot {
    generation: u64,
    /// Generation still waiting for its result.
    pending: Option<u64>,
    layer: Option<BackgroundLayer>,
}

impl BackgroundSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request. Any previous layer is dropped immediately and
    /// every outstanding ticket becomes stale.
    pub fn request(&mut self, url: &str) -> LoadTicket {
        self.generation += 1;
        self.pending = Some(self.generation);
        self.layer = None;
        log::debug!("Background request #{} for '{url}'", self.generation);
        LoadTicket {
            generation: self.generation,
            url: url.to_string(),
        }
    }

    /// Delivers the outcome of a load.
    ///
    /// Returns `true` when the ticket is the outstanding one, in which case
    /// the slot changed (loaded, or left empty on failure) and a redraw is
    /// due. Stale or already completed tickets are ignored and return `false`.
    pub fn complete(&mut self, ticket: &LoadTicket, result: Result<BackgroundLayer>) -> bool {
        if self.pending != Some(ticket.generation) {
            log::debug!(
                "Dropping background load #{} (current #{}, pending {:?})",
                ticket.generation,
                self.generation,
                self.pending
            );
            return false;
        }
        self.pending = None;

        match result {
            Ok(layer) => {
                log::info!("Background loaded: '{}' ({}x{})", layer.url, layer.width, layer.height);
                self.layer = Some(layer);
            }
            Err(err) => {
                log::warn!("{err}");
                self.layer = None;
            }
        }
        true
    }

    /// Currently committed layer, if any.
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<&BackgroundLayer> {
        self.layer.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ViewerError;

    fn layer(url: &str) -> BackgroundLayer {
        BackgroundLayer {
            url: url.to_string(),
            width: 4,
            height: 4,
        }
    }

    fn not_found(url: &str) -> ViewerError {
        ViewerError::BackgroundLoad {
            url: url.to_string(),
            reason: "404".to_string(),
        }
    }

    #[test]
    fn current_ticket_commits() {
        let mut slot = BackgroundSlot::new();
        let ticket = slot.request("a.png");
        assert!(slot.complete(&ticket, Ok(layer("a.png"))));
        assert_eq!(slot.current().map(|l| l.url.as_str()), Some("a.png"));
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut slot = BackgroundSlot::new();
        let first = slot.request("a.png");
        let second = slot.request("b.png");

        assert!(slot.complete(&second, Ok(layer("b.png"))));
        assert!(!slot.complete(&first, Ok(layer("a.png"))));
        assert_eq!(slot.current().map(|l| l.url.as_str()), Some("b.png"));
    }

    #[test]
    fn failure_leaves_slot_empty() {
        let mut slot = BackgroundSlot::new();
        let ticket = slot.request("missing.png");
        assert!(slot.complete(&ticket, Err(not_found("missing.png"))));
        assert!(slot.current().is_none());
    }

    #[test]
    fn ticket_is_consumed_by_first_completion() {
        let mut slot = BackgroundSlot::new();
        let ticket = slot.request("a.png");
        assert!(slot.complete(&ticket, Ok(layer("a.png"))));

        // A late failure on the same ticket must not wipe the committed layer.
        assert!(!slot.complete(&ticket, Err(not_found("a.png"))));
        assert!(!slot.complete(&ticket, Ok(layer("other.png"))));
        assert_eq!(slot.current().map(|l| l.url.as_str()), Some("a.png"));
    }
}
