//! Screen extent.
//!
//! The root view resolves against the screen, and content→screen
//! conversions can clamp to it. The extent is one reactive signal: a
//! [`ViewTree`](crate::ViewTree) without a fixed screen reads it on every
//! pass, so a `layout` call inside a spark-signals `effect` re-runs when a
//! resize handler calls [`set_screen_size`].

use spark_signals::{signal, Signal};

use crate::types::Size;

const FALLBACK: Size = Size::new(80, 24);

thread_local! {
    static SCREEN: Signal<Size> = signal(FALLBACK);
}

/// Current screen extent. Tracked when read inside an effect.
pub fn screen_size() -> Size {
    SCREEN.with(|screen| screen.get())
}

/// Replace the screen extent (called on resize events). Negative extents
/// are clamped to zero.
pub fn set_screen_size(size: Size) {
    SCREEN.with(|screen| screen.set(size.clamped()));
}

/// Query the terminal and store its extent.
///
/// Leaves the current extent alone when stdout is not a terminal.
pub fn detect_screen_size() {
    match crossterm::terminal::size() {
        Ok((columns, rows)) => set_screen_size(Size::new(columns as i32, rows as i32)),
        Err(err) => {
            let current = screen_size();
            log::debug!("terminal size unavailable, keeping {}x{}: {err}", current.width, current.height);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
