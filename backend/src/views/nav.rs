// src/views/nav.rs

use crate::views::{auth::Identity, route::Route};

/// Something whose scrolling can be suspended while an overlay is open.
pub trait ScrollSurface {
    fn set_scroll_locked(&self, locked: bool);
}

/// Holds the surface locked; unlocks on drop.
pub struct ScrollLock<'a, S: ScrollSurface + ?Sized> {
    surface: &'a S,
}

impl<'a, S: ScrollSurface + ?Sized> ScrollLock<'a, S> {
    pub fn acquire(surface: &'a S) -> Self {
        surface.set_scroll_locked(true);
        Self { surface }
    }
}

impl<S: ScrollSurface + ?Sized> Drop for ScrollLock<'_, S> {
    fn drop(&mut self) {
        self.surface.set_scroll_locked(false);
    }
}

/// The mobile navigation menu. Scrolling stays locked exactly as long as
/// the menu is open, including when the menu itself goes away.
pub struct NavMenu<'a, S: ScrollSurface + ?Sized> {
    surface: &'a S,
    lock: Option<ScrollLock<'a, S>>,
}

impl<'a, S: ScrollSurface + ?Sized> NavMenu<'a, S> {
    pub fn new(surface: &'a S) -> Self {
        Self {
            surface,
            lock: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock.is_some()
    }

    pub fn open(&mut self) {
        if self.lock.is_none() {
            self.lock = Some(ScrollLock::acquire(self.surface));
        }
    }

    pub fn close(&mut self) {
        self.lock = None;
    }

    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    /// Menu entries. The dashboard is only offered to signed-in users.
    pub fn links(&self, identity: &dyn Identity) -> Vec<(&'static str, Route)> {
        let mut links = vec![("Home", Route::Home), ("Quiz", Route::QuizStart)];
        if identity.is_loaded() && identity.is_signed_in() {
            links.push(("Dashboard", Route::Dashboard));
        }
        links.push(("Leaderboard", Route::Leaderboard));
        links
    }
}
