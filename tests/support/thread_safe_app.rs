//! Mutex-guarded Bevy `App` that rspec fixtures can share between closures.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::App;

/// `App` wrapper that is `Send + Sync` because every access goes through a
/// mutex.
#[derive(Debug)]
pub struct ThreadSafeApp(pub App);

impl Deref for ThreadSafeApp {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ThreadSafeApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SAFETY: rspec requires fixtures to be `Send + Sync` but the suites run
// serially (see `rspec_runner::run_serial`), and the wrapped `App` is only
// reached through the mutex in `SharedApp`.
unsafe impl Send for ThreadSafeApp {}
unsafe impl Sync for ThreadSafeApp {}

/// Shared handle to a wrapped app.
pub type SharedApp = Arc<Mutex<ThreadSafeApp>>;

/// Wraps `app` for sharing.
pub fn share(app: App) -> SharedApp {
    Arc::new(Mutex::new(ThreadSafeApp(app)))
}

/// Locks the shared app, recovering from a poisoned mutex so one failed
/// example does not cascade into the rest of the suite.
pub fn lock_app(app: &SharedApp) -> MutexGuard<'_, ThreadSafeApp> {
    app.lock().unwrap_or_else(PoisonError::into_inner)
}
