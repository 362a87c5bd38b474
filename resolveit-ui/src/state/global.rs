//! Global Application State
//!
//! Reactive state management using Leptos signals. The session lives only
//! in memory, so a page reload signs the user out.

use gloo_timers::callback::Timeout;
use leptos::*;

use crate::api;
use super::models::{Session, User};

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Signed-in user and token
    pub session: RwSignal<Option<Session>>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
    success_timer: StoredValue<Option<Timeout>>,
    error_timer: StoredValue<Option<Timeout>>,
}

/// Keep `timer` as the pending auto-clear. The one it replaces is dropped,
/// which cancels it.
fn rearm<T>(slot: &mut Option<T>, timer: T) {
    slot.replace(timer);
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        session: create_rw_signal(None),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
        success_timer: store_value(None),
        error_timer: store_value(None),
    };

    provide_context(state);
}

pub fn use_global_state() -> GlobalState {
    use_context::<GlobalState>().expect("GlobalState not found")
}

impl GlobalState {
    pub fn sign_in(&self, session: Session) {
        api::set_token(Some(session.token.clone()));
        self.session.set(Some(session));
    }

    pub fn sign_out(&self) {
        api::set_token(None);
        self.session.set(None);
    }

    pub fn user(&self) -> Option<User> {
        self.session.with(|s| s.as_ref().map(|s| s.user.clone()))
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.with(Option::is_some)
    }

    pub fn is_staff(&self) -> bool {
        self.session
            .with(|s| s.as_ref().is_some_and(|s| s.user.is_staff()))
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        let timer = Timeout::new(3000, move || {
            success_signal.set(None);
        });
        self.success_timer.update_value(|slot| rearm(slot, timer));
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        web_sys::console::error_1(&message.into());
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        let timer = Timeout::new(5000, move || {
            error_signal.set(None);
        });
        self.error_timer.update_value(|slot| rearm(slot, timer));
    }

    pub fn clear_error(&self) {
        self.error_timer.set_value(None);
        self.error.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked(Rc<Cell<u32>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_rearm_cancels_previous_timer() {
        let dropped = Rc::new(Cell::new(0));
        let mut slot = None;

        rearm(&mut slot, Tracked(dropped.clone()));
        assert_eq!(dropped.get(), 0);

        rearm(&mut slot, Tracked(dropped.clone()));
        assert_eq!(dropped.get(), 1);
        assert!(slot.is_some());

        slot = None;
        assert_eq!(dropped.get(), 2);
        assert!(slot.is_none());
    }
}
