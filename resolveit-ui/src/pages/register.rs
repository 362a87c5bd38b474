//! Registration Page

use leptos::*;
use leptos_router::*;

use super::{INPUT_CLASS, PRIMARY_BUTTON};
use crate::api;
use crate::state::use_global_state;
use crate::state::validation::validate_register;

/// Confirmation text the API sends for a new account
const REGISTERED: &str = "Registered Successfully";

#[component]
pub fn Register() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (name, set_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let (name, email, password) = (name.get(), email.get(), password.get());
        if let Err(message) = validate_register(&name, &email, &password, &confirm.get()) {
            state.show_error(&message);
            return;
        }

        set_submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::auth::register(name.trim(), email.trim(), &password).await {
                Ok(message) if message == REGISTERED => {
                    state.show_success("Account created. Please sign in.");
                    navigate("/login", Default::default());
                }
                Ok(message) => state.show_error(&message),
                Err(e) => state.show_error(&e),
            }
            set_submitting.set(false);
        });
    };

    let field = move |kind: &'static str,
                      placeholder: &'static str,
                      value: ReadSignal<String>,
                      set: WriteSignal<String>| {
        view! {
            <input
                type=kind
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| set.set(event_target_value(&ev))
                class=INPUT_CLASS
            />
        }
    };

    view! {
        <div class="max-w-md mx-auto mt-16 bg-white rounded-xl shadow p-8 space-y-6">
            <div class="text-center">
                <h1 class="text-2xl font-bold">"Create an account"</h1>
                <p class="text-gray-500 mt-1">"Students can submit and follow complaints"</p>
            </div>

            <form on:submit=on_submit class="space-y-4">
                {field("text", "Full name", name, set_name)}
                {field("email", "Email", email, set_email)}
                {field("password", "Password", password, set_password)}
                {field("password", "Confirm password", confirm, set_confirm)}
                <button type="submit" disabled=move || submitting.get() class=format!("w-full {}", PRIMARY_BUTTON)>
                    {move || if submitting.get() { "Creating..." } else { "Register" }}
                </button>
            </form>

            <p class="text-center text-sm text-gray-600">
                "Already registered? "
                <A href="/login" class="text-indigo-600 hover:underline">"Sign in"</A>
            </p>
        </div>
    }
}
