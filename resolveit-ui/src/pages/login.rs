//! Login Page

use leptos::*;
use leptos_router::*;

use super::{INPUT_CLASS, PRIMARY_BUTTON};
use crate::api;
use crate::state::use_global_state;
use crate::state::validation::validate_login;

#[component]
pub fn Login() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let (email, password) = (email.get(), password.get());
        if let Err(message) = validate_login(&email, &password) {
            state.show_error(&message);
            return;
        }

        set_submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::auth::login(email.trim(), &password).await {
                Ok(session) => {
                    let name = session.user.name.clone();
                    state.sign_in(session);
                    state.show_success(&format!("Welcome back, {}", name));
                    navigate("/dashboard", Default::default());
                }
                Err(e) => state.show_error(&e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-md mx-auto mt-16 bg-white rounded-xl shadow p-8 space-y-6">
            <div class="text-center">
                <div class="text-5xl mb-2">"🎓"</div>
                <h1 class="text-2xl font-bold">"Sign in to ResolveIT"</h1>
                <p class="text-gray-500 mt-1">"Track and resolve campus grievances"</p>
            </div>

            <form on:submit=on_submit class="space-y-4">
                <input
                    type="email"
                    placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <button type="submit" disabled=move || submitting.get() class=format!("w-full {}", PRIMARY_BUTTON)>
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>

            <p class="text-center text-sm text-gray-600">
                "No account? "
                <A href="/register" class="text-indigo-600 hover:underline">"Register"</A>
            </p>

            <ServerSettings />
        </div>
    }
}

/// API URL override with a reachability check
#[component]
fn ServerSettings() -> impl IntoView {
    let state = use_global_state();

    let (api_url, set_api_url) = create_signal(api::get_api_base());
    let (testing, set_testing) = create_signal(false);

    let test_connection = move |_| {
        set_testing.set(true);
        api::set_api_base(&api_url.get());

        spawn_local(async move {
            match api::auth::check_health().await {
                Ok(()) => state.show_success("Connection successful!"),
                Err(e) => state.show_error(&format!("Connection failed: {}", e)),
            }
            set_testing.set(false);
        });
    };

    view! {
        <details class="text-sm text-gray-600">
            <summary class="cursor-pointer">"Server settings"</summary>
            <div class="flex space-x-2 mt-3">
                <input
                    type="text"
                    prop:value=move || api_url.get()
                    on:input=move |ev| set_api_url.set(event_target_value(&ev))
                    class="flex-1 rounded-lg px-3 py-2 border border-gray-300"
                />
                <button
                    on:click=test_connection
                    disabled=move || testing.get()
                    class="px-3 py-2 bg-gray-200 hover:bg-gray-300 rounded-lg"
                >
                    {move || if testing.get() { "Testing..." } else { "Save & test" }}
                </button>
            </div>
        </details>
    }
}
