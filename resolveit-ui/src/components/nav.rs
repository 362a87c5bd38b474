//! Navigation Component
//!
//! Header navigation bar. Staff see the directory and reports links.

use leptos::*;
use leptos_router::*;

use crate::state::use_global_state;

#[component]
pub fn Nav() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let sign_out = move |_| {
        state.sign_out();
        state.show_success("Signed out");
        navigate("/login", Default::default());
    };

    view! {
        <nav class="bg-indigo-700 text-white">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href="/dashboard" class="flex items-center space-x-3">
                        <span class="text-2xl">"🎓"</span>
                        <span class="text-xl font-bold">"ResolveIT"</span>
                    </A>

                    <div class="flex items-center space-x-1">
                        <NavLink href="/dashboard" label="Dashboard" />
                        <NavLink href="/submit" label="New Complaint" />
                        <NavLink href="/my-complaints" label="My Complaints" />
                        <Show when=move || state.is_staff()>
                            <NavLink href="/students" label="Students" />
                            <NavLink href="/reports" label="Reports" />
                        </Show>
                        <NavLink href="/profile" label="Profile" />
                        <button
                            on:click=sign_out
                            class="ml-2 px-4 py-2 rounded-lg bg-indigo-800 hover:bg-indigo-900 transition-colors"
                        >
                            "Sign out"
                        </button>
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Individual navigation link
#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-4 py-2 rounded-lg text-indigo-100 hover:text-white hover:bg-indigo-600 transition-colors"
            active_class="bg-indigo-600 text-white"
        >
            {label}
        </A>
    }
}
