//! Profile Page
//!
//! Account details and the notification inbox.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::ListSkeleton;
use crate::state::timeline::format_timestamp;
use crate::state::{use_global_state, Notification};

#[component]
pub fn Profile() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();
    let notifications = create_rw_signal(None::<Vec<Notification>>);

    create_effect(move |_| {
        spawn_local(async move {
            match api::notifications::mine().await {
                Ok(list) => notifications.set(Some(list)),
                Err(e) => {
                    notifications.set(Some(Vec::new()));
                    state.show_error(&format!("Failed to load notifications: {}", e));
                }
            }
        });
    });

    let mark_read = move |id: i64| {
        spawn_local(async move {
            match api::notifications::mark_read(id).await {
                Ok(()) => notifications.update(|list| {
                    if let Some(n) = list.iter_mut().flatten().find(|n| n.id == id) {
                        n.is_read = true;
                    }
                }),
                Err(e) => state.show_error(&e),
            }
        });
    };

    let sign_out = move |_| {
        state.sign_out();
        navigate("/login", Default::default());
    };

    view! {
        <div class="max-w-3xl mx-auto space-y-6">
            <section class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
                <h1 class="text-2xl font-bold mb-4">"Profile"</h1>
                {move || state.user().map(|u| view! {
                    <dl class="grid grid-cols-3 gap-4 text-sm">
                        <div><dt class="text-gray-500">"Name"</dt><dd class="font-medium">{u.name}</dd></div>
                        <div><dt class="text-gray-500">"Email"</dt><dd class="font-medium">{u.email}</dd></div>
                        <div><dt class="text-gray-500">"Role"</dt><dd class="font-medium">{u.role.replace('_', " ")}</dd></div>
                    </dl>
                })}
                <button
                    on:click=sign_out
                    class="mt-6 px-5 py-2 rounded-lg bg-red-600 hover:bg-red-700 text-white"
                >
                    "Sign out"
                </button>
            </section>

            <section class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
                <h2 class="text-xl font-semibold mb-4">"Notifications"</h2>
                {move || match notifications.get() {
                    None => view! { <ListSkeleton /> }.into_view(),
                    Some(list) if list.is_empty() => view! {
                        <p class="text-gray-500">"You're all caught up."</p>
                    }.into_view(),
                    Some(list) => view! {
                        <ul class="divide-y divide-gray-100">
                            {list.into_iter().map(|n| {
                                let id = n.id;
                                let link = n.complaint_id.map(|c| format!("/status/{}", c));
                                view! {
                                    <li class={if n.is_read { "py-3 opacity-60" } else { "py-3" }}>
                                        <div class="flex items-start justify-between">
                                            <div>
                                                <p class="font-medium">{n.title}</p>
                                                <p class="text-sm text-gray-600">{n.message}</p>
                                                <p class="text-xs text-gray-400 mt-1">{format_timestamp(&n.created_at)}</p>
                                            </div>
                                            <div class="flex items-center space-x-3 text-sm">
                                                {link.map(|href| view! {
                                                    <A href=href class="text-indigo-600 hover:underline">"View"</A>
                                                })}
                                                {(!n.is_read).then(|| view! {
                                                    <button on:click=move |_| mark_read(id) class="text-gray-500 hover:text-gray-800">
                                                        "Mark read"
                                                    </button>
                                                })}
                                            </div>
                                        </div>
                                    </li>
                                }
                            }).collect_view()}
                        </ul>
                    }.into_view(),
                }}
            </section>
        </div>
    }
}
