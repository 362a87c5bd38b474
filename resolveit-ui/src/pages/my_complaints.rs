//! My Complaints Page

use leptos::*;
use leptos_router::*;

use super::dashboard::{recent, ComplaintRow};
use crate::api;
use crate::components::ListSkeleton;
use crate::state::{use_global_state, Complaint};

#[component]
pub fn MyComplaints() -> impl IntoView {
    let state = use_global_state();
    let complaints = create_rw_signal(None::<Vec<Complaint>>);
    let (filter, set_filter) = create_signal(String::from("ALL"));

    create_effect(move |_| {
        spawn_local(async move {
            match api::complaints::mine().await {
                Ok(items) => complaints.set(Some(recent(items, usize::MAX))),
                Err(e) => {
                    complaints.set(Some(Vec::new()));
                    state.show_error(&format!("Failed to load complaints: {}", e));
                }
            }
        });
    });

    let visible = move || {
        let wanted = filter.get();
        complaints.get().map(|items| {
            items
                .into_iter()
                .filter(|c| wanted == "ALL" || c.status == wanted)
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"My Complaints"</h1>
                <select
                    on:change=move |ev| set_filter.set(event_target_value(&ev))
                    class="rounded-lg px-3 py-2 border border-gray-300"
                >
                    {["ALL", "NEW", "UNDER_REVIEW", "IN_PROGRESS", "RESOLVED", "CLOSED", "ESCALATED"]
                        .into_iter()
                        .map(|s| view! { <option value=s>{s.replace('_', " ")}</option> })
                        .collect_view()}
                </select>
            </div>

            <section class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
                {move || match visible() {
                    None => view! { <ListSkeleton count=4 /> }.into_view(),
                    Some(items) if items.is_empty() => view! {
                        <div class="text-center py-8 space-y-3">
                            <p class="text-gray-500">"Nothing to show."</p>
                            <A href="/submit" class="text-indigo-600 hover:underline">"Submit a complaint"</A>
                        </div>
                    }.into_view(),
                    Some(items) => view! {
                        <ul class="divide-y divide-gray-100">
                            {items.into_iter().map(|c| view! { <ComplaintRow complaint=c /> }).collect_view()}
                        </ul>
                    }.into_view(),
                }}
            </section>
        </div>
    }
}
