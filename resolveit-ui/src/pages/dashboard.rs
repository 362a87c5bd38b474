//! Dashboard Page
//!
//! Headline counts and the five newest complaints visible to the user.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::{ListSkeleton, PriorityBadge, StatCard, StatusBadge};
use crate::state::{use_global_state, Complaint, Stats};

/// Newest first, at most `limit`
pub fn recent(mut complaints: Vec<Complaint>, limit: usize) -> Vec<Complaint> {
    complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    complaints.truncate(limit);
    complaints
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_global_state();

    let stats = create_rw_signal(Stats::default());
    let latest = create_rw_signal(Vec::<Complaint>::new());
    let (loaded, set_loaded) = create_signal(false);

    create_effect(move |_| {
        let staff = state.is_staff();
        spawn_local(async move {
            state.loading.set(true);

            let list = async {
                if staff {
                    api::complaints::all().await
                } else {
                    api::complaints::mine().await
                }
            };
            let (stats_result, list_result) =
                futures_util::join!(api::complaints::stats(), list);

            match stats_result {
                Ok(s) => stats.set(s),
                Err(e) => state.show_error(&format!("Failed to load statistics: {}", e)),
            }
            match list_result {
                Ok(items) => latest.set(recent(items, 5)),
                Err(e) => state.show_error(&format!("Failed to load complaints: {}", e)),
            }

            set_loaded.set(true);
            state.loading.set(false);
        });
    });

    let greeting = move || {
        state
            .user()
            .map(|u| format!("Welcome, {}", u.name))
            .unwrap_or_default()
    };

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Dashboard"</h1>
                    <p class="text-gray-500 mt-1">{greeting}</p>
                </div>
                <A href="/submit" class="px-5 py-3 bg-indigo-600 hover:bg-indigo-700 text-white rounded-lg font-medium">
                    "+ New Complaint"
                </A>
            </div>

            <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
                <StatCard label="Open" icon="📂" accent="text-blue-600"
                    value=Signal::derive(move || stats.with(|s| s.open.to_string())) />
                <StatCard label="Resolved" icon="✅" accent="text-green-600"
                    value=Signal::derive(move || stats.with(|s| s.resolved.to_string())) />
                <StatCard label="Total" icon="📋"
                    value=Signal::derive(move || stats.with(|s| s.total.to_string())) />
                <StatCard label="Resolution rate" icon="📈" accent="text-indigo-600"
                    value=Signal::derive(move || stats.with(|s| format!("{}%", s.resolution_rate()))) />
            </section>

            <section class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
                <h2 class="text-xl font-semibold mb-4">"Recent complaints"</h2>
                {move || {
                    if !loaded.get() {
                        return view! { <ListSkeleton count=5 /> }.into_view();
                    }
                    let items = latest.get();
                    if items.is_empty() {
                        return view! {
                            <p class="text-gray-500">"No complaints yet."</p>
                        }.into_view();
                    }
                    view! {
                        <ul class="divide-y divide-gray-100">
                            {items.into_iter().map(|c| view! { <ComplaintRow complaint=c /> }).collect_view()}
                        </ul>
                    }.into_view()
                }}
            </section>
        </div>
    }
}

/// One linked list row, shared with the "My Complaints" page
#[component]
pub fn ComplaintRow(complaint: Complaint) -> impl IntoView {
    let href = format!("/status/{}", complaint.complaint_id);
    let created = complaint.created_at.format("%d %b %Y").to_string();
    let anonymous = complaint.is_anonymous;

    view! {
        <li class="py-3">
            <A href=href class="flex items-center justify-between hover:bg-gray-50 rounded-lg px-2 py-1">
                <div>
                    <div class="font-medium text-gray-900">
                        "#"{complaint.complaint_id}" "{complaint.title}
                    </div>
                    <div class="text-xs text-gray-500">
                        {complaint.category}" · "{created}
                        {anonymous.then(|| view! { <span class="ml-2 italic">"anonymous"</span> })}
                    </div>
                </div>
                <div class="flex items-center space-x-3">
                    <PriorityBadge priority=complaint.priority />
                    <StatusBadge status=complaint.status />
                </div>
            </A>
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn complaint(id: i64, days_ago: i64) -> Complaint {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Complaint {
            complaint_id: id,
            title: format!("Complaint {}", id),
            description: String::new(),
            category: "General".into(),
            priority: "LOW".into(),
            status: "NEW".into(),
            is_anonymous: false,
            anonymous_email: None,
            user: None,
            assigned_to: None,
            created_at: base - Duration::days(days_ago),
            resolved_at: None,
        }
    }

    #[test]
    fn test_recent_sorts_newest_first_and_limits() {
        let items = (1..=7).map(|i| complaint(i, 10 - i)).collect();
        let top = recent(items, 5);
        let ids: Vec<i64> = top.iter().map(|c| c.complaint_id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }
}
