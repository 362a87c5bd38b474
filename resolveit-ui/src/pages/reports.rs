//! Reports Page
//!
//! Staff overview: rates, status and category breakdowns, CSV export.

use leptos::*;

use crate::api;
use crate::components::{Loading, StatCard};
use crate::state::models::percent;
use crate::state::{use_global_state, Stats};

#[component]
pub fn Reports() -> impl IntoView {
    let state = use_global_state();
    let stats = create_rw_signal(None::<Stats>);
    let (exporting, set_exporting) = create_signal(false);

    create_effect(move |_| {
        spawn_local(async move {
            match api::complaints::stats().await {
                Ok(s) => stats.set(Some(s)),
                Err(e) => state.show_error(&format!("Failed to load statistics: {}", e)),
            }
        });
    });

    let export = move |_| {
        set_exporting.set(true);
        spawn_local(async move {
            match api::complaints::export_csv().await {
                Ok(file_name) => state.show_success(&format!("Downloaded {}", file_name)),
                Err(e) => state.show_error(&format!("Export failed: {}", e)),
            }
            set_exporting.set(false);
        });
    };

    view! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Reports"</h1>
                <button
                    on:click=export
                    disabled=move || exporting.get()
                    class="px-5 py-3 bg-indigo-600 hover:bg-indigo-700 disabled:bg-gray-400 text-white rounded-lg font-medium"
                >
                    {move || if exporting.get() { "Exporting..." } else { "⬇ Export CSV" }}
                </button>
            </div>

            {move || match stats.get() {
                None => view! { <Loading /> }.into_view(),
                Some(s) => {
                    let total = s.total;
                    let rate = s.resolution_rate();
                    let escalation = percent(s.escalated, total);
                    view! {
                        <section class="grid grid-cols-2 md:grid-cols-4 gap-4">
                            <StatCard label="Total complaints" icon="📋" value=total.to_string() />
                            <StatCard label="Open cases" icon="📂" accent="text-blue-600"
                                value=s.open.to_string() />
                            <StatCard label="Resolution rate" icon="✅" accent="text-green-600"
                                value=format!("{}%", rate) />
                            <StatCard label="Escalation rate" icon="⚠" accent="text-red-600"
                                value=format!("{}%", escalation) />
                        </section>
                        <div class="grid md:grid-cols-2 gap-8">
                            <BarChart title="By status" total=total
                                rows=s.status_rows().into_iter().map(|(l, n)| (l.to_string(), n)).collect() />
                            <BarChart title="By category" total=total
                                rows=s.categories.into_iter().collect() />
                        </div>
                    }.into_view()
                }
            }}
        </div>
    }
}

#[component]
fn BarChart(title: &'static str, total: i64, rows: Vec<(String, i64)>) -> impl IntoView {
    view! {
        <section class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
            <h2 class="text-lg font-semibold mb-4">{title}</h2>
            {if rows.is_empty() {
                view! { <p class="text-gray-500 text-sm">"No data"</p> }.into_view()
            } else {
                rows.into_iter().map(|(label, count)| {
                    let width = format!("width: {}%", percent(count, total));
                    view! {
                        <div class="mb-3">
                            <div class="flex justify-between text-sm mb-1">
                                <span>{label}</span>
                                <span class="text-gray-500">{count}</span>
                            </div>
                            <div class="h-2 bg-gray-100 rounded">
                                <div class="h-2 bg-indigo-500 rounded" style=width />
                            </div>
                        </div>
                    }
                }).collect_view()
            }}
        </section>
    }
}
