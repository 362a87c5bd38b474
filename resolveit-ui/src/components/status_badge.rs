//! Status and priority pills.

use leptos::*;

use crate::state::models::status_label;

fn status_class(status: &str) -> &'static str {
    match status {
        "NEW" => "bg-blue-100 text-blue-800",
        "UNDER_REVIEW" | "IN_PROGRESS" => "bg-yellow-100 text-yellow-800",
        "RESOLVED" => "bg-green-100 text-green-800",
        "CLOSED" => "bg-gray-200 text-gray-700",
        "ESCALATED" => "bg-red-100 text-red-800",
        _ => "bg-gray-100 text-gray-700",
    }
}

fn priority_class(priority: &str) -> &'static str {
    match priority {
        "HIGH" => "text-red-600",
        "MEDIUM" => "text-yellow-600",
        _ => "text-gray-500",
    }
}

#[component]
pub fn StatusBadge(#[prop(into)] status: String) -> impl IntoView {
    view! {
        <span class=format!(
            "px-2 py-1 rounded-full text-xs font-semibold {}",
            status_class(&status)
        )>
            {status_label(&status)}
        </span>
    }
}

#[component]
pub fn PriorityBadge(#[prop(into)] priority: String) -> impl IntoView {
    view! {
        <span class=format!("text-xs font-medium {}", priority_class(&priority))>
            {priority}
        </span>
    }
}
