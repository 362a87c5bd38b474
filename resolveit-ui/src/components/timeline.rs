//! Timeline Component
//!
//! Vertical history of a complaint, newest first.

use leptos::*;

use crate::state::timeline::{build_timeline, TimelineItem};
use crate::state::TimelineEntry;

#[component]
pub fn Timeline(entries: Vec<TimelineEntry>) -> impl IntoView {
    let items = build_timeline(&entries);

    if items.is_empty() {
        return view! {
            <p class="text-gray-500 text-sm">"No history yet."</p>
        }
        .into_view();
    }

    view! {
        <ol class="relative border-l border-gray-200 ml-3 space-y-6">
            {items.into_iter().map(|item| view! { <TimelineRow item=item /> }).collect_view()}
        </ol>
    }
    .into_view()
}

#[component]
fn TimelineRow(item: TimelineItem) -> impl IntoView {
    let TimelineItem {
        title,
        date,
        icon,
        content,
        is_public,
        author,
    } = item;

    view! {
        <li class="ml-6">
            <span class="absolute -left-3 flex items-center justify-center w-6 h-6 bg-white rounded-full ring-4 ring-gray-100">
                {icon.glyph()}
            </span>
            <div class="flex items-center space-x-2">
                <h3 class="font-semibold text-gray-900">{title}</h3>
                {(!is_public).then(|| view! {
                    <span class="px-2 py-0.5 text-xs rounded bg-purple-100 text-purple-800">
                        "Internal"
                    </span>
                })}
            </div>
            <time class="block text-xs text-gray-500 mb-1">{date}" · "{author}</time>
            {content.map(|text| view! {
                <p class="text-sm text-gray-700 whitespace-pre-line">{text}</p>
            })}
        </li>
    }
}
