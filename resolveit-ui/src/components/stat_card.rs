//! Stat Card Component
//!
//! One headline number with a label.

use leptos::*;

#[component]
pub fn StatCard(
    #[prop(into)]
    label: String,
    #[prop(into)]
    value: MaybeSignal<String>,
    /// Emoji shown beside the label
    #[prop(default = "📋")]
    icon: &'static str,
    #[prop(default = "text-gray-900")]
    accent: &'static str,
) -> impl IntoView {
    view! {
        <div class="bg-white rounded-lg p-5 shadow-sm border border-gray-200">
            <div class="flex items-center justify-between">
                <span class="text-gray-500 text-sm">{label}</span>
                <span class="text-xl">{icon}</span>
            </div>
            <div class=format!("text-3xl font-bold mt-2 {}", accent)>
                {move || value.get()}
            </div>
        </div>
    }
}
