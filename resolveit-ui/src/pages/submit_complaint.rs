//! Submit Complaint Page
//!
//! Complaint form with an optional evidence file. Anonymous submissions may
//! leave a contact email instead of an account link.

use leptos::html::Input;
use leptos::*;
use leptos_router::*;

use super::{INPUT_CLASS, PRIMARY_BUTTON};
use crate::api;
use crate::state::validation::{optional, validate_complaint};
use crate::state::{use_global_state, Category, ComplaintDraft};

const PRIORITIES: [&str; 3] = ["LOW", "MEDIUM", "HIGH"];

#[component]
pub fn SubmitComplaint() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let categories = create_rw_signal(Vec::<Category>::new());
    let (title, set_title) = create_signal(String::new());
    let (description, set_description) = create_signal(String::new());
    let (category, set_category) = create_signal(String::from("General"));
    let (priority, set_priority) = create_signal(String::from("MEDIUM"));
    let (anonymous, set_anonymous) = create_signal(false);
    let (contact_email, set_contact_email) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);
    let file_input = create_node_ref::<Input>();

    create_effect(move |_| {
        spawn_local(async move {
            match api::directory::categories().await {
                Ok(list) => categories.set(list),
                Err(e) => state.show_error(&format!("Failed to load categories: {}", e)),
            }
        });
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let (title, description) = (title.get(), description.get());
        if let Err(message) = validate_complaint(&title, &description) {
            state.show_error(&message);
            return;
        }

        let is_anonymous = anonymous.get();
        let draft = ComplaintDraft {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            category: category.get(),
            priority: priority.get(),
            is_anonymous,
            anonymous_email: if is_anonymous {
                optional(&contact_email.get())
            } else {
                None
            },
        };
        let file = file_input
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));

        set_submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::complaints::create(&draft, file).await {
                Ok(complaint) => {
                    state.show_success(&format!(
                        "Complaint #{} submitted",
                        complaint.complaint_id
                    ));
                    navigate("/dashboard", Default::default());
                }
                Err(e) => state.show_error(&e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <h1 class="text-3xl font-bold">"Submit a complaint"</h1>

            <form on:submit=on_submit class="bg-white rounded-xl shadow-sm border border-gray-200 p-6 space-y-5">
                <div class="flex space-x-2">
                    <VisibilityButton label="Public" active=Signal::derive(move || !anonymous.get())
                        on_select=move || set_anonymous.set(false) />
                    <VisibilityButton label="Anonymous" active=Signal::derive(move || anonymous.get())
                        on_select=move || set_anonymous.set(true) />
                </div>

                <Show when=move || anonymous.get()>
                    <input
                        type="email"
                        placeholder="Contact email (optional)"
                        prop:value=move || contact_email.get()
                        on:input=move |ev| set_contact_email.set(event_target_value(&ev))
                        class=INPUT_CLASS
                    />
                </Show>

                <input
                    type="text"
                    placeholder="Subject"
                    prop:value=move || title.get()
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <textarea
                    rows="6"
                    placeholder="Describe the issue"
                    prop:value=move || description.get()
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                    class=INPUT_CLASS
                />

                <div class="grid grid-cols-2 gap-4">
                    <label class="block">
                        <span class="text-sm text-gray-600">"Category"</span>
                        <select
                            on:change=move |ev| set_category.set(event_target_value(&ev))
                            class=INPUT_CLASS
                        >
                            {move || categories.get().into_iter().map(|c| {
                                let name = c.category_name.clone();
                                let selected = name == category.get_untracked();
                                view! { <option value=name.clone() selected=selected>{name}</option> }
                            }).collect_view()}
                        </select>
                    </label>
                    <label class="block">
                        <span class="text-sm text-gray-600">"Priority"</span>
                        <select
                            on:change=move |ev| set_priority.set(event_target_value(&ev))
                            class=INPUT_CLASS
                        >
                            {PRIORITIES.into_iter().map(|p| view! {
                                <option value=p selected=move || priority.get() == p>{p}</option>
                            }).collect_view()}
                        </select>
                    </label>
                </div>

                <label class="block">
                    <span class="text-sm text-gray-600">"Evidence (optional)"</span>
                    <input type="file" node_ref=file_input class="block mt-1 text-sm" />
                </label>

                <button type="submit" disabled=move || submitting.get() class=PRIMARY_BUTTON>
                    {move || if submitting.get() { "Submitting..." } else { "Submit" }}
                </button>
            </form>
        </div>
    }
}

#[component]
fn VisibilityButton(
    label: &'static str,
    #[prop(into)]
    active: Signal<bool>,
    on_select: impl Fn() + 'static,
) -> impl IntoView {
    view! {
        <button
            type="button"
            on:click=move |_| on_select()
            class=move || {
                if active.get() {
                    "px-4 py-2 rounded-lg bg-indigo-600 text-white"
                } else {
                    "px-4 py-2 rounded-lg bg-gray-100 text-gray-700 hover:bg-gray-200"
                }
            }
        >
            {label}
        </button>
    }
}
