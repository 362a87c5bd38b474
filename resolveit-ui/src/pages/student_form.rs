//! Add / Edit Student Page
//!
//! `/students/add` creates, `/students/edit/:id` loads and updates.

use leptos::*;
use leptos_router::*;

use super::{INPUT_CLASS, PRIMARY_BUTTON};
use crate::api;
use crate::state::validation::{optional, validate_student};
use crate::state::{use_global_state, StudentInput};

#[component]
pub fn StudentForm() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();
    let params = use_params_map();
    let editing = move || params.with(|p| p.get("id").and_then(|v| v.parse::<i64>().ok()));

    let (name, set_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (department, set_department) = create_signal(String::new());
    let (phone, set_phone) = create_signal(String::new());
    let (saving, set_saving) = create_signal(false);

    create_effect(move |_| {
        let Some(id) = editing() else { return };
        spawn_local(async move {
            match api::students::get_one(id).await {
                Ok(student) => {
                    set_name.set(student.name);
                    set_email.set(student.email);
                    set_department.set(student.department);
                    set_phone.set(student.phone.unwrap_or_default());
                }
                Err(e) => state.show_error(&format!("Failed to load student: {}", e)),
            }
        });
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let input = StudentInput {
            name: name.get().trim().to_string(),
            email: email.get().trim().to_string(),
            department: department.get().trim().to_string(),
            phone: optional(&phone.get()),
        };
        if let Err(message) = validate_student(&input.name, &input.email, &input.department) {
            state.show_error(&message);
            return;
        }

        set_saving.set(true);
        let id = editing();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = match id {
                Some(id) => api::students::update(id, &input).await,
                None => api::students::create(&input).await,
            };
            match result {
                Ok(_) => {
                    state.show_success(if id.is_some() { "Student updated" } else { "Student added" });
                    navigate("/students", Default::default());
                }
                Err(e) => state.show_error(&e),
            }
            set_saving.set(false);
        });
    };

    let field = move |label: &'static str,
                      kind: &'static str,
                      value: ReadSignal<String>,
                      set: WriteSignal<String>| {
        view! {
            <label class="block">
                <span class="text-sm text-gray-600">{label}</span>
                <input
                    type=kind
                    prop:value=move || value.get()
                    on:input=move |ev| set.set(event_target_value(&ev))
                    class=INPUT_CLASS
                />
            </label>
        }
    };

    view! {
        <div class="max-w-xl mx-auto space-y-6">
            <h1 class="text-3xl font-bold">
                {move || if editing().is_some() { "Edit student" } else { "Add student" }}
            </h1>
            <form on:submit=on_submit class="bg-white rounded-xl shadow-sm border border-gray-200 p-6 space-y-4">
                {field("Name", "text", name, set_name)}
                {field("Email", "email", email, set_email)}
                {field("Department", "text", department, set_department)}
                {field("Phone (optional)", "tel", phone, set_phone)}
                <div class="flex space-x-3">
                    <button type="submit" disabled=move || saving.get() class=PRIMARY_BUTTON>
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                    <A href="/students" class="px-6 py-3 rounded-lg bg-gray-100 hover:bg-gray-200">"Cancel"</A>
                </div>
            </form>
        </div>
    }
}
