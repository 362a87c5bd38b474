//! Students Page
//!
//! Directory listing with edit and delete actions.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::ListSkeleton;
use crate::state::{use_global_state, Student};

#[component]
pub fn Students() -> impl IntoView {
    let state = use_global_state();
    let students = create_rw_signal(None::<Vec<Student>>);
    let (search, set_search) = create_signal(String::new());

    create_effect(move |_| {
        spawn_local(async move {
            match api::students::list().await {
                Ok(list) => students.set(Some(list)),
                Err(e) => {
                    students.set(Some(Vec::new()));
                    state.show_error(&format!("Failed to load students: {}", e));
                }
            }
        });
    });

    let remove = move |student: Student| {
        let confirmed = web_sys::window()
            .and_then(|w| {
                w.confirm_with_message(&format!("Delete {}?", student.name))
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match api::students::remove(student.id).await {
                Ok(()) => {
                    students.update(|list| {
                        if let Some(list) = list {
                            list.retain(|s| s.id != student.id);
                        }
                    });
                    state.show_success("Student deleted");
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    let filtered = move || {
        let needle = search.get().to_lowercase();
        students.get().map(|list| {
            list.into_iter()
                .filter(|s| {
                    needle.is_empty()
                        || s.name.to_lowercase().contains(&needle)
                        || s.email.to_lowercase().contains(&needle)
                        || s.department.to_lowercase().contains(&needle)
                })
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"Students"</h1>
                <A href="/students/add" class="px-5 py-3 bg-indigo-600 hover:bg-indigo-700 text-white rounded-lg font-medium">
                    "+ Add student"
                </A>
            </div>

            <input
                type="search"
                placeholder="Search by name, email or department"
                on:input=move |ev| set_search.set(event_target_value(&ev))
                class="w-full rounded-lg px-4 py-2 border border-gray-300"
            />

            <section class="bg-white rounded-xl shadow-sm border border-gray-200 overflow-hidden">
                {move || match filtered() {
                    None => view! { <div class="p-6"><ListSkeleton /></div> }.into_view(),
                    Some(list) if list.is_empty() => view! {
                        <p class="p-6 text-gray-500">"No students found."</p>
                    }.into_view(),
                    Some(list) => view! {
                        <table class="w-full text-sm">
                            <thead class="bg-gray-50 text-left text-gray-600">
                                <tr>
                                    <th class="px-4 py-3">"Name"</th>
                                    <th class="px-4 py-3">"Email"</th>
                                    <th class="px-4 py-3">"Department"</th>
                                    <th class="px-4 py-3">"Phone"</th>
                                    <th class="px-4 py-3" />
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-gray-100">
                                {list.into_iter().map(|s| {
                                    let edit = format!("/students/edit/{}", s.id);
                                    let target = s.clone();
                                    view! {
                                        <tr>
                                            <td class="px-4 py-3 font-medium">{s.name}</td>
                                            <td class="px-4 py-3">{s.email}</td>
                                            <td class="px-4 py-3">{s.department}</td>
                                            <td class="px-4 py-3">{s.phone.unwrap_or_else(|| "-".to_string())}</td>
                                            <td class="px-4 py-3 text-right space-x-3">
                                                <A href=edit class="text-indigo-600 hover:underline">"Edit"</A>
                                                <button
                                                    on:click=move |_| remove(target.clone())
                                                    class="text-red-600 hover:underline"
                                                >
                                                    "Delete"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view(),
                }}
            </section>
        </div>
    }
}
