//! Complaint Status Page
//!
//! Details, evidence and history of one complaint. Staff get the handling
//! panel; the owner of a resolved complaint can close or reopen it.

use std::future::Future;
use std::pin::Pin;

use leptos::*;
use leptos_router::*;

use super::{INPUT_CLASS, PRIMARY_BUTTON};
use crate::api;
use crate::components::{Loading, PriorityBadge, StatusBadge, Timeline};
use crate::state::timeline::format_timestamp;
use crate::state::validation::{optional, validate_reopen, validate_resolution};
use crate::state::{use_global_state, Attachment, Complaint, TimelineEntry, User};

type Action = Pin<Box<dyn Future<Output = Result<(), String>>>>;

#[derive(Clone, PartialEq)]
struct Details {
    complaint: Complaint,
    timeline: Vec<TimelineEntry>,
    attachments: Vec<Attachment>,
    staff: Vec<User>,
}

fn human_size(bytes: i64) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{} B", b),
    }
}

#[component]
pub fn ComplaintStatus() -> impl IntoView {
    let state = use_global_state();
    let params = use_params_map();
    let id = move || {
        params.with(|p| p.get("id").and_then(|v| v.parse::<i64>().ok()))
    };

    let details = create_rw_signal(None::<Details>);
    let (load_error, set_load_error) = create_signal(None::<String>);
    let (version, set_version) = create_signal(0u32);
    let reload = move || set_version.update(|v| *v += 1);

    create_effect(move |_| {
        version.get();
        let Some(id) = id() else {
            set_load_error.set(Some("Invalid complaint id".to_string()));
            return;
        };
        let staff = state.is_staff();
        spawn_local(async move {
            set_load_error.set(None);
            let users = async {
                if staff {
                    api::directory::users().await
                } else {
                    Ok(Vec::new())
                }
            };
            let (complaint, timeline, attachments, users) = futures_util::join!(
                api::complaints::get_one(id),
                api::complaints::timeline(id),
                api::complaints::attachments(id),
                users,
            );

            let loaded = complaint.and_then(|complaint| {
                Ok(Details {
                    complaint,
                    timeline: timeline?,
                    attachments: attachments?,
                    staff: users
                        .unwrap_or_default()
                        .into_iter()
                        .filter(User::is_staff)
                        .collect(),
                })
            });
            match loaded {
                Ok(d) => details.set(Some(d)),
                Err(e) => set_load_error.set(Some(e)),
            }
        });
    });

    view! {
        <div class="max-w-4xl mx-auto space-y-6">
            {move || {
                if let Some(error) = load_error.get() {
                    return view! {
                        <div class="bg-white rounded-xl border border-red-200 p-8 text-center space-y-4">
                            <p class="text-red-600">{error}</p>
                            <button on:click=move |_| reload() class=PRIMARY_BUTTON>"Retry"</button>
                        </div>
                    }.into_view();
                }
                match details.get() {
                    None => view! { <Loading /> }.into_view(),
                    Some(d) => {
                        let user = state.user();
                        let staff_panel = state.is_staff() && d.complaint.is_actionable();
                        let owner_panel = d.complaint.status == "RESOLVED"
                            && user.as_ref().is_some_and(|u| d.complaint.is_owned_by(u));
                        let complaint_id = d.complaint.complaint_id;
                        view! {
                            <Summary complaint=d.complaint.clone() attachments=d.attachments.clone() />
                            {staff_panel.then(|| view! {
                                <StaffPanel
                                    complaint_id=complaint_id
                                    status=d.complaint.status.clone()
                                    staff=d.staff.clone()
                                    on_done=reload
                                />
                            })}
                            {owner_panel.then(|| view! {
                                <OwnerPanel complaint_id=complaint_id on_done=reload />
                            })}
                            <section class="bg-white rounded-xl shadow-sm border border-gray-200 p-6">
                                <h2 class="text-xl font-semibold mb-4">"Timeline"</h2>
                                <Timeline entries=d.timeline.clone() />
                            </section>
                        }.into_view()
                    }
                }
            }}
        </div>
    }
}

#[component]
fn Summary(complaint: Complaint, attachments: Vec<Attachment>) -> impl IntoView {
    let submitter = if complaint.is_anonymous {
        "Anonymous".to_string()
    } else {
        complaint
            .user
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    };
    let assignee = complaint
        .assigned_to
        .as_ref()
        .map(|u| u.name.clone())
        .unwrap_or_else(|| "Unassigned".to_string());

    view! {
        <section class="bg-white rounded-xl shadow-sm border border-gray-200 p-6 space-y-4">
            <div class="flex items-start justify-between">
                <div>
                    <p class="text-sm text-gray-500">"Complaint #"{complaint.complaint_id}</p>
                    <h1 class="text-2xl font-bold">{complaint.title.clone()}</h1>
                </div>
                <div class="flex items-center space-x-3">
                    <PriorityBadge priority=complaint.priority.clone() />
                    <StatusBadge status=complaint.status.clone() />
                </div>
            </div>
            <p class="text-gray-700 whitespace-pre-line">{complaint.description.clone()}</p>
            <dl class="grid grid-cols-2 md:grid-cols-4 gap-4 text-sm">
                <Field label="Category" value=complaint.category.clone() />
                <Field label="Submitted by" value=submitter />
                <Field label="Assigned to" value=assignee />
                <Field label="Submitted" value=format_timestamp(&complaint.created_at) />
            </dl>
            {(!attachments.is_empty()).then(|| view! {
                <div>
                    <h3 class="text-sm font-semibold text-gray-600 mb-1">"Evidence"</h3>
                    <ul class="text-sm text-gray-700 space-y-1">
                        {attachments.into_iter().map(|a| view! {
                            <li>"📎 "{a.file_name}" ("{human_size(a.file_size)}")"</li>
                        }).collect_view()}
                    </ul>
                </div>
            })}
        </section>
    }
}

#[component]
fn Field(label: &'static str, #[prop(into)] value: String) -> impl IntoView {
    view! {
        <div>
            <dt class="text-gray-500">{label}</dt>
            <dd class="font-medium text-gray-900">{value}</dd>
        </div>
    }
}

/// Assign, comment and resolve
#[component]
fn StaffPanel<F>(complaint_id: i64, status: String, staff: Vec<User>, on_done: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let state = use_global_state();
    let navigate = use_navigate();
    let (assignee, set_assignee) = create_signal(
        staff.first().map(|u| u.id.to_string()).unwrap_or_default(),
    );
    let (comment, set_comment) = create_signal(String::new());
    let (internal, set_internal) = create_signal(false);
    let (resolution, set_resolution) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let run = move |label: &'static str, action: Action| {
        set_busy.set(true);
        spawn_local(async move {
            match action.await {
                Ok(()) => {
                    state.show_success(label);
                    on_done();
                }
                Err(e) => state.show_error(&e),
            }
            set_busy.set(false);
        });
    };

    let assign = move |_| {
        let Ok(user_id) = assignee.get().parse::<i64>() else {
            state.show_error("Choose a staff member");
            return;
        };
        run(
            "Complaint assigned",
            Box::pin(async move { api::complaints::assign(complaint_id, user_id).await.map(|_| ()) }),
        );
    };

    let add_comment = move |_| {
        let text = comment.get();
        if text.trim().is_empty() {
            state.show_error("Comment cannot be empty");
            return;
        }
        let is_public = !internal.get();
        set_comment.set(String::new());
        run(
            "Comment added",
            Box::pin(async move {
                api::complaints::comment(complaint_id, text.trim(), is_public)
                    .await
                    .map(|_| ())
            }),
        );
    };

    let resolve = move |_| {
        let text = resolution.get();
        if let Err(message) = validate_resolution(&text) {
            state.show_error(&message);
            return;
        }
        run(
            "Complaint resolved",
            Box::pin(async move {
                api::complaints::resolve(complaint_id, optional(&text).as_deref())
                    .await
                    .map(|_| ())
            }),
        );
    };

    let start_review = move |_| {
        let update = api::complaints::ComplaintUpdate {
            status: Some("UNDER_REVIEW".to_string()),
            ..Default::default()
        };
        run(
            "Marked under review",
            Box::pin(async move {
                api::complaints::update(complaint_id, &update).await.map(|_| ())
            }),
        );
    };

    let delete = move |_| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Delete this complaint?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::complaints::remove(complaint_id).await {
                Ok(()) => {
                    state.show_success("Complaint deleted");
                    navigate("/dashboard", Default::default());
                }
                Err(e) => state.show_error(&e),
            }
        });
    };

    view! {
        <section class="bg-white rounded-xl shadow-sm border border-indigo-200 p-6 space-y-5">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold">"Handle complaint"</h2>
                <div class="space-x-2">
                    {(status == "NEW").then(|| view! {
                        <button
                            on:click=start_review
                            disabled=move || busy.get()
                            class="px-4 py-2 rounded-lg bg-yellow-100 hover:bg-yellow-200 text-yellow-800"
                        >
                            "Start review"
                        </button>
                    })}
                    <button on:click=delete class="px-4 py-2 rounded-lg text-red-600 hover:bg-red-50">
                        "Delete"
                    </button>
                </div>
            </div>

            <div class="flex space-x-2">
                <select
                    on:change=move |ev| set_assignee.set(event_target_value(&ev))
                    class=INPUT_CLASS
                >
                    {staff.into_iter().map(|u| view! {
                        <option value=u.id.to_string()>{u.name}" ("{u.role}")"</option>
                    }).collect_view()}
                </select>
                <button on:click=assign disabled=move || busy.get() class=PRIMARY_BUTTON>"Assign"</button>
            </div>

            <div class="space-y-2">
                <textarea
                    rows="3"
                    placeholder="Add a comment"
                    prop:value=move || comment.get()
                    on:input=move |ev| set_comment.set(event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <div class="flex items-center justify-between">
                    <label class="flex items-center space-x-2 text-sm text-gray-600">
                        <input
                            type="checkbox"
                            prop:checked=move || internal.get()
                            on:change=move |ev| set_internal.set(event_target_checked(&ev))
                        />
                        <span>"Internal note (hidden from the student)"</span>
                    </label>
                    <button on:click=add_comment disabled=move || busy.get() class=PRIMARY_BUTTON>"Comment"</button>
                </div>
            </div>

            <div class="space-y-2">
                <textarea
                    rows="3"
                    placeholder="Resolution summary"
                    prop:value=move || resolution.get()
                    on:input=move |ev| set_resolution.set(event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <button
                    on:click=resolve
                    disabled=move || busy.get()
                    class="px-6 py-3 bg-green-600 hover:bg-green-700 disabled:bg-gray-400 text-white rounded-lg font-medium"
                >
                    "Mark resolved"
                </button>
            </div>
        </section>
    }
}

/// Close or reopen a resolved complaint
#[component]
fn OwnerPanel<F>(complaint_id: i64, on_done: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let state = use_global_state();
    let (reason, set_reason) = create_signal(String::new());
    let (busy, set_busy) = create_signal(false);

    let close = move |_| {
        set_busy.set(true);
        spawn_local(async move {
            match api::complaints::close(complaint_id, None).await {
                Ok(_) => {
                    state.show_success("Complaint closed. Thank you!");
                    on_done();
                }
                Err(e) => state.show_error(&e),
            }
            set_busy.set(false);
        });
    };

    let reopen = move |_| {
        let text = reason.get();
        if let Err(message) = validate_reopen(&text) {
            state.show_error(&message);
            return;
        }
        set_busy.set(true);
        spawn_local(async move {
            match api::complaints::reopen(complaint_id, text.trim()).await {
                Ok(_) => {
                    state.show_success("Complaint reopened");
                    on_done();
                }
                Err(e) => state.show_error(&e),
            }
            set_busy.set(false);
        });
    };

    view! {
        <section class="bg-white rounded-xl shadow-sm border border-green-200 p-6 space-y-4">
            <h2 class="text-xl font-semibold">"Is this resolved?"</h2>
            <button
                on:click=close
                disabled=move || busy.get()
                class="px-6 py-3 bg-green-600 hover:bg-green-700 disabled:bg-gray-400 text-white rounded-lg font-medium"
            >
                "Yes, close it"
            </button>
            <div class="space-y-2">
                <textarea
                    rows="3"
                    placeholder="Why is this not resolved?"
                    prop:value=move || reason.get()
                    on:input=move |ev| set_reason.set(event_target_value(&ev))
                    class=INPUT_CLASS
                />
                <button
                    on:click=reopen
                    disabled=move || busy.get()
                    class="px-6 py-3 bg-red-600 hover:bg-red-700 disabled:bg-gray-400 text-white rounded-lg font-medium"
                >
                    "Reopen"
                </button>
            </div>
        </section>
    }
}
