//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::components::{Nav, Toast};
use crate::pages::{
    ComplaintStatus, Dashboard, Login, MyComplaints, Profile, Register, Reports, StudentForm,
    Students, SubmitComplaint,
};
use crate::state::{provide_global_state, use_global_state};

/// Paths rendered without the navigation bar
const BARE_PATHS: [&str; 2] = ["/login", "/register"];

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    let state = use_global_state();

    let signed_in = move || state.is_signed_in();
    let staff = move || state.is_staff();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-50 text-gray-900 flex flex-col">
                <NavBar />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=Home />
                        <Route path="/login" view=Login />
                        <Route path="/register" view=Register />

                        <ProtectedRoute path="/dashboard" redirect_path="/login" condition=signed_in view=Dashboard />
                        <ProtectedRoute path="/submit" redirect_path="/login" condition=signed_in view=SubmitComplaint />
                        <ProtectedRoute path="/status/:id" redirect_path="/login" condition=signed_in view=ComplaintStatus />
                        <ProtectedRoute path="/my-complaints" redirect_path="/login" condition=signed_in view=MyComplaints />
                        <ProtectedRoute path="/profile" redirect_path="/login" condition=signed_in view=Profile />

                        <ProtectedRoute path="/students" redirect_path="/dashboard" condition=staff view=Students />
                        <ProtectedRoute path="/students/add" redirect_path="/dashboard" condition=staff view=StudentForm />
                        <ProtectedRoute path="/students/edit/:id" redirect_path="/dashboard" condition=staff view=StudentForm />
                        <ProtectedRoute path="/reports" redirect_path="/dashboard" condition=staff view=Reports />

                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// `/` goes to the dashboard when signed in, else to login
#[component]
fn Home() -> impl IntoView {
    let state = use_global_state();
    let target = if state.is_signed_in() { "/dashboard" } else { "/login" };
    view! { <Redirect path=target /> }
}

#[component]
fn NavBar() -> impl IntoView {
    let state = use_global_state();
    let location = use_location();

    let visible = move || {
        let path = location.pathname.get();
        state.is_signed_in() && !BARE_PATHS.contains(&path.as_str())
    };

    view! {
        <Show when=visible>
            <Nav />
        </Show>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-500 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-indigo-600 hover:bg-indigo-700 text-white rounded-lg font-medium transition-colors"
            >
                "Go home"
            </A>
        </div>
    }
}
