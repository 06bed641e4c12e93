use leptos::prelude::*;

/// 落地页：未登录用户的入口
#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-md">
                    <h1 class="text-4xl font-bold mb-4">"Welcome to CourseWork Lite"</h1>
                    <p class="text-lg mb-6 text-base-content/70">"Your personal academic organizer."</p>
                    <div class="flex justify-center gap-2">
                        <a href="#/login" class="btn btn-primary">"Login"</a>
                        <a href="#/register" class="btn btn-neutral">"Register"</a>
                    </div>
                </div>
            </div>
        </div>
    }
}
