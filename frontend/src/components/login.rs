use crate::api::use_api;
use crate::auth;
use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let api = use_api();
    let router = use_router();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match auth::login(&auth_ctx, &api, &email.get(), &password.get()).await {
                // 会话信号变化也会触发重定向；这里显式导航避免等下一轮评估
                Ok(()) => router.navigate(AppRoute::Dashboard),
                Err(err) => set_error_msg.set(Some(err.message())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Login"</h1>
                    <p class="text-base-content/70">"Sign in to see your courses and tasks"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Log In".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm text-base-content/70 mt-4">
                            "Don't have an account? "
                            <a href="#/register" class="link link-primary">"Sign up"</a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
