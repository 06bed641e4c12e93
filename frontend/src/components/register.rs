use crate::api::use_api;
use crate::auth;
use crate::web::route::AppRoute;
use crate::web::router::rewrite_hash;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let api = use_api();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get().is_empty() || email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);
        set_success_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            // 注册成功不会自动登录，稍候把用户带去登录页
            match auth::register(&api, &username.get(), &email.get(), &password.get()).await {
                Ok(_) => {
                    set_success_msg
                        .set(Some("Registration successful! You can now log in.".to_string()));
                    set_timeout(
                        move || rewrite_hash(AppRoute::Login),
                        Duration::from_secs(2),
                    );
                }
                Err(err) => set_error_msg.set(Some(err.message())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create an Account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <Show when=move || success_msg.get().is_some()>
                            <div role="alert" class="alert alert-success text-sm py-2">
                                <span>{move || success_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password (min 8 characters)"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                minlength="8"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Registering..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm text-base-content/70 mt-4">
                            "Already have an account? "
                            <a href="#/login" class="link link-primary">"Log in"</a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
