use crate::api::use_api;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 表单消息：(是否成功, 文案)
type FormMessage = Option<(bool, String)>;

fn message_view(message: ReadSignal<FormMessage>) -> impl IntoView {
    move || {
        message.get().map(|(ok, text)| {
            let class = if ok {
                "alert alert-success text-sm py-2"
            } else {
                "alert alert-error text-sm py-2"
            };
            view! {
                <div role="alert" class=class>
                    <span>{text}</span>
                </div>
            }
        })
    }
}

/// 账号设置页：改邮箱、改密码
///
/// 两个表单彼此独立；都走网关，401 拦截照常生效。
#[component]
pub fn AccountPage() -> impl IntoView {
    let api = use_api();

    // 改邮箱表单
    let (new_email, set_new_email) = signal(String::new());
    let (email_password, set_email_password) = signal(String::new());
    let (email_message, set_email_message) = signal(FormMessage::None);

    // 改密码表单
    let (current_password, set_current_password) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());
    let (password_message, set_password_message) = signal(FormMessage::None);

    let on_email_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            set_email_message.set(None);

            let api = api.clone();
            spawn_local(async move {
                match api.change_email(&new_email.get(), &email_password.get()).await {
                    Ok(()) => {
                        set_email_message.set(Some((
                            true,
                            "Email updated successfully! Please log in again with your new email."
                                .to_string(),
                        )));
                        set_new_email.set(String::new());
                        set_email_password.set(String::new());
                    }
                    Err(err) => set_email_message.set(Some((false, err.message()))),
                }
            });
        }
    };

    let on_password_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            set_password_message.set(None);

            // 客户端校验：两次输入必须一致，不一致不发请求
            if new_password.get() != confirm_password.get() {
                set_password_message
                    .set(Some((false, "New passwords do not match.".to_string())));
                return;
            }

            let api = api.clone();
            spawn_local(async move {
                match api
                    .change_password(&current_password.get(), &new_password.get())
                    .await
                {
                    Ok(()) => {
                        set_password_message
                            .set(Some((true, "Password updated successfully!".to_string())));
                        set_current_password.set(String::new());
                        set_new_password.set(String::new());
                        set_confirm_password.set(String::new());
                    }
                    Err(err) => set_password_message.set(Some((false, err.message()))),
                }
            });
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-2xl mx-auto space-y-8">
                <div class="flex items-center justify-between">
                    <h1 class="text-3xl font-bold">"Account Settings"</h1>
                    <a href="#/dashboard" class="link link-hover">"← Back to Dashboard"</a>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_email_submit>
                        <h2 class="card-title">"Change Email"</h2>
                        <div class="form-control">
                            <label class="label" for="new-email">
                                <span class="label-text">"New Email"</span>
                            </label>
                            <input
                                id="new-email"
                                type="email"
                                on:input=move |ev| set_new_email.set(event_target_value(&ev))
                                prop:value=new_email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email-password">
                                <span class="label-text">"Confirm with Current Password"</span>
                            </label>
                            <input
                                id="email-password"
                                type="password"
                                on:input=move |ev| set_email_password.set(event_target_value(&ev))
                                prop:value=email_password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        {message_view(email_message)}
                        <div class="card-actions justify-end mt-2">
                            <button type="submit" class="btn btn-primary">"Update Email"</button>
                        </div>
                    </form>
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_password_submit>
                        <h2 class="card-title">"Change Password"</h2>
                        <div class="form-control">
                            <label class="label" for="current-password">
                                <span class="label-text">"Current Password"</span>
                            </label>
                            <input
                                id="current-password"
                                type="password"
                                on:input=move |ev| set_current_password.set(event_target_value(&ev))
                                prop:value=current_password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="new-password">
                                <span class="label-text">"New Password"</span>
                            </label>
                            <input
                                id="new-password"
                                type="password"
                                minlength="8"
                                on:input=move |ev| set_new_password.set(event_target_value(&ev))
                                prop:value=new_password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="confirm-password">
                                <span class="label-text">"Confirm New Password"</span>
                            </label>
                            <input
                                id="confirm-password"
                                type="password"
                                on:input=move |ev| set_confirm_password.set(event_target_value(&ev))
                                prop:value=confirm_password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        {message_view(password_message)}
                        <div class="card-actions justify-end mt-2">
                            <button type="submit" class="btn btn-primary">"Update Password"</button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
