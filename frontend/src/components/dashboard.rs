use crate::api::use_api;
use crate::auth::{self, use_auth};
use crate::components::course_dialog::{AddCourseDialog, EditCourseDialog};
use crate::components::reminders::RemindersBanner;
use crate::components::sidebar::Sidebar;
use crate::components::task_dialog::{AddTaskDialog, EditTaskDialog};
use crate::components::task_list::TaskList;
use crate::log_error;
use crate::web::BrowserTokenStore;
use coursework_shared::protocol::{
    CreateCourseRequest, CreateTaskRequest, UpdateCourseRequest, UpdateTaskRequest,
};
use coursework_shared::view::{
    CourseFilter, SortDirection, SortKey, ViewSpec, derive_view, reconcile_course_removed,
    reconcile_created, reconcile_removed, reconcile_updated,
};
use coursework_shared::{Course, Task};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let api = use_api();

    // 原始集合（本页是唯一持有者，只通过 reconcile_* 改动）
    let (courses, set_courses) = signal(Vec::<Course>::new());
    let (tasks, set_tasks) = signal(Vec::<Task>::new());
    let (loading, set_loading) = signal(true);
    let (load_error, set_load_error) = signal(Option::<String>::None);

    // 视图条件与弹窗状态
    let (view_spec, set_view_spec) = signal(ViewSpec::default());
    let (editing_course, set_editing_course) = signal(Option::<Course>::None);
    let (editing_task, set_editing_task) = signal(Option::<Task>::None);
    let (notification, set_notification) = signal(Option::<(String, bool)>::None); // 消息内容, 是否出错

    let notify = move |message: String, is_error: bool| {
        set_notification.set(Some((message, is_error)));
    };

    // 课程与任务并发拉取；任一失败整页进入错误态，丢弃半份数据
    let load_page = {
        let api = api.clone();
        move || {
            let api = api.clone();
            set_loading.set(true);
            set_load_error.set(None);
            spawn_local(async move {
                let (courses_result, tasks_result) =
                    futures::join!(api.get_courses(), api.get_tasks());
                match (courses_result, tasks_result) {
                    (Ok(course_list), Ok(task_list)) => {
                        set_courses.set(course_list);
                        set_tasks.set(task_list);
                    }
                    (Err(err), _) | (_, Err(err)) => {
                        log_error!("[Dashboard] load failed: {}", err);
                        set_load_error.set(Some(err.message()));
                    }
                }
                set_loading.set(false);
            });
        }
    };

    // 初始加载
    {
        let load_page = load_page.clone();
        Effect::new(move |_| load_page());
    }
    let on_retry = {
        let load_page = load_page.clone();
        move |_| load_page()
    };
    let on_refresh = move |_| load_page();

    // 3 秒后清除通知
    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || set_notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    // 派生视图：过滤 + 排序全部交给视图引擎
    let visible_tasks = Signal::derive(move || derive_view(&tasks.get(), &view_spec.get()));

    // --- 课程操作 ---

    let on_select_course = Callback::new(move |filter: CourseFilter| {
        set_view_spec.update(|spec| spec.selected_course = filter);
    });

    let on_start_edit_course =
        Callback::new(move |course: Course| set_editing_course.set(Some(course)));

    let on_add_course = Callback::new({
        let api = api.clone();
        move |request: CreateCourseRequest| {
            let api = api.clone();
            spawn_local(async move {
                match api.create_course(request).await {
                    Ok(course) => {
                        set_courses.update(|list| reconcile_created(list, course));
                        notify("Course added".to_string(), false);
                    }
                    Err(err) => notify(err.message(), true),
                }
            });
        }
    });

    let on_update_course = Callback::new({
        let api = api.clone();
        move |request: UpdateCourseRequest| {
            let api = api.clone();
            spawn_local(async move {
                match api.update_course(request).await {
                    Ok(course) => {
                        set_courses.update(|list| {
                            reconcile_updated(list, course);
                        });
                        set_editing_course.set(None);
                        notify("Course updated".to_string(), false);
                    }
                    Err(err) => notify(err.message(), true),
                }
            });
        }
    });

    let on_delete_course = Callback::new({
        let api = api.clone();
        move |id: String| {
            let api = api.clone();
            spawn_local(async move {
                match api.delete_course(&id).await {
                    Ok(()) => {
                        // 级联：本地同步移除课程、它的任务，并复位过滤器
                        set_courses.update(|course_list| {
                            set_tasks.update(|task_list| {
                                set_view_spec.update(|spec| {
                                    reconcile_course_removed(course_list, task_list, spec, &id);
                                });
                            });
                        });
                        notify("Course deleted".to_string(), false);
                    }
                    Err(err) => notify(err.message(), true),
                }
            });
        }
    });

    // --- 任务操作 ---

    let on_start_edit_task = Callback::new(move |task: Task| set_editing_task.set(Some(task)));

    let on_add_task = Callback::new({
        let api = api.clone();
        move |request: CreateTaskRequest| {
            let api = api.clone();
            spawn_local(async move {
                match api.create_task(request).await {
                    Ok(task) => {
                        set_tasks.update(|list| reconcile_created(list, task));
                        notify("Task added".to_string(), false);
                    }
                    Err(err) => notify(err.message(), true),
                }
            });
        }
    });

    let on_update_task = Callback::new({
        let api = api.clone();
        move |request: UpdateTaskRequest| {
            let api = api.clone();
            spawn_local(async move {
                match api.update_task(request).await {
                    Ok(task) => {
                        set_tasks.update(|list| {
                            reconcile_updated(list, task);
                        });
                        set_editing_task.set(None);
                        notify("Task updated".to_string(), false);
                    }
                    Err(err) => notify(err.message(), true),
                }
            });
        }
    });

    let on_toggle_task = Callback::new({
        let api = api.clone();
        move |task: Task| {
            let api = api.clone();
            spawn_local(async move {
                // 状态翻转就是一次只改 status 的更新
                let request = UpdateTaskRequest::from_task(&task.with_toggled_status());
                match api.update_task(request).await {
                    Ok(updated) => {
                        set_tasks.update(|list| {
                            reconcile_updated(list, updated);
                        });
                    }
                    Err(err) => notify(err.message(), true),
                }
            });
        }
    });

    let on_delete_task = Callback::new({
        let api = api.clone();
        move |id: String| {
            let api = api.clone();
            spawn_local(async move {
                match api.delete_task(&id).await {
                    Ok(()) => {
                        set_tasks.update(|list| {
                            reconcile_removed(list, &id);
                        });
                        notify("Task deleted".to_string(), false);
                    }
                    Err(err) => notify(err.message(), true),
                }
            });
        }
    });

    let on_logout = move |_| {
        auth::logout(&auth_ctx, &BrowserTokenStore);
        // 导航由路由服务的会话监听自动处理
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-6">
                // 通知提示框
                <Show when=move || notification.get().is_some()>
                    <div class="toast toast-top toast-end z-50">
                        <div class=move || {
                            let is_error = notification.get().map(|(_, e)| e).unwrap_or(false);
                            if is_error {
                                "alert alert-error shadow-lg"
                            } else {
                                "alert alert-success shadow-lg"
                            }
                        }>
                            <span>{move || notification.get().map(|(text, _)| text).unwrap_or_default()}</span>
                        </div>
                    </div>
                </Show>

                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1">
                        <a class="btn btn-ghost text-xl">"CourseWork Lite"</a>
                    </div>
                    <div class="flex-none gap-2">
                        <AddCourseDialog on_add=on_add_course />
                        <AddTaskDialog courses=courses on_add=on_add_task />
                        <a href="#/account" class="btn btn-ghost btn-sm">"Account"</a>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                            "Logout"
                        </button>
                    </div>
                </div>

                <Show when=move || load_error.get().is_some()>
                    <div role="alert" class="alert alert-error">
                        <span>{move || load_error.get().unwrap_or_default()}</span>
                        <button class="btn btn-sm" on:click=on_retry.clone()>"Retry"</button>
                    </div>
                </Show>

                <Show when=move || loading.get() && load_error.get().is_none()>
                    <div class="flex items-center justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>

                <Show when=move || !loading.get() && load_error.get().is_none()>
                    <RemindersBanner tasks=tasks />

                    <div class="flex flex-col md:flex-row gap-6 items-start">
                        <Sidebar
                            courses=courses
                            selected=Signal::derive(move || view_spec.get().selected_course)
                            on_select=on_select_course
                            on_edit=on_start_edit_course
                            on_delete=on_delete_course
                        />

                        <div class="card bg-base-100 shadow-xl flex-1 w-full">
                            <div class="card-body p-0">
                                <div class="flex flex-wrap items-center justify-between gap-4 p-6 pb-2">
                                    <h3 class="card-title">
                                        {move || if view_spec.get().show_archived {
                                            "Archived Tasks"
                                        } else {
                                            "Tasks"
                                        }}
                                    </h3>
                                    <div class="flex items-center gap-3">
                                        <label class="label cursor-pointer gap-2">
                                            <span class="label-text">"Show archived"</span>
                                            <input
                                                type="checkbox"
                                                class="toggle toggle-primary toggle-sm"
                                                prop:checked=move || view_spec.get().show_archived
                                                on:change=move |ev| {
                                                    let checked = event_target_checked(&ev);
                                                    set_view_spec.update(|spec| spec.show_archived = checked);
                                                }
                                            />
                                        </label>
                                        <select
                                            class="select select-bordered select-sm"
                                            on:change=move |ev| {
                                                let key = SortKey::from_str_or_default(&event_target_value(&ev));
                                                set_view_spec.update(|spec| spec.sort_key = key);
                                            }
                                        >
                                            <option value="dueDate" selected=move || view_spec.get().sort_key == SortKey::DueDate>"Due date"</option>
                                            <option value="title" selected=move || view_spec.get().sort_key == SortKey::Title>"Title"</option>
                                            <option value="priority" selected=move || view_spec.get().sort_key == SortKey::Priority>"Priority"</option>
                                        </select>
                                        <select
                                            class="select select-bordered select-sm"
                                            on:change=move |ev| {
                                                let direction = SortDirection::from_str_or_default(&event_target_value(&ev));
                                                set_view_spec.update(|spec| spec.sort_direction = direction);
                                            }
                                        >
                                            <option value="ascending" selected=move || view_spec.get().sort_direction == SortDirection::Ascending>"Ascending"</option>
                                            <option value="descending" selected=move || view_spec.get().sort_direction == SortDirection::Descending>"Descending"</option>
                                        </select>
                                        <button class="btn btn-ghost btn-sm btn-circle" on:click=on_refresh.clone()>
                                            "↻"
                                        </button>
                                    </div>
                                </div>

                                <TaskList
                                    tasks=visible_tasks
                                    courses=courses
                                    on_toggle=on_toggle_task
                                    on_edit=on_start_edit_task
                                    on_delete=on_delete_task
                                />
                            </div>
                        </div>
                    </div>
                </Show>

                // 编辑弹窗（按需渲染）
                {move || editing_course.get().map(|course| view! {
                    <EditCourseDialog
                        course=course
                        on_save=on_update_course
                        on_close=move |_: ()| set_editing_course.set(None)
                    />
                })}
                {move || editing_task.get().map(|task| view! {
                    <EditTaskDialog
                        task=task
                        courses=courses
                        on_save=on_update_task
                        on_close=move |_: ()| set_editing_task.set(None)
                    />
                })}
            </div>
        </div>
    }
}
