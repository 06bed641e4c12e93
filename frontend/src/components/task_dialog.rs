use coursework_shared::date::{date_input_value, due_date_from_input};
use coursework_shared::protocol::{CreateTaskRequest, UpdateTaskRequest};
use coursework_shared::{Course, Priority, Task, TaskStatus};
use leptos::prelude::*;

/// 空文本字段按缺省处理
fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

// =========================================================
// 新建任务
// =========================================================

/// 新建任务只填标题和课程，其余字段由后端给默认值
#[component]
pub fn AddTaskDialog(
    #[prop(into)] courses: Signal<Vec<Course>>,
    #[prop(into)] on_add: Callback<CreateTaskRequest>,
) -> impl IntoView {
    let (open, set_open) = signal(false);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    let (title, set_title) = signal(String::new());
    let (course_id, set_course_id) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_open = move |_| {
        // 预选第一个课程，和下拉框的默认显示保持一致
        if course_id.get().is_empty() {
            let list = courses.get();
            if let Some(course) = list.first() {
                set_course_id.set(course.id.clone());
            }
        }
        set_error_msg.set(None);
        set_open.set(true);
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if course_id.get().is_empty() {
            set_error_msg.set(Some("Please select a course.".to_string()));
            return;
        }
        on_add.run(CreateTaskRequest {
            title: title.get(),
            course_id: course_id.get(),
        });
        set_open.set(false);
        set_title.set(String::new());
    };

    view! {
        <button class="btn btn-primary btn-sm" on:click=on_open>
            "+ Add Task"
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Add New Task"</h3>
                <form on:submit=on_submit class="space-y-4 mt-4">
                    <Show when=move || error_msg.get().is_some()>
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                    </Show>
                    <div class="form-control">
                        <label class="label" for="task-title">
                            <span class="label-text">"Task Title"</span>
                        </label>
                        <input
                            id="task-title"
                            type="text"
                            minlength="3"
                            on:input=move |ev| set_title.set(event_target_value(&ev))
                            prop:value=title
                            class="input input-bordered w-full"
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="task-course">
                            <span class="label-text">"Course"</span>
                        </label>
                        <select
                            id="task-course"
                            class="select select-bordered w-full"
                            on:change=move |ev| set_course_id.set(event_target_value(&ev))
                            required
                        >
                            <Show when=move || courses.get().is_empty()>
                                <option disabled>"Please create a course first"</option>
                            </Show>
                            <For
                                each=move || courses.get()
                                key=|course| course.id.clone()
                                children=move |course| {
                                    let id = course.id.clone();
                                    let value = course.id.clone();
                                    view! {
                                        <option
                                            value=value
                                            selected=move || course_id.get() == id
                                        >
                                            {course.course_name.clone()}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </div>
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary">"Add Task"</button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}

// =========================================================
// 编辑任务
// =========================================================

/// 任务编辑表单状态
#[derive(Clone, Copy)]
struct TaskFormState {
    title: RwSignal<String>,
    description: RwSignal<String>,
    /// `<input type="date">` 的值（YYYY-MM-DD 或空串）
    due_date: RwSignal<String>,
    priority: RwSignal<Priority>,
    status: RwSignal<TaskStatus>,
    course_id: RwSignal<String>,
}

impl TaskFormState {
    fn from_task(task: &Task) -> Self {
        Self {
            title: RwSignal::new(task.title.clone()),
            description: RwSignal::new(task.description.clone().unwrap_or_default()),
            due_date: RwSignal::new(date_input_value(task.due_date.as_deref())),
            priority: RwSignal::new(task.priority),
            status: RwSignal::new(task.status),
            course_id: RwSignal::new(task.course_id.clone()),
        }
    }

    fn to_update_request(self, id: String) -> UpdateTaskRequest {
        UpdateTaskRequest {
            id,
            title: self.title.get(),
            description: optional(self.description.get()),
            due_date: due_date_from_input(&self.due_date.get()),
            priority: self.priority.get(),
            status: self.status.get(),
            course_id: self.course_id.get(),
        }
    }
}

#[component]
pub fn EditTaskDialog(
    task: Task,
    #[prop(into)] courses: Signal<Vec<Course>>,
    #[prop(into)] on_save: Callback<UpdateTaskRequest>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let form = TaskFormState::from_task(&task);
    let task_id = task.id.clone();

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        on_save.run(form.to_update_request(task_id.clone()));
    };

    view! {
        <div class="modal modal-open">
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Edit Task"</h3>
                <form on:submit=on_submit class="space-y-4 mt-4">
                    <div class="form-control">
                        <label class="label" for="edit-title">
                            <span class="label-text">"Task Title"</span>
                        </label>
                        <input
                            id="edit-title"
                            type="text"
                            minlength="3"
                            on:input=move |ev| form.title.set(event_target_value(&ev))
                            prop:value=form.title
                            class="input input-bordered w-full"
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="edit-description">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="edit-description"
                            rows="3"
                            on:input=move |ev| form.description.set(event_target_value(&ev))
                            prop:value=form.description
                            class="textarea textarea-bordered w-full"
                        ></textarea>
                    </div>
                    <div class="form-control">
                        <label class="label" for="edit-due-date">
                            <span class="label-text">"Due Date"</span>
                        </label>
                        <input
                            id="edit-due-date"
                            type="date"
                            on:input=move |ev| form.due_date.set(event_target_value(&ev))
                            prop:value=form.due_date
                            class="input input-bordered w-full"
                        />
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="edit-priority">
                                <span class="label-text">"Priority"</span>
                            </label>
                            <select
                                id="edit-priority"
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    form.priority.set(Priority::from_str_or_default(&event_target_value(&ev)))
                                }
                            >
                                <option value="Low" selected=move || form.priority.get() == Priority::Low>"Low"</option>
                                <option value="Medium" selected=move || form.priority.get() == Priority::Medium>"Medium"</option>
                                <option value="High" selected=move || form.priority.get() == Priority::High>"High"</option>
                            </select>
                        </div>
                        <div class="form-control">
                            <label class="label" for="edit-status">
                                <span class="label-text">"Status"</span>
                            </label>
                            <select
                                id="edit-status"
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    let status = if event_target_value(&ev) == "complete" {
                                        TaskStatus::Complete
                                    } else {
                                        TaskStatus::Active
                                    };
                                    form.status.set(status);
                                }
                            >
                                <option value="active" selected=move || form.status.get() == TaskStatus::Active>"Active"</option>
                                <option value="complete" selected=move || form.status.get() == TaskStatus::Complete>"Complete"</option>
                            </select>
                        </div>
                    </div>
                    <div class="form-control">
                        <label class="label" for="edit-course">
                            <span class="label-text">"Course"</span>
                        </label>
                        <select
                            id="edit-course"
                            class="select select-bordered w-full"
                            on:change=move |ev| form.course_id.set(event_target_value(&ev))
                            required
                        >
                            <For
                                each=move || courses.get()
                                key=|course| course.id.clone()
                                children=move |course| {
                                    let id = course.id.clone();
                                    let value = course.id.clone();
                                    view! {
                                        <option
                                            value=value
                                            selected=move || form.course_id.get() == id
                                        >
                                            {course.course_name.clone()}
                                        </option>
                                    }
                                }
                            />
                        </select>
                    </div>
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| on_close.run(())>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary">"Save Changes"</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
